//! Bluesim backend
//!
//! Bluespec's Bluesim flow builds through a make wrapper that produces a
//! runnable `out` script per test, and the simulation itself is that script.
//! Result markers are the `[ERROR]`/`[WARN]` log tags and the `Finished
//! test` line printed by the testbench harness.

use std::path::{Path, PathBuf};

use crate::model::{HdlFile, Test};
use crate::run::patterns::PatternSet;
use crate::run::runner::SimulatorBackend;
use crate::run::RunError;

#[derive(Debug)]
pub struct Bluesim {
    patterns: PatternSet,
}

impl Bluesim {
    pub fn new() -> Result<Self, RunError> {
        Ok(Self {
            patterns: PatternSet::compile(r"\[ERROR\]", r"\[WARN\]", r"Finished test")?,
        })
    }
}

impl SimulatorBackend for Bluesim {
    fn name(&self) -> &'static str {
        "bluesim"
    }

    fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    fn compile_command(&self, file: &HdlFile, build_dir: &Path) -> Vec<String> {
        let mut command = vec![
            "make".to_string(),
            format!("BUILDDIR={}", build_dir.display()),
            format!("RUN_TEST={}", file.name()),
            "NOCOLOR=1".to_string(),
        ];
        command.extend(file.com_options().iter().cloned());
        command.push(build_dir.join("out").display().to_string());
        command
    }

    fn simulate_command(&self, test: &Test, output_root: &Path) -> Vec<String> {
        vec![
            "bash".to_string(),
            self.build_artifact(test, output_root).display().to_string(),
        ]
    }

    fn build_artifact(&self, test: &Test, output_root: &Path) -> PathBuf {
        output_root
            .join("library")
            .join(test.testcase().name().to_lowercase())
            .join("out")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestCase;

    #[test]
    fn compile_command_carries_build_dir_and_com_options() {
        let backend = Bluesim::new().unwrap();
        let file = HdlFile::new("TbCounter", "test/TbCounter.bsv", vec!["VERBOSE=1".into()]);
        let command = backend.compile_command(&file, Path::new("/out/library/tbcounter"));

        assert_eq!(command[0], "make");
        assert!(command.contains(&"BUILDDIR=/out/library/tbcounter".to_string()));
        assert!(command.contains(&"RUN_TEST=TbCounter".to_string()));
        assert!(command.contains(&"NOCOLOR=1".to_string()));
        assert!(command.contains(&"VERBOSE=1".to_string()));
        assert_eq!(command.last().unwrap(), "/out/library/tbcounter/out");
    }

    #[test]
    fn simulate_command_runs_the_generated_script() {
        let backend = Bluesim::new().unwrap();
        let test = Test::new(
            "work",
            "TbCounter",
            TestCase::new("TcBasic"),
            "test/TbCounter.bsv",
            "/out/test/tcbasic",
        );
        let command = backend.simulate_command(&test, Path::new("/out"));
        assert_eq!(command, ["bash", "/out/library/tcbasic/out"]);
    }
}
