//! GHDL backend
//!
//! Analyzes each file into a per-library workdir and elaborates/runs the
//! testbench in one step. GHDL prefixes diagnostics with `error:` /
//! `warning:`; the success check is the summary line our VHDL harness
//! reports at the end of a clean run.

use std::path::{Path, PathBuf};

use crate::model::{HdlFile, Test};
use crate::run::patterns::PatternSet;
use crate::run::runner::SimulatorBackend;
use crate::run::RunError;

const VHDL_STD: &str = "--std=08";

#[derive(Debug)]
pub struct Ghdl {
    patterns: PatternSet,
}

impl Ghdl {
    pub fn new() -> Result<Self, RunError> {
        Ok(Self {
            patterns: PatternSet::compile(
                r"(?i)\berror:",
                r"(?i)\bwarning:",
                r"(?i)simulation (?:finished|completed)",
            )?,
        })
    }
}

impl SimulatorBackend for Ghdl {
    fn name(&self) -> &'static str {
        "ghdl"
    }

    fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    fn compile_command(&self, file: &HdlFile, build_dir: &Path) -> Vec<String> {
        let mut command = vec![
            "ghdl".to_string(),
            "-a".to_string(),
            VHDL_STD.to_string(),
            format!("--workdir={}", build_dir.display()),
        ];
        command.extend(file.com_options().iter().cloned());
        command.push(file.path().display().to_string());
        command
    }

    fn simulate_command(&self, test: &Test, output_root: &Path) -> Vec<String> {
        vec![
            "ghdl".to_string(),
            "--elab-run".to_string(),
            VHDL_STD.to_string(),
            format!(
                "--workdir={}",
                output_root
                    .join("library")
                    .join(test.library().to_lowercase())
                    .display()
            ),
            test.testbench().to_string(),
            format!("-gGC_TESTCASE={}", test.testcase().name()),
        ]
    }

    fn build_artifact(&self, test: &Test, output_root: &Path) -> PathBuf {
        // Analysis leaves the library index in the workdir.
        output_root
            .join("library")
            .join(test.library().to_lowercase())
            .join(format!("{}-obj08.cf", test.library().to_lowercase()))
    }

    fn descriptive_name(&self, test: &Test) -> String {
        format!("{}.{}({})", test.library(), test.testbench(), test.testcase().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestCase;

    #[test]
    fn analyze_command_targets_the_workdir() {
        let backend = Ghdl::new().unwrap();
        let file = HdlFile::new("uart_pkg", "src/uart_pkg.vhd", vec!["-frelaxed".into()]);
        let command = backend.compile_command(&file, Path::new("/out/library/work"));
        assert_eq!(command[..3], ["ghdl", "-a", "--std=08"]);
        assert!(command.contains(&"--workdir=/out/library/work".to_string()));
        assert!(command.contains(&"-frelaxed".to_string()));
        assert_eq!(command.last().unwrap(), "src/uart_pkg.vhd");
    }

    #[test]
    fn testcase_is_passed_as_a_generic() {
        let backend = Ghdl::new().unwrap();
        let test = Test::new(
            "work",
            "tb_uart",
            TestCase::new("tc_parity"),
            "src/tb_uart.vhd",
            "/out/test/tc_parity",
        );
        let command = backend.simulate_command(&test, Path::new("/out"));
        assert!(command.contains(&"tb_uart".to_string()));
        assert!(command.contains(&"-gGC_TESTCASE=tc_parity".to_string()));
    }

    #[test]
    fn ghdl_diagnostics_classify() {
        let backend = Ghdl::new().unwrap();
        let fail = "src/tb.vhd:10:3: error: no declaration for \"clk\"\n";
        assert_eq!(
            backend.patterns().classify(fail, true),
            crate::model::TestStatus::Fail
        );
        let pass = "simulation finished @100ns\n";
        assert_eq!(
            backend.patterns().classify(pass, true),
            crate::model::TestStatus::Pass
        );
    }
}
