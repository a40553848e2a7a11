//! End-to-end regression run: manifest -> runner -> JUnit report
//!
//! Uses the bluesim backend with bash scripts standing in for the generated
//! simulator executables, so the whole pipeline (artifact lookup, process
//! execution, classification, reporting) is exercised without a real
//! simulator installed.

#![cfg(unix)]

use std::fs;
use std::path::Path;

use hdlreg::{backend_for_name, JunitReporter, Manifest, RunConfig, RunResults, SimRunner, TestStatus};

const MANIFEST: &str = r#"{
    "libraries": [],
    "tests": [
        { "library": "work", "testbench": "tb_core", "testcase": "tc_pass", "file": "test/tc_pass.bsv" },
        { "library": "work", "testbench": "tb_core", "testcase": "tc_fail", "file": "test/tc_fail.bsv" },
        { "library": "work", "testbench": "tb_core", "testcase": "tc_skip", "file": "test/tc_skip.bsv", "skip": true }
    ]
}"#;

/// Place a bash script where the bluesim backend expects the build artifact.
fn install_artifact(root: &Path, testcase: &str, body: &str) {
    let dir = root.join("library").join(testcase);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("out"), body).unwrap();
}

fn run_scenario(root: &Path) -> (Vec<hdlreg::Test>, RunResults) {
    let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
    let tests = manifest.tests(root);
    for test in &tests {
        if !test.is_skipped() {
            fs::create_dir_all(test.test_path()).unwrap();
        }
    }

    install_artifact(root, "tc_pass", "echo 'Finished test'\n");
    install_artifact(root, "tc_fail", "echo '[ERROR] assertion failed'\nexit 1\n");

    let config = RunConfig {
        output_path: root.to_path_buf(),
        sim_threads: 2,
        ..RunConfig::default()
    };
    let runner = SimRunner::new(backend_for_name("bluesim").unwrap(), config);
    let tests = runner.simulate_all(tests);
    let results = RunResults::tally(&tests);
    (tests, results)
}

#[test]
fn three_test_scenario_classifies_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let (tests, results) = run_scenario(dir.path());

    assert_eq!(tests[0].status(), TestStatus::Pass);
    assert_eq!(tests[1].status(), TestStatus::Fail);
    assert_eq!(tests[2].status(), TestStatus::NotRun);
    assert_eq!(results.total(), 3);
    assert_eq!(results.executed(), 2);

    let report_path = dir.path().join("report.xml");
    let reporter = JunitReporter::new(&report_path);
    let written = reporter
        .write(&tests, &results, "2024-05-01T10:00:00", 2500)
        .unwrap();
    assert!(written);

    let doc = fs::read_to_string(&report_path).unwrap();
    assert!(doc.contains("tests=\"3\""));
    assert!(doc.contains("failures=\"1\""));
    assert!(doc.contains("skipped=\"1\""));
    assert!(doc.contains("errors=\"0\""));
    assert!(doc.contains("name=\"work.tb_core.tc_pass\""));
    assert!(doc.contains("file=\"test/tc_fail.bsv\""));
    assert!(doc.contains("<failure message=\"Failed\"/>"));
    assert!(doc.contains("<skipped message=\"Skipped\"/>"));
    // Captured output lands in system-out.
    assert!(doc.contains("Finished test"));
    assert!(doc.contains("[ERROR] assertion failed"));
}

#[test]
fn report_order_follows_the_test_list() {
    let dir = tempfile::tempdir().unwrap();
    let (tests, _) = run_scenario(dir.path());

    let names: Vec<String> = tests.iter().map(|t| t.name()).collect();
    assert_eq!(
        names,
        [
            "work.tb_core.tc_pass",
            "work.tb_core.tc_fail",
            "work.tb_core.tc_skip"
        ]
    );
}

#[test]
fn all_skipped_regression_writes_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let manifest: Manifest = serde_json::from_str(MANIFEST).unwrap();
    let mut tests = manifest.tests(dir.path());
    for test in &mut tests {
        test.set_skipped(true);
    }

    let config = RunConfig {
        output_path: dir.path().to_path_buf(),
        ..RunConfig::default()
    };
    let runner = SimRunner::new(backend_for_name("bluesim").unwrap(), config);
    let tests = runner.simulate_all(tests);
    let results = RunResults::tally(&tests);
    assert_eq!(results.executed(), 0);

    let report_path = dir.path().join("report.xml");
    let written = JunitReporter::new(&report_path)
        .write(&tests, &results, "ts", 0)
        .unwrap();
    assert!(!written);
    assert!(!report_path.exists());
}

#[test]
fn run_log_is_kept_in_each_test_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (tests, _) = run_scenario(dir.path());

    for test in &tests[..2] {
        let log = test.test_path().join("run.log");
        assert!(log.exists(), "missing {}", log.display());
    }
}
