//! Regression manifest
//!
//! Test discovery and dependency analysis happen outside this crate; their
//! result arrives here as a JSON manifest describing the libraries to
//! compile and the tests to run. The manifest is the boundary object: it is
//! deserialized once and converted into the model entities the runner
//! consumes.
//!
//! ```json
//! {
//!   "libraries": [
//!     { "name": "work", "files": [ { "name": "tb_uart", "path": "src/tb_uart.vhd" } ] }
//!   ],
//!   "tests": [
//!     { "library": "work", "testbench": "tb_uart", "testcase": "tc_parity" },
//!     { "library": "work", "testbench": "tb_uart", "testcase": "tc_flaky", "skip": true }
//!   ]
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::model::{HdlFile, Library, Test, TestCase};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub libraries: Vec<LibrarySpec>,
    #[serde(default)]
    pub tests: Vec<TestSpec>,
}

#[derive(Debug, Deserialize)]
pub struct LibrarySpec {
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileSpec>,
}

#[derive(Debug, Deserialize)]
pub struct FileSpec {
    pub name: String,
    pub path: PathBuf,
    /// Simulator-specific compile flags, order preserved.
    #[serde(default)]
    pub com_options: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct TestSpec {
    pub library: String,
    pub testbench: String,
    pub testcase: String,
    /// Source file recorded in the report; defaults to the testbench name.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// Excluded by upstream selection; stays NOT_RUN and is reported as
    /// skipped.
    #[serde(default)]
    pub skip: bool,
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Libraries to compile, in manifest order.
    pub fn libraries(&self) -> Vec<Library> {
        self.libraries
            .iter()
            .map(|lib| {
                let files = lib
                    .files
                    .iter()
                    .map(|f| HdlFile::new(&f.name, &f.path, f.com_options.clone()))
                    .collect();
                Library::new(&lib.name, files)
            })
            .collect()
    }

    /// Build the test list, assigning each test a working directory under
    /// `<output>/test/<library>.<testbench>.<testcase>`.
    pub fn tests(&self, output_root: &Path) -> Vec<Test> {
        self.tests
            .iter()
            .map(|spec| {
                let source_file = spec
                    .file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(format!("test/{}.vhd", spec.testbench)));
                let test_path = output_root.join("test").join(format!(
                    "{}.{}.{}",
                    spec.library, spec.testbench, spec.testcase
                ));
                let mut test = Test::new(
                    &spec.library,
                    &spec.testbench,
                    TestCase::new(&spec.testcase),
                    source_file,
                    test_path,
                );
                test.set_skipped(spec.skip);
                test
            })
            .collect()
    }
}
