//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Path of the trellis binary built by cargo for integration tests
pub fn trellis_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_trellis"))
}

/// Run the trellis binary in the specified directory with colors disabled
pub fn run_trellis_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(trellis_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute trellis binary")
}

/// Write a task file into `dir` and return its file name
pub fn write_tasks(dir: &Path, name: &str, content: &str) -> String {
    std::fs::write(dir.join(name), content).expect("Failed to write task file");
    name.to_string()
}

/// The four-task chain used throughout the scenario tests, as a JSON array.
pub const CHAIN_TASKS: &str = r#"[
  {"id": "T1", "title": "Setup infrastructure", "complexity": 2},
  {"id": "T2", "title": "Create database schema", "complexity": 3,
   "dependencies": [{"targetTaskId": "T1", "type": "depends_on"}]},
  {"id": "T3", "title": "Build API endpoints", "complexity": 5},
  {"id": "T4", "title": "Build UI components", "complexity": 3}
]"#;

/// Two tasks that depend on each other.
pub const CYCLIC_TASKS: &str = r#"[
  {"id": "A", "title": "First", "complexity": 1,
   "dependencies": [{"targetTaskId": "B", "type": "depends_on"}]},
  {"id": "B", "title": "Second", "complexity": 1,
   "dependencies": [{"targetTaskId": "A", "type": "depends_on"}]}
]"#;
