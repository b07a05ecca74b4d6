//! Error types for trellis operations.
//!
//! Only a small part of the engine is designed to fail loudly. Graph
//! algorithms are total and degrade to safe values on internal faults;
//! `CycleDetected` from [`TaskGraph::get_execution_order`] is the single
//! analysis error a caller must handle. The remaining variants cover the
//! loading and configuration surface around the engine.
//!
//! [`TaskGraph::get_execution_order`]: crate::graph::TaskGraph::get_execution_order

use std::io;
use thiserror::Error;

/// The error type for trellis operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The dependency graph contains cycles, so no execution order exists.
    #[error("Dependency graph contains {count} cycle(s); no valid execution order exists")]
    CycleDetected {
        /// Number of cycles found by cycle detection.
        count: usize,
    },

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line of a JSON Lines task file could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Description of the parse failure
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A task record violates the input contract.
    #[error("Invalid task: {0}")]
    InvalidTask(String),
}

/// A specialized Result type for trellis operations.
pub type Result<T> = std::result::Result<T, Error>;
