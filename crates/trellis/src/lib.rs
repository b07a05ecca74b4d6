//! Trellis - task dependency graph analysis.
//!
//! This crate analyzes a snapshot of work items and their prerequisite
//! relationships. It infers likely dependencies from task text, builds a
//! directed graph of explicit and inferred edges, and answers scheduling
//! questions about it: cycles, execution order, critical path and parallel
//! batches.
//!
//! # Example
//!
//! ```
//! use trellis::domain::{DependencyDeclaration, DependencyType, Task};
//! use trellis::graph::TaskGraph;
//!
//! let mut graph = TaskGraph::new();
//! graph.add_task(&Task::new("T1", "Setup infrastructure", 2));
//! graph.add_task(
//!     &Task::new("T2", "Create database schema", 3)
//!         .with_dependency(DependencyDeclaration::new("T1", DependencyType::DependsOn)),
//! );
//!
//! let analysis = graph.analyze();
//! assert_eq!(analysis.execution_order, vec!["T1".into(), "T2".into()]);
//! ```

#![forbid(unsafe_code)]

// Public modules for library usage
pub mod analysis;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod inference;
pub mod loader;

// Public CLI module (needed by binary)
pub mod cli;

// Internal modules (not exposed as public API)
pub(crate) mod output;
