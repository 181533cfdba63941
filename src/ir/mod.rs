//! Intermediate Representation structures.
//!
//! This module defines the build graph produced from a parsed script. The IR
//! is independent of both CMake and Bazel syntax: a list of targets, each
//! with its sources, include directories and dependency names.
//!
//! # Examples
//!
//! ```
//! use cmake_to_bazel::{cmake, ir::{BuildGraph, TargetKind}};
//!
//! let stmts = cmake::parse("add_executable(app main.c)", "CMakeLists.txt")?;
//! let graph = BuildGraph::from_statements(&stmts)?;
//! assert_eq!(graph.targets[0].kind, TargetKind::Binary);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod from_statements;
mod graph;

pub use graph::{BuildGraph, IrGenError, Target, TargetKind};
