//! CMake to Bazel migration library.
//!
//! The pipeline reads a `CMakeLists.txt` into [`cmake::Statement`]s, folds
//! them into an [`ir::BuildGraph`], renders the graph as Starlark with
//! [`bazel_gen::generate`] and checks the result with [`validate::validate`].
//! [`deploy`] and [`docs`] produce a deployment configuration for a component
//! from its documentation.

pub mod bazel_gen;
pub mod cli;
pub mod cmake;
pub mod deploy;
pub mod docs;
pub mod ir;
pub mod runner;
pub mod validate;
