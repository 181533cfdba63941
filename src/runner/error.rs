//! Error types for the runner module.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised during command execution.
#[derive(Debug, Error, Diagnostic)]
pub enum RunnerError {
    /// The CMake script does not exist at the expected path.
    #[error("CMake script not found at {path}")]
    #[diagnostic(
        code(cmake_to_bazel::runner::script_not_found),
        help("run from the project root or pass the script location with --file")
    )]
    ScriptNotFound {
        /// The path that was attempted.
        path: Utf8PathBuf,
    },

    /// A BUILD file failed structural validation.
    #[error("{path} failed validation: {diagnostic}")]
    #[diagnostic(code(cmake_to_bazel::runner::invalid_build_file))]
    InvalidBuildFile {
        /// The file that was checked.
        path: Utf8PathBuf,
        /// The failing check's message.
        diagnostic: String,
    },

    /// A command-line path is not valid UTF-8.
    #[error("path {} is not valid UTF-8", .path.display())]
    #[diagnostic(code(cmake_to_bazel::runner::non_utf8_path))]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },
}
