//! Helpers for invoking the built `cmake-to-bazel` binary in tests.

use anyhow::{Context, Result};
use assert_cmd::Command;
use std::path::Path;

/// Captured output from a `cmake-to-bazel` invocation.
#[derive(Debug)]
pub struct CliRun {
    /// Captured stdout (lossy UTF-8).
    pub stdout: String,
    /// Captured stderr (lossy UTF-8).
    pub stderr: String,
    /// Whether the command exited successfully.
    pub success: bool,
    /// Exit code, absent when the process was killed by a signal.
    pub code: Option<i32>,
}

/// Run `cmake-to-bazel` in `current_dir` with the supplied args.
///
/// # Errors
///
/// Returns an error when the binary cannot be located or spawned.
pub fn run_cli_in(current_dir: &Path, args: &[&str]) -> Result<CliRun> {
    let output = Command::cargo_bin("cmake-to-bazel")
        .context("locate cmake-to-bazel binary")?
        .current_dir(current_dir)
        .args(args)
        .output()
        .context("run cmake-to-bazel")?;
    Ok(CliRun {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        success: output.status.success(),
        code: output.status.code(),
    })
}
