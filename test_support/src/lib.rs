//! Test utilities shared by the integration suites.
//!
//! Provides temporary component fixtures, a runner for the built binary and
//! a fake chat completion server.

pub mod chat_server;
pub mod cli;

pub use chat_server::{ChatServer, RecordedRequest, spawn_chat_server};
pub use cli::{CliRun, run_cli_in};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// A component directory inside a temporary workspace.
///
/// The workspace is removed when the fixture is dropped.
#[derive(Debug)]
pub struct Component {
    root: TempDir,
    dir: Utf8PathBuf,
}

impl Component {
    /// Create `<tmp>/<name>/CMakeLists.txt` containing `script`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary directory or script cannot be
    /// created.
    pub fn with_script(name: &str, script: &str) -> Result<Self> {
        let root = TempDir::new().context("create temp workspace")?;
        let dir = utf8(root.path())?.join(name);
        fs::create_dir_all(&dir).with_context(|| format!("create {dir}"))?;
        fs::write(dir.join("CMakeLists.txt"), script).context("write CMakeLists.txt")?;
        Ok(Self { root, dir })
    }

    /// Write `files` into a `docs` directory beside the component and
    /// return its path.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written.
    pub fn write_docs(&self, files: &[(&str, &str)]) -> Result<Utf8PathBuf> {
        let docs = self.workspace()?.join("docs");
        for (name, body) in files {
            let path = docs.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
            }
            fs::write(&path, body).with_context(|| format!("write {path}"))?;
        }
        Ok(docs)
    }

    /// The component directory.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// The temporary directory holding the component.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary path is not UTF-8.
    pub fn workspace(&self) -> Result<&Utf8Path> {
        utf8(self.root.path())
    }

    /// Read a file from the component directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read(&self, file: &str) -> Result<String> {
        let path = self.dir.join(file);
        fs::read_to_string(&path).with_context(|| format!("read {path}"))
    }
}

fn utf8(path: &std::path::Path) -> Result<&Utf8Path> {
    Utf8Path::from_path(path).with_context(|| format!("non UTF-8 path {}", path.display()))
}
