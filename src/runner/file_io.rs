//! File creation helpers for the runner.
//! Writes generated files through capability-based directory handles.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Return `true` when `path` is the CLI sentinel indicating "write to stdout".
#[must_use]
pub fn is_stdout_path(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn write_in_dir(dir: &Dir, path: &Utf8Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        dir.create_dir_all(parent)
            .with_context(|| format!("create directory {parent}"))?;
    }
    let mut file = dir
        .create(path)
        .with_context(|| format!("create {path}"))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("write {path}"))?;
    file.flush().with_context(|| format!("flush {path}"))?;
    file.sync_all().with_context(|| format!("sync {path}"))?;
    Ok(())
}

/// Open the nearest existing directory for `path` and return it with the
/// remaining relative path.
///
/// Relative paths are resolved against the current directory first, since a
/// directory handle cannot reach through `..`.
fn derive_dir_and_relative(path: &Utf8Path) -> Result<(Dir, Utf8PathBuf)> {
    let path = if path.is_relative() {
        let cwd = std::env::current_dir().context("resolve current directory")?;
        Utf8PathBuf::from_path_buf(cwd)
            .map_err(|cwd| anyhow!("current directory {} is not valid UTF-8", cwd.display()))?
            .join(path)
    } else {
        path.to_owned()
    };

    let (base, dir) = path
        .ancestors()
        .skip(1)
        .find_map(|candidate| {
            Dir::open_ambient_dir(candidate, ambient_authority())
                .ok()
                .map(|dir| (candidate.to_owned(), dir))
        })
        .ok_or_else(|| anyhow!("no existing ancestor directory for {path}"))?;
    let relative = path
        .strip_prefix(&base)
        .context("derive relative output path")?
        .to_owned();
    Ok((dir, relative))
}

/// Write `content` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if no ancestor directory can be opened or the write
/// fails.
pub fn write_file(path: &Utf8Path, content: &str) -> Result<()> {
    let (dir, relative) = derive_dir_and_relative(path)?;
    write_in_dir(&dir, &relative, content)?;
    info!("Wrote {path}");
    Ok(())
}

fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

/// Write `content` to standard output, treating a closed pipe as success.
///
/// # Errors
///
/// Returns an error for any write failure other than a broken pipe.
pub fn write_stdout(content: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.flush())
    {
        Err(err) if !is_broken_pipe(&err) => Err(err).context("write to stdout"),
        _ => Ok(()),
    }
}
