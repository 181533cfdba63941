//! Renders manual pages for the CLI into `target/generated-man`.

use clap::CommandFactory;
use clap_mangen::Man;
use std::{env, fs, path::Path, path::PathBuf};

#[path = "src/cli.rs"]
#[expect(
    dead_code,
    reason = "Only type definitions are needed for man page generation"
)]
mod cli;

type BuildResult<T> = Result<T, Box<dyn std::error::Error>>;

fn render(man: &Man, path: &Path) -> BuildResult<()> {
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    fs::write(path, buf)?;
    Ok(())
}

fn main() -> BuildResult<()> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_NAME");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_DESCRIPTION");

    let out_dir = PathBuf::from("target/generated-man");
    if out_dir.exists() {
        fs::remove_dir_all(&out_dir)?;
    }
    fs::create_dir_all(&out_dir)?;

    let cmd = cli::Cli::command();
    let name = cmd.get_name().to_owned();
    let package = env::var("CARGO_PKG_NAME").unwrap_or_else(|_| name.clone());
    if name != package {
        return Err(format!(
            "CLI name '{name}' differs from package name '{package}'; packaging expects {package}.1"
        )
        .into());
    }

    // One page per subcommand so `man cmake-to-bazel-migrate` works.
    for sub in cmd.get_subcommands() {
        let page = format!("{name}-{}", sub.get_name());
        let man = Man::new(sub.clone()).title(page.to_uppercase());
        render(&man, &out_dir.join(format!("{page}.1")))?;
    }
    render(&Man::new(cmd), &out_dir.join(format!("{name}.1")))
}
