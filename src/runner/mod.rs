//! CLI execution and command dispatch logic.
//!
//! This module keeps `main` minimal by providing a single entry point that
//! handles command execution, plus the translation and migration pipelines
//! the commands share.

mod error;
mod file_io;

pub use error::RunnerError;

use crate::cli::{Cli, Commands, GenerateArgs, MigrateArgs};
use crate::cmake::{self, ParseError};
use crate::deploy::{self, ChatClient, TextGenerator};
use crate::validate::{Validation, validate};
use crate::{bazel_gen, docs, ir::BuildGraph};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Name of the CMake script inside a component.
pub const CMAKE_LISTS: &str = "CMakeLists.txt";
/// Name of the generated BUILD file inside a component.
pub const BUILD_FILE: &str = "BUILD.bazel";
/// Name of the generated deployment configuration inside a component.
pub const DEPLOY_CONFIG: &str = "config.yaml";

/// Wrapper around generated BUILD file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildFileContent(String);
impl BuildFileContent {
    /// Store the provided BUILD file text.
    #[must_use]
    pub const fn new(content: String) -> Self {
        Self(content)
    }
    /// Borrow the underlying text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
    /// Consume the wrapper returning the owned text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Result of translating one script.
#[derive(Debug, Clone)]
pub struct Translation {
    /// The rendered BUILD file.
    pub content: BuildFileContent,
    /// Structural check of `content`.
    pub validation: Validation,
}

/// Where to obtain a deployment configuration during migration.
pub struct DeploySource<'a> {
    /// Documentation directory used as prompt context.
    pub docs: Utf8PathBuf,
    /// Service that answers the prompt.
    pub generator: &'a dyn TextGenerator,
}

/// Files produced by [`migrate_component`].
#[derive(Debug, Clone)]
pub struct Migration {
    /// Path of the written BUILD file.
    pub build_file: Utf8PathBuf,
    /// Path of the written deployment configuration, when one was requested.
    pub config_file: Option<Utf8PathBuf>,
    /// Structural check of the BUILD file.
    pub validation: Validation,
}

/// Execute the parsed [`Cli`] command.
///
/// # Errors
///
/// Returns an error if reading, translating or writing fails, or when
/// `validate` finds a structural problem.
pub fn run(cli: &Cli) -> Result<()> {
    let command = cli
        .command
        .clone()
        .unwrap_or_else(|| Commands::Generate(GenerateArgs::default()));
    match command {
        Commands::Generate(args) => handle_generate(&args),
        Commands::Validate { file } => handle_validate(&file),
        Commands::Migrate(args) => handle_migrate(&args),
    }
}

/// Parse, build, render and validate a script.
///
/// A failed validation is logged as a warning; the translation is still
/// returned.
///
/// # Errors
///
/// Returns an error if the script cannot be parsed or contains a malformed
/// declaration.
///
/// # Examples
/// ```
/// use cmake_to_bazel::runner::translate;
///
/// let t = translate("add_executable(app main.c)", "CMakeLists.txt")?;
/// assert!(t.content.as_str().contains("cc_binary("));
/// assert!(t.validation.passed());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn translate(source: &str, name: &str) -> Result<Translation> {
    let statements = cmake::parse(source, name)?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        let ast_json =
            serde_json::to_string_pretty(&statements).context("serialising statements")?;
        debug!("AST:\n{ast_json}");
    }
    let graph = BuildGraph::from_statements(&statements)
        .with_context(|| format!("building target graph from {name}"))?;
    debug!(targets = graph.targets.len(), "built target graph");

    let content = bazel_gen::generate(&graph);
    let validation = validate(&content);
    if !validation.passed() {
        warn!(
            diagnostic = validation.diagnostic(),
            "generated BUILD file failed validation"
        );
    }
    Ok(Translation {
        content: BuildFileContent::new(content),
        validation,
    })
}

/// Translate `COMPONENT/CMakeLists.txt` into `COMPONENT/BUILD.bazel` and,
/// when `deploy` is given, write `COMPONENT/config.yaml`.
///
/// # Errors
///
/// Returns an error if the script is missing or invalid, the documentation
/// cannot be loaded, the generator fails, or a file cannot be written.
pub fn migrate_component(
    component: &Utf8Path,
    deploy: Option<&DeploySource<'_>>,
) -> Result<Migration> {
    let script = component.join(CMAKE_LISTS);
    let translation = translate_file(&script)?;
    let build_file = component.join(BUILD_FILE);
    file_io::write_file(&build_file, translation.content.as_str())?;

    let config_file = match deploy {
        Some(source) => {
            let path = component.join(DEPLOY_CONFIG);
            write_deploy_config(component, source, &path)?;
            Some(path)
        }
        None => None,
    };

    Ok(Migration {
        build_file,
        config_file,
        validation: translation.validation,
    })
}

fn write_deploy_config(
    component: &Utf8Path,
    source: &DeploySource<'_>,
    path: &Utf8Path,
) -> Result<()> {
    let name = component_name(component);
    let context = docs::load_dir(&source.docs)
        .with_context(|| format!("loading documentation from {}", source.docs))?;
    let config = deploy::generate_config(source.generator, &context, &name)
        .with_context(|| format!("generating deployment config for {name}"))?;
    if config.is_fallback() {
        warn!(component = %name, "deployment answer was not YAML; writing raw answer");
    }
    file_io::write_file(path, &config.to_yaml()?)
}

/// Name passed to the prompt: the component directory's final component.
fn component_name(component: &Utf8Path) -> String {
    component
        .file_name()
        .map(str::to_owned)
        .or_else(|| {
            component
                .canonicalize_utf8()
                .ok()
                .and_then(|p| p.file_name().map(str::to_owned))
        })
        .unwrap_or_else(|| component.as_str().to_owned())
}

fn translate_file(script: &Utf8Path) -> Result<Translation> {
    if !script.is_file() {
        return Err(RunnerError::ScriptNotFound {
            path: script.to_owned(),
        }
        .into());
    }
    let source = fs::read_to_string(script).with_context(|| format!("reading {script}"))?;
    translate(&source, script.as_str())
}

fn utf8_path(path: &Path) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path.to_path_buf())
        .map_err(|path| RunnerError::NonUtf8Path { path }.into())
}

fn handle_generate(args: &GenerateArgs) -> Result<()> {
    let translation = translate_file(&utf8_path(&args.file)?)?;
    if file_io::is_stdout_path(&args.output) {
        file_io::write_stdout(translation.content.as_str())
    } else {
        file_io::write_file(&utf8_path(&args.output)?, translation.content.as_str())
    }
}

fn handle_validate(file: &Path) -> Result<()> {
    let path = utf8_path(file)?;
    let text = fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let report = validate(&text);
    if report.passed() {
        info!("{path} passed validation");
        Ok(())
    } else {
        Err(RunnerError::InvalidBuildFile {
            path,
            diagnostic: report.diagnostic().to_owned(),
        }
        .into())
    }
}

fn handle_migrate(args: &MigrateArgs) -> Result<()> {
    let component = utf8_path(&args.component)?;
    let client = args
        .llm_url
        .as_deref()
        .map(|url| ChatClient::new(url, args.llm_api_key.clone(), args.model.clone()));
    // clap rejects `--docs` without `--llm-url`.
    let deploy = match (&args.docs, &client) {
        (Some(docs), Some(client)) => Some(DeploySource {
            docs: utf8_path(docs)?,
            generator: client,
        }),
        _ => None,
    };

    let migration = migrate_component(&component, deploy.as_ref())?;
    info!(
        build_file = %migration.build_file,
        config_file = migration.config_file.as_deref().map(Utf8Path::as_str),
        "migration complete"
    );
    Ok(())
}

/// Render `err` for the terminal.
///
/// Script syntax errors and runner errors are drawn as `miette` reports with
/// source snippets; anything else falls back to the context chain.
#[must_use]
pub fn render_error(err: &anyhow::Error) -> String {
    let diagnostic = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<ParseError>()
            .map(|d| d as &dyn Diagnostic)
            .or_else(|| cause.downcast_ref::<RunnerError>().map(|d| d as &dyn Diagnostic))
    });
    let mut out = String::new();
    let rendered = diagnostic.is_some_and(|diagnostic| {
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .with_wrap_lines(false)
            .render_report(&mut out, diagnostic)
            .is_ok()
    });
    if rendered { out } else { format!("{err:#}") }
}

#[cfg(test)]
mod tests;
