//! Command line interface definition using clap.
//!
//! This module defines the [`Cli`] structure and its subcommands. It only
//! depends on `clap` and the standard library because `build.rs` includes it
//! to render the manual page.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Script read when no `--file` is given.
const DEFAULT_SCRIPT: &str = "CMakeLists.txt";
/// BUILD file written when no output is given.
const DEFAULT_OUTPUT: &str = "BUILD.bazel";

/// Translate CMake projects into Bazel BUILD files.
#[derive(Debug, Parser)]
#[command(name = "cmake-to-bazel", author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose diagnostic logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Optional subcommand to execute; defaults to `generate` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Parse the provided arguments, applying the default command when needed.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error when the arguments are invalid.
    pub fn try_parse_with_default<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args).map(Self::with_default_command)
    }

    /// Apply the default command if none was specified.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Generate(GenerateArgs::default()));
        }
        self
    }
}

/// Arguments accepted by the `generate` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct GenerateArgs {
    /// Path to the CMake script to translate.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_SCRIPT)]
    pub file: PathBuf,

    /// Where to write the BUILD file; `-` writes to standard output.
    #[arg(value_name = "OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,
}

impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_SCRIPT),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

/// Arguments accepted by the `migrate` command.
#[derive(Debug, Args, PartialEq, Eq, Clone)]
pub struct MigrateArgs {
    /// Component directory containing `CMakeLists.txt`.
    #[arg(value_name = "COMPONENT")]
    pub component: PathBuf,

    /// Documentation directory used to generate `config.yaml`.
    ///
    /// Without it only `BUILD.bazel` is written.
    #[arg(long, value_name = "DIR", requires = "llm_url")]
    pub docs: Option<PathBuf>,

    /// Base URL of an OpenAI-compatible API, e.g. `http://host/v1`.
    #[arg(long = "llm-url", value_name = "URL")]
    pub llm_url: Option<String>,

    /// Bearer token sent to the API.
    #[arg(long = "llm-api-key", value_name = "KEY")]
    pub llm_api_key: Option<String>,

    /// Model name requested from the API (default `gpt-4`).
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,
}

/// Available top-level commands.
#[derive(Debug, Subcommand, PartialEq, Eq, Clone)]
pub enum Commands {
    /// Translate a CMake script into a BUILD file (default).
    Generate(GenerateArgs),

    /// Check an existing BUILD file for the expected rule structure.
    Validate {
        /// BUILD file to check.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Write `BUILD.bazel` (and optionally `config.yaml`) into a component.
    Migrate(MigrateArgs),
}
