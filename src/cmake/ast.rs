//! CMake script Abstract Syntax Tree structures.
//!
//! A parsed `CMakeLists.txt` is a flat sequence of [`Statement`]s. Control
//! flow and variables are not evaluated, so the tree never nests: each
//! statement is one command invocation with its arguments in source order.
//!
//! ```rust
//! use cmake_to_bazel::cmake::{Argument, Statement};
//!
//! let stmt = Statement::new(
//!     "add_library",
//!     vec![Argument::unquoted("core"), Argument::unquoted("core.c")],
//! );
//! assert_eq!(stmt.values().collect::<Vec<_>>(), ["core", "core.c"]);
//! ```

use serde::Serialize;
use std::ops::Range;

/// One command invocation such as `add_library(core core.c)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    /// Command name, lowercased because CMake command names are
    /// case-insensitive.
    pub command: String,
    /// Arguments in the order they appear.
    pub args: Vec<Argument>,
    /// Byte range of the whole invocation in the source text.
    pub span: Range<usize>,
}

impl Statement {
    /// Build a statement without source location information.
    ///
    /// The command name is lowercased to match parser output.
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            command: command.into().to_ascii_lowercase(),
            args,
            span: 0..0,
        }
    }

    /// Iterate over the argument values.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(|arg| arg.value.as_str())
    }

    /// Split the arguments into the first value and the remaining values.
    ///
    /// Returns `None` when the statement has no arguments.
    #[must_use]
    pub fn split_first(&self) -> Option<(&str, Vec<String>)> {
        let (head, tail) = self.args.split_first()?;
        let rest = tail.iter().map(|arg| arg.value.clone()).collect();
        Some((head.value.as_str(), rest))
    }
}

/// A single command argument after escape processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    /// The argument text with quotes and escapes removed.
    pub value: String,
    /// How the argument was written.
    pub kind: ArgumentKind,
}

impl Argument {
    /// Construct an unquoted argument.
    #[must_use]
    pub fn unquoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: ArgumentKind::Unquoted,
        }
    }

    /// Construct a double-quoted argument.
    #[must_use]
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: ArgumentKind::Quoted,
        }
    }

    /// Construct a bracket argument (`[[...]]`).
    #[must_use]
    pub fn bracket(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            kind: ArgumentKind::Bracket,
        }
    }
}

/// Lexical form of an [`Argument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgumentKind {
    /// A bare word such as `main.c`.
    Unquoted,
    /// A `"double quoted"` string.
    Quoted,
    /// A `[[bracket]]` or `[=[bracket]=]` string.
    Bracket,
}
