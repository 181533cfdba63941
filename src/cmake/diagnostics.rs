//! Translates script syntax errors into `miette` diagnostics.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// The syntax problem found while scanning a script.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// A `"` argument reached the end of input.
    #[error("unterminated quoted argument")]
    UnterminatedQuoted,
    /// A `[[` argument or comment has no matching close.
    #[error("unterminated bracket argument")]
    UnterminatedBracket,
    /// A command name was not followed by `(`.
    #[error("expected `(` after command `{command}`")]
    MissingOpenParen {
        /// The command name as written.
        command: String,
    },
    /// An argument list reached the end of input before its `)`.
    #[error("unbalanced parentheses in argument list")]
    UnbalancedParen,
    /// A character that cannot start a command.
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
}

impl ParseErrorKind {
    fn help(&self) -> Option<String> {
        match self {
            Self::UnterminatedQuoted => Some("add the closing `\"` to the argument".into()),
            Self::UnterminatedBracket => {
                Some("close the bracket with the same number of `=` signs as it opened".into())
            }
            Self::MissingOpenParen { command } => {
                Some(format!("command invocations look like `{command}(...)`"))
            }
            Self::UnbalancedParen => Some("add the missing `)`".into()),
            Self::UnexpectedCharacter(_) => None,
        }
    }
}

/// Error raised when a script cannot be parsed.
///
/// # Examples
/// ```rust
/// use cmake_to_bazel::cmake::{self, ParseErrorKind};
///
/// let err = cmake::parse("add_library(core \"a.c", "CMakeLists.txt").unwrap_err();
/// assert_eq!(err.kind(), &ParseErrorKind::UnterminatedQuoted);
/// assert_eq!(err.offset(), 17);
/// ```
#[derive(Debug, Error, Diagnostic)]
#[error("{kind} in {name} at byte {offset}")]
#[diagnostic(code(cmake_to_bazel::cmake::parse))]
pub struct ParseError {
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
    #[help]
    help: Option<String>,
    kind: ParseErrorKind,
    name: String,
    offset: usize,
}

impl ParseError {
    pub(super) fn new(kind: ParseErrorKind, src: &str, name: &str, offset: usize) -> Self {
        let offset = offset.min(src.len());
        let len = src
            .get(offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(0, char::len_utf8);
        Self {
            src: NamedSource::new(name, src.to_owned()),
            span: SourceSpan::from((offset, len)),
            help: kind.help(),
            kind,
            name: name.to_owned(),
            offset,
        }
    }

    /// The syntax problem.
    #[must_use]
    pub const fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Byte offset of the problem in the source text.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }
}
