//! `CMakeLists.txt` parsing.
//!
//! The parser turns script text into a flat list of [`Statement`]s which the
//! [`crate::ir`] builder then folds into a build graph. Syntax errors are
//! reported as [`ParseError`] diagnostics that point at the offending byte.

mod ast;
mod diagnostics;
mod parser;

pub use ast::{Argument, ArgumentKind, Statement};
pub use diagnostics::{ParseError, ParseErrorKind};
pub use parser::parse;
