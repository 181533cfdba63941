//! Hand-written scanner for the command-invocation subset of the CMake
//! language.
//!
//! Only the lexical structure is recognised: command invocations, the three
//! argument forms, and comments. Nothing is evaluated, so `${VAR}` references
//! and `if()` blocks pass through as ordinary statements and arguments.

use super::ast::{Argument, Statement};
use super::diagnostics::{ParseError, ParseErrorKind};

/// Parse `source` into a sequence of statements.
///
/// `name` identifies the script in diagnostics.
///
/// # Errors
///
/// Returns [`ParseError`] when the script is lexically malformed, for example
/// when a quoted argument or an argument list is never closed.
///
/// # Examples
/// ```rust
/// use cmake_to_bazel::cmake;
///
/// let stmts = cmake::parse("ADD_EXECUTABLE(app main.c) # entry point", "CMakeLists.txt")?;
/// assert_eq!(stmts[0].command, "add_executable");
/// assert_eq!(stmts[0].values().collect::<Vec<_>>(), ["app", "main.c"]);
/// # Ok::<(), cmake_to_bazel::cmake::ParseError>(())
/// ```
pub fn parse(source: &str, name: &str) -> Result<Vec<Statement>, ParseError> {
    Scanner::new(source)
        .statements()
        .map_err(|(kind, offset)| ParseError::new(kind, source, name, offset))
}

type Failure = (ParseErrorKind, usize);

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        self.src.get(self.pos..).unwrap_or_default()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        self.src.get(start..self.pos).unwrap_or_default()
    }

    fn statements(mut self) -> Result<Vec<Statement>, Failure> {
        let mut statements = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Ok(statements),
                Some(c) if is_ident_start(c) => statements.push(self.command()?),
                Some(c) => return Err((ParseErrorKind::UnexpectedCharacter(c), self.pos)),
            }
        }
    }

    /// Skip whitespace, line comments and bracket comments.
    fn skip_trivia(&mut self) -> Result<(), Failure> {
        loop {
            self.eat_while(char::is_whitespace);
            if self.peek() != Some('#') {
                return Ok(());
            }
            let start = self.pos;
            self.bump();
            if let Some(level) = self.bracket_level() {
                self.bracket_body(level, start)?;
            } else {
                self.eat_while(|c| c != '\n');
            }
        }
    }

    fn command(&mut self) -> Result<Statement, Failure> {
        let start = self.pos;
        let name = self.eat_while(is_ident_continue);
        self.eat_while(|c| c == ' ' || c == '\t');
        if self.peek() != Some('(') {
            return Err((
                ParseErrorKind::MissingOpenParen {
                    command: name.to_owned(),
                },
                self.pos,
            ));
        }
        let open = self.pos;
        self.bump();
        let args = self.arguments(open)?;
        Ok(Statement {
            command: name.to_ascii_lowercase(),
            args,
            span: start..self.pos,
        })
    }

    fn arguments(&mut self, open: usize) -> Result<Vec<Argument>, Failure> {
        let mut args = Vec::new();
        let mut depth = 0usize;
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err((ParseErrorKind::UnbalancedParen, open)),
                Some('(') => {
                    self.bump();
                    depth += 1;
                }
                Some(')') => {
                    self.bump();
                    if depth == 0 {
                        return Ok(args);
                    }
                    depth -= 1;
                }
                Some('"') => args.push(self.quoted()?),
                Some('[') => {
                    if let Some(level) = self.bracket_level() {
                        let start = self.pos;
                        let body = self.bracket_body(level, start)?;
                        args.push(Argument::bracket(body));
                    } else {
                        args.push(self.unquoted());
                    }
                }
                Some(_) => args.push(self.unquoted()),
            }
        }
    }

    /// Number of `=` signs in a bracket opener at the current position.
    fn bracket_level(&self) -> Option<usize> {
        let after = self.rest().strip_prefix('[')?;
        let level = after.chars().take_while(|c| *c == '=').count();
        after.get(level..)?.starts_with('[').then_some(level)
    }

    /// Consume a bracket opener, its body and the matching closer.
    ///
    /// A newline directly after the opener is not part of the body.
    fn bracket_body(&mut self, level: usize, start: usize) -> Result<&'a str, Failure> {
        self.pos += level + 2;
        let closer = format!("]{}]", "=".repeat(level));
        let Some(len) = self.rest().find(&closer) else {
            return Err((ParseErrorKind::UnterminatedBracket, start));
        };
        let body = self.rest().get(..len).unwrap_or_default();
        self.pos += len + closer.len();
        let body = body
            .strip_prefix("\r\n")
            .or_else(|| body.strip_prefix('\n'))
            .unwrap_or(body);
        Ok(body)
    }

    fn quoted(&mut self) -> Result<Argument, Failure> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err((ParseErrorKind::UnterminatedQuoted, start)),
                Some('"') => return Ok(Argument::quoted(value)),
                Some('\\') => match self.bump() {
                    None => return Err((ParseErrorKind::UnterminatedQuoted, start)),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    // Line continuation.
                    Some('\n') => {}
                    Some(other) => value.push(other),
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn unquoted(&mut self) -> Argument {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | '#') {
                break;
            }
            self.bump();
            if c != '\\' {
                value.push(c);
                continue;
            }
            match self.bump() {
                Some(';') => value.push(';'),
                Some(other) => {
                    value.push('\\');
                    value.push(other);
                }
                None => value.push('\\'),
            }
        }
        Argument::unquoted(value)
    }
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
