//! Bazel BUILD file generator.
//!
//! This module converts a [`crate::ir::BuildGraph`] into Starlark rule
//! blocks. Targets are emitted in graph order so output mirrors the order of
//! declarations in the source script.

use crate::ir::{BuildGraph, Target, TargetKind};
use itertools::Itertools;
use std::fmt::{self, Display, Formatter, Write};

/// Generate the contents of a `BUILD.bazel` file.
///
/// Each target becomes one rule block followed by a blank line.
///
/// # Examples
/// ```
/// use cmake_to_bazel::{bazel_gen, ir::{BuildGraph, Target, TargetKind}};
///
/// let graph = BuildGraph {
///     targets: vec![Target::new("app", TargetKind::Binary, vec!["main.c".into()])],
/// };
/// let text = bazel_gen::generate(&graph);
/// assert!(text.starts_with("cc_binary(\n    name = \"app\",\n"));
/// ```
#[must_use]
pub fn generate(graph: &BuildGraph) -> String {
    graph
        .targets
        .iter()
        .map(|target| RuleBlock { target }.to_string())
        .collect()
}

/// Bazel rule used for a target kind.
#[must_use]
pub const fn rule_name(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::StaticLibrary => "cc_library",
        TargetKind::Binary => "cc_binary",
    }
}

/// Wrapper struct to display a target as a rule block.
struct RuleBlock<'a> {
    target: &'a Target,
}

impl Display for RuleBlock<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let target = self.target;
        writeln!(f, "{}(", rule_name(target.kind))?;
        writeln!(f, "    name = {},", StarlarkStr(&target.name))?;
        writeln!(f, "    srcs = {},", StarlarkList(&target.sources))?;
        if !target.include_dirs.is_empty() {
            writeln!(f, "    includes = {},", StarlarkList(&target.include_dirs))?;
        }
        writeln!(f, "    deps = {},", StarlarkList(&target.deps))?;
        writeln!(f, ")")?;
        writeln!(f)
    }
}

/// A double-quoted Starlark string literal.
struct StarlarkStr<'a>(&'a str);

impl Display for StarlarkStr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                '"' => f.write_str("\\\"")?,
                '\n' => f.write_str("\\n")?,
                '\t' => f.write_str("\\t")?,
                '\r' => f.write_str("\\r")?,
                other => f.write_char(other)?,
            }
        }
        f.write_char('"')
    }
}

/// A bracketed, comma-separated Starlark list of strings.
struct StarlarkList<'a>(&'a [String]);

impl Display for StarlarkList<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}]",
            self.0.iter().map(|item| StarlarkStr(item)).join(", ")
        )
    }
}
