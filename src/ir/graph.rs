//! Build graph data structures.

use serde::Serialize;
use thiserror::Error;

/// The kind of artefact a [`Target`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Declared by `add_library`.
    StaticLibrary,
    /// Declared by `add_executable`.
    Binary,
}

/// A buildable unit collected from the script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    /// Identifier from the first argument of the declaring statement.
    pub name: String,
    /// Library or executable.
    pub kind: TargetKind,
    /// Source files in declaration order.
    pub sources: Vec<String>,
    /// Include directories broadcast by `include_directories` statements
    /// processed after this target was declared.
    pub include_dirs: Vec<String>,
    /// Dependency names from matching `target_link_libraries` statements.
    /// These are not checked against declared targets.
    pub deps: Vec<String>,
}

impl Target {
    /// Create a target with no include directories or dependencies.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TargetKind, sources: Vec<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            sources,
            include_dirs: Vec::new(),
            deps: Vec::new(),
        }
    }
}

/// The complete set of targets in declaration order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BuildGraph {
    /// Targets in the order their declaring statements appear.
    pub targets: Vec<Target>,
}

impl BuildGraph {
    /// Look up the first target called `name`.
    #[must_use]
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }
}

/// Errors produced while building the graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IrGenError {
    /// A declaring or linking statement has no arguments.
    #[error("`{command}` at statement {index} is missing its target name")]
    MalformedStatement {
        /// The offending command.
        command: String,
        /// Zero-based position of the statement in the script.
        index: usize,
    },
}
