//! Statement-to-IR conversion.

use tracing::debug;

use crate::cmake::Statement;

use super::graph::{BuildGraph, IrGenError, Target, TargetKind};

impl BuildGraph {
    /// Fold a statement sequence into a [`BuildGraph`].
    ///
    /// Statements are applied in order. `include_directories` reaches only
    /// the targets declared before it; `target_link_libraries` naming an
    /// unknown target changes nothing. Unsupported commands are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`IrGenError::MalformedStatement`] when `add_library`,
    /// `add_executable` or `target_link_libraries` has no arguments.
    pub fn from_statements(statements: &[Statement]) -> Result<Self, IrGenError> {
        statements
            .iter()
            .enumerate()
            .try_fold(Self::default(), |graph, (index, stmt)| graph.apply(index, stmt))
    }

    fn apply(mut self, index: usize, stmt: &Statement) -> Result<Self, IrGenError> {
        match stmt.command.as_str() {
            "add_library" => self.declare(TargetKind::StaticLibrary, index, stmt)?,
            "add_executable" => self.declare(TargetKind::Binary, index, stmt)?,
            "include_directories" => self.broadcast_includes(stmt),
            "target_link_libraries" => self.link(index, stmt)?,
            other => debug!(command = other, index, "ignoring unsupported command"),
        }
        Ok(self)
    }

    fn declare(
        &mut self,
        kind: TargetKind,
        index: usize,
        stmt: &Statement,
    ) -> Result<(), IrGenError> {
        let (name, sources) = required_head(index, stmt)?;
        self.targets.push(Target::new(name, kind, sources));
        Ok(())
    }

    fn broadcast_includes(&mut self, stmt: &Statement) {
        let dirs: Vec<String> = stmt.values().map(str::to_owned).collect();
        for target in &mut self.targets {
            target.include_dirs.extend(dirs.iter().cloned());
        }
    }

    fn link(&mut self, index: usize, stmt: &Statement) -> Result<(), IrGenError> {
        let (name, deps) = required_head(index, stmt)?;
        let Some(first) = self.targets.iter().position(|t| t.name == name) else {
            debug!(target_name = name, index, "link target not declared; skipping");
            return Ok(());
        };
        for target in self
            .targets
            .iter_mut()
            .skip(first)
            .filter(|t| t.name == name)
        {
            target.deps.extend(deps.iter().cloned());
        }
        Ok(())
    }
}

fn required_head(index: usize, stmt: &Statement) -> Result<(&str, Vec<String>), IrGenError> {
    stmt.split_first()
        .ok_or_else(|| IrGenError::MalformedStatement {
            command: stmt.command.clone(),
            index,
        })
}
