//! Variable instructions (`clear`, `incr`, `decr`) and unknown commands.
//!
//! Each method returns the position of the next instruction.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::events::Output;
use crate::parser::ast::SourceLocation;
use tracing::warn;

impl Interpreter {
    pub(crate) fn execute_clear(&mut self, var: &str, position: usize) -> Result<usize, RuntimeError> {
        self.store.clear(var);
        Ok(position + 1)
    }

    /// An unseen variable is declared as 0 first, so it ends up at 1.
    pub(crate) fn execute_incr(
        &mut self,
        var: &str,
        position: usize,
        location: SourceLocation,
    ) -> Result<usize, RuntimeError> {
        self.store
            .increment(var)
            .ok_or_else(|| RuntimeError::IntegerOverflow {
                var: var.to_string(),
                position,
                location,
            })?;
        Ok(position + 1)
    }

    /// Saturates at zero; an unseen variable is declared as 0.
    pub(crate) fn execute_decr(&mut self, var: &str, position: usize) -> Result<usize, RuntimeError> {
        self.store.decrement(var);
        Ok(position + 1)
    }

    pub(crate) fn execute_unknown(
        &mut self,
        command: &str,
        position: usize,
        location: SourceLocation,
    ) -> Result<usize, RuntimeError> {
        warn!(command, position, "skipping unknown command");
        self.emit_output(Output::warning(format!(
            "Unknown command `{}` at position {} ({}), skipped",
            command, position, location
        )));
        Ok(position + 1)
    }
}
