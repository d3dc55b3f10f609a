//! Block instruction execution (`while`, `if`, `end`).
//!
//! Adds `impl Interpreter` methods for the two block forms. A true `while`
//! pushes its own position onto the loop return stack; the matching
//! `end while` pops it and jumps back so the condition is re-evaluated. A
//! false opener of either kind lands just after its `end`.
//!
//! The block kind closed by an `end` comes from the jump table, never from
//! the word written after `end`.

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::{BlockKind, Comparator, Condition, SourceLocation};

impl Interpreter {
    pub(crate) fn execute_while(
        &mut self,
        cond: &Condition,
        position: usize,
        location: SourceLocation,
    ) -> Result<usize, RuntimeError> {
        if self.evaluate_condition(cond, position, location)? {
            self.while_stack.push(position);
            Ok(position + 1)
        } else {
            Ok(self.block_end(position)? + 1)
        }
    }

    pub(crate) fn execute_if(
        &mut self,
        cond: &Condition,
        position: usize,
        location: SourceLocation,
    ) -> Result<usize, RuntimeError> {
        if self.evaluate_condition(cond, position, location)? {
            Ok(position + 1)
        } else {
            Ok(self.block_end(position)? + 1)
        }
    }

    pub(crate) fn execute_end(&mut self, position: usize) -> Result<usize, RuntimeError> {
        let close = *self
            .program
            .jumps()
            .close(position)
            .ok_or_else(|| internal("`end` has no resolved block", position))?;

        match close.kind {
            BlockKind::If => Ok(position + 1),
            BlockKind::While => {
                let back = self
                    .while_stack
                    .pop()
                    .ok_or_else(|| internal("loop return stack is empty", position))?;
                if back != close.opener {
                    return Err(internal(
                        &format!(
                            "loop return stack holds {}, expected {}",
                            back, close.opener
                        ),
                        position,
                    ));
                }
                Ok(back)
            }
        }
    }

    /// Evaluate `<var> <op> <literal>`, declaring an unseen variable as 0.
    ///
    /// The operator and literal are checked before the variable is read, so a
    /// malformed condition leaves the store untouched.
    pub(crate) fn evaluate_condition(
        &mut self,
        cond: &Condition,
        position: usize,
        location: SourceLocation,
    ) -> Result<bool, RuntimeError> {
        let comparator =
            Comparator::parse(&cond.op).ok_or_else(|| RuntimeError::UnknownOperator {
                operator: cond.op.clone(),
                position,
                location,
            })?;

        let rhs = parse_literal(&cond.literal).ok_or_else(|| RuntimeError::InvalidOperand {
            literal: cond.literal.clone(),
            position,
            location,
        })?;

        let lhs = self.store.read_or_zero(&cond.var);
        Ok(comparator.apply(lhs, rhs))
    }

    fn block_end(&self, opener: usize) -> Result<usize, RuntimeError> {
        self.program
            .jumps()
            .target(opener)
            .map(|t| t.end)
            .ok_or_else(|| internal("block opener has no jump target", opener))
    }
}

/// Digits only: no sign, no whitespace, and must fit in a `u64`
fn parse_literal(literal: &str) -> Option<u64> {
    if literal.is_empty() || !literal.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    literal.parse().ok()
}

fn internal(message: &str, position: usize) -> RuntimeError {
    RuntimeError::Internal {
        message: message.to_string(),
        position,
    }
}
