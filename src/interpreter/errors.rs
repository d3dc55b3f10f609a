//! Runtime error types for the Barebones interpreter
//!
//! This module defines [`RuntimeError`], which represents all errors that can occur
//! during program execution (as opposed to structural load errors).
//!
//! All runtime errors are fatal - they halt execution and are reported through
//! the interpreter's output channel before being returned to the caller.

use crate::parser::ast::SourceLocation;
use thiserror::Error;

/// Runtime errors that can occur during execution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Comparison literal is not a non-negative integer
    #[error("Invalid operand `{literal}` at position {position} ({location}): expected a non-negative integer")]
    InvalidOperand {
        literal: String,
        position: usize,
        location: SourceLocation,
    },

    /// Comparison operator is not one of `==`, `not`, `>`, `<`
    #[error("Operator not found: `{operator}` at position {position} ({location})")]
    UnknownOperator {
        operator: String,
        position: usize,
        location: SourceLocation,
    },

    /// `incr` on a variable already at the largest representable value
    #[error("Integer overflow incrementing `{var}` at position {position} ({location})")]
    IntegerOverflow {
        var: String,
        position: usize,
        location: SourceLocation,
    },

    /// Engine and jump table disagree; indicates a block resolution defect
    #[error("Internal error at position {position}: {message}")]
    Internal { message: String, position: usize },
}

impl RuntimeError {
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            RuntimeError::InvalidOperand { location, .. }
            | RuntimeError::UnknownOperator { location, .. }
            | RuntimeError::IntegerOverflow { location, .. } => Some(location),
            RuntimeError::Internal { .. } => None,
        }
    }

    /// Position of the instruction that failed
    pub fn position(&self) -> usize {
        match self {
            RuntimeError::InvalidOperand { position, .. }
            | RuntimeError::UnknownOperator { position, .. }
            | RuntimeError::IntegerOverflow { position, .. }
            | RuntimeError::Internal { position, .. } => *position,
        }
    }
}
