//! Barebones execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: The interpreter state machine, single-step and run modes
//! - [`events`]: Observer callbacks, tagged output and the stop handle
//! - [`errors`]: Runtime error types
//!
//! # Execution Model
//!
//! The program is a flat instruction list. A program counter selects the
//! next instruction; `while`/`if`/`end` move it using the precomputed jump
//! table, everything else advances it by one. Instruction semantics live in
//! `statements` (variables) and `loops` (blocks).

pub mod engine;
pub mod errors;
pub mod events;
mod loops;
mod statements;

pub use engine::{Interpreter, RunState, Step};
pub use errors::RuntimeError;
pub use events::{Observer, Output, OutputKind, StepEvent, StopHandle};
