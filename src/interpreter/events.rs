//! Observer interface between the engine and its presentation layer
//!
//! The engine only pushes notifications; it never reads from an observer.
//! Observers are invoked synchronously, in registration order, inline with
//! execution.

use crate::parser::ast::SourceLocation;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tag distinguishing diagnostic text from informational text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Info,
    Warning,
    Error,
}

/// One piece of text emitted through the output channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub kind: OutputKind,
    pub text: String,
}

impl Output {
    pub fn info(text: impl Into<String>) -> Self {
        Output {
            kind: OutputKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Output {
            kind: OutputKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Output {
            kind: OutputKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == OutputKind::Error
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OutputKind::Info => write!(f, "{}", self.text),
            OutputKind::Warning => write!(f, "warning: {}", self.text),
            OutputKind::Error => write!(f, "error: {}", self.text),
        }
    }
}

/// Details of one completed single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepEvent {
    /// Position that was executed
    pub position: usize,
    /// Position that will execute next
    pub next: usize,
    pub location: SourceLocation,
}

/// Callbacks fired by the engine. Every method defaults to a no-op.
pub trait Observer {
    /// A single `step()` executed an instruction. Not fired by `run()`.
    fn on_step_finished(&mut self, _event: &StepEvent) {}

    /// Execution reached the end of the program or was stopped.
    fn on_run_finished(&mut self) {}

    fn on_output(&mut self, _output: &Output) {}
}

/// Requests termination from outside the engine.
///
/// Clones share one flag. The engine checks it before each instruction,
/// so a stop requested from another thread lands at the next check point.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    requested: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub(crate) fn clear(&self) {
        self.requested.store(false, Ordering::SeqCst);
    }
}
