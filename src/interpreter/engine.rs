// Execution engine for the Barebones interpreter

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::events::{Observer, Output, StepEvent, StopHandle};
use crate::memory::VariableStore;
use crate::parser::ast::{Instruction, Program, SourceLocation};
use crate::snapshot::{MockTerminal, Snapshot, SnapshotManager};
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Lifecycle of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    /// Ended by a stop request or a runtime error
    Stopped,
    /// Program counter moved past the last instruction
    Finished,
}

/// Result of a single [`Interpreter::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The instruction at this position was executed
    Executed(usize),
    /// Nothing left to execute; the run is over
    Finished,
}

/// The interpreter that executes a loaded Barebones program
pub struct Interpreter {
    /// Loaded program and its jump table, shared with the dispatch loop
    pub(crate) program: Rc<Program>,

    /// Variables, created on first use
    pub(crate) store: VariableStore,

    /// Position of the next instruction
    pub(crate) pc: usize,

    /// Position of the most recently executed instruction
    pub(crate) last_pc: Option<usize>,

    /// Re-entry positions of the `while` loops currently executing
    pub(crate) while_stack: Vec<usize>,

    pub(crate) state: RunState,

    /// Instructions executed since the last reset
    pub(crate) executed: u64,

    /// Wall-clock time of the last complete `run()`
    elapsed: Option<Duration>,

    /// Transcript of every output emitted
    terminal: MockTerminal,

    observers: Vec<Box<dyn Observer>>,

    stop: StopHandle,

    /// Snapshots taken before each single step and before each `run()`
    history: SnapshotManager,
}

impl Interpreter {
    /// Create a new interpreter for the loaded program
    pub fn new(program: Program) -> Self {
        Interpreter {
            program: Rc::new(program),
            store: VariableStore::new(),
            pc: 0,
            last_pc: None,
            while_stack: Vec::new(),
            state: RunState::NotStarted,
            executed: 0,
            elapsed: None,
            terminal: MockTerminal::new(),
            observers: Vec::new(),
            stop: StopHandle::default(),
            history: SnapshotManager::new(0),
        }
    }

    /// Register an observer; observers are notified in registration order
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.add_observer(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Keep up to `limit` snapshots so single steps can be undone
    pub fn with_history(mut self, limit: usize) -> Self {
        self.history = SnapshotManager::new(limit);
        self
    }

    /// Handle for requesting a stop from outside the engine
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Execute a single instruction.
    ///
    /// Past the last instruction this emits the completion event instead and
    /// returns [`Step::Finished`]. Once the run is over, further calls do nothing.
    pub fn step(&mut self) -> Result<Step, RuntimeError> {
        if self.is_done() {
            return Ok(Step::Finished);
        }

        let snapshot = self.capture();
        self.history.push(snapshot);

        if self.stop.is_stop_requested() {
            self.finish(RunState::Stopped);
            return Ok(Step::Finished);
        }

        let position = self.pc;
        let Some(location) = self.program.get(position).map(|s| s.location) else {
            self.finish(RunState::Finished);
            return Ok(Step::Finished);
        };

        self.state = RunState::Running;
        self.execute_at(position)?;

        let event = StepEvent {
            position,
            next: self.pc,
            location,
        };
        for observer in &mut self.observers {
            observer.on_step_finished(&event);
        }

        Ok(Step::Executed(position))
    }

    /// Run until the program finishes, fails, or a stop is requested.
    ///
    /// No per-step events are emitted. Elapsed time is recorded only when the
    /// run started from the beginning and completed naturally. A single
    /// snapshot is taken first, so one `step_back()` undoes the whole run.
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        if self.is_done() {
            return Ok(());
        }

        let snapshot = self.capture();
        self.history.push(snapshot);

        let fresh = self.state == RunState::NotStarted;
        let start = Instant::now();
        self.state = RunState::Running;
        info!(instructions = self.program.len(), "run started");

        while self.pc < self.program.len() {
            if self.stop.is_stop_requested() {
                self.finish(RunState::Stopped);
                return Ok(());
            }
            self.execute_at(self.pc)?;
        }

        if fresh {
            self.elapsed = Some(start.elapsed());
        }
        self.finish(RunState::Finished);
        Ok(())
    }

    /// Stop immediately, emitting the completion event.
    ///
    /// From another thread, use [`Interpreter::stop_handle`] instead.
    pub fn stop(&mut self) {
        if !self.is_done() {
            self.finish(RunState::Stopped);
        }
    }

    /// Undo the most recent single step. Returns `false` with no history left.
    pub fn step_back(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Return to the initial state, keeping the program and observers
    pub fn reset(&mut self) {
        self.store = VariableStore::new();
        self.pc = 0;
        self.last_pc = None;
        self.while_stack.clear();
        self.state = RunState::NotStarted;
        self.executed = 0;
        self.elapsed = None;
        self.terminal = MockTerminal::new();
        self.history.clear();
        self.stop.clear();
        debug!("interpreter reset");
    }

    /// Execute the instruction at `position`, moving the program counter.
    /// A failure is reported through the output channel and ends the run.
    fn execute_at(&mut self, position: usize) -> Result<(), RuntimeError> {
        match self.execute(position) {
            Ok(next) => {
                self.last_pc = Some(position);
                self.pc = next;
                self.executed += 1;
                Ok(())
            }
            Err(err) => {
                warn!(position = err.position(), error = %err, "runtime error");
                self.emit_output(Output::error(err.to_string()));
                self.finish(RunState::Stopped);
                Err(err)
            }
        }
    }

    /// Decode and execute one instruction, returning the next position
    fn execute(&mut self, position: usize) -> Result<usize, RuntimeError> {
        let program = Rc::clone(&self.program);
        let stmt = program
            .get(position)
            .ok_or_else(|| RuntimeError::Internal {
                message: "program counter out of range".to_string(),
                position,
            })?;
        let location = stmt.location;
        trace!(position, instruction = %stmt.instruction, "execute");

        match &stmt.instruction {
            Instruction::Clear { var } => self.execute_clear(var, position),
            Instruction::Incr { var } => self.execute_incr(var, position, location),
            Instruction::Decr { var } => self.execute_decr(var, position),
            Instruction::While(cond) => self.execute_while(cond, position, location),
            Instruction::If(cond) => self.execute_if(cond, position, location),
            Instruction::End { .. } => self.execute_end(position),
            Instruction::Unknown { command, .. } => {
                self.execute_unknown(command, position, location)
            }
        }
    }

    pub(crate) fn emit_output(&mut self, output: Output) {
        for observer in &mut self.observers {
            observer.on_output(&output);
        }
        self.terminal.push(output);
    }

    fn finish(&mut self, state: RunState) {
        self.state = state;
        self.stop.clear();
        info!(?state, executed = self.executed, "run ended");
        for observer in &mut self.observers {
            observer.on_run_finished();
        }
    }

    fn capture(&self) -> Snapshot {
        Snapshot {
            pc: self.pc,
            last_pc: self.last_pc,
            store: self.store.clone(),
            while_stack: self.while_stack.clone(),
            terminal_len: self.terminal.len(),
            state: self.state,
            executed: self.executed,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.pc = snapshot.pc;
        self.last_pc = snapshot.last_pc;
        self.store = snapshot.store;
        self.while_stack = snapshot.while_stack;
        self.terminal.truncate(snapshot.terminal_len);
        self.state = snapshot.state;
        self.executed = snapshot.executed;
        // Any restored state precedes the end of a complete run
        self.elapsed = None;
    }

    // ========== Getter methods for UI ==========

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn variables(&self) -> &VariableStore {
        &self.store
    }

    /// Position of the next instruction to execute
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Position of the most recently executed instruction
    pub fn last_pc(&self) -> Option<usize> {
        self.last_pc
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Whether the run has finished or been stopped
    pub fn is_done(&self) -> bool {
        matches!(self.state, RunState::Finished | RunState::Stopped)
    }

    pub fn executed(&self) -> u64 {
        self.executed
    }

    /// Number of `while` loops currently being executed
    pub fn loop_depth(&self) -> usize {
        self.while_stack.len()
    }

    pub fn terminal(&self) -> &MockTerminal {
        &self.terminal
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Source location of the next instruction, if any
    pub fn current_location(&self) -> Option<SourceLocation> {
        self.program.get(self.pc).map(|s| s.location)
    }

    /// Source location of the most recently executed instruction
    pub fn last_location(&self) -> Option<SourceLocation> {
        self.last_pc
            .and_then(|pc| self.program.get(pc))
            .map(|s| s.location)
    }

    pub fn memory_dump(&self) -> String {
        self.store.dump()
    }

    /// Elapsed time of the last complete run
    pub fn elapsed(&self) -> Option<Duration> {
        self.elapsed
    }

    pub fn elapsed_report(&self) -> String {
        match self.elapsed {
            Some(d) => format!("Execution finished in {:.6}ms", d.as_secs_f64() * 1000.0),
            None => "Execution time unavailable: no complete run recorded".to_string(),
        }
    }
}
