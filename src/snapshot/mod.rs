// Stepping history and output transcript

use crate::interpreter::engine::RunState;
use crate::interpreter::events::{Output, OutputKind};
use crate::memory::VariableStore;
use std::collections::VecDeque;

/// Mock terminal recording everything the engine emits
#[derive(Debug, Clone, Default)]
pub struct MockTerminal {
    pub lines: Vec<Output>,
}

impl MockTerminal {
    pub fn new() -> Self {
        MockTerminal { lines: Vec::new() }
    }

    pub fn push(&mut self, output: Output) {
        self.lines.push(output);
    }

    /// Drop everything recorded after the first `len` entries
    pub fn truncate(&mut self, len: usize) {
        self.lines.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.lines.iter().any(Output::is_error)
    }

    /// Get all output as display lines, splitting multi-line entries
    pub fn get_output(&self) -> Vec<(String, OutputKind)> {
        self.lines
            .iter()
            .flat_map(|o| {
                o.to_string()
                    .lines()
                    .map(|l| (l.to_string(), o.kind))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// Execution state captured before a single step
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub pc: usize,
    pub last_pc: Option<usize>,
    pub store: VariableStore,
    pub while_stack: Vec<usize>,
    pub terminal_len: usize,
    pub state: RunState,
    pub executed: u64,
}

/// Bounded history of snapshots; the oldest is evicted when full
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: VecDeque<Snapshot>,
    limit: usize,
}

impl SnapshotManager {
    pub fn new(limit: usize) -> Self {
        SnapshotManager {
            snapshots: VecDeque::new(),
            limit,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) {
        if self.limit == 0 {
            return;
        }
        if self.snapshots.len() == self.limit {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Take the most recent snapshot
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
