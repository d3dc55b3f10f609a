//! Main TUI application state and logic

use crate::interpreter::engine::{Interpreter, RunState, Step};
use crate::parser::ast::Instruction;
use crate::ui::panes::{self, SourceScrollState, StatusRenderData};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Steps executed per frame while fast-forwarding
const FAST_FORWARD_BATCH: usize = 10_000;

/// Delay between steps in play mode
const PLAY_INTERVAL: Duration = Duration::from_millis(400);

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Memory,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> output -> memory)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Memory,
            FocusedPane::Memory => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    pub interpreter: Interpreter,

    /// The source code being executed
    pub source_code: String,

    pub focused_pane: FocusedPane,

    pub source_scroll: SourceScrollState,
    pub memory_scroll: usize,
    pub terminal_scroll: usize,

    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Step once per [`PLAY_INTERVAL`]
    pub is_playing: bool,

    /// Step in large batches each frame until the program ends
    pub is_fast_forwarding: bool,

    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app with the given interpreter and source code
    pub fn new(interpreter: Interpreter, source_code: String) -> Self {
        let earlier = Instant::now()
            .checked_sub(Duration::from_secs(1))
            .unwrap_or_else(Instant::now);
        App {
            interpreter,
            source_code,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState {
                offset: 0,
                target_line_row: None,
            },
            memory_scroll: 0,
            terminal_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            is_playing: false,
            is_fast_forwarding: false,
            last_play_time: earlier,
            last_space_press: earlier,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.is_fast_forwarding {
                self.fast_forward_batch();
            } else if self.is_playing && self.last_play_time.elapsed() >= PLAY_INTERVAL {
                self.step_forward();
                self.last_play_time = Instant::now();
            }

            let timeout = if self.is_fast_forwarding {
                Duration::from_millis(1)
            } else {
                Duration::from_millis(50)
            };
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let has_error = self.interpreter.terminal().has_errors();
        let current_line = if has_error {
            self.interpreter.current_location().map(|l| l.line)
        } else {
            self.interpreter
                .current_location()
                .or_else(|| self.interpreter.last_location())
                .map(|l| l.line)
        };

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            current_line,
            has_error && self.interpreter.state() == RunState::Stopped,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_terminal_pane(
            frame,
            left_rows[1],
            self.interpreter.terminal(),
            self.focused_pane == FocusedPane::Output,
            &mut self.terminal_scroll,
        );

        let changed = self.last_written_variable();
        panes::render_memory_pane(
            frame,
            columns[1],
            self.interpreter.variables(),
            changed.as_deref(),
            self.interpreter.loop_depth(),
            self.focused_pane == FocusedPane::Memory,
            &mut self.memory_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                executed: self.interpreter.executed(),
                pc: self.interpreter.pc(),
                program_len: self.interpreter.program().len(),
                state: self.interpreter.state(),
                history: self.interpreter.history_len(),
                has_error,
                is_playing: self.is_playing,
                is_fast_forwarding: self.is_fast_forwarding,
            },
        );
    }

    /// Variable written by the most recently executed instruction
    fn last_written_variable(&self) -> Option<String> {
        let pc = self.interpreter.last_pc()?;
        match &self.interpreter.program().get(pc)?.instruction {
            Instruction::Clear { var } | Instruction::Incr { var } | Instruction::Decr { var } => {
                Some(var.clone())
            }
            _ => None,
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Char(c @ '1'..='9') => {
                self.pause();
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let mut stepped = 0;
                for _ in 0..n {
                    if !self.step_forward() {
                        break;
                    }
                    stepped += 1;
                }
                if stepped == n {
                    self.status_message = format!("Stepped forward {} step(s)", stepped);
                }
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Right | KeyCode::Char('s') => {
                self.pause();
                self.step_forward();
            }
            KeyCode::Left => {
                self.pause();
                if self.interpreter.step_back() {
                    self.status_message = "Stepped backward".to_string();
                    self.terminal_scroll = usize::MAX;
                } else {
                    self.status_message = "Cannot step backward: no history left".to_string();
                }
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Memory => {
                    self.memory_scroll = self.memory_scroll.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.terminal_scroll = self.terminal_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Memory => {
                    self.memory_scroll = self.memory_scroll.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.terminal_scroll = self.terminal_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // 200ms debounce against key repeat
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_fast_forwarding = false;
                    self.is_playing = !self.is_playing && !self.interpreter.is_done();
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                if !self.interpreter.is_done() {
                    self.is_fast_forwarding = true;
                    self.status_message = "Running to end...".to_string();
                }
            }
            KeyCode::Esc => {
                self.pause();
                self.status_message = "Paused".to_string();
            }
            KeyCode::Char('x') => {
                self.pause();
                self.interpreter.stop();
                self.status_message = "Program stopped".to_string();
            }
            KeyCode::Backspace => {
                self.pause();
                self.interpreter.reset();
                self.terminal_scroll = 0;
                self.memory_scroll = 0;
                self.status_message = "Restarted".to_string();
            }
            _ => {}
        }
    }

    fn pause(&mut self) {
        self.is_playing = false;
        self.is_fast_forwarding = false;
    }

    fn fast_forward_batch(&mut self) {
        for _ in 0..FAST_FORWARD_BATCH {
            if !self.step_forward() {
                return;
            }
        }
        self.status_message = format!(
            "Running to end... {} steps",
            self.interpreter.executed()
        );
    }

    /// Execute one step. Returns `false` once the run is over.
    fn step_forward(&mut self) -> bool {
        let more = match self.interpreter.step() {
            Ok(Step::Executed(position)) => {
                if let Some(stmt) = self.interpreter.program().get(position) {
                    self.status_message = format!("Executed `{}`", stmt.instruction);
                }
                true
            }
            Ok(Step::Finished) => {
                self.status_message = match self.interpreter.state() {
                    RunState::Stopped => "Program stopped".to_string(),
                    _ => "Program finished".to_string(),
                };
                false
            }
            Err(e) => {
                self.status_message = format!("Runtime error: {}", e);
                false
            }
        };
        self.terminal_scroll = usize::MAX;
        if !more {
            self.pause();
        }
        more
    }
}
