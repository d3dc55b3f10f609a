//! TUI pane rendering modules
//!
//! - [`source`]: Source code display with syntax highlighting and current line indicator
//! - [`memory`]: Variables and their values
//! - [`terminal`]: Output channel transcript, coloured by output kind
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a primary `render_*` function that draws from
//! borrowed interpreter state and owns no state of its own beyond scroll offsets.

pub mod memory;
pub mod source;
pub mod status;
pub mod terminal;

pub use memory::render_memory_pane;
pub use source::{render_source_pane, SourceScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use terminal::render_terminal_pane;
