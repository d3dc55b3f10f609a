//! # Introduction
//!
//! A Barebones interpreter with a stepping terminal debugger. Barebones
//! programs only clear, increment and decrement non-negative integer
//! variables inside `while`/`if` blocks; this crate loads them, resolves
//! their block structure once, and executes them one instruction at a time
//! or straight through.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Lexer → Validator → Block resolver → Interpreter → Observers / TUI
//! ```
//!
//! 1. [`parser`]: splits source into statements, validates arity and builds
//!    the jump table. Any structural error rejects the whole program.
//! 2. [`interpreter`]: the program-counter state machine with `step()`,
//!    `run()` and `stop()`, reporting through [`interpreter::Observer`]s.
//! 3. [`memory`]: the variable store.
//! 4. [`snapshot`]: output transcript and the bounded stepping history
//!    behind `step_back()`.
//! 5. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use barebones::interpreter::Interpreter;
//!
//! let program = barebones::parser::load("clear X; incr X; incr X").unwrap();
//! let mut interpreter = Interpreter::new(program);
//! interpreter.run().unwrap();
//! assert_eq!(interpreter.variables().get("X"), Some(2));
//! ```

pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod snapshot;
pub mod ui;
