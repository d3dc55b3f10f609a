//! Barebones source loader
//!
//! This module transforms source text into a validated [`ast::Program`]:
//! - [`lexer`]: Tokenization (source text → statement fragments), plus the
//!   line highlighter used by the UI
//! - [`parser`]: Validation (fragments → instructions) and structural errors
//! - [`blocks`]: Block resolution (instructions → jump table)
//! - [`ast`]: Instruction and program definitions
//!
//! Loading is all-or-nothing: any structural error means no program.

pub mod ast;
pub mod blocks;
pub mod lexer;
pub mod parser;

pub use parser::{LoadError, ParseError};

/// Load a program from source text.
///
/// Structural errors are returned, never observed: nothing has been
/// registered with an interpreter yet. Callers forward them to their
/// observers with [`LoadError::outputs`].
pub fn load(source: &str) -> Result<ast::Program, LoadError> {
    parser::Parser::new(source).parse_program()
}
