// Instruction model for Barebones programs

use crate::parser::blocks::JumpTable;
use std::fmt;

/// Source location information for error reporting and highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The two kinds of structured block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    While,
    If,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::While => write!(f, "while"),
            BlockKind::If => write!(f, "if"),
        }
    }
}

/// Comparison operators accepted by `while` and `if`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Equal,    // ==
    NotEqual, // not
    Greater,  // >
    Less,     // <
}

impl Comparator {
    /// Look up an operator by its source spelling.
    pub fn parse(op: &str) -> Option<Self> {
        match op {
            "==" => Some(Comparator::Equal),
            "not" => Some(Comparator::NotEqual),
            ">" => Some(Comparator::Greater),
            "<" => Some(Comparator::Less),
            _ => None,
        }
    }

    pub fn apply(self, lhs: u64, rhs: u64) -> bool {
        match self {
            Comparator::Equal => lhs == rhs,
            Comparator::NotEqual => lhs != rhs,
            Comparator::Greater => lhs > rhs,
            Comparator::Less => lhs < rhs,
        }
    }
}

/// `<var> <op> <literal>` as written in a `while` or `if` header.
///
/// The operator and literal are kept as source text: a bad literal is an
/// operand error raised when the condition is evaluated, not at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub var: String,
    pub op: String,
    pub literal: String,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.var, self.op, self.literal)
    }
}

/// A single validated instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Clear { var: String },
    Incr { var: String },
    Decr { var: String },
    While(Condition),
    If(Condition),
    /// `end while`, `end if`, or any other closing word
    End { kind: String },
    /// A command word the interpreter does not know; skipped with a warning
    Unknown { command: String, operands: Vec<String> },
}

impl Instruction {
    /// Command word as it appears in source
    pub fn command(&self) -> &str {
        match self {
            Instruction::Clear { .. } => "clear",
            Instruction::Incr { .. } => "incr",
            Instruction::Decr { .. } => "decr",
            Instruction::While(_) => "while",
            Instruction::If(_) => "if",
            Instruction::End { .. } => "end",
            Instruction::Unknown { command, .. } => command,
        }
    }

    /// Block kind opened by this instruction, if any
    pub fn opens_block(&self) -> Option<BlockKind> {
        match self {
            Instruction::While(_) => Some(BlockKind::While),
            Instruction::If(_) => Some(BlockKind::If),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Clear { var } => write!(f, "clear {}", var),
            Instruction::Incr { var } => write!(f, "incr {}", var),
            Instruction::Decr { var } => write!(f, "decr {}", var),
            Instruction::While(cond) => write!(f, "while {}", cond),
            Instruction::If(cond) => write!(f, "if {}", cond),
            Instruction::End { kind } => write!(f, "end {}", kind),
            Instruction::Unknown { command, operands } => {
                write!(f, "{}", command)?;
                for operand in operands {
                    write!(f, " {}", operand)?;
                }
                Ok(())
            }
        }
    }
}

/// An instruction together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub instruction: Instruction,
    pub location: SourceLocation,
}

/// A loaded program: the flat instruction sequence plus its block table.
///
/// Both are fixed once [`crate::parser::load`] returns.
#[derive(Debug, Clone)]
pub struct Program {
    statements: Vec<Statement>,
    jumps: JumpTable,
}

impl Program {
    pub(crate) fn new(statements: Vec<Statement>, jumps: JumpTable) -> Self {
        Program { statements, jumps }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn get(&self, position: usize) -> Option<&Statement> {
        self.statements.get(position)
    }

    pub fn jumps(&self) -> &JumpTable {
        &self.jumps
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_lookup() {
        assert_eq!(Comparator::parse("=="), Some(Comparator::Equal));
        assert_eq!(Comparator::parse("not"), Some(Comparator::NotEqual));
        assert_eq!(Comparator::parse(">"), Some(Comparator::Greater));
        assert_eq!(Comparator::parse("<"), Some(Comparator::Less));
        assert_eq!(Comparator::parse("!="), None);
        assert_eq!(Comparator::parse(">="), None);
    }

    #[test]
    fn test_comparator_apply() {
        assert!(Comparator::Equal.apply(3, 3));
        assert!(Comparator::NotEqual.apply(3, 4));
        assert!(!Comparator::NotEqual.apply(0, 0));
        assert!(Comparator::Greater.apply(5, 0));
        assert!(!Comparator::Less.apply(5, 5));
    }

    #[test]
    fn test_instruction_display() {
        let cond = Condition {
            var: "X".to_string(),
            op: "not".to_string(),
            literal: "0".to_string(),
        };
        assert_eq!(Instruction::While(cond).to_string(), "while X not 0");
        assert_eq!(
            Instruction::End {
                kind: "while".to_string()
            }
            .to_string(),
            "end while"
        );
    }
}
