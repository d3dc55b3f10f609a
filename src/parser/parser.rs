use crate::interpreter::events::Output;
use crate::parser::ast::*;
use crate::parser::blocks::resolve_blocks;
use crate::parser::lexer::{Fragment, Lexer};
use thiserror::Error;
use tracing::{debug, warn};

/// A structural problem found while loading a program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A statement has the wrong number of operands for its command
    #[error("Incorrect arguments at {location}: `{command}` expects {expected} operand(s), found {found}")]
    IncorrectArguments {
        command: String,
        expected: usize,
        found: usize,
        location: SourceLocation,
    },

    /// An `end` with no open block to close
    #[error("while/if-end mismatch at {location}: `end` at position {position} has no open block")]
    UnmatchedEnd {
        position: usize,
        location: SourceLocation,
    },

    /// A `while`/`if` block that is never closed
    #[error("while/if-end mismatch: `{kind}` block opened at {location} is never closed")]
    UnterminatedBlock {
        kind: BlockKind,
        location: SourceLocation,
    },

    /// `end while` closing an `if`, or another word closing a `while`
    #[error("while/if-end mismatch at {location}: `end {closer}` closes the `{opened}` block opened at {opened_at}")]
    KindMismatch {
        opened: BlockKind,
        opened_at: SourceLocation,
        closer: String,
        location: SourceLocation,
    },
}

impl ParseError {
    pub fn location(&self) -> SourceLocation {
        match self {
            ParseError::IncorrectArguments { location, .. }
            | ParseError::UnmatchedEnd { location, .. }
            | ParseError::UnterminatedBlock { location, .. }
            | ParseError::KindMismatch { location, .. } => *location,
        }
    }
}

/// Every structural error in a program. Loading is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("program has {} structural error(s)", .errors.len())]
pub struct LoadError {
    pub errors: Vec<ParseError>,
}

impl LoadError {
    /// One error-tagged output per structural error, followed by the summary,
    /// ready to hand to an [`Observer`](crate::interpreter::Observer).
    pub fn outputs(&self) -> Vec<Output> {
        self.errors
            .iter()
            .map(|e| Output::error(e.to_string()))
            .chain(std::iter::once(Output::error(self.to_string())))
            .collect()
    }
}

/// Operand count required by a known command, `None` for unknown commands
pub fn expected_operands(command: &str) -> Option<usize> {
    match command {
        "clear" | "incr" | "decr" | "end" => Some(1),
        "while" | "if" => Some(3),
        _ => None,
    }
}

/// Turn fragments into instructions, collecting every arity violation.
///
/// Unknown command words pass validation untouched; the engine skips them
/// with a warning when they are reached.
pub fn validate(fragments: &[Fragment]) -> Result<Vec<Statement>, Vec<ParseError>> {
    let mut statements = Vec::with_capacity(fragments.len());
    let mut errors = Vec::new();

    for fragment in fragments {
        let command = fragment.command();
        let operands = fragment.operands();

        if let Some(expected) = expected_operands(command) {
            if operands.len() != expected {
                errors.push(ParseError::IncorrectArguments {
                    command: command.to_string(),
                    expected,
                    found: operands.len(),
                    location: fragment.location,
                });
                continue;
            }
        }

        let instruction = match (command, operands) {
            ("clear", [var]) => Instruction::Clear { var: var.clone() },
            ("incr", [var]) => Instruction::Incr { var: var.clone() },
            ("decr", [var]) => Instruction::Decr { var: var.clone() },
            ("while", [var, op, literal]) => Instruction::While(Condition {
                var: var.clone(),
                op: op.clone(),
                literal: literal.clone(),
            }),
            ("if", [var, op, literal]) => Instruction::If(Condition {
                var: var.clone(),
                op: op.clone(),
                literal: literal.clone(),
            }),
            ("end", [kind]) => Instruction::End { kind: kind.clone() },
            _ => {
                warn!(command, location = %fragment.location, "unrecognised command");
                Instruction::Unknown {
                    command: command.to_string(),
                    operands: operands.to_vec(),
                }
            }
        };

        statements.push(Statement {
            instruction,
            location: fragment.location,
        });
    }

    if errors.is_empty() {
        Ok(statements)
    } else {
        Err(errors)
    }
}

/// Loader for Barebones programs: tokenize, validate, resolve blocks
pub struct Parser {
    fragments: Vec<Fragment>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            fragments: Lexer::new(source).tokenize(),
        }
    }

    /// Build the program, or fail with every structural error found.
    ///
    /// Block resolution only runs once every statement has valid arity;
    /// otherwise the dropped statements would surface as spurious mismatches.
    pub fn parse_program(&self) -> Result<Program, LoadError> {
        let statements = validate(&self.fragments).map_err(|errors| LoadError { errors })?;
        let jumps = resolve_blocks(&statements).map_err(|errors| LoadError { errors })?;

        debug!(
            instructions = statements.len(),
            blocks = jumps.len(),
            "program loaded"
        );
        Ok(Program::new(statements, jumps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_builds_instructions() {
        let fragments = Lexer::new("clear X; incr X; while X not 0; decr X; end while").tokenize();
        let stmts = validate(&fragments).unwrap();

        assert_eq!(stmts.len(), 5);
        assert_eq!(
            stmts[0].instruction,
            Instruction::Clear {
                var: "X".to_string()
            }
        );
        assert!(matches!(&stmts[2].instruction, Instruction::While(c) if c.op == "not" && c.literal == "0"));
        assert_eq!(
            stmts[4].instruction,
            Instruction::End {
                kind: "while".to_string()
            }
        );
    }

    #[test]
    fn test_arity_errors_are_all_collected() {
        let fragments = Lexer::new("clear\nincr X Y\nwhile X == \nend").tokenize();
        let errors = validate(&fragments).unwrap_err();

        assert_eq!(errors.len(), 4);
        assert!(matches!(
            &errors[0],
            ParseError::IncorrectArguments { command, expected: 1, found: 0, .. } if command == "clear"
        ));
        assert!(matches!(
            &errors[2],
            ParseError::IncorrectArguments { expected: 3, found: 2, location, .. } if location.line == 3
        ));
    }

    #[test]
    fn test_unknown_command_passes_validation() {
        let fragments = Lexer::new("print X\nhalt").tokenize();
        let stmts = validate(&fragments).unwrap();

        assert!(matches!(
            &stmts[0].instruction,
            Instruction::Unknown { command, operands } if command == "print" && operands.len() == 1
        ));
        assert!(matches!(&stmts[1].instruction, Instruction::Unknown { operands, .. } if operands.is_empty()));
    }

    #[test]
    fn test_parse_program_rejects_arity_before_blocks() {
        let err = Parser::new("while X == 0\nincr\nend while").parse_program().unwrap_err();

        assert_eq!(err.errors.len(), 1);
        assert!(matches!(err.errors[0], ParseError::IncorrectArguments { .. }));
    }

    #[test]
    fn test_parse_program_success() {
        let program = Parser::new("clear X\nwhile X == 0\nincr X\nend while\n")
            .parse_program()
            .unwrap();

        assert_eq!(program.len(), 4);
        assert_eq!(program.jumps().target(1).unwrap().end, 3);
    }

    #[test]
    fn test_error_messages_name_location() {
        let err = Parser::new("incr").parse_program().unwrap_err();
        let message = err.errors[0].to_string();
        assert!(message.contains("line 1, column 1"));
        assert!(message.contains("`incr` expects 1"));
        assert_eq!(err.to_string(), "program has 1 structural error(s)");
    }

    #[test]
    fn test_error_locations() {
        let err = Parser::new("clear X
  while X == 0
end if
incr")
            .parse_program()
            .unwrap_err();

        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].location(), SourceLocation::new(4, 1));

        let err = Parser::new("clear X
  while X == 0
end if").parse_program().unwrap_err();
        assert!(matches!(err.errors[0], ParseError::KindMismatch { .. }));
        assert_eq!(err.errors[0].location(), SourceLocation::new(3, 1));

        let err = Parser::new("incr X
  while X == 0").parse_program().unwrap_err();
        assert_eq!(err.errors[0].location(), SourceLocation::new(2, 3));
    }

    #[test]
    fn test_load_error_outputs() {
        let err = Parser::new("incr
decr X Y").parse_program().unwrap_err();
        let outputs = err.outputs();

        assert_eq!(outputs.len(), 3);
        assert!(outputs.iter().all(Output::is_error));
        assert!(outputs[0].text.contains("line 1, column 1"));
        assert!(outputs[1].text.contains("line 2, column 1"));
        assert_eq!(outputs[2].text, "program has 2 structural error(s)");
    }
}
