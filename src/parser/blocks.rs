//! Block resolution: matching each `while`/`if` with its `end`.
//!
//! A single forward scan keeps a stack of open blocks. Openers push their
//! position; each `end` pops the innermost one and records the pair in both
//! directions, so the engine never has to re-derive the block kind from the
//! word written after `end`.

use super::ast::{BlockKind, Instruction, SourceLocation, Statement};
use super::parser::ParseError;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Where a block opener jumps when its condition is false
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockTarget {
    pub kind: BlockKind,
    /// Position of the matching `end`
    pub end: usize,
}

/// What an `end` instruction closes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockClose {
    pub kind: BlockKind,
    /// Position of the matching `while`/`if`
    pub opener: usize,
}

/// Opener → end and end → opener mappings for one program
#[derive(Debug, Clone, Default)]
pub struct JumpTable {
    targets: FxHashMap<usize, BlockTarget>,
    closes: FxHashMap<usize, BlockClose>,
}

impl JumpTable {
    pub fn target(&self, opener: usize) -> Option<&BlockTarget> {
        self.targets.get(&opener)
    }

    pub fn close(&self, end: usize) -> Option<&BlockClose> {
        self.closes.get(&end)
    }

    /// Number of resolved blocks
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// All `(opener, target)` pairs, ordered by opener position
    pub fn entries(&self) -> Vec<(usize, BlockTarget)> {
        let mut entries: Vec<_> = self.targets.iter().map(|(k, v)| (*k, *v)).collect();
        entries.sort_by_key(|(opener, _)| *opener);
        entries
    }
}

/// Build the jump table for `statements`, or report every mismatch found.
pub fn resolve_blocks(statements: &[Statement]) -> Result<JumpTable, Vec<ParseError>> {
    let mut table = JumpTable::default();
    let mut open: Vec<(usize, BlockKind, SourceLocation)> = Vec::new();
    let mut errors = Vec::new();

    for (position, stmt) in statements.iter().enumerate() {
        if let Some(kind) = stmt.instruction.opens_block() {
            open.push((position, kind, stmt.location));
            continue;
        }

        let Instruction::End { kind: closer } = &stmt.instruction else {
            continue;
        };

        let Some((opener, kind, opened_at)) = open.pop() else {
            errors.push(ParseError::UnmatchedEnd {
                position,
                location: stmt.location,
            });
            continue;
        };

        // Only `end while` loops back, so it must close a while block and
        // nothing else may.
        if (kind == BlockKind::While) != (closer == "while") {
            errors.push(ParseError::KindMismatch {
                opened: kind,
                opened_at,
                closer: closer.clone(),
                location: stmt.location,
            });
            continue;
        }

        table.targets.insert(opener, BlockTarget { kind, end: position });
        table.closes.insert(position, BlockClose { kind, opener });
    }

    for (_, kind, location) in open {
        errors.push(ParseError::UnterminatedBlock { kind, location });
    }

    if errors.is_empty() {
        debug!(blocks = table.len(), "resolved block structure");
        Ok(table)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Lexer;
    use crate::parser::parser::validate;

    fn statements(source: &str) -> Vec<Statement> {
        validate(&Lexer::new(source).tokenize()).expect("validation failed")
    }

    #[test]
    fn test_sequential_blocks() {
        let stmts = statements("while X not 0\ndecr X\nend while\nif Y == 0\nincr Y\nend if");
        let table = resolve_blocks(&stmts).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.target(0),
            Some(&BlockTarget {
                kind: BlockKind::While,
                end: 2
            })
        );
        assert_eq!(
            table.target(3),
            Some(&BlockTarget {
                kind: BlockKind::If,
                end: 5
            })
        );
        assert_eq!(
            table.close(2),
            Some(&BlockClose {
                kind: BlockKind::While,
                opener: 0
            })
        );
    }

    #[test]
    fn test_nested_blocks_match_innermost_first() {
        let stmts = statements(
            "while X not 0; if X == 2; incr Y; end if; while Y not 0; decr Y; end while; decr X; end while",
        );
        let table = resolve_blocks(&stmts).unwrap();

        assert_eq!(table.target(0).unwrap().end, 8);
        assert_eq!(table.target(1).unwrap().end, 3);
        assert_eq!(table.target(4).unwrap().end, 6);
        for (opener, target) in table.entries() {
            assert!(target.end > opener);
        }
    }

    #[test]
    fn test_unmatched_end() {
        let stmts = statements("clear X\nend while");
        let errors = resolve_blocks(&stmts).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ParseError::UnmatchedEnd { position: 1, .. }));
    }

    #[test]
    fn test_unterminated_block() {
        let stmts = statements("while X == 0\nincr X");
        let errors = resolve_blocks(&stmts).unwrap_err();

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            ParseError::UnterminatedBlock {
                kind: BlockKind::While,
                ..
            }
        ));
    }

    #[test]
    fn test_end_kind_must_agree_with_opener() {
        let stmts = statements("if X == 0\nend while");
        let errors = resolve_blocks(&stmts).unwrap_err();
        assert!(matches!(
            errors[0],
            ParseError::KindMismatch {
                opened: BlockKind::If,
                ..
            }
        ));

        let stmts = statements("while X == 0\nend if");
        let errors = resolve_blocks(&stmts).unwrap_err();
        assert!(matches!(
            errors[0],
            ParseError::KindMismatch {
                opened: BlockKind::While,
                ..
            }
        ));
    }

    #[test]
    fn test_if_closed_by_any_non_while_word() {
        let stmts = statements("if X == 0\nincr X\nend fi");
        let table = resolve_blocks(&stmts).unwrap();
        assert_eq!(table.target(0).unwrap().kind, BlockKind::If);
    }
}
