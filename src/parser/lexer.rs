//! Lexer (tokenizer) for Barebones source
//!
//! Splits raw text into lines, each line into statements on `;`, and each
//! statement into whitespace-delimited fields. Empty statements are dropped
//! without consuming a position. The same splitting rules drive
//! [`highlight_line`], which the source pane uses for colouring.

use super::ast::SourceLocation;

/// Separates statements sharing one physical line
pub const STATEMENT_SEPARATOR: char = ';';

/// Recognised command words
pub const COMMANDS: [&str; 6] = ["clear", "incr", "decr", "while", "if", "end"];

/// Recognised comparison operators
pub const OPERATORS: [&str; 4] = ["==", "not", ">", "<"];

/// One non-empty statement split into fields, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub fields: Vec<String>,
    pub location: SourceLocation,
}

impl Fragment {
    pub fn command(&self) -> &str {
        // Fragments are only built from non-empty statements
        self.fields.first().map(String::as_str).unwrap_or_default()
    }

    pub fn operands(&self) -> &[String] {
        self.fields.get(1..).unwrap_or_default()
    }
}

/// Lexer for Barebones source code
pub struct Lexer<'a> {
    input: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// Tokenize the entire input into fragments, in source order
    pub fn tokenize(&self) -> Vec<Fragment> {
        let mut fragments = Vec::new();

        for (line_idx, line) in self.input.lines().enumerate() {
            let mut offset = 0;
            for part in line.split(STATEMENT_SEPARATOR) {
                let leading = part.len() - part.trim_start().len();
                let text = part.trim();
                if !text.is_empty() {
                    let column = line[..offset + leading].chars().count() + 1;
                    fragments.push(Fragment {
                        fields: text.split_whitespace().map(str::to_string).collect(),
                        location: SourceLocation::new(line_idx + 1, column),
                    });
                }
                offset += part.len() + STATEMENT_SEPARATOR.len_utf8();
            }
        }

        fragments
    }
}

/// Highlight classes for a piece of a source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// Command word in field 0
    Instruction,
    /// Block word after `end`
    Keyword,
    Operator,
    Number,
    Name,
    Separator,
    Whitespace,
}

/// A contiguous slice of a source line with its highlight class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    pub text: &'a str,
    pub kind: SectionKind,
}

/// Classify every byte of `line` into highlight sections.
///
/// Concatenating the section texts reproduces the line exactly.
pub fn highlight_line(line: &str) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    let mut field = 0;
    let mut command = "";
    let mut start = 0;

    while start < line.len() {
        let rest = &line[start..];
        let ch = rest.chars().next().unwrap_or_default();

        if ch == STATEMENT_SEPARATOR {
            let len = ch.len_utf8();
            sections.push(Section {
                text: &rest[..len],
                kind: SectionKind::Separator,
            });
            field = 0;
            command = "";
            start += len;
            continue;
        }

        if ch.is_whitespace() {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            sections.push(Section {
                text: &rest[..len],
                kind: SectionKind::Whitespace,
            });
            start += len;
            continue;
        }

        let len = rest
            .find(|c: char| c.is_whitespace() || c == STATEMENT_SEPARATOR)
            .unwrap_or(rest.len());
        let word = &rest[..len];
        let kind = classify_word(word, field, command);
        if field == 0 {
            command = word;
        }
        sections.push(Section { text: word, kind });
        field += 1;
        start += len;
    }

    sections
}

fn classify_word(word: &str, field: usize, command: &str) -> SectionKind {
    if field == 0 {
        return if COMMANDS.contains(&word) {
            SectionKind::Instruction
        } else {
            SectionKind::Name
        };
    }

    match (command, field) {
        ("end", 1) => SectionKind::Keyword,
        ("while" | "if", 2) if OPERATORS.contains(&word) => SectionKind::Operator,
        _ if word.bytes().all(|b| b.is_ascii_digit()) => SectionKind::Number,
        _ => SectionKind::Name,
    }
}
