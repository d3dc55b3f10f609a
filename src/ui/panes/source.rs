//! Source code pane rendering with syntax highlighting
//!
//! Displays the program being executed with the line holding the next
//! instruction highlighted. Highlight classes come from
//! [`highlight_line`], so the pane colours text with the same splitting
//! rules the loader uses.

use crate::parser::lexer::{highlight_line, SectionKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn section_style(kind: SectionKind) -> Style {
    match kind {
        SectionKind::Instruction => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        SectionKind::Keyword => Style::default().fg(DEFAULT_THEME.keyword),
        SectionKind::Operator => Style::default().fg(DEFAULT_THEME.operator),
        SectionKind::Number => Style::default().fg(DEFAULT_THEME.number),
        SectionKind::Name => Style::default().fg(DEFAULT_THEME.variable),
        SectionKind::Separator => Style::default().fg(DEFAULT_THEME.comment),
        SectionKind::Whitespace => Style::default(),
    }
}

fn highlight_source_code(line: &str) -> Line<'_> {
    Line::from(
        highlight_line(line)
            .into_iter()
            .map(|section| Span::styled(section.text, section_style(section.kind)))
            .collect::<Vec<_>>(),
    )
}

/// Scroll state for the source pane
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the source code pane.
///
/// `current_line` is the 1-based line of the next instruction, `None` once
/// the program has finished.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: Option<usize>,
    is_error: bool,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the current line at a fixed row while stepping
    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    if let Some(line) = current_line.filter(|l| *l > 0 && *l <= total_lines) {
        scroll_state.offset = (line - 1).saturating_sub(target_row);
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = current_line == Some(line_num);
            let line_num_str = format!("{:4} ", line_num);

            let (num_style, content_base_style) = if is_current && is_error {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(ratatui::style::Color::White)
                        .add_modifier(Modifier::BOLD),
                )
            } else if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), Style::default())
            };

            let mut content_line = highlight_source_code(line);
            if is_current && is_error {
                for span in &mut content_line.spans {
                    span.style = content_base_style;
                }
            } else if is_current {
                for span in &mut content_line.spans {
                    span.style = span.style.patch(content_base_style);
                }
            }

            let marker = if is_current { "▶" } else { " " };
            let mut final_spans = vec![
                Span::styled(marker, num_style),
                Span::styled(line_num_str, num_style),
            ];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
