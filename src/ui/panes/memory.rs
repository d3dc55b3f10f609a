//! Variables pane rendering
//!
//! Lists every declared variable with its value, sorted by name. Variables
//! written by the most recent instruction are marked.

use crate::memory::VariableStore;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the variables pane
pub fn render_memory_pane(
    frame: &mut Frame,
    area: Rect,
    store: &VariableStore,
    changed: Option<&str>,
    loop_depth: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Memory │ loop depth {} ", loop_depth))
        .borders(Borders::ALL)
        .border_style(border_style);

    let entries = store.sorted();
    let name_width = entries.iter().map(|(name, _)| name.len()).max().unwrap_or(0);

    let all_items: Vec<ListItem> = if entries.is_empty() {
        vec![ListItem::new("(no variables)").style(Style::default().fg(DEFAULT_THEME.comment))]
    } else {
        entries
            .iter()
            .map(|(name, value)| {
                let is_changed = changed == Some(*name);
                let marker_style = Style::default().fg(DEFAULT_THEME.secondary);
                ListItem::new(Line::from(vec![
                    Span::styled(if is_changed { "▸ " } else { "  " }, marker_style),
                    Span::styled(
                        format!("{:<width$}", name, width = name_width),
                        Style::default().fg(DEFAULT_THEME.variable),
                    ),
                    Span::styled(" <- ", Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(
                        value.to_string(),
                        if is_changed {
                            Style::default()
                                .fg(DEFAULT_THEME.number)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(DEFAULT_THEME.number)
                        },
                    ),
                ]))
            })
            .collect()
    };

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
