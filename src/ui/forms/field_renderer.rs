//! Field rendering utilities for forms

use crate::state::{FieldKind, FormField};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, ListItem, Paragraph, Wrap},
    Frame,
};

const LABEL_WIDTH: usize = 44;

/// One-line summary of a field for the form list
pub fn field_row(field: &FormField, is_active: bool) -> ListItem<'static> {
    let label_style = if is_active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let value = field.display_value();
    // Multiline values show their first line only
    let summary = match value.split_once('\n') {
        Some((first, _)) => format!("{first} …"),
        None => value,
    };
    ListItem::new(Line::from(vec![
        Span::styled(format!("  {:<LABEL_WIDTH$} ", field.label), label_style),
        Span::styled(summary, Style::default().fg(Color::White)),
    ]))
}

/// Section heading row for the form list
pub fn section_row(title: &str) -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        title.to_uppercase(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )))
}

/// Key hint for editing a field of this kind
fn edit_hint(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "type to edit",
        FieldKind::Multiline => "type to edit, Enter for a new line",
        FieldKind::Number => "digits only",
        FieldKind::Date => "YYYY-MM-DD",
        FieldKind::Select(_) | FieldKind::Choice(_) => "←→ or Space to choose",
        FieldKind::Boolean => "Space to toggle",
    }
}

/// Draw the editor box for the focused field
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FormField) {
    let accent = Style::default().fg(Color::Cyan);
    let display_value = field.display_value();
    let cursor = if field.kind.is_typed() { "▌" } else { "" };

    let content = if field.is_multiline() {
        let mut lines: Vec<Line> = display_value
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled(cursor, accent));
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_value, Style::default().fg(Color::White)),
            Span::styled(cursor, accent),
        ]))
    };

    let block = Block::default()
        .title(format!(" {} ", field.label))
        .title_bottom(Line::from(format!(" {} ", edit_hint(field.kind))).right_aligned())
        .borders(Borders::ALL)
        .border_style(accent);
    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}
