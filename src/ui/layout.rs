//! Layout components (section sidebar, status bar)

use super::widgets::render_scrollable_list;
use crate::app::App;
use crate::platform::{EXPORT_SHORTCUT, SAVE_SHORTCUT};
use crate::state::MonitoringForm;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 28;

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    // Reserve bottom line for status bar
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
        .split(rows[0]);

    (chunks[0], chunks[1])
}

/// Titles of the sections that have at least one shown field, in form order.
///
/// The second element is the position of the section holding the focus.
pub fn visible_sections(form: &MonitoringForm, visible: &[usize]) -> (Vec<&'static str>, usize) {
    let mut titles: Vec<&'static str> = Vec::new();
    let mut active = 0;
    for &i in visible {
        let Some(section) = form.section_of(i) else {
            continue;
        };
        if titles.last() != Some(&section.title) {
            titles.push(section.title);
        }
        if i == form.active_field_index {
            active = titles.len().saturating_sub(1);
        }
    }
    (titles, active)
}

/// Draw the sidebar listing the shown sections
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.dispatcher.form();
    let visible = app.dispatcher.visible_indices();
    let (titles, active) = visible_sections(form, &visible);

    let items: Vec<ListItem> = titles
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            let style = if idx == active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            ListItem::new(Line::from(Span::styled(*title, style)))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Sections ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_symbol("▸ ");
    let selected = (!titles.is_empty()).then_some(active);
    render_scrollable_list(frame, area, list, selected);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![Span::styled(
        format!(
            " Tab/↑↓:field  PgUp/PgDn:section  Space/←→:choose  {SAVE_SHORTCUT}:save  {EXPORT_SHORTCUT}:export  ^L:clear  ^R:forget saved  Esc:quit"
        ),
        Style::default().fg(Color::Gray),
    )];

    if let Some(indicator) = app.state.save_indicator() {
        let color = match indicator {
            "saved" => Color::Green,
            "save failed" => Color::Red,
            _ => Color::Yellow,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(indicator, Style::default().fg(color)));
    }

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::White)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);
}
