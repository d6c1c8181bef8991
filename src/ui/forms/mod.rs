//! The monitoring form view

mod field_renderer;

use super::widgets::render_scrollable_list;
use crate::app::App;
use crate::state::MonitoringForm;
use field_renderer::{draw_field, field_row, section_row};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Rows of the form list with the row index of the focused field
fn form_rows(form: &MonitoringForm, visible: &[usize]) -> (Vec<ListItem<'static>>, Option<usize>) {
    let mut rows = Vec::new();
    let mut selected = None;
    let mut current_section = None;
    for &i in visible {
        let section = form.section_of(i);
        let id = section.map(|s| s.id);
        if id != current_section {
            if let Some(section) = section {
                rows.push(section_row(section.title));
            }
            current_section = id;
        }
        let is_active = i == form.active_field_index;
        if is_active {
            selected = Some(rows.len());
        }
        rows.push(field_row(&form.fields()[i], is_active));
    }
    (rows, selected)
}

/// Draw the scrolling field list and the editor for the focused field
pub fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let form = app.dispatcher.form();
    let active = form.active_field();
    let editor_height = match active {
        Some(field) if field.is_multiline() => 8,
        _ => 3,
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(editor_height)])
        .split(area);

    let visible = app.dispatcher.visible_indices();
    let (rows, selected) = form_rows(form, &visible);
    let list = List::new(rows)
        .block(
            Block::default()
                .title(" Monitoring Tool for Private Schools ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(Style::default().bg(Color::Rgb(30, 40, 55)));
    render_scrollable_list(frame, chunks[0], list, selected);

    if let Some(field) = active {
        draw_field(frame, chunks[1], field);
    }
}
