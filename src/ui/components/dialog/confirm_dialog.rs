//! Confirmation dialog for quitting and clearing data

use super::base::{key_hint, render_dialog, DialogConfig};
use crate::state::{ConfirmAction, PendingConfirm};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

fn accent(action: ConfirmAction) -> Color {
    match action {
        ConfirmAction::Quit => Color::Yellow,
        ConfirmAction::ClearForm | ConfirmAction::ClearSavedData => Color::Red,
    }
}

/// Cancel and confirm rows, marking the highlighted one
fn option_lines(pending: &PendingConfirm) -> Vec<Line<'static>> {
    [
        (false, "Cancel", Color::White),
        (true, pending.action.confirm_label(), accent(pending.action)),
    ]
    .into_iter()
    .map(|(confirms, label, color)| {
        if pending.selected_option == confirms {
            Line::from(Span::styled(
                format!("▸ {label}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(Span::styled(
                format!("  {label}"),
                Style::default().fg(Color::DarkGray),
            ))
        }
    })
    .collect()
}

/// Render a confirmation dialog for `pending`
pub fn render_confirm_dialog(frame: &mut Frame, pending: &PendingConfirm) {
    let action = pending.action;
    render_dialog(
        frame,
        DialogConfig {
            title: action.title(),
            accent: accent(action),
            message: action.message(),
            options: option_lines(pending),
            hint: Some(vec![
                key_hint("↑↓"),
                Span::raw(" select  "),
                key_hint("Enter"),
                Span::raw(" confirm  "),
                key_hint("Esc"),
                Span::raw(" cancel"),
            ]),
            max_width: 56,
        },
    );
}
