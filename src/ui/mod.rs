//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod widgets;

use crate::app::App;
use components::{render_confirm_dialog, render_error_dialog};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (sidebar_area, main_area) = layout::create_layout(frame.area());

    layout::draw_sidebar(frame, sidebar_area, app);
    forms::draw_form(frame, main_area, app);
    layout::draw_status_bar(frame, app);

    // Dialogs overlay everything; errors take precedence
    if let Some(message) = app.state.current_error() {
        render_error_dialog(frame, message);
    } else if let Some(pending) = &app.state.confirm {
        render_confirm_dialog(frame, pending);
    }
}
