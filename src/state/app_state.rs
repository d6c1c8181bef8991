//! Application state definitions

use crate::dispatch::SaveStatus;
use std::collections::VecDeque;

/// Action waiting for the user to confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Quit while the form has changes that were not exported
    Quit,
    ClearForm,
    ClearSavedData,
}

impl ConfirmAction {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Quit => "Unsaved Changes",
            Self::ClearForm => "Clear Form",
            Self::ClearSavedData => "Clear Saved Data",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Quit => "You have unsaved changes. Are you sure you want to leave?",
            Self::ClearForm => "Are you sure you want to clear all form data?",
            Self::ClearSavedData => {
                "Are you sure you want to clear all saved data? This cannot be undone."
            }
        }
    }

    pub fn confirm_label(&self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::ClearForm | Self::ClearSavedData => "Clear",
        }
    }
}

/// Confirmation dialog state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirm {
    pub action: ConfirmAction,
    /// true = confirm highlighted, false = cancel highlighted
    pub selected_option: bool,
}

impl PendingConfirm {
    pub fn new(action: ConfirmAction) -> Self {
        Self {
            action,
            selected_option: false,
        }
    }
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Errors waiting to be shown, oldest first
    pub errors: VecDeque<String>,
    pub confirm: Option<PendingConfirm>,
    pub status_message: Option<String>,
    /// Result of the most recent save attempt
    pub save_status: Option<SaveStatus>,
}

impl AppState {
    pub fn push_error(&mut self, message: String) {
        tracing::debug!("Showing error: {message}");
        self.errors.push_back(message);
    }

    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Short save indicator for the status bar
    pub fn save_indicator(&self) -> Option<&'static str> {
        match self.save_status.as_ref()? {
            SaveStatus::Idle => None,
            SaveStatus::Pending => Some("editing…"),
            SaveStatus::Saved => Some("saved"),
            SaveStatus::Disabled => Some("not persisted"),
            SaveStatus::Failed { .. } => Some("save failed"),
        }
    }
}
