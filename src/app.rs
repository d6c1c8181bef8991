//! Application state and core logic

use crate::config::FormConfig;
use crate::dispatch::{Dispatcher, Focus, FormEvent, SaveStatus};
use crate::export::write_report;
use crate::persistence::{
    AutosaveScheduler, DisabledStore, FileStore, KeyValueStore, SaveTrigger, StateSerializer,
};
use crate::platform::is_command;
use crate::state::monitoring::monitoring_schema;
use crate::state::{
    AppState, ConfirmAction, FieldKind, FieldValue, FormField, MonitoringForm, PendingConfirm,
};
use crate::visibility::Category;
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use std::path::PathBuf;
use std::time::Instant;

pub type Store = Box<dyn KeyValueStore>;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// The form and its persistence
    pub dispatcher: Dispatcher<Store>,
    export_dir: PathBuf,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance, restoring saved data when present
    pub fn new(config: &FormConfig) -> Result<Self> {
        let store: Store = if config.persistence_enabled() {
            Box::new(FileStore::new(config.data_dir()))
        } else {
            tracing::info!("Persistence disabled; form data stays in memory");
            Box::new(DisabledStore)
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: &FormConfig, store: Store) -> Result<Self> {
        let form = MonitoringForm::new(monitoring_schema())?;
        let mut dispatcher = Dispatcher::new(
            form,
            StateSerializer::new(store),
            AutosaveScheduler::new(config.quiet_window()),
        );
        let mut state = AppState::default();
        if dispatcher.initialize(Local::now().date_naive()).is_some() {
            state.status_message = Some("Previously saved data has been restored".to_string());
        }
        Ok(Self {
            state,
            dispatcher,
            export_dir: config.export_dir(),
            quit: false,
        })
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Flush a due autosave; called on every loop iteration
    pub fn tick(&mut self, now: Instant) {
        let status = self.dispatcher.tick(now);
        if status != SaveStatus::Idle {
            self.record_save(status);
        }
    }

    /// Write any edit still waiting for its quiet window
    pub fn flush(&mut self) {
        let status = self.dispatcher.flush();
        if status != SaveStatus::Idle {
            tracing::debug!("Flushed pending edit: {status:?}");
        }
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }
        if self.state.confirm.is_some() {
            return self.handle_confirm_key(key);
        }
        if is_command(&key) {
            return self.handle_command_key(key);
        }
        self.handle_form_key(key)
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('s') => {
                let status = self.dispatcher.save_now();
                if status == SaveStatus::Saved {
                    self.state.status_message = Some("Form data saved".to_string());
                }
                self.record_save(status);
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => self.ask(ConfirmAction::ClearSavedData),
            KeyCode::Char('l') => self.ask(ConfirmAction::ClearForm),
            KeyCode::Char('q') | KeyCode::Char('c') => self.request_quit(),
            _ => {}
        }
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(field) = self.dispatcher.form().active_field().cloned() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Esc => self.request_quit(),
            KeyCode::Tab | KeyCode::Down => self.dispatcher.move_focus(Focus::Next),
            KeyCode::BackTab | KeyCode::Up => self.dispatcher.move_focus(Focus::Prev),
            KeyCode::PageDown => self.dispatcher.move_focus(Focus::NextSection),
            KeyCode::PageUp => self.dispatcher.move_focus(Focus::PrevSection),
            KeyCode::Enter if field.is_multiline() => {
                if let Some(value) = field.with_char('\n') {
                    self.apply(FormEvent::field_changed(&field.name, value, SaveTrigger::Coalesced));
                }
            }
            KeyCode::Enter => self.dispatcher.move_focus(Focus::Next),
            KeyCode::Backspace => {
                if let Some(value) = field.without_last_char() {
                    self.apply(FormEvent::field_changed(&field.name, value, SaveTrigger::Coalesced));
                }
            }
            KeyCode::Left => self.cycle(&field, false),
            KeyCode::Right => self.cycle(&field, true),
            KeyCode::Char(' ') if field.kind == FieldKind::Boolean => self.toggle(&field),
            KeyCode::Char(' ') if !field.kind.is_typed() => self.cycle(&field, true),
            KeyCode::Char(c) => {
                if let Some(value) = field.with_char(c) {
                    self.apply(FormEvent::field_changed(&field.name, value, SaveTrigger::Coalesced));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        let Some(pending) = self.state.confirm.as_mut() else {
            return Ok(());
        };
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                pending.selected_option = !pending.selected_option;
            }
            KeyCode::Char('y') => {
                let action = pending.action;
                self.state.confirm = None;
                self.confirm(action);
            }
            KeyCode::Enter => {
                let PendingConfirm {
                    action,
                    selected_option,
                } = *pending;
                self.state.confirm = None;
                if selected_option {
                    self.confirm(action);
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => self.state.confirm = None,
            _ => {}
        }
        Ok(())
    }

    fn ask(&mut self, action: ConfirmAction) {
        self.state.confirm = Some(PendingConfirm::new(action));
    }

    fn confirm(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::Quit => self.quit = true,
            ConfirmAction::ClearForm => {
                let status = self.dispatcher.clear_form();
                self.record_save(status);
                self.state.status_message = Some("Form cleared".to_string());
            }
            ConfirmAction::ClearSavedData => match self.dispatcher.clear_saved_data() {
                Ok(()) => {
                    self.state.save_status = None;
                    self.state.status_message = Some("Saved data cleared successfully".to_string());
                }
                Err(e) => self.push_error(format!("Could not clear saved data: {e}")),
            },
        }
    }

    /// Quit, asking first when the form changed since the last baseline
    fn request_quit(&mut self) {
        if self.dispatcher.check_for_unsaved_changes() {
            self.ask(ConfirmAction::Quit);
        } else {
            self.quit = true;
        }
    }

    fn toggle(&mut self, field: &FormField) {
        let Some(value) = field.toggled() else {
            return;
        };
        let event = match (Category::from_toggle_field(&field.name), value) {
            (Some(category), FieldValue::Flag(enabled)) => {
                FormEvent::CategoryToggled { category, enabled }
            }
            (_, value) => FormEvent::field_changed(&field.name, value, SaveTrigger::Immediate),
        };
        self.apply(event);
    }

    fn cycle(&mut self, field: &FormField, forward: bool) {
        let Some(value) = field.cycled(forward) else {
            return;
        };
        let event = match (field.kind, value) {
            (FieldKind::Choice(_), FieldValue::Choice(selected)) => {
                FormEvent::choice_selected(&field.name, selected.as_deref())
            }
            (_, value) => FormEvent::field_changed(&field.name, value, SaveTrigger::Immediate),
        };
        self.apply(event);
    }

    fn apply(&mut self, event: FormEvent) {
        match self.dispatcher.dispatch(event, Instant::now()) {
            Ok(outcome) => {
                if let Some(sibling) = outcome.forced_off {
                    tracing::debug!("Cleared `{sibling}`");
                }
                self.record_save(outcome.save);
            }
            Err(e) => self.push_error(e.to_string()),
        }
    }

    fn record_save(&mut self, status: SaveStatus) {
        if let SaveStatus::Failed {
            message,
            first: true,
        } = &status
        {
            self.push_error(format!(
                "Form data could not be saved: {message}\nYour changes are kept until you quit."
            ));
        }
        self.state.save_status = Some(status);
    }

    fn export(&mut self) {
        let snapshot = self.dispatcher.snapshot();
        match write_report(&self.export_dir, &snapshot, Local::now().date_naive()) {
            Ok(path) => {
                self.dispatcher.mark_exported();
                self.state.status_message =
                    Some(format!("Document saved to {}", path.display()));
            }
            Err(e) => {
                tracing::warn!("Export failed: {e}");
                self.push_error(format!("Error generating document: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, STORAGE_KEY};
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        App::with_store(&FormConfig::default(), Box::new(MemoryStore::default())).unwrap()
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
            .unwrap();
    }

    fn focus(app: &mut App, name: &str) {
        for _ in 0..app.dispatcher.form().fields().len() {
            if app.dispatcher.form().active_field().map(|f| f.name.as_str()) == Some(name) {
                return;
            }
            press(app, KeyCode::Tab);
        }
        panic!("`{name}` is not reachable");
    }

    fn value(app: &App, name: &str) -> String {
        app.dispatcher.form().field(name).unwrap().as_text().to_string()
    }

    #[test]
    fn test_fresh_start_has_no_restore_message() {
        let app = app();
        assert!(app.state.status_message.is_none());
        assert!(!value(&app, "monitorDate").is_empty());
    }

    #[test]
    fn test_restore_message_when_data_saved() {
        let mut store = MemoryStore::default();
        store.set(STORAGE_KEY, r#"{"sdo":"Baguio"}"#).unwrap();
        let app = App::with_store(&FormConfig::default(), Box::new(store)).unwrap();
        assert_eq!(
            app.state.status_message.as_deref(),
            Some("Previously saved data has been restored")
        );
        assert_eq!(value(&app, "sdo"), "Baguio");
    }

    #[test]
    fn test_typing_edits_active_field() {
        let mut app = app();
        focus(&mut app, "sdo");
        for c in "Naga".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(value(&app, "sdo"), "Nag");
        assert_eq!(app.state.save_status, Some(SaveStatus::Pending));
    }

    #[test]
    fn test_space_toggles_category_and_hides_section() {
        let mut app = app();
        focus(&mut app, "filterHomeschool");
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.dispatcher.form().toggles().is_enabled(Category::Homeschool));
        assert_eq!(app.state.save_status, Some(SaveStatus::Saved));
    }

    #[test]
    fn test_right_arrow_selects_choice() {
        let mut app = app();
        focus(&mut app, "voucherOffered");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.dispatcher.form().selected("voucherOffered"), Some("yes"));
        press(&mut app, KeyCode::Tab);
        assert_eq!(
            app.dispatcher.form().active_field().unwrap().name,
            "voucherCount"
        );
    }

    #[test]
    fn test_quit_without_changes_is_immediate() {
        let mut app = app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());
    }

    #[test]
    fn test_quit_with_changes_asks_first() {
        let mut app = app();
        focus(&mut app, "sdo");
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);
        assert!(!app.should_quit());
        assert_eq!(
            app.state.confirm.as_ref().map(|c| c.action),
            Some(ConfirmAction::Quit)
        );
        press(&mut app, KeyCode::Enter);
        assert!(!app.should_quit());
        ctrl(&mut app, 'q');
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert!(app.should_quit());
    }

    #[test]
    fn test_clear_form_after_confirmation() {
        let mut app = app();
        focus(&mut app, "sdo");
        press(&mut app, KeyCode::Char('x'));
        ctrl(&mut app, 'l');
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(value(&app, "sdo"), "");
        assert_eq!(app.state.status_message.as_deref(), Some("Form cleared"));
    }

    #[test]
    fn test_error_dialog_blocks_input_until_dismissed() {
        let mut app = app();
        app.push_error("boom");
        focus_blocked(&mut app);
        press(&mut app, KeyCode::Enter);
        assert!(app.state.current_error().is_none());
    }

    fn focus_blocked(app: &mut App) {
        let before = app.dispatcher.form().active_field_index;
        press(app, KeyCode::Tab);
        assert_eq!(app.dispatcher.form().active_field_index, before);
    }
}
