//! Typed form events and their routing to the form, the visibility engine
//! and the persistence layer

use crate::persistence::{
    capture, restore, AutosaveScheduler, KeyValueStore, RestoreReport, SaveTrigger,
    SessionContext, Snapshot, StateSerializer, StorageError,
};
use crate::state::{FieldError, FieldKind, FieldValue, MonitoringForm, DATE_FORMAT};
use crate::visibility::{Category, VisibilityDecisionSet, VisibilityEngine};
use chrono::NaiveDate;
use std::time::Instant;
use thiserror::Error;

/// Field that defaults to today's date on a fresh form
pub const MONITOR_DATE_FIELD: &str = "monitorDate";

/// Focus movement within the shown fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Next,
    Prev,
    NextSection,
    PrevSection,
}

/// A user interaction with the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    FieldChanged {
        name: String,
        value: FieldValue,
        trigger: SaveTrigger,
    },
    CategoryToggled {
        category: Category,
        enabled: bool,
    },
    ChoiceSelected {
        group: String,
        value: Option<String>,
    },
}

impl FormEvent {
    pub fn field_changed(name: impl Into<String>, value: FieldValue, trigger: SaveTrigger) -> Self {
        Self::FieldChanged {
            name: name.into(),
            value,
            trigger,
        }
    }

    pub fn choice_selected(group: impl Into<String>, value: Option<&str>) -> Self {
        Self::ChoiceSelected {
            group: group.into(),
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("`{0}` is not a declared choice group")]
    UnknownGroup(String),
    #[error("category toggle field `{0}` is not declared")]
    MissingToggle(&'static str),
}

/// Result of a persistence attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing was written
    Idle,
    /// A coalesced write is waiting for the quiet window
    Pending,
    Saved,
    /// Persistence is turned off
    Disabled,
    /// The write failed; `first` is true only for the first failure this session
    Failed { message: String, first: bool },
}

/// What a dispatched event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// True when shown/hidden state may differ from before the event
    pub visibility_changed: bool,
    /// Exclusive sibling forced off by this event
    pub forced_off: Option<&'static str>,
    pub save: SaveStatus,
}

/// Owns the form and everything that reacts to its changes
pub struct Dispatcher<S> {
    form: MonitoringForm,
    engine: VisibilityEngine,
    serializer: StateSerializer<S>,
    scheduler: AutosaveScheduler,
    session: SessionContext,
}

impl<S: KeyValueStore> Dispatcher<S> {
    pub fn new(form: MonitoringForm, serializer: StateSerializer<S>, scheduler: AutosaveScheduler) -> Self {
        let engine = form.schema().engine();
        let session = SessionContext::new(capture(&form));
        Self {
            form,
            engine,
            serializer,
            scheduler,
            session,
        }
    }

    pub fn form(&self) -> &MonitoringForm {
        &self.form
    }

    /// Move focus among the fields currently shown
    pub fn move_focus(&mut self, focus: Focus) {
        let visible = self.visible_indices();
        match focus {
            Focus::Next => self.form.next_field(&visible),
            Focus::Prev => self.form.prev_field(&visible),
            Focus::NextSection => self.form.jump_section(&visible, true),
            Focus::PrevSection => self.form.jump_section(&visible, false),
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Re-derive visibility decisions from the current toggles
    pub fn decisions(&self) -> VisibilityDecisionSet {
        self.engine.evaluate(&self.form.toggles())
    }

    /// Indices of the fields currently shown
    pub fn visible_indices(&self) -> Vec<usize> {
        self.form.visible_indices(&self.engine, &self.decisions())
    }

    pub fn snapshot(&self) -> Snapshot {
        capture(&self.form)
    }

    /// Restore saved data, or default the monitoring date on a fresh form.
    ///
    /// Either way the result becomes the session baseline.
    pub fn initialize(&mut self, today: NaiveDate) -> Option<RestoreReport> {
        let report = match self.serializer.load() {
            Some(snapshot) => {
                let report = restore(&mut self.form, &snapshot);
                let programs: Vec<_> = self
                    .form
                    .toggles()
                    .enabled_categories()
                    .map(|c| c.label())
                    .collect();
                tracing::info!(
                    "Restored {} saved fields (programs: {})",
                    report.restored,
                    programs.join(", ")
                );
                Some(report)
            }
            None => {
                let date = today.format(DATE_FORMAT).to_string();
                if let Err(e) = self.form.set_value(MONITOR_DATE_FIELD, FieldValue::Text(date)) {
                    tracing::debug!("No default monitoring date: {e}");
                }
                None
            }
        };
        self.session.rebase(capture(&self.form));
        self.refocus();
        report
    }

    /// Apply an event to the form and schedule persistence.
    ///
    /// On error the form is unchanged.
    pub fn dispatch(&mut self, event: FormEvent, now: Instant) -> Result<DispatchOutcome, DispatchError> {
        let (forced_off, visibility_changed, trigger) = match event {
            FormEvent::FieldChanged {
                name,
                value,
                trigger,
            } => {
                let affects_visibility = Category::from_toggle_field(&name).is_some()
                    || self.engine.groups().iter().any(|g| g.field == name);
                let forced = self.form.set_value(&name, value)?;
                (forced, affects_visibility, trigger)
            }
            FormEvent::CategoryToggled { category, enabled } => {
                let name = category.toggle_field();
                if self.form.field(name).is_none() {
                    return Err(DispatchError::MissingToggle(name));
                }
                let forced = self.form.set_value(name, FieldValue::Flag(enabled))?;
                (forced, true, SaveTrigger::Immediate)
            }
            FormEvent::ChoiceSelected { group, value } => {
                let is_choice = matches!(
                    self.form.field(&group).map(|f| f.kind),
                    Some(FieldKind::Choice(_))
                );
                if !is_choice {
                    return Err(DispatchError::UnknownGroup(group));
                }
                let forced = self.form.set_value(&group, FieldValue::Choice(value))?;
                let gates = self.engine.groups().iter().any(|g| g.field == group);
                (forced, gates, SaveTrigger::Immediate)
            }
        };
        if visibility_changed {
            self.refocus();
        }
        let save = if self.scheduler.record(trigger, now) {
            self.persist()
        } else {
            SaveStatus::Pending
        };
        Ok(DispatchOutcome {
            visibility_changed,
            forced_off,
            save,
        })
    }

    /// Flush a coalesced write whose quiet window has elapsed
    pub fn tick(&mut self, now: Instant) -> SaveStatus {
        if self.scheduler.poll(now) {
            self.persist()
        } else if self.scheduler.is_pending() {
            SaveStatus::Pending
        } else {
            SaveStatus::Idle
        }
    }

    /// Write now, dropping any pending coalesced write
    pub fn save_now(&mut self) -> SaveStatus {
        self.scheduler.cancel();
        self.persist()
    }

    /// Write a pending coalesced edit right away
    pub fn flush(&mut self) -> SaveStatus {
        if self.scheduler.is_pending() {
            self.save_now()
        } else {
            SaveStatus::Idle
        }
    }

    /// Reset every field and drop the saved draft, so the next start is fresh
    pub fn clear_form(&mut self) -> SaveStatus {
        self.form.reset();
        self.scheduler.cancel();
        let result = self.serializer.clear().map(|()| SaveStatus::Idle);
        self.session.rebase(capture(&self.form));
        self.storage_status(result)
    }

    /// Remove saved data and reset the form without writing it back
    pub fn clear_saved_data(&mut self) -> Result<(), StorageError> {
        self.scheduler.cancel();
        self.serializer.clear()?;
        self.form.reset();
        self.session.rebase(capture(&self.form));
        tracing::info!("Cleared saved form data");
        Ok(())
    }

    /// Record that the current values have been exported
    pub fn mark_exported(&mut self) {
        self.session.rebase(capture(&self.form));
    }

    pub fn check_for_unsaved_changes(&mut self) -> bool {
        let current = capture(&self.form);
        self.session.check_for_unsaved_changes(&current)
    }

    fn refocus(&mut self) {
        let visible = self.visible_indices();
        self.form.ensure_active_visible(&visible);
    }

    fn persist(&mut self) -> SaveStatus {
        let result = self
            .serializer
            .persist(&capture(&self.form))
            .map(|()| SaveStatus::Saved);
        self.storage_status(result)
    }

    fn storage_status(&mut self, result: Result<SaveStatus, StorageError>) -> SaveStatus {
        match result {
            Ok(status) => status,
            Err(StorageError::Disabled) => SaveStatus::Disabled,
            Err(e) => {
                let first = self.session.note_storage_failure();
                if first {
                    tracing::warn!("Storage write failed: {e}");
                }
                SaveStatus::Failed {
                    message: e.to_string(),
                    first,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{DisabledStore, MemoryStore, STORAGE_KEY};
    use crate::state::monitoring::monitoring_schema;
    use std::time::Duration;

    const WINDOW: Duration = Duration::from_millis(500);

    fn dispatcher_with<S: KeyValueStore>(store: S) -> Dispatcher<S> {
        let form = MonitoringForm::new(monitoring_schema()).unwrap();
        Dispatcher::new(form, StateSerializer::new(store), AutosaveScheduler::new(WINDOW))
    }

    fn dispatcher() -> Dispatcher<MemoryStore> {
        dispatcher_with(MemoryStore::default())
    }

    fn is_shown(d: &Dispatcher<impl KeyValueStore>, name: &str) -> bool {
        let i = d.form().fields().iter().position(|f| f.name == name).unwrap();
        d.visible_indices().contains(&i)
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    mod events {
        use super::*;

        #[test]
        fn test_category_toggle_hides_program_fields() {
            let mut d = dispatcher();
            let outcome = d
                .dispatch(
                    FormEvent::CategoryToggled {
                        category: Category::Shs,
                        enabled: false,
                    },
                    Instant::now(),
                )
                .unwrap();
            assert!(outcome.visibility_changed);
            assert_eq!(outcome.save, SaveStatus::Saved);
            assert!(!is_shown(&d, "shsLPT"));
            assert!(!is_shown(&d, "shsLabICT"));
            assert!(is_shown(&d, "jhsLPT"));
        }

        #[test]
        fn test_choice_selection_opens_gated_block() {
            let mut d = dispatcher();
            let outcome = d
                .dispatch(FormEvent::choice_selected("escOffered", Some("yes")), Instant::now())
                .unwrap();
            assert!(outcome.visibility_changed);
            assert!(is_shown(&d, "escCount"));
            d.dispatch(FormEvent::choice_selected("escOffered", None), Instant::now())
                .unwrap();
            assert!(!is_shown(&d, "escCount"));
        }

        #[test]
        fn test_exclusive_pair_reports_forced_sibling() {
            let mut d = dispatcher();
            let now = Instant::now();
            d.dispatch(
                FormEvent::field_changed("fac_library_not", FieldValue::Flag(true), SaveTrigger::Immediate),
                now,
            )
            .unwrap();
            let outcome = d
                .dispatch(
                    FormEvent::field_changed(
                        "fac_library_evident",
                        FieldValue::Flag(true),
                        SaveTrigger::Immediate,
                    ),
                    now,
                )
                .unwrap();
            assert_eq!(outcome.forced_off, Some("fac_library_not"));
            assert!(!outcome.visibility_changed);
        }

        #[test]
        fn test_unknown_field_leaves_form_unchanged() {
            let mut d = dispatcher();
            let before = d.snapshot();
            let result = d.dispatch(
                FormEvent::field_changed("schoolFax", FieldValue::text("1"), SaveTrigger::Coalesced),
                Instant::now(),
            );
            assert!(matches!(
                result,
                Err(DispatchError::Field(FieldError::UnknownField(_)))
            ));
            assert_eq!(d.snapshot(), before);
        }

        #[test]
        fn test_wrong_kind_is_rejected() {
            let mut d = dispatcher();
            let result = d.dispatch(
                FormEvent::field_changed("progSHS", FieldValue::text("yes"), SaveTrigger::Immediate),
                Instant::now(),
            );
            assert!(matches!(
                result,
                Err(DispatchError::Field(FieldError::Rejected { .. }))
            ));
        }

        #[test]
        fn test_choice_event_on_non_choice_field() {
            let mut d = dispatcher();
            let result = d.dispatch(FormEvent::choice_selected("sdo", Some("yes")), Instant::now());
            assert_eq!(result, Err(DispatchError::UnknownGroup("sdo".into())));
        }

        #[test]
        fn test_focus_leaves_hidden_field() {
            let mut d = dispatcher();
            let now = Instant::now();
            d.dispatch(FormEvent::choice_selected("voucherOffered", Some("yes")), now)
                .unwrap();
            let count = d
                .form()
                .fields()
                .iter()
                .position(|f| f.name == "voucherCount")
                .unwrap();
            d.form.active_field_index = count;
            d.dispatch(FormEvent::choice_selected("voucherOffered", Some("no")), now)
                .unwrap();
            assert_eq!(d.form().active_field().unwrap().name, "escOffered");
        }
    }

    #[test]
    fn test_move_focus_skips_closed_gate() {
        let mut d = dispatcher();
        let voucher = d
            .form()
            .fields()
            .iter()
            .position(|f| f.name == "voucherOffered")
            .unwrap();
        d.form.active_field_index = voucher;
        d.move_focus(Focus::Next);
        assert_eq!(d.form().active_field().unwrap().name, "escOffered");
        d.move_focus(Focus::Prev);
        assert_eq!(d.form().active_field().unwrap().name, "voucherOffered");
    }

    mod autosave {
        use super::*;

        #[test]
        fn test_typing_is_coalesced_until_quiet() {
            let mut d = dispatcher();
            let start = Instant::now();
            let outcome = d
                .dispatch(
                    FormEvent::field_changed("sdo", FieldValue::text("Q"), SaveTrigger::Coalesced),
                    start,
                )
                .unwrap();
            assert_eq!(outcome.save, SaveStatus::Pending);
            assert_eq!(d.tick(start + Duration::from_millis(100)), SaveStatus::Pending);
            assert_eq!(d.tick(start + WINDOW), SaveStatus::Saved);
            assert_eq!(d.tick(start + WINDOW * 2), SaveStatus::Idle);
        }

        #[test]
        fn test_saved_snapshot_restores_in_new_session() {
            let mut d = dispatcher();
            let now = Instant::now();
            d.dispatch(
                FormEvent::field_changed("sdo", FieldValue::text("Iloilo"), SaveTrigger::Immediate),
                now,
            )
            .unwrap();
            d.dispatch(
                FormEvent::CategoryToggled {
                    category: Category::Hei,
                    enabled: false,
                },
                now,
            )
            .unwrap();
            let stored = d.serializer.store().get(STORAGE_KEY).unwrap().unwrap();

            let mut store = MemoryStore::default();
            store.set(STORAGE_KEY, &stored).unwrap();
            let mut next = dispatcher_with(store);
            let report = next.initialize(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
            assert!(report.is_some());
            assert_eq!(next.form().field("sdo").unwrap().as_text(), "Iloilo");
            assert!(!next.form().toggles().is_enabled(Category::Hei));
            assert!(!is_shown(&next, "isHEI"));
            assert!(!next.check_for_unsaved_changes());
        }

        #[test]
        fn test_storage_failure_reported_once() {
            let mut d = dispatcher_with(FailingStore);
            let now = Instant::now();
            let first = d.dispatch(FormEvent::choice_selected("jdvpOffered", Some("no")), now);
            assert!(matches!(
                first.unwrap().save,
                SaveStatus::Failed { first: true, .. }
            ));
            let second = d.dispatch(FormEvent::choice_selected("jdvpOffered", Some("yes")), now);
            assert!(matches!(
                second.unwrap().save,
                SaveStatus::Failed { first: false, .. }
            ));
            assert_eq!(d.form().selected("jdvpOffered"), Some("yes"));
        }

        #[test]
        fn test_flush_writes_pending_edit() {
            let mut d = dispatcher();
            assert_eq!(d.flush(), SaveStatus::Idle);
            d.dispatch(
                FormEvent::field_changed("sdo", FieldValue::text("Cebu"), SaveTrigger::Coalesced),
                Instant::now(),
            )
            .unwrap();
            assert_eq!(d.flush(), SaveStatus::Saved);
            let stored = d.serializer.store().get(STORAGE_KEY).unwrap().unwrap();
            assert!(stored.contains("Cebu"));
            assert_eq!(d.flush(), SaveStatus::Idle);
        }

        #[test]
        fn test_disabled_persistence_is_silent() {
            let mut d = dispatcher_with(DisabledStore);
            assert_eq!(d.save_now(), SaveStatus::Disabled);
            assert!(!d.session().storage_failure_reported());
        }
    }

    mod session {
        use super::*;

        #[test]
        fn test_fresh_form_defaults_monitor_date() {
            let mut d = dispatcher();
            assert!(d.initialize(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()).is_none());
            assert_eq!(d.form().field(MONITOR_DATE_FIELD).unwrap().as_text(), "2024-06-03");
            assert!(!d.check_for_unsaved_changes());
        }

        #[test]
        fn test_edit_marks_unsaved_until_export() {
            let mut d = dispatcher();
            d.dispatch(
                FormEvent::field_changed("address", FieldValue::text("Roxas Blvd"), SaveTrigger::Coalesced),
                Instant::now(),
            )
            .unwrap();
            assert!(d.check_for_unsaved_changes());
            d.mark_exported();
            assert!(!d.check_for_unsaved_changes());
        }

        #[test]
        fn test_clear_saved_data_resets_everything() {
            let mut d = dispatcher();
            d.dispatch(
                FormEvent::field_changed("sdo", FieldValue::text("Davao"), SaveTrigger::Immediate),
                Instant::now(),
            )
            .unwrap();
            d.clear_saved_data().unwrap();
            assert_eq!(d.form().field("sdo").unwrap().as_text(), "");
            assert!(d.serializer.load().is_none());
            assert!(!d.check_for_unsaved_changes());
        }

        #[test]
        fn test_clear_form_removes_saved_draft() {
            let mut d = dispatcher();
            d.dispatch(
                FormEvent::field_changed("sdo", FieldValue::text("Davao"), SaveTrigger::Immediate),
                Instant::now(),
            )
            .unwrap();
            assert_eq!(d.clear_form(), SaveStatus::Idle);
            assert!(d.serializer.store().get(STORAGE_KEY).unwrap().is_none());
            assert_eq!(d.form().field("sdo").unwrap().as_text(), "");
            assert!(d.form().toggles().is_enabled(Category::Hei));
            assert!(!d.check_for_unsaved_changes());
        }

        #[test]
        fn test_restart_after_clear_form_starts_fresh() {
            let mut d = dispatcher();
            d.dispatch(
                FormEvent::field_changed("sdo", FieldValue::text("Davao"), SaveTrigger::Immediate),
                Instant::now(),
            )
            .unwrap();
            d.clear_form();

            let mut next = dispatcher_with(d.serializer.store().clone());
            let report = next.initialize(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
            assert!(report.is_none());
            assert_eq!(
                next.form().field(MONITOR_DATE_FIELD).unwrap().as_text(),
                "2024-06-03"
            );
        }
    }
}
