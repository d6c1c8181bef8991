//! Capture/restore of form values and snapshot persistence

use super::snapshot::{value_as_text, Snapshot};
use super::storage::{KeyValueStore, StorageError};
use crate::state::{is_iso_date, is_numeric, FieldKind, FieldValue, MonitoringForm};
use serde_json::Value;

/// Fixed key the snapshot is stored under
pub const STORAGE_KEY: &str = "depedMonitoringFormData";

/// Read every declared field into a snapshot.
///
/// Empty values are written explicitly: `""` for text-like and unselected
/// fields, `false` for checkboxes.
pub fn capture(form: &MonitoringForm) -> Snapshot {
    let mut snapshot = Snapshot::new();
    for field in form.fields() {
        let value = match &field.value {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Flag(b) => Value::Bool(*b),
            FieldValue::Choice(selected) => Value::String(selected.clone().unwrap_or_default()),
        };
        snapshot.insert(field.name.clone(), value);
    }
    snapshot
}

/// What a restore did with the snapshot's keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub restored: usize,
    /// Keys with no matching declared field
    pub ignored: Vec<String>,
    /// Declared fields whose stored value could not be used
    pub rejected: Vec<String>,
}

/// Coerce a stored value to the field kind; `None` leaves the field as it is
fn coerce(kind: FieldKind, value: &Value) -> Option<FieldValue> {
    match kind {
        FieldKind::Boolean => Some(FieldValue::Flag(matches!(value, Value::Bool(true)))),
        FieldKind::Text | FieldKind::Multiline => Some(FieldValue::Text(value_as_text(value))),
        FieldKind::Number => {
            let text = value_as_text(value);
            Some(FieldValue::Text(if is_numeric(&text) {
                text
            } else {
                String::new()
            }))
        }
        FieldKind::Date => {
            let text = value_as_text(value);
            Some(FieldValue::Text(if is_iso_date(&text) {
                text
            } else {
                String::new()
            }))
        }
        FieldKind::Select(options) => {
            let text = value_as_text(value);
            (text.is_empty() || options.contains(&text.as_str())).then_some(FieldValue::Text(text))
        }
        FieldKind::Choice(options) => {
            let text = value_as_text(value);
            if text.is_empty() {
                Some(FieldValue::Choice(None))
            } else {
                options
                    .contains(&text.as_str())
                    .then_some(FieldValue::Choice(Some(text)))
            }
        }
    }
}

/// Apply a snapshot to the form.
///
/// Unknown keys are ignored; declared fields absent from the snapshot keep
/// their current value.
pub fn restore(form: &mut MonitoringForm, snapshot: &Snapshot) -> RestoreReport {
    let mut report = RestoreReport::default();
    for (name, value) in snapshot.iter() {
        let Some(kind) = form.field(name).map(|f| f.kind) else {
            report.ignored.push(name.to_string());
            continue;
        };
        match coerce(kind, value).map(|v| form.set_value(name, v)) {
            Some(Ok(_)) => report.restored += 1,
            _ => report.rejected.push(name.to_string()),
        }
    }
    if !report.ignored.is_empty() {
        tracing::debug!("Ignored {} unknown snapshot keys", report.ignored.len());
    }
    if !report.rejected.is_empty() {
        tracing::debug!("Rejected stored values for {:?}", report.rejected);
    }
    report
}

/// Reads and writes snapshots under [`STORAGE_KEY`]
#[derive(Debug)]
pub struct StateSerializer<S> {
    store: S,
}

impl<S: KeyValueStore> StateSerializer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write the snapshot, replacing whatever was stored before
    pub fn persist(&mut self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let json = snapshot.to_json()?;
        self.store.set(STORAGE_KEY, &json)?;
        tracing::debug!("Saved snapshot with {} fields", snapshot.len());
        Ok(())
    }

    /// Read the stored snapshot.
    ///
    /// Missing, unreadable and undecodable data all come back as `None`.
    pub fn load(&self) -> Option<Snapshot> {
        let json = match self.store.get(STORAGE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Could not read saved data: {e}");
                return None;
            }
        };
        match Snapshot::from_json(&json) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Ignoring saved data that failed to decode: {e}");
                None
            }
        }
    }

    /// Remove the stored snapshot. Removing twice is fine.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(STORAGE_KEY)
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }
}
