//! Per-run session bookkeeping

use super::snapshot::Snapshot;

/// Baseline snapshot and the flags derived from it
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    baseline: Snapshot,
    has_unsaved_changes: bool,
    storage_failure_reported: bool,
}

impl SessionContext {
    pub fn new(baseline: Snapshot) -> Self {
        Self {
            baseline,
            ..Self::default()
        }
    }

    /// Replace the baseline (after restore, export or clear)
    pub fn rebase(&mut self, baseline: Snapshot) {
        self.baseline = baseline;
        self.has_unsaved_changes = false;
    }

    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Compare `current` against the baseline and remember the result
    pub fn check_for_unsaved_changes(&mut self, current: &Snapshot) -> bool {
        self.has_unsaved_changes = *current != self.baseline;
        self.has_unsaved_changes
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    /// Returns true only the first time a storage failure is noted
    pub fn note_storage_failure(&mut self) -> bool {
        !std::mem::replace(&mut self.storage_failure_reported, true)
    }

    pub fn storage_failure_reported(&self) -> bool {
        self.storage_failure_reported
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(sdo: &str) -> Snapshot {
        let mut snapshot = Snapshot::new();
        snapshot.insert("sdo", sdo);
        snapshot
    }

    #[test]
    fn test_unchanged_snapshot_is_clean() {
        let mut session = SessionContext::new(snapshot("Manila"));
        assert!(!session.check_for_unsaved_changes(&snapshot("Manila")));
    }

    #[test]
    fn test_changed_snapshot_is_dirty_until_rebased() {
        let mut session = SessionContext::new(snapshot("Manila"));
        assert!(session.check_for_unsaved_changes(&snapshot("Cebu")));
        assert!(session.has_unsaved_changes());
        session.rebase(snapshot("Cebu"));
        assert!(!session.has_unsaved_changes());
        assert!(!session.check_for_unsaved_changes(&snapshot("Cebu")));
    }

    #[test]
    fn test_storage_failure_reported_once() {
        let mut session = SessionContext::default();
        assert!(session.note_storage_failure());
        assert!(!session.note_storage_failure());
        assert!(session.storage_failure_reported());
    }
}
