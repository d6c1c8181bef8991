//! Debounced save scheduling

use std::time::{Duration, Instant};

/// Default quiet window after the last coalesced edit
pub const DEFAULT_QUIET_WINDOW: Duration = Duration::from_millis(500);

/// Longest quiet window honoured; larger configured values are clamped
pub const MAX_QUIET_WINDOW: Duration = Duration::from_secs(60);

/// How a change wants to be persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    /// Free-text typing: save once the user pauses
    Coalesced,
    /// Discrete selections: save right away
    Immediate,
}

/// Decides when a snapshot should be written
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    quiet_window: Duration,
    deadline: Option<Instant>,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_WINDOW)
    }
}

impl AutosaveScheduler {
    pub fn new(quiet_window: Duration) -> Self {
        Self {
            quiet_window: quiet_window.min(MAX_QUIET_WINDOW),
            deadline: None,
        }
    }

    pub fn quiet_window(&self) -> Duration {
        self.quiet_window
    }

    /// Record a change; returns true when it should be written now.
    ///
    /// An immediate change cancels any pending coalesced write.
    pub fn record(&mut self, trigger: SaveTrigger, now: Instant) -> bool {
        match trigger {
            SaveTrigger::Immediate => {
                self.deadline = None;
                true
            }
            SaveTrigger::Coalesced => {
                self.deadline = Some(now.checked_add(self.quiet_window).unwrap_or(now));
                false
            }
        }
    }

    /// Returns true (once) when a pending write's quiet window has elapsed
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any pending write
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn test_immediate_writes_now() {
        let mut scheduler = AutosaveScheduler::new(WINDOW);
        assert!(scheduler.record(SaveTrigger::Immediate, Instant::now()));
        assert!(!scheduler.is_pending());
    }

    #[test]
    fn test_coalesced_waits_for_quiet_window() {
        let mut scheduler = AutosaveScheduler::new(WINDOW);
        let start = Instant::now();
        assert!(!scheduler.record(SaveTrigger::Coalesced, start));
        assert!(!scheduler.poll(start + Duration::from_millis(499)));
        assert!(scheduler.poll(start + WINDOW));
        assert!(!scheduler.poll(start + WINDOW * 2));
    }

    #[test]
    fn test_newer_edit_postpones_deadline() {
        let mut scheduler = AutosaveScheduler::new(WINDOW);
        let start = Instant::now();
        scheduler.record(SaveTrigger::Coalesced, start);
        scheduler.record(SaveTrigger::Coalesced, start + Duration::from_millis(400));
        assert!(!scheduler.poll(start + Duration::from_millis(600)));
        assert!(scheduler.poll(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_immediate_cancels_pending() {
        let mut scheduler = AutosaveScheduler::new(WINDOW);
        let start = Instant::now();
        scheduler.record(SaveTrigger::Coalesced, start);
        assert!(scheduler.record(SaveTrigger::Immediate, start + Duration::from_millis(10)));
        assert!(!scheduler.poll(start + WINDOW * 2));
    }

    #[test]
    fn test_huge_window_is_clamped() {
        let mut scheduler = AutosaveScheduler::new(Duration::from_millis(u64::MAX));
        assert_eq!(scheduler.quiet_window(), MAX_QUIET_WINDOW);
        let start = Instant::now();
        assert!(!scheduler.record(SaveTrigger::Coalesced, start));
        assert!(!scheduler.poll(start + Duration::from_secs(59)));
        assert!(scheduler.poll(start + MAX_QUIET_WINDOW));
    }

    #[test]
    fn test_default_window() {
        assert_eq!(AutosaveScheduler::default().quiet_window(), DEFAULT_QUIET_WINDOW);
    }
}
