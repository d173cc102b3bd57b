//! Dirty tracking - unsaved-edit detection for the bound form
//!
//! The tracker observes field mutations and reports dirty/clean transitions;
//! the controller toggles the submit trigger and arms the close guard on each
//! transition.

use std::collections::BTreeMap;

use crate::messages::DirtyState;
use crate::model::FormSnapshot;

/// Observes form field mutations and reports state transitions
pub trait DirtyTracker {
    /// Reset the tracker against a freshly bound form
    fn bind(&mut self, form: &FormSnapshot);
    /// Record a field mutation; `Some` on each dirty/clean transition
    fn record(&mut self, name: &str, value: &str) -> Option<DirtyState>;
    /// Stop observing (the form was unbound)
    fn reset(&mut self);
}

/// Default tracker: compares current values against the bound snapshot. A
/// form is dirty while any field differs from its baseline, so reverting an
/// edit reports a clean transition.
#[derive(Debug, Default)]
pub struct BaselineDirtyTracker {
    baseline: BTreeMap<String, String>,
    current: BTreeMap<String, String>,
    dirty: bool,
}

impl BaselineDirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DirtyTracker for BaselineDirtyTracker {
    fn bind(&mut self, form: &FormSnapshot) {
        self.baseline = form
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect();
        self.current = self.baseline.clone();
        self.dirty = false;
    }

    fn record(&mut self, name: &str, value: &str) -> Option<DirtyState> {
        self.current.insert(name.to_string(), value.to_string());
        let dirty = self
            .current
            .iter()
            .any(|(n, v)| self.baseline.get(n).map(String::as_str) != Some(v.as_str()));
        if dirty == self.dirty {
            return None;
        }
        self.dirty = dirty;
        Some(if dirty {
            DirtyState::Dirty
        } else {
            DirtyState::Clean
        })
    }

    fn reset(&mut self) {
        self.baseline.clear();
        self.current.clear();
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_tracker() -> BaselineDirtyTracker {
        let mut tracker = BaselineDirtyTracker::new();
        let form = FormSnapshot::new("/items", "post")
            .with_field("title", "Widget")
            .with_field("qty", "1");
        tracker.bind(&form);
        tracker
    }

    #[test]
    fn reports_transitions_not_every_edit() {
        let mut tracker = bound_tracker();
        assert_eq!(tracker.record("title", "Gadget"), Some(DirtyState::Dirty));
        // Still dirty, no transition
        assert_eq!(tracker.record("qty", "2"), None);
        assert_eq!(tracker.record("qty", "1"), None);
        // Reverting the last differing field goes clean
        assert_eq!(tracker.record("title", "Widget"), Some(DirtyState::Clean));
    }

    #[test]
    fn unknown_field_counts_as_dirty() {
        let mut tracker = bound_tracker();
        assert_eq!(tracker.record("extra", "x"), Some(DirtyState::Dirty));
    }

    #[test]
    fn rebind_clears_state() {
        let mut tracker = bound_tracker();
        tracker.record("title", "Gadget");
        tracker.bind(&FormSnapshot::new("/other", "post").with_field("a", "1"));
        assert_eq!(tracker.record("a", "2"), Some(DirtyState::Dirty));
    }
}
