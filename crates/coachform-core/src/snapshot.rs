//! Baseline snapshot: the last known server state of the record
//!
//! Captured as a structural clone exactly once, immediately after a
//! successful load, and never mutated afterwards. A create-mode session has
//! no baseline at all; the diff engine then treats every active row as new.

use crate::model::Trainee;

/// Immutable origin point for diffing
#[derive(Debug, Clone, Default)]
pub struct Baseline(Option<Trainee>);

impl Baseline {
    /// No baseline: create mode
    pub fn absent() -> Self {
        Self(None)
    }

    /// Capture the loaded record: edit mode
    pub fn capture(record: &Trainee) -> Self {
        Self(Some(record.clone()))
    }

    /// The captured record, if any
    pub fn record(&self) -> Option<&Trainee> {
        self.0.as_ref()
    }

    /// Whether a baseline was captured
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}
