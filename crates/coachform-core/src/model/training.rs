//! Manual-plan training rows and their nested exercises and sets

use coachform_core_types::PersistedId;
use serde::{Deserialize, Serialize};

use super::weekday::Weekday;

/// One training day inside the manual plan
///
/// Forms a three-level nesting: Training → Exercise → ExerciseSet. Each
/// level is independently addable and removable in the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    /// Server-assigned id, absent until the first successful save
    #[serde(default)]
    pub id: Option<PersistedId>,

    /// Day this training applies to; unset on a fresh placeholder row
    #[serde(default)]
    pub weekday: Option<Weekday>,

    /// Free-form coach notes for the day
    #[serde(default)]
    pub description: String,

    /// Exercises in insertion order
    #[serde(default)]
    pub exercises: Vec<Exercise>,

    /// Tombstone set by remove/switch operations only, never serialized
    #[serde(skip)]
    destroyed: bool,
}

impl Training {
    /// Create a fresh placeholder row with one empty exercise
    pub fn placeholder() -> Self {
        Self {
            id: None,
            weekday: None,
            description: String::new(),
            exercises: vec![Exercise::placeholder()],
            destroyed: false,
        }
    }

    /// Whether this row has been saved at least once
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether this row is scheduled for destruction on the next save
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn set_destroyed(&mut self, destroyed: bool) {
        self.destroyed = destroyed;
    }

    /// Exercises that are still visible to the presentation layer,
    /// paired with their raw collection index for addressing mutations
    pub fn visible_exercises(&self) -> impl Iterator<Item = (usize, &Exercise)> {
        self.exercises
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_destroyed())
    }
}

/// One exercise inside a training day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Server-assigned id, absent until the first successful save
    #[serde(default)]
    pub id: Option<PersistedId>,

    /// Exercise name, e.g. "Squat"
    #[serde(default)]
    pub name: String,

    /// Reference to an instruction video
    #[serde(default)]
    pub video_url: String,

    /// Sets in insertion order
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,

    #[serde(skip)]
    destroyed: bool,
}

impl Exercise {
    /// Create a fresh placeholder row with one empty set
    pub fn placeholder() -> Self {
        Self {
            id: None,
            name: String::new(),
            video_url: String::new(),
            sets: vec![ExerciseSet::placeholder()],
            destroyed: false,
        }
    }

    /// Whether this row has been saved at least once
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether this row is scheduled for destruction on the next save
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn set_destroyed(&mut self, destroyed: bool) {
        self.destroyed = destroyed;
    }

    /// Visible sets paired with their raw collection index
    pub fn visible_sets(&self) -> impl Iterator<Item = (usize, &ExerciseSet)> {
        self.sets
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_destroyed())
    }
}

/// One series/repeats pair inside an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    /// Server-assigned id, absent until the first successful save
    #[serde(default)]
    pub id: Option<PersistedId>,

    /// Number of series
    #[serde(default)]
    pub series: Option<u32>,

    /// Repeats per series
    #[serde(default)]
    pub repeats: Option<u32>,

    #[serde(skip)]
    destroyed: bool,
}

impl ExerciseSet {
    /// Create a fresh placeholder row
    pub fn placeholder() -> Self {
        Self {
            id: None,
            series: None,
            repeats: None,
            destroyed: false,
        }
    }

    /// Whether this row has been saved at least once
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Whether this row is scheduled for destruction on the next save
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub(crate) fn set_destroyed(&mut self, destroyed: bool) {
        self.destroyed = destroyed;
    }
}
