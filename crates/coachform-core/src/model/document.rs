//! Document-plan weekly upload rows

use coachform_core_types::PersistedId;
use serde::{Deserialize, Serialize};

use super::attachment::Attachment;
use super::weekday::Weekday;
use crate::preview::PreviewId;

/// One weekly document upload inside the document plan
///
/// A freshly uploaded file lives in `file` until the save succeeds; a
/// previously saved row instead carries the server-side `file_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyDocument {
    /// Server-assigned id, absent until the first successful save
    #[serde(default)]
    pub id: Option<PersistedId>,

    /// Day this document applies to; unset on a fresh placeholder row
    #[serde(default)]
    pub weekday: Option<Weekday>,

    /// Locally picked file awaiting upload, never part of the JSON record
    #[serde(skip)]
    pub file: Option<Attachment>,

    /// Where the server stored the last uploaded file
    #[serde(default)]
    pub file_url: Option<String>,

    /// Free-form notes shown alongside the document
    #[serde(default)]
    pub notes: String,

    #[serde(skip)]
    destroyed: bool,

    /// Open preview handle for `file`, owned by the draft's registry
    #[serde(skip)]
    pub(crate) preview: Option<PreviewId>,
}

impl WeeklyDocument {
    /// Create a fresh placeholder row
    pub fn placeholder() -> Self {
        Self {
            id: None,
            weekday: None,
            file: None,
            file_url: None,
            notes: String::new(),
            destroyed: false,
            preview: None,
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
