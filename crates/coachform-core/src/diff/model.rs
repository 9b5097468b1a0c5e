//! Change-set types produced by the diff engine

use coachform_core_types::PersistedId;

use crate::encode::path::Seg;
use crate::model::Attachment;

/// How a destroyed parent's persisted children are handled
///
/// The backend is assumed to cascade destruction server-side, but that
/// assumption is unverified, so it is configurable rather than baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CascadeMode {
    /// Emit only the parent's destroy marker; the receiver cascades
    #[default]
    ReceiverCascades,
    /// Also emit destroy markers for every persisted descendant
    ExplicitChildMarkers,
}

/// Options controlling diff computation
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// Cascade behavior for destroyed parents
    pub cascade: CascadeMode,
}

/// One value destined for the wire
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeValue {
    /// A persistent id echoed back to the server; always encoded
    Id(PersistedId),
    /// A destroy marker for a soft-deleted row; always encoded
    Destroy,
    /// A textual scalar; dropped by the encoder when empty
    Text(String),
    /// A binary attachment, attached as raw bytes with metadata
    Binary(Attachment),
}

/// One (path, value) pair of the change-set
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    /// Path segments from the root, e.g. `root / plan / trainings / 0 / weekday`
    pub path: Vec<Seg>,
    /// The value to transmit
    pub value: ChangeValue,
}

/// Ordered minimal set of changes between the live tree and the baseline
///
/// Order is deterministic: root scalars in declared order, then each
/// collection in declared order, rows by live position, fields in declared
/// order. Computing the diff twice on an unchanged pair yields an
/// identical change-set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub entries: Vec<ChangeEntry>,
}

impl ChangeSet {
    /// An empty change-set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry, cloning the current path prefix
    pub fn push(&mut self, path: &[Seg], value: ChangeValue) {
        self.entries.push(ChangeEntry {
            path: path.to_vec(),
            value,
        });
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing changed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in wire order
    pub fn iter(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.entries.iter()
    }
}
