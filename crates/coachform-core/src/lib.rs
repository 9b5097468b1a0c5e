//! Coachform Core - nested-entity form editor for trainee records
//!
//! This crate provides the in-memory model behind the trainee editing form,
//! including:
//! - The trainee entity tree with recursively nested child collections
//! - Mutation operations with soft- vs hard-delete semantics
//! - Baseline snapshot capture and a minimal-change diff engine
//! - Bracketed-path payload encoding for the persistence gateway
//! - Scoped file-preview handle registration
//!
//! The HTTP transport, rendering layer and session handling live elsewhere;
//! this crate only produces the minimal partial-update payload and tracks
//! the editing state needed to compute it.

pub mod diff;
pub mod draft;
pub mod encode;
pub mod errors;
pub mod logging;
pub mod model;
pub mod preview;
pub mod snapshot;
pub mod validate;

// Re-export commonly used types
pub use diff::{CascadeMode, ChangeSet, DiffOptions};
pub use draft::TraineeDraft;
pub use encode::{EncodedPayload, PayloadValue};
pub use errors::{CoachFormError, Result};
pub use model::{
    Attachment, Exercise, ExerciseSet, Food, Meal, Plan, PlanVariant, Trainee, Training,
    Weekday, WeeklyDocument,
};
pub use preview::{NoopProvider, PreviewId, PreviewProvider, PreviewRegistry};
pub use snapshot::Baseline;
pub use validate::validate;
