//! Domain model for the trainee editing form
//!
//! The model is a tree: a `Trainee` owns a `Plan`, which holds both plan
//! arms (manual trainings/meals and weekly documents) simultaneously so
//! that toggling the variant before submission never loses data. Every
//! child node carries an optional server-assigned id and a private
//! `destroyed` tombstone that only the draft's remove/switch operations
//! may set.

mod attachment;
mod document;
mod meal;
mod plan;
mod trainee;
mod training;
mod weekday;

pub use attachment::{Attachment, FileBlob};
pub use document::WeeklyDocument;
pub use meal::{Food, Meal};
pub use plan::{Plan, PlanVariant};
pub use trainee::Trainee;
pub use training::{Exercise, ExerciseSet, Training};
pub use weekday::Weekday;
