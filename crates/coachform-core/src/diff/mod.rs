//! Minimal change-set computation between the live tree and its baseline
//!
//! The engine walks the active plan arm depth-first and emits only what the
//! gateway needs: new rows in full, changed fields of persisted rows, and
//! destroy markers for soft-deleted persisted rows. A persisted row whose
//! fields and children are all unchanged contributes nothing at all; that
//! full-skip behavior is the bandwidth contract the engine exists to keep.

mod engine;
mod model;

pub use engine::compute;
pub use model::{CascadeMode, ChangeEntry, ChangeSet, ChangeValue, DiffOptions};
