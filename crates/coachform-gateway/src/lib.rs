//! Persistence gateway contract and the submission protocol
//!
//! The gateway itself (HTTP transport, auth headers) is supplied
//! externally; this crate defines the trait it must implement and the
//! small state machine that drives one save: validate, diff, encode, lock
//! the draft, issue exactly one create-or-update request, then either
//! install the returned record as the new baseline or surface the error
//! verbatim with the tree preserved.

pub mod gateway;
pub mod submit;

pub use gateway::{GatewayError, PersistenceGateway};
pub use submit::{load, SubmitOutcome, SubmitState, Submission};
