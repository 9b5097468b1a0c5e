//! Wire encoding of a change-set into bracketed-path form fields
//!
//! The key grammar (`root[plan][trainings][0][weekday]`) lives in `path`
//! as a pure function so that it can be tested in isolation; `payload`
//! turns a change-set into the ordered field list handed to the gateway.

pub mod path;
pub mod payload;

pub use path::{bracketed, Seg};
pub use payload::{encode, EncodedPayload, PayloadField, PayloadValue};
