//! Core types shared across the coachform facilities
//!
//! This crate provides foundational types used by the form core and the
//! persistence gateway:
//!
//! - **Identity types**: PersistedId for server-assigned record ids
//! - **Correlation types**: RequestId for submission tracking
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction

pub mod correlation;
pub mod id;
pub mod sensitive;

pub use correlation::RequestId;
pub use id::PersistedId;
pub use sensitive::Sensitive;
