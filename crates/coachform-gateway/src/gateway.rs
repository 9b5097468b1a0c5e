//! The externally supplied persistence gateway

use async_trait::async_trait;
use coachform_core::{EncodedPayload, Trainee};
use coachform_core_types::PersistedId;
use thiserror::Error;

/// A failed gateway request
///
/// The message is surfaced to the caller verbatim. `auth_expired`
/// distinguishes expired credentials, which are forwarded to the external
/// session collaborator instead of being handled here.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
    pub auth_expired: bool,
}

impl GatewayError {
    /// An ordinary network or server-side rejection
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            auth_expired: false,
        }
    }

    /// An expired-credentials rejection
    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            auth_expired: true,
        }
    }
}

/// Contract the external persistence layer must fulfil
///
/// Payload fields follow the bracketed-path key grammar; the transport
/// carries them in a binary-capable key/value body. The gateway is assumed
/// to apply nested payloads transactionally: from this crate's view a save
/// is all-or-nothing.
#[async_trait]
pub trait PersistenceGateway {
    /// Load a record; used to build the baseline snapshot
    async fn fetch(&self, id: PersistedId) -> Result<Trainee, GatewayError>;

    /// Create a new record, returning it with server-assigned ids
    async fn create(&self, payload: EncodedPayload) -> Result<Trainee, GatewayError>;

    /// Partially update an existing record, returning its new state
    async fn update(&self, id: PersistedId, payload: EncodedPayload)
        -> Result<Trainee, GatewayError>;
}
