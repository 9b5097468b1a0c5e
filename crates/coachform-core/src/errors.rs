//! Error taxonomy for the form core
//!
//! Three families, matching how the caller recovers:
//! - validation failures: correct the field and resubmit
//! - gateway failures: surfaced verbatim, the tree is preserved, resubmit
//! - expired credentials: forwarded to the external session collaborator
//!
//! No error here is fatal to the process.

use thiserror::Error;

/// Result type alias using CoachFormError
pub type Result<T> = std::result::Result<T, CoachFormError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoachFormError {
    // ===== Validation =====
    /// A local format check failed; submission of the record is blocked
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    // ===== Addressing =====
    /// A mutation addressed a collection index that does not exist
    #[error("No node at index {index} in {collection}")]
    NodeNotFound {
        collection: &'static str,
        index: usize,
    },

    // ===== Submission =====
    /// A mutation or a second submit arrived while a submission is in flight
    #[error("A submission is already in flight")]
    SubmissionInFlight,

    /// The gateway rejected the request; message is surfaced verbatim
    #[error("Gateway error: {message}")]
    Gateway { message: String },

    /// Credentials expired mid-session; handled by the session collaborator
    #[error("Authentication expired: {message}")]
    AuthExpired { message: String },
}

impl CoachFormError {
    /// Get the stable error code for this error
    ///
    /// Codes are stable across releases and safe to match on in callers
    /// and tests.
    pub fn code(&self) -> &'static str {
        match self {
            CoachFormError::Validation { .. } => "ERR_VALIDATION",
            CoachFormError::NodeNotFound { .. } => "ERR_NODE_NOT_FOUND",
            CoachFormError::SubmissionInFlight => "ERR_SUBMISSION_IN_FLIGHT",
            CoachFormError::Gateway { .. } => "ERR_GATEWAY",
            CoachFormError::AuthExpired { .. } => "ERR_AUTH_EXPIRED",
        }
    }

    /// Whether the caller can recover by correcting input and resubmitting
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CoachFormError::AuthExpired { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct() {
        let errors = [
            CoachFormError::Validation {
                field: "email".into(),
                reason: "missing @".into(),
            },
            CoachFormError::NodeNotFound {
                collection: "trainings",
                index: 3,
            },
            CoachFormError::SubmissionInFlight,
            CoachFormError::Gateway {
                message: "500".into(),
            },
            CoachFormError::AuthExpired {
                message: "token expired".into(),
            },
        ];
        let codes: std::collections::HashSet<_> = errors.iter().map(|e| e.code()).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_gateway_message_is_verbatim() {
        let err = CoachFormError::Gateway {
            message: "422 Unprocessable Entity: weekday taken".into(),
        };
        assert!(err
            .to_string()
            .contains("422 Unprocessable Entity: weekday taken"));
    }

    #[test]
    fn test_auth_expired_is_not_recoverable() {
        let err = CoachFormError::AuthExpired {
            message: "expired".into(),
        };
        assert!(!err.is_recoverable());
        assert!(CoachFormError::SubmissionInFlight.is_recoverable());
    }
}
