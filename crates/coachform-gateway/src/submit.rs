//! The submission state machine
//!
//! `Idle → Submitting → {Succeeded, Failed}`, where both terminal states
//! are resting states: the next submit may begin from either. Only
//! `Submitting` rejects a new attempt. There is no automatic retry and no
//! cancellation of an in-flight request.

use coachform_core::encode;
use coachform_core::{validate, CoachFormError, DiffOptions, TraineeDraft};
use coachform_core_types::{PersistedId, RequestId};
use tracing::{info, warn};

use crate::gateway::{GatewayError, PersistenceGateway};

/// Where one submission currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitState {
    /// No submission attempted yet
    #[default]
    Idle,
    /// Exactly one request is in flight; mutation is gated
    Submitting,
    /// The last submission installed a new baseline
    Succeeded,
    /// The last submission failed; the tree is preserved unchanged
    Failed,
}

/// What a successful submission did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// First save; the record now carries server-assigned ids
    Created,
    /// Partial update applied
    Updated,
    /// Nothing changed since the baseline; no request was issued
    NoChanges,
}

/// Drives saves of one draft against a gateway
#[derive(Debug, Default)]
pub struct Submission {
    state: SubmitState,
    options: DiffOptions,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submission with non-default diff options (cascade behavior)
    pub fn with_options(options: DiffOptions) -> Self {
        Self {
            state: SubmitState::Idle,
            options,
        }
    }

    /// Current state of the machine
    pub fn state(&self) -> SubmitState {
        self.state
    }

    /// Run one save to completion
    ///
    /// Validates, diffs, encodes, locks the draft, then issues exactly one
    /// request: create when the record has no id, update otherwise. On
    /// success the server-returned record replaces the tree and baseline;
    /// on failure the tree is preserved unchanged and the error is
    /// surfaced verbatim. An unchanged persisted record short-circuits
    /// without a request.
    ///
    /// # Errors
    ///
    /// `SubmissionInFlight` when called while `Submitting`; `Validation`
    /// when a format check fails; `Gateway`/`AuthExpired` when the request
    /// fails.
    pub async fn submit<G>(
        &mut self,
        draft: &mut TraineeDraft,
        gateway: &G,
    ) -> Result<SubmitOutcome, CoachFormError>
    where
        G: PersistenceGateway + ?Sized,
    {
        if self.state == SubmitState::Submitting {
            return Err(CoachFormError::SubmissionInFlight);
        }

        validate(draft.tree())?;

        let changes = draft.changes(&self.options);
        let record_id = draft.id();
        if record_id.is_some() && changes.is_empty() {
            self.state = SubmitState::Succeeded;
            return Ok(SubmitOutcome::NoChanges);
        }
        let payload = encode::encode(&changes);

        draft.lock_for_submission()?;
        self.state = SubmitState::Submitting;
        let request_id = RequestId::new();
        info!(
            request_id = %request_id,
            fields = payload.len(),
            create = record_id.is_none(),
            "submitting record"
        );

        let result = match record_id {
            None => gateway.create(payload).await,
            Some(id) => gateway.update(id, payload).await,
        };

        match result {
            Ok(record) => {
                draft.accept_server_record(record);
                self.state = SubmitState::Succeeded;
                info!(request_id = %request_id, "submission succeeded");
                Ok(match record_id {
                    None => SubmitOutcome::Created,
                    Some(_) => SubmitOutcome::Updated,
                })
            }
            Err(err) => {
                draft.unlock();
                self.state = SubmitState::Failed;
                warn!(request_id = %request_id, error = %err, "submission failed");
                Err(map_gateway_error(err))
            }
        }
    }
}

/// Fetch a record and open an edit-mode draft over it
pub async fn load<G>(gateway: &G, id: PersistedId) -> Result<TraineeDraft, CoachFormError>
where
    G: PersistenceGateway + ?Sized,
{
    let record = gateway.fetch(id).await.map_err(map_gateway_error)?;
    Ok(TraineeDraft::from_record(record))
}

fn map_gateway_error(err: GatewayError) -> CoachFormError {
    if err.auth_expired {
        CoachFormError::AuthExpired {
            message: err.message,
        }
    } else {
        CoachFormError::Gateway {
            message: err.message,
        }
    }
}
