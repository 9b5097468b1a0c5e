//! Submission protocol tests against a scripted in-memory gateway.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use coachform_core::{EncodedPayload, Trainee, TraineeDraft, Training, Weekday};
use coachform_core_types::PersistedId;
use coachform_gateway::{
    load, GatewayError, PersistenceGateway, SubmitOutcome, SubmitState, Submission,
};

// ---------------------------------------------------------------------------
// Scripted gateway
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Fetch(PersistedId),
    Create(EncodedPayload),
    Update(PersistedId, EncodedPayload),
}

/// Gateway that replays queued responses and records every call
struct ScriptedGateway {
    calls: Mutex<Vec<Call>>,
    responses: Mutex<VecDeque<Result<Trainee, GatewayError>>>,
}

impl ScriptedGateway {
    fn new(responses: Vec<Result<Trainee, GatewayError>>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responses: Mutex::new(responses.into()),
        }
    }

    fn next_response(&self) -> Result<Trainee, GatewayError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("gateway called more often than scripted")
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PersistenceGateway for ScriptedGateway {
    async fn fetch(&self, id: PersistedId) -> Result<Trainee, GatewayError> {
        self.calls.lock().unwrap().push(Call::Fetch(id));
        self.next_response()
    }

    async fn create(&self, payload: EncodedPayload) -> Result<Trainee, GatewayError> {
        self.calls.lock().unwrap().push(Call::Create(payload));
        self.next_response()
    }

    async fn update(
        &self,
        id: PersistedId,
        payload: EncodedPayload,
    ) -> Result<Trainee, GatewayError> {
        self.calls.lock().unwrap().push(Call::Update(id, payload));
        self.next_response()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn server_record(id: u64) -> Trainee {
    let mut t = Trainee::empty();
    t.id = Some(PersistedId::new(id));
    t.name = "Ana".to_string();
    t.email = "ana@x.com".to_string();
    let mut row = Training::placeholder();
    row.id = Some(PersistedId::new(5));
    row.weekday = Some(Weekday::Monday);
    row.exercises.clear();
    t.plan.trainings = vec![row];
    t.plan.meals.clear();
    t
}

fn filled_create_draft() -> TraineeDraft {
    let mut draft = TraineeDraft::new();
    draft.set_name("Ana").unwrap();
    draft.set_email("ana@x.com").unwrap();
    draft.set_training_weekday(0, Weekday::Monday).unwrap();
    draft
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_success_installs_server_record() {
    let gateway = ScriptedGateway::new(vec![Ok(server_record(42))]);
    let mut draft = filled_create_draft();
    let mut submission = Submission::new();

    let outcome = submission.submit(&mut draft, &gateway).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Created);
    assert_eq!(submission.state(), SubmitState::Succeeded);
    assert_eq!(draft.id(), Some(PersistedId::new(42)));
    assert!(!draft.is_locked());
    assert!(draft.baseline().is_present());

    match &gateway.calls()[..] {
        [Call::Create(payload)] => {
            assert_eq!(payload.text("root[name]"), Some("Ana"));
            assert_eq!(
                payload.text("root[plan][trainings][0][weekday]"),
                Some("monday")
            );
        }
        other => panic!("expected one create call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_failure_preserves_tree_and_surfaces_error() {
    let gateway = ScriptedGateway::new(vec![
        Err(GatewayError::new("503 temporarily unavailable")),
        Ok(server_record(42)),
    ]);
    let mut draft = TraineeDraft::from_record(server_record(42));
    draft.set_training_weekday(0, Weekday::Tuesday).unwrap();
    let mut submission = Submission::new();

    let err = submission.submit(&mut draft, &gateway).await.unwrap_err();
    assert_eq!(err.code(), "ERR_GATEWAY");
    assert!(err.to_string().contains("503 temporarily unavailable"));
    assert_eq!(submission.state(), SubmitState::Failed);

    // The edit survives and the draft is unlocked: correct and resubmit.
    assert!(!draft.is_locked());
    assert_eq!(
        draft.tree().plan.trainings[0].weekday,
        Some(Weekday::Tuesday)
    );
    let outcome = submission.submit(&mut draft, &gateway).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::Updated);
}

#[tokio::test]
async fn test_unchanged_update_short_circuits_without_request() {
    let gateway = ScriptedGateway::new(vec![]);
    let mut draft = TraineeDraft::from_record(server_record(42));
    let mut submission = Submission::new();

    let outcome = submission.submit(&mut draft, &gateway).await.unwrap();
    assert_eq!(outcome, SubmitOutcome::NoChanges);
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_update_targets_the_record_id() {
    let gateway = ScriptedGateway::new(vec![Ok(server_record(42))]);
    let mut draft = TraineeDraft::from_record(server_record(42));
    draft.set_name("Ana Maria").unwrap();
    let mut submission = Submission::new();

    submission.submit(&mut draft, &gateway).await.unwrap();
    match &gateway.calls()[..] {
        [Call::Update(id, payload)] => {
            assert_eq!(*id, PersistedId::new(42));
            assert_eq!(payload.text("root[name]"), Some("Ana Maria"));
        }
        other => panic!("expected one update call, got {:?}", other),
    }
}

#[tokio::test]
async fn test_auth_expired_is_distinguished() {
    let gateway = ScriptedGateway::new(vec![Err(GatewayError::auth_expired("token expired"))]);
    let mut draft = filled_create_draft();
    let mut submission = Submission::new();

    let err = submission.submit(&mut draft, &gateway).await.unwrap_err();
    assert_eq!(err.code(), "ERR_AUTH_EXPIRED");
    assert!(!err.is_recoverable());
}

#[tokio::test]
async fn test_validation_failure_blocks_before_any_request() {
    let gateway = ScriptedGateway::new(vec![]);
    let mut draft = TraineeDraft::new(); // blank name and email
    let mut submission = Submission::new();

    let err = submission.submit(&mut draft, &gateway).await.unwrap_err();
    assert_eq!(err.code(), "ERR_VALIDATION");
    assert!(gateway.calls().is_empty());
    assert!(!draft.is_locked());
}

#[tokio::test]
async fn test_concurrent_submit_attempt_is_rejected() {
    let gateway = ScriptedGateway::new(vec![]);
    let mut draft = filled_create_draft();
    // Simulate a submission already holding the draft.
    draft.lock_for_submission().unwrap();

    let mut submission = Submission::new();
    let err = submission.submit(&mut draft, &gateway).await.unwrap_err();
    assert_eq!(err.code(), "ERR_SUBMISSION_IN_FLIGHT");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn test_load_builds_an_edit_mode_draft() {
    let gateway = ScriptedGateway::new(vec![Ok(server_record(42))]);
    let draft = load(&gateway, PersistedId::new(42)).await.unwrap();

    assert_eq!(draft.id(), Some(PersistedId::new(42)));
    assert!(draft.baseline().is_present());
    assert!(draft
        .changes(&coachform_core::DiffOptions::default())
        .is_empty());
    assert_eq!(gateway.calls(), vec![Call::Fetch(PersistedId::new(42))]);
}
