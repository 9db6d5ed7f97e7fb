//! Submit and resume flows against a recording in-memory backend.

use std::collections::HashMap;
use std::sync::Mutex;

use binops_client::{
    AssignToShift, AssignToUser, BulkAssignMoves, ClientError, CreateMoveRequest,
    MoveRequestUpdate,
};
use binops_core::{
    DisposalAction, InProgressAction, InsertPosition, MoveRequest, MoveStatus, MoveType, Shift,
    ShiftDetails, ShiftStatus, Waypoint,
};
use binops_moves::{
    load_picker, AssignmentChoice, BinTarget, CacheInvalidator, Collection, DestinationDraft,
    EntryMode, MoveDraft, MoveForm, MoveRequestApi, MoveRequestEditor, PendingOperation,
    QueryCache, Resolution, ShiftMode, SubmitError, SubmitOutcome, ValidationError,
};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(CreateMoveRequest),
    Update { id: String, update: MoveRequestUpdate },
    AssignUser(AssignToUser),
    AssignShift(AssignToShift),
    BulkAssign(BulkAssignMoves),
    Cancel { id: String, reason: String },
    ShiftDetails(String),
}

/// Records every call. Calls listed in `failures` (by zero-based position)
/// fail with the scripted error; every other call succeeds.
#[derive(Default)]
struct FakeApi {
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<usize, ClientError>>,
    route: Vec<Waypoint>,
}

impl FakeApi {
    fn failing_at(position: usize, status: u16, message: &str) -> Self {
        let api = Self::default();
        api.fail_at(position, status, message);
        api
    }

    fn fail_at(&self, position: usize, status: u16, message: &str) {
        self.failures.lock().unwrap().insert(
            position,
            ClientError::Api {
                status,
                message: message.to_owned(),
            },
        );
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Records `call` and returns its scripted failure, if any, along with
    /// the call's position.
    fn record(&self, call: Call) -> Result<usize, ClientError> {
        let mut calls = self.calls.lock().unwrap();
        let position = calls.len();
        calls.push(call);
        match self.failures.lock().unwrap().remove(&position) {
            Some(err) => Err(err),
            None => Ok(position),
        }
    }
}

fn stored(id: &str, updated_at: i64) -> MoveRequest {
    MoveRequest {
        updated_at,
        id: id.to_owned(),
        ..original(None, None)
    }
}

impl MoveRequestApi for FakeApi {
    async fn create_move_request(
        &self,
        payload: &CreateMoveRequest,
    ) -> Result<MoveRequest, ClientError> {
        let position = self.record(Call::Create(payload.clone()))?;
        Ok(stored(&format!("mr-new-{position}"), 1))
    }

    async fn update_move_request(
        &self,
        id: &str,
        update: &MoveRequestUpdate,
    ) -> Result<MoveRequest, ClientError> {
        self.record(Call::Update {
            id: id.to_owned(),
            update: update.clone(),
        })?;
        Ok(stored(id, update.client_updated_at.unwrap_or(0) + 1))
    }

    async fn assign_move_to_user(&self, payload: &AssignToUser) -> Result<(), ClientError> {
        self.record(Call::AssignUser(payload.clone())).map(drop)
    }

    async fn assign_move_to_shift(&self, payload: &AssignToShift) -> Result<(), ClientError> {
        self.record(Call::AssignShift(payload.clone())).map(drop)
    }

    async fn bulk_assign_moves(&self, payload: &BulkAssignMoves) -> Result<(), ClientError> {
        self.record(Call::BulkAssign(payload.clone())).map(drop)
    }

    async fn cancel_move_request(&self, id: &str, reason: &str) -> Result<(), ClientError> {
        self.record(Call::Cancel {
            id: id.to_owned(),
            reason: reason.to_owned(),
        })
        .map(drop)
    }

    async fn get_shift_details_by_driver_id(
        &self,
        driver_id: &str,
    ) -> Result<ShiftDetails, ClientError> {
        self.record(Call::ShiftDetails(driver_id.to_owned()))?;
        Ok(ShiftDetails {
            bins: self.route.clone(),
        })
    }
}

const IN_PROGRESS: &str = "Driver Sam Okafor is currently at this location (Stop 3 of 8)";
const ACTIVE_ROUTE: &str = "This shift is on an active route; confirm to modify it";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// 2026-10-22 00:00 UTC.
const FUTURE_DATE: i64 = 1_792_627_200;

fn original(shift: Option<&str>, user: Option<&str>) -> MoveRequest {
    MoveRequest {
        id: "mr-1".to_owned(),
        bin_id: "bin-1".to_owned(),
        bin_number: Some(17),
        bin_street: Some("12 Elm St".to_owned()),
        bin_fill_percentage: Some(82.0),
        scheduled_date: FUTURE_DATE,
        move_type: MoveType::Store,
        new_street: None,
        new_city: None,
        new_zip: None,
        new_latitude: None,
        new_longitude: None,
        disposal_action: Some(DisposalAction::Store),
        assigned_user_id: user.map(str::to_owned),
        assigned_shift_id: shift.map(str::to_owned),
        assignment_type: match (shift, user) {
            (Some(_), _) => Some("shift".to_owned()),
            (None, Some(_)) => Some("user".to_owned()),
            (None, None) => None,
        },
        reason: Some("overflowing".to_owned()),
        notes: None,
        status: MoveStatus::Pending,
        updated_at: 100,
    }
}

fn future_shift(shift_id: &str, position: InsertPosition) -> AssignmentChoice {
    AssignmentChoice::FutureShift {
        shift_id: shift_id.to_owned(),
        insert_position: Some(position),
    }
}

fn store_draft() -> MoveDraft {
    MoveDraft {
        scheduled_date: Some(FUTURE_DATE),
        move_type: Some(MoveType::Store),
        disposal_action: Some(DisposalAction::Store),
        ..MoveDraft::default()
    }
}

fn editor<'a>(
    api: &'a FakeApi,
    cache: &'a QueryCache,
) -> MoveRequestEditor<'a, FakeApi, QueryCache> {
    MoveRequestEditor::new(api, cache).with_today(today())
}

fn expect_pending(outcome: SubmitOutcome) -> PendingOperation {
    match outcome {
        SubmitOutcome::NeedsConfirmation(pending) => pending,
        other => panic!("expected a pending confirmation, got {other:?}"),
    }
}

#[tokio::test]
async fn unchanged_assignment_issues_single_update_reasserting_it() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(Some("shift-a"), None));
    form.draft.notes = Some("gate code 1234".to_owned());

    let outcome = editor(&api, &cache).submit(&form).await.unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Updated { ref move_request_id } if move_request_id == "mr-1"
    ));

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    let Call::Update { id, update } = &calls[0] else {
        panic!("expected an update, got {:?}", calls[0]);
    };
    assert_eq!(id, "mr-1");
    assert_eq!(update.notes.as_deref(), Some("gate code 1234"));
    assert_eq!(update.client_updated_at, Some(100));
    assert_eq!(update.assigned_shift_id, Some(Some("shift-a".to_owned())));
    assert_eq!(update.assigned_user_id, Some(None));
    assert_eq!(update.assignment_type, Some(Some("shift".to_owned())));
    assert_eq!(cache.generation(Collection::MoveRequests), 1);
    assert_eq!(cache.generation(Collection::Shifts), 1);
    assert_eq!(cache.generation(Collection::Bins), 1);
}

#[tokio::test]
async fn moving_between_shifts_updates_fields_then_assigns_only_new_shift() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(Some("shift-a"), None));
    form.draft.reason = Some("customer request".to_owned());
    form.assignment = future_shift("shift-b", InsertPosition::End);

    editor(&api, &cache).submit(&form).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    let Call::Update { update, .. } = &calls[0] else {
        panic!("expected fields update first, got {:?}", calls[0]);
    };
    assert_eq!(update.reason.as_deref(), Some("customer request"));
    assert_eq!(update.assigned_shift_id, None, "fields update leaves assignment alone");
    assert_eq!(
        calls[1],
        Call::AssignShift(AssignToShift {
            move_request_id: "mr-1".to_owned(),
            shift_id: "shift-b".to_owned(),
            insert_after_bin_id: None,
            insert_position: Some(InsertPosition::End),
            overrides: binops_client::ConflictOverrides::default(),
        })
    );
}

#[tokio::test]
async fn assignment_only_change_skips_fields_update() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(Some("shift-a"), None));
    form.assignment = AssignmentChoice::User {
        user_id: "u-7".to_owned(),
    };

    editor(&api, &cache).submit(&form).await.unwrap();

    assert_eq!(
        api.calls(),
        vec![Call::AssignUser(AssignToUser {
            move_request_id: "mr-1".to_owned(),
            user_id: "u-7".to_owned(),
            overrides: binops_client::ConflictOverrides::default(),
        })]
    );
}

#[tokio::test]
async fn unassigning_clears_all_assignment_fields_without_assign_call() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(Some("shift-a"), None));
    form.assignment = AssignmentChoice::Unassigned;

    editor(&api, &cache).submit(&form).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    let Call::Update { update, .. } = &calls[0] else {
        panic!("expected an unassign update, got {:?}", calls[0]);
    };
    assert_eq!(update.assigned_shift_id, Some(None));
    assert_eq!(update.assigned_user_id, Some(None));
    assert_eq!(update.assignment_type, Some(None));
    assert_eq!(update.scheduled_date, None);
    assert_eq!(update.move_type, None);
    assert_eq!(update.new_street, None);
}

#[tokio::test]
async fn switching_relocation_to_store_clears_destination() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut relocation = original(None, None);
    relocation.move_type = MoveType::Relocation;
    relocation.disposal_action = None;
    relocation.new_street = Some("400 Main St".to_owned());
    relocation.new_city = Some("Dallas".to_owned());
    relocation.new_zip = Some("75201".to_owned());
    relocation.new_latitude = Some(32.78);
    relocation.new_longitude = Some(-96.8);
    let mut form = MoveForm::edit(relocation);
    form.draft.move_type = Some(MoveType::Store);
    form.draft.disposal_action = Some(DisposalAction::Store);

    editor(&api, &cache).submit(&form).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 1);
    let Call::Update { update, .. } = &calls[0] else {
        panic!("expected an update, got {:?}", calls[0]);
    };
    let body = serde_json::to_value(update).unwrap();
    assert_eq!(body["move_type"], "store");
    assert_eq!(body["disposal_action"], "store");
    for field in ["new_street", "new_city", "new_zip", "new_latitude", "new_longitude"] {
        assert!(body[field].is_null(), "{field} should be cleared");
        assert!(body.get(field).is_some(), "{field} should be sent");
    }
}

#[tokio::test]
async fn switching_store_to_relocation_clears_disposal_action() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(None, None));
    form.draft.move_type = Some(MoveType::Relocation);
    form.draft.destination = DestinationDraft {
        street: Some("400 Main St".to_owned()),
        city: Some("Dallas".to_owned()),
        zip: Some("75201".to_owned()),
        latitude: None,
        longitude: None,
    };

    editor(&api, &cache).submit(&form).await.unwrap();

    let calls = api.calls();
    let Call::Update { update, .. } = &calls[0] else {
        panic!("expected an update, got {:?}", calls[0]);
    };
    assert_eq!(update.disposal_action, Some(None));
    assert_eq!(update.new_city, Some(Some("Dallas".to_owned())));
}

#[tokio::test]
async fn unassign_after_fields_update_chains_lock_token() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(None, Some("u-7")));
    form.draft.notes = Some("leave by the gate".to_owned());
    form.assignment = AssignmentChoice::Unassigned;

    editor(&api, &cache).submit(&form).await.unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    let (Call::Update { update: first, .. }, Call::Update { update: second, .. }) =
        (&calls[0], &calls[1])
    else {
        panic!("expected two updates, got {calls:?}");
    };
    assert_eq!(first.client_updated_at, Some(100));
    assert_eq!(second.client_updated_at, Some(101));
    assert_eq!(second.assigned_user_id, Some(None));
}

#[tokio::test]
async fn in_progress_conflict_retries_same_payload_with_chosen_action() {
    let api = FakeApi::failing_at(0, 409, IN_PROGRESS);
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(Some("shift-a"), None));
    form.draft.notes = Some("gate code 1234".to_owned());
    let editor = editor(&api, &cache);

    let pending = expect_pending(editor.submit(&form).await.unwrap());
    let PendingOperation::InProgress { conflict, .. } = &pending else {
        panic!("expected in-progress conflict, got {pending:?}");
    };
    assert_eq!(conflict.driver_name.as_deref(), Some("Sam Okafor"));
    assert_eq!(conflict.stop_label.as_deref(), Some("Stop 3 of 8"));
    assert_eq!(cache.generation(Collection::MoveRequests), 0);

    let outcome = editor
        .resolve(
            &pending,
            Resolution::InProgress(InProgressAction::InsertAfterCurrent),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::Updated { .. }));

    let calls = api.calls();
    assert_eq!(calls.len(), 2);
    let (Call::Update { update: first, .. }, Call::Update { update: retry, .. }) =
        (&calls[0], &calls[1])
    else {
        panic!("expected original update and its retry, got {calls:?}");
    };
    assert_eq!(
        retry.overrides.in_progress_action,
        Some(InProgressAction::InsertAfterCurrent)
    );
    let mut expected = first.clone();
    expected.overrides.in_progress_action = Some(InProgressAction::InsertAfterCurrent);
    assert_eq!(retry, &expected);
    assert_eq!(
        serde_json::to_value(retry).unwrap()["in_progress_action"],
        "insert_after_current"
    );
}

#[tokio::test]
async fn active_shift_conflict_mid_sequence_resumes_at_assignment() {
    // The fields update succeeds; the assign-to-shift call is rejected.
    let api = FakeApi::failing_at(1, 409, ACTIVE_ROUTE);
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(Some("shift-a"), None));
    form.draft.reason = Some("customer request".to_owned());
    form.assignment = AssignmentChoice::ActiveShift {
        shift_id: "shift-b".to_owned(),
        remaining: vec![Waypoint {
            bin_id: "bin-42".to_owned(),
            bin_number: Some(42),
            current_street: None,
            sequence_order: 4,
            is_completed: 0,
        }],
        insert_after_bin_id: Some("bin-42".to_owned()),
    };
    let editor = editor(&api, &cache);

    let pending = expect_pending(editor.submit(&form).await.unwrap());
    assert!(matches!(pending, PendingOperation::ActiveShift { .. }));
    assert_eq!(pending.message(), ACTIVE_ROUTE);
    assert_eq!(
        cache.generation(Collection::MoveRequests),
        1,
        "applied fields update is refreshed"
    );

    let err = editor
        .resolve(
            &pending,
            Resolution::ActiveShift {
                acknowledged: false,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::ActiveShiftNotAcknowledged)
    ));
    assert_eq!(api.calls().len(), 2, "no call without acknowledgement");

    editor
        .resolve(&pending, Resolution::ActiveShift { acknowledged: true })
        .await
        .unwrap();

    let calls = api.calls();
    assert_eq!(calls.len(), 3);
    let Call::AssignShift(retry) = &calls[2] else {
        panic!("expected assign-to-shift retry, got {:?}", calls[2]);
    };
    assert_eq!(retry.shift_id, "shift-b");
    assert_eq!(retry.insert_after_bin_id.as_deref(), Some("bin-42"));
    assert_eq!(retry.overrides.confirm_active_shift_change, Some(true));
    assert!(
        calls.iter().all(|c| !matches!(c, Call::AssignShift(a) if a.shift_id == "shift-a")),
        "old shift never receives an assignment"
    );
}

#[tokio::test]
async fn confirmed_overrides_accumulate_across_conflicts() {
    let api = FakeApi::failing_at(0, 409, ACTIVE_ROUTE);
    api.fail_at(1, 409, IN_PROGRESS);
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(Some("shift-a"), None));
    form.draft.notes = Some("call ahead".to_owned());
    let editor = editor(&api, &cache);

    let first = expect_pending(editor.submit(&form).await.unwrap());
    let second = expect_pending(
        editor
            .resolve(&first, Resolution::ActiveShift { acknowledged: true })
            .await
            .unwrap(),
    );
    assert!(matches!(second, PendingOperation::InProgress { .. }));
    assert_eq!(
        second.resume().overrides().confirm_active_shift_change,
        Some(true)
    );

    editor
        .resolve(
            &second,
            Resolution::InProgress(InProgressAction::ReoptimizeRoute),
        )
        .await
        .unwrap();

    let calls = api.calls();
    let Call::Update { update, .. } = &calls[2] else {
        panic!("expected final update, got {:?}", calls[2]);
    };
    assert_eq!(update.overrides.confirm_active_shift_change, Some(true));
    assert_eq!(
        update.overrides.in_progress_action,
        Some(InProgressAction::ReoptimizeRoute)
    );
}

#[tokio::test]
async fn mismatched_resolution_is_rejected_without_call() {
    let api = FakeApi::failing_at(0, 409, IN_PROGRESS);
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(None, None));
    form.draft.notes = Some("x".to_owned());
    let editor = editor(&api, &cache);

    let pending = expect_pending(editor.submit(&form).await.unwrap());
    let err = editor
        .resolve(&pending, Resolution::ActiveShift { acknowledged: true })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::ResolutionMismatch)
    ));
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn stale_lock_token_is_reported_as_stale_update() {
    let api = FakeApi::failing_at(0, 409, "Move request was modified by another user");
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(None, None));
    form.draft.notes = Some("x".to_owned());

    let err = editor(&api, &cache).submit(&form).await.unwrap_err();
    assert!(
        matches!(err, SubmitError::StaleUpdate { ref message } if message.contains("modified"))
    );
}

#[tokio::test]
async fn other_failures_abort_without_pending_state() {
    let api = FakeApi::failing_at(0, 500, "database unavailable");
    let cache = QueryCache::new();
    let mut form = MoveForm::edit(original(None, None));
    form.draft.notes = Some("x".to_owned());

    let err = editor(&api, &cache).submit(&form).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Request(ClientError::Api { status: 500, .. })
    ));
    assert_eq!(cache.generation(Collection::MoveRequests), 0);
}

#[tokio::test]
async fn relocation_without_city_or_zip_makes_no_call() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::create(EntryMode::CreateSingle {
        bin: BinTarget::new("bin-1"),
    });
    form.draft = MoveDraft {
        scheduled_date: Some(FUTURE_DATE),
        move_type: Some(MoveType::Relocation),
        destination: DestinationDraft {
            street: Some("400 Oak Ave".to_owned()),
            ..DestinationDraft::default()
        },
        ..MoveDraft::default()
    };

    let err = editor(&api, &cache).submit(&form).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::IncompleteDestination { .. })
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn active_shift_with_no_remaining_stops_makes_no_call() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::create(EntryMode::CreateSingle {
        bin: BinTarget::new("bin-1"),
    });
    form.draft = store_draft();
    form.assignment = AssignmentChoice::ActiveShift {
        shift_id: "shift-b".to_owned(),
        remaining: vec![],
        insert_after_bin_id: None,
    };

    let err = editor(&api, &cache).submit(&form).await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::NoRemainingStops { .. })
    ));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn bulk_create_then_assign_each_to_future_shift_start() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let mut form = MoveForm::create(EntryMode::CreateBulk {
        bins: vec![
            BinTarget::new("bin-1"),
            BinTarget::new("bin-2"),
            BinTarget::new("bin-3"),
        ],
    });
    form.draft = store_draft();
    form.assignment = future_shift("shift-f", InsertPosition::Start);

    let SubmitOutcome::Created(report) = editor(&api, &cache).submit(&form).await.unwrap() else {
        panic!("expected a create report");
    };
    assert_eq!(report.created, vec!["mr-new-0", "mr-new-1", "mr-new-2"]);
    assert!(report.assignment_failures.is_empty());

    let calls = api.calls();
    assert_eq!(calls.len(), 6);
    let created_bins: Vec<&str> = calls[..3]
        .iter()
        .map(|c| match c {
            Call::Create(payload) => payload.bin_id.as_str(),
            other => panic!("expected create, got {other:?}"),
        })
        .collect();
    assert_eq!(created_bins, vec!["bin-1", "bin-2", "bin-3"]);
    for (call, id) in calls[3..].iter().zip(&report.created) {
        let Call::AssignShift(assign) = call else {
            panic!("expected assign-to-shift, got {call:?}");
        };
        assert_eq!(&assign.move_request_id, id);
        assert_eq!(assign.shift_id, "shift-f");
        assert_eq!(assign.insert_position, Some(InsertPosition::Start));
        assert_eq!(
            serde_json::to_value(assign).unwrap()["insert_position"],
            "start"
        );
    }
    assert_eq!(cache.generation(Collection::Bins), 1);
}

#[tokio::test]
async fn failed_create_keeps_earlier_requests_and_skips_assignment() {
    let api = FakeApi::failing_at(1, 500, "insert failed");
    let cache = QueryCache::new();
    let mut form = MoveForm::create(EntryMode::CreateBulk {
        bins: vec![
            BinTarget::new("bin-1"),
            BinTarget::new("bin-2"),
            BinTarget::new("bin-3"),
        ],
    });
    form.draft = store_draft();
    form.assignment = future_shift("shift-f", InsertPosition::End);

    let err = editor(&api, &cache).submit(&form).await.unwrap_err();
    let SubmitError::Create { created, .. } = err else {
        panic!("expected partial create error, got {err:?}");
    };
    assert_eq!(created, vec!["mr-new-0"]);
    assert_eq!(api.calls().len(), 2);
    assert_eq!(cache.generation(Collection::MoveRequests), 1);
}

#[tokio::test]
async fn failed_assignment_after_create_does_not_stop_batch() {
    // Creates are calls 0 and 1; the first assignment is call 2.
    let api = FakeApi::failing_at(2, 409, ACTIVE_ROUTE);
    let cache = QueryCache::new();
    let mut form = MoveForm::create(EntryMode::CreateBulk {
        bins: vec![BinTarget::new("bin-1"), BinTarget::new("bin-2")],
    });
    form.draft = store_draft();
    form.assignment = AssignmentChoice::User {
        user_id: "u-7".to_owned(),
    };

    let SubmitOutcome::Created(report) = editor(&api, &cache).submit(&form).await.unwrap() else {
        panic!("expected a create report");
    };
    assert_eq!(report.created.len(), 2);
    assert_eq!(report.assignment_failures.len(), 1);
    assert_eq!(report.assignment_failures[0].move_request_id, "mr-new-0");
    assert_eq!(api.calls().len(), 4);
}

#[tokio::test]
async fn cancel_requires_reason_and_refreshes_caches() {
    let api = FakeApi::default();
    let cache = QueryCache::new();
    let editor = editor(&api, &cache);

    let err = editor.cancel("mr-1", "   ").await.unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::EmptyCancelReason)
    ));
    assert!(api.calls().is_empty());

    editor.cancel("mr-1", " bin removed by customer ").await.unwrap();
    assert_eq!(
        api.calls(),
        vec![Call::Cancel {
            id: "mr-1".to_owned(),
            reason: "bin removed by customer".to_owned(),
        }]
    );
    assert_eq!(cache.generation(Collection::Shifts), 1);
}

#[tokio::test]
async fn bulk_assign_requires_shift_and_resumes_after_conflict() {
    let api = FakeApi::failing_at(0, 409, ACTIVE_ROUTE);
    let cache = QueryCache::new();
    let editor = editor(&api, &cache);
    let ids = vec!["mr-1".to_owned(), "mr-2".to_owned()];

    let err = editor
        .bulk_assign(
            &ids,
            &AssignmentChoice::User {
                user_id: "u-7".to_owned(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::ShiftRequired)
    ));
    let err = editor
        .bulk_assign(&[], &future_shift("shift-f", InsertPosition::End))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SubmitError::Validation(ValidationError::NoMoveRequestsSelected)
    ));
    assert!(api.calls().is_empty());

    let pending = expect_pending(
        editor
            .bulk_assign(&ids, &future_shift("shift-f", InsertPosition::End))
            .await
            .unwrap(),
    );
    assert_eq!(pending.move_request_ids(), vec!["mr-1", "mr-2"]);

    let outcome = editor
        .resolve(&pending, Resolution::ActiveShift { acknowledged: true })
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        SubmitOutcome::Assigned { ref move_request_ids } if move_request_ids.len() == 2
    ));
    let calls = api.calls();
    let Call::BulkAssign(retry) = &calls[1] else {
        panic!("expected bulk-assign retry, got {:?}", calls[1]);
    };
    assert_eq!(retry.insert_position, Some(InsertPosition::End));
    assert_eq!(retry.overrides.confirm_active_shift_change, Some(true));
}

#[tokio::test]
async fn picker_loads_route_only_for_active_shift() {
    let api = FakeApi {
        route: vec![
            Waypoint {
                bin_id: "bin-1".to_owned(),
                bin_number: None,
                current_street: None,
                sequence_order: 1,
                is_completed: 1,
            },
            Waypoint {
                bin_id: "bin-2".to_owned(),
                bin_number: None,
                current_street: None,
                sequence_order: 2,
                is_completed: 0,
            },
        ],
        ..FakeApi::default()
    };
    let mut shift = Shift {
        id: "shift-b".to_owned(),
        driver_id: "drv-3".to_owned(),
        driver_name: Some("Ana Ruiz".to_owned()),
        date: "2026-10-19".to_owned(),
        start_time: None,
        status: ShiftStatus::Scheduled,
        bin_count: 2,
        bins_collected: 1,
    };

    let picker = load_picker(&api, &shift).await.unwrap();
    assert_eq!(picker.mode(), ShiftMode::Future);
    assert!(api.calls().is_empty());

    shift.status = ShiftStatus::Active;
    let picker = load_picker(&api, &shift).await.unwrap();
    assert_eq!(picker.mode(), ShiftMode::Active);
    assert_eq!(api.calls(), vec![Call::ShiftDetails("drv-3".to_owned())]);
    assert_eq!(picker.anchors().len(), 1);
    assert_eq!(picker.anchors()[0].bin_id, "bin-2");
}

#[test]
fn query_cache_is_a_cache_invalidator() {
    let cache = QueryCache::new();
    cache.invalidate(&[Collection::Zones]);
    assert_eq!(cache.generation(Collection::Zones), 1);
}
