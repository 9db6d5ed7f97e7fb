use binops_client::BinopsClient;
use binops_core::{InsertPosition, Shift};
use binops_moves::{
    load_picker, AssignmentChoice, BinTarget, EntryMode, MoveDraft, MoveForm, MoveRequestEditor,
    QueryCache, SubmitOutcome,
};
use chrono::{NaiveTime, Utc};

use super::confirm::{describe, settle};
use super::{AssignArgs, AssignmentArgs, CancelArgs, EditArgs, FieldArgs, ScheduleArgs};

/// Create a move request for each `--bin`, then assign each one if an
/// assignment was given.
///
/// # Errors
///
/// Returns an error on validation failure, when a create call fails, or when
/// any assignment after creation failed. Requests created before a failure
/// are kept and listed.
pub(crate) async fn run_schedule(client: &BinopsClient, args: &ScheduleArgs) -> anyhow::Result<()> {
    let mut bins: Vec<BinTarget> = args.bins.iter().map(BinTarget::new).collect();
    let mode = if bins.len() == 1 {
        EntryMode::CreateSingle {
            bin: bins.remove(0),
        }
    } else {
        EntryMode::CreateBulk { bins }
    };

    let mut form = MoveForm::create(mode);
    apply_fields(&mut form.draft, &args.fields);
    if let Some(choice) = assignment_choice(client, &args.assignment).await? {
        form.assignment = choice;
    }

    let cache = QueryCache::new();
    let editor = MoveRequestEditor::new(client, &cache);
    let outcome = editor.submit(&form).await?;
    print_outcome(&outcome)
}

/// Apply the given field and assignment changes to an existing request.
///
/// # Errors
///
/// Returns an error on validation failure, a stale lock token, an
/// unanswered route conflict, or any failed backend call.
pub(crate) async fn run_edit(client: &BinopsClient, args: &EditArgs) -> anyhow::Result<()> {
    let original = client.get_move_request(&args.id).await?;
    let mut form = MoveForm::edit(original);
    apply_fields(&mut form.draft, &args.fields);
    if args.unassign {
        form.assignment = AssignmentChoice::Unassigned;
    } else if let Some(choice) = assignment_choice(client, &args.assignment).await? {
        form.assignment = choice;
    }

    let cache = QueryCache::new();
    let editor = MoveRequestEditor::new(client, &cache);
    let outcome = editor.submit(&form).await?;
    let outcome = settle(&editor, outcome, &args.conflicts).await?;
    print_outcome(&outcome)
}

/// Cancel one move request.
///
/// # Errors
///
/// Returns an error for a blank reason or a failed backend call.
pub(crate) async fn run_cancel(client: &BinopsClient, args: &CancelArgs) -> anyhow::Result<()> {
    let cache = QueryCache::new();
    MoveRequestEditor::new(client, &cache)
        .cancel(&args.id, &args.reason)
        .await?;
    println!("cancelled move request {}", args.id);
    Ok(())
}

/// Assign existing move requests to a shift in one call.
///
/// # Errors
///
/// Returns an error on validation failure, an unanswered route conflict, or
/// a failed backend call.
pub(crate) async fn run_assign(client: &BinopsClient, args: &AssignArgs) -> anyhow::Result<()> {
    let shift = find_shift(client, &args.shift).await?;
    let choice = shift_choice(client, &shift, args.after_bin.as_deref(), args.position).await?;

    let cache = QueryCache::new();
    let editor = MoveRequestEditor::new(client, &cache);
    let outcome = editor.bulk_assign(&args.ids, &choice).await?;
    let outcome = settle(&editor, outcome, &args.conflicts).await?;
    print_outcome(&outcome)
}

/// Copies the flags that were given into the draft.
fn apply_fields(draft: &mut MoveDraft, fields: &FieldArgs) {
    if let Some(date) = fields.date {
        draft.scheduled_date = Some(date.and_time(NaiveTime::MIN).and_utc().timestamp());
    }
    if let Some(preset) = fields.preset {
        draft.apply_preset(preset.into(), Utc::now());
    }
    if fields.move_type.is_some() {
        draft.move_type = fields.move_type;
    }
    if fields.disposal.is_some() {
        draft.disposal_action = fields.disposal;
    }

    let destination = &mut draft.destination;
    for (slot, value) in [
        (&mut destination.street, &fields.street),
        (&mut destination.city, &fields.city),
        (&mut destination.zip, &fields.zip),
        (&mut draft.reason, &fields.reason),
        (&mut draft.notes, &fields.notes),
    ] {
        if value.is_some() {
            slot.clone_from(value);
        }
    }
    if fields.lat.is_some() {
        destination.latitude = fields.lat;
    }
    if fields.lng.is_some() {
        destination.longitude = fields.lng;
    }
}

async fn assignment_choice(
    client: &BinopsClient,
    args: &AssignmentArgs,
) -> anyhow::Result<Option<AssignmentChoice>> {
    if let Some(user_id) = &args.user {
        return Ok(Some(AssignmentChoice::User {
            user_id: user_id.clone(),
        }));
    }
    let Some(shift_id) = &args.shift else {
        return Ok(None);
    };
    let shift = find_shift(client, shift_id).await?;
    let choice = shift_choice(client, &shift, args.after_bin.as_deref(), args.position).await?;
    Ok(Some(choice))
}

async fn find_shift(client: &BinopsClient, shift_id: &str) -> anyhow::Result<Shift> {
    client
        .get_shifts()
        .await?
        .into_iter()
        .find(|shift| shift.id == shift_id)
        .ok_or_else(|| anyhow::anyhow!("shift '{shift_id}' not found; run `binops shifts`"))
}

async fn shift_choice(
    client: &BinopsClient,
    shift: &Shift,
    after_bin: Option<&str>,
    position: Option<InsertPosition>,
) -> anyhow::Result<AssignmentChoice> {
    let picker = load_picker(client, shift).await?;
    if !picker.can_insert() {
        tracing::warn!(shift_id = %shift.id, "active shift has no remaining stops");
    }
    Ok(picker.choose(after_bin, position))
}

fn print_outcome(outcome: &SubmitOutcome) -> anyhow::Result<()> {
    match outcome {
        SubmitOutcome::Created(report) => {
            println!("created {} move request(s):", report.created.len());
            for id in &report.created {
                println!("  {id}");
            }
            if !report.assignment_failures.is_empty() {
                for failure in &report.assignment_failures {
                    eprintln!(
                        "assignment failed for {}: {}",
                        failure.move_request_id, failure.error
                    );
                }
                anyhow::bail!(
                    "{} of {} created move request(s) were left unassigned",
                    report.assignment_failures.len(),
                    report.created.len()
                );
            }
        }
        SubmitOutcome::Updated { move_request_id } => {
            println!("updated move request {move_request_id}");
        }
        SubmitOutcome::Assigned { move_request_ids } => {
            println!("assigned {} move request(s)", move_request_ids.len());
        }
        SubmitOutcome::NeedsConfirmation(pending) => anyhow::bail!(describe(pending)),
    }
    Ok(())
}
