use binops_client::BinopsClient;
use binops_moves::{
    InProgressConflict, MoveRequestEditor, PendingOperation, QueryCache, Resolution, SubmitOutcome,
};

use super::ConflictArgs;

/// Answers route conflicts from the command-line flags until the submission
/// completes. Each kind of conflict is answered at most once.
///
/// # Errors
///
/// Returns an error describing the conflict when no flag answers it, or the
/// submission error from a resumed call.
pub(crate) async fn settle(
    editor: &MoveRequestEditor<'_, BinopsClient, QueryCache>,
    mut outcome: SubmitOutcome,
    answers: &ConflictArgs,
) -> anyhow::Result<SubmitOutcome> {
    let mut in_progress_answered = false;
    let mut active_shift_answered = false;

    loop {
        let SubmitOutcome::NeedsConfirmation(pending) = outcome else {
            return Ok(outcome);
        };
        let resolution = match &pending {
            PendingOperation::InProgress { .. } => match answers.in_progress_action {
                Some(action) if !in_progress_answered => {
                    in_progress_answered = true;
                    Resolution::InProgress(action)
                }
                _ => anyhow::bail!(describe(&pending)),
            },
            PendingOperation::ActiveShift { .. } => {
                if !answers.confirm_active_shift || active_shift_answered {
                    anyhow::bail!(describe(&pending));
                }
                active_shift_answered = true;
                Resolution::ActiveShift { acknowledged: true }
            }
        };
        tracing::info!(?resolution, "answering route conflict from flags");
        outcome = editor.resolve(&pending, resolution).await?;
    }
}

/// What the operator needs to know to decide, and the flag that answers it.
pub(crate) fn describe(pending: &PendingOperation) -> String {
    match pending {
        PendingOperation::InProgress { conflict, .. } => describe_in_progress(conflict),
        PendingOperation::ActiveShift { message, .. } => describe_active_shift(message),
    }
}

fn describe_in_progress(conflict: &InProgressConflict) -> String {
    format!(
        "driver {} is at this bin ({}): {}\nre-run with --in-progress-action \
         remove_from_route|insert_after_current|reoptimize_route",
        conflict.driver_name.as_deref().unwrap_or("(unknown)"),
        conflict.stop_label.as_deref().unwrap_or("stop unknown"),
        conflict.message
    )
}

fn describe_active_shift(message: &str) -> String {
    format!("{message}\nre-run with --confirm-active-shift to modify the driver's active route")
}
