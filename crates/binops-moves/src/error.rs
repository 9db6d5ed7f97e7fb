use binops_client::ClientError;
use binops_core::{MoveStatus, MoveType};
use chrono::NaiveDate;
use thiserror::Error;

/// Client-side rejection of a form. No backend call has been made.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("a bin must be selected")]
    MissingBin,

    #[error("bulk scheduling needs at least one bin")]
    NoBinsSelected,

    #[error("a scheduled date is required")]
    MissingScheduledDate,

    #[error("scheduled date {0} is not a valid timestamp")]
    InvalidScheduledDate(i64),

    #[error("scheduled date {date} is in the past")]
    ScheduledDateInPast { date: NaiveDate },

    #[error("a move type is required")]
    MissingMoveType,

    #[error("relocation requires a complete destination address (missing: {})", .missing.join(", "))]
    IncompleteDestination { missing: Vec<&'static str> },

    #[error("destination coordinates are out of range")]
    InvalidCoordinates,

    #[error("{0} moves require a disposal action")]
    MissingDisposalAction(MoveType),

    #[error("a user must be selected for a user assignment")]
    MissingUser,

    #[error("a shift must be selected")]
    MissingShift,

    #[error("inserting into an active shift requires choosing the stop to insert after")]
    MissingInsertAnchor,

    #[error("shift {shift_id} has no remaining stops to insert after")]
    NoRemainingStops { shift_id: String },

    #[error("bin {bin_id} is not a remaining stop on the selected shift")]
    UnknownInsertAnchor { bin_id: String },

    #[error("inserting into a future shift requires choosing start or end")]
    MissingInsertPosition,

    #[error("move requests can only be bulk-assigned to a shift")]
    ShiftRequired,

    #[error("no move requests selected")]
    NoMoveRequestsSelected,

    #[error("move request is {status} and can no longer be changed")]
    NotEditable { status: MoveStatus },

    #[error("a cancellation reason is required")]
    EmptyCancelReason,

    #[error("changing an active route must be explicitly acknowledged")]
    ActiveShiftNotAcknowledged,

    #[error("the chosen resolution does not match the pending conflict")]
    ResolutionMismatch,
}

/// Why a submission stopped. Route conflicts are not errors; they come back
/// as a pending operation.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Optimistic-lock failure: the request changed since it was loaded.
    #[error("move request was changed by someone else; reload and try again ({message})")]
    StaleUpdate { message: String },

    #[error("request failed: {0}")]
    Request(#[from] ClientError),

    /// Bulk creation stopped part-way; `created` were kept.
    #[error("created {} move request(s) before failing: {source}", .created.len())]
    Create {
        created: Vec<String>,
        #[source]
        source: ClientError,
    },
}
