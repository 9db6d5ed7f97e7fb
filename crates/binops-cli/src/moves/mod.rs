//! Move-request command handlers: list, schedule, edit, cancel and assign.
//!
//! Route conflicts reported by the backend are answered from the
//! `--in-progress-action` and `--confirm-active-shift` flags. Without the
//! matching flag the command prints the conflict and fails.

mod confirm;
mod query;
mod submit;

use binops_core::{DisposalAction, InProgressAction, InsertPosition, MoveType};
use binops_moves::DatePreset;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};

pub(crate) use query::run_requests;
pub(crate) use submit::{run_assign, run_cancel, run_edit, run_schedule};

/// Quick date choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    Tomorrow,
    InThreeDays,
    InAWeek,
}

impl From<PresetArg> for DatePreset {
    fn from(preset: PresetArg) -> Self {
        match preset {
            PresetArg::Tomorrow => Self::Tomorrow,
            PresetArg::InThreeDays => Self::InThreeDays,
            PresetArg::InAWeek => Self::InAWeek,
        }
    }
}

/// Move fields. On `edit`, only the flags given are changed.
#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Scheduled day (YYYY-MM-DD)
    #[arg(long, conflicts_with = "preset")]
    pub date: Option<NaiveDate>,
    /// Schedule relative to now instead of giving a date
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,
    /// store, relocation or pickup_only
    #[arg(long = "type")]
    pub move_type: Option<MoveType>,
    /// retire or store
    #[arg(long)]
    pub disposal: Option<DisposalAction>,
    /// Relocation destination street
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub zip: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,
    #[arg(long)]
    pub reason: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

/// Where to assign. `--after-bin` applies to an active shift, `--position`
/// to one that has not started.
#[derive(Debug, Args)]
pub struct AssignmentArgs {
    /// Assign to a user instead of a shift
    #[arg(long, conflicts_with = "shift")]
    pub user: Option<String>,
    /// Insert into this shift's route
    #[arg(long)]
    pub shift: Option<String>,
    /// Remaining stop to insert after (active shift)
    #[arg(long, requires = "shift")]
    pub after_bin: Option<String>,
    /// start or end of the route (future shift)
    #[arg(long, requires = "shift")]
    pub position: Option<InsertPosition>,
}

/// Answers to route conflicts.
#[derive(Debug, Args)]
pub struct ConflictArgs {
    /// What to do when a driver is at the bin right now
    /// (remove_from_route, insert_after_current, reoptimize_route)
    #[arg(long)]
    pub in_progress_action: Option<InProgressAction>,
    /// Acknowledge that this modifies a driver's active route
    #[arg(long)]
    pub confirm_active_shift: bool,
}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    /// Bin to schedule; repeat for several bins
    #[arg(long = "bin", required = true)]
    pub bins: Vec<String>,
    #[command(flatten)]
    pub fields: FieldArgs,
    #[command(flatten)]
    pub assignment: AssignmentArgs,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Move request id
    pub id: String,
    #[command(flatten)]
    pub fields: FieldArgs,
    #[command(flatten)]
    pub assignment: AssignmentArgs,
    /// Remove the current assignment
    #[arg(long, conflicts_with_all = ["user", "shift"])]
    pub unassign: bool,
    #[command(flatten)]
    pub conflicts: ConflictArgs,
}

#[derive(Debug, Args)]
pub struct CancelArgs {
    /// Move request id
    pub id: String,
    #[arg(long)]
    pub reason: String,
}

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Move request ids
    #[arg(required = true)]
    pub ids: Vec<String>,
    #[arg(long)]
    pub shift: String,
    /// Remaining stop to insert after (active shift)
    #[arg(long)]
    pub after_bin: Option<String>,
    /// start or end of the route (future shift)
    #[arg(long)]
    pub position: Option<InsertPosition>,
    #[command(flatten)]
    pub conflicts: ConflictArgs,
}

/// Format a scheduled day, or a dash when the timestamp was out of range.
fn fmt_day(day: Option<chrono::DateTime<chrono::Utc>>) -> String {
    day.map_or_else(
        || "\u{2014}".to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    )
}
