//! Submissions paused on a route conflict.
//!
//! A [`PendingOperation`] holds everything computed before the conflict so
//! the flow resumes at the call that was rejected instead of starting over.

use binops_client::{BulkAssignMoves, ConflictOverrides};
use binops_core::{InProgressAction, MoveRequest};

use crate::conflict::InProgressConflict;
use crate::error::ValidationError;
use crate::form::{AssignmentTarget, MoveFields};

/// The operator must decide how to handle a live route before the
/// submission can continue.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingOperation {
    /// A driver is servicing the bin right now.
    InProgress {
        conflict: InProgressConflict,
        resume: Resume,
    },
    /// The target shift is on the road.
    ActiveShift { message: String, resume: Resume },
}

/// The operator's answer to a [`PendingOperation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    InProgress(InProgressAction),
    /// `acknowledged` is the "I understand this modifies the active route"
    /// checkbox.
    ActiveShift { acknowledged: bool },
}

impl PendingOperation {
    /// The backend message that caused the pause.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InProgress { conflict, .. } => &conflict.message,
            Self::ActiveShift { message, .. } => message,
        }
    }

    /// Move requests the paused operation acts on.
    #[must_use]
    pub fn move_request_ids(&self) -> Vec<&str> {
        match &self.resume().kind {
            ResumeKind::Edit { plan, .. } => vec![plan.original.id.as_str()],
            ResumeKind::BulkAssign { payload } => {
                payload.move_request_ids.iter().map(String::as_str).collect()
            }
        }
    }

    #[must_use]
    pub fn resume(&self) -> &Resume {
        match self {
            Self::InProgress { resume, .. } | Self::ActiveShift { resume, .. } => resume,
        }
    }

    /// Overrides that `resolution` adds to the retried call.
    pub(crate) fn accept(
        &self,
        resolution: Resolution,
    ) -> Result<ConflictOverrides, ValidationError> {
        match (self, resolution) {
            (Self::InProgress { .. }, Resolution::InProgress(action)) => Ok(ConflictOverrides {
                in_progress_action: Some(action),
                confirm_active_shift_change: None,
            }),
            (Self::ActiveShift { .. }, Resolution::ActiveShift { acknowledged: true }) => {
                Ok(ConflictOverrides {
                    in_progress_action: None,
                    confirm_active_shift_change: Some(true),
                })
            }
            (Self::ActiveShift { .. }, Resolution::ActiveShift { acknowledged: false }) => {
                Err(ValidationError::ActiveShiftNotAcknowledged)
            }
            _ => Err(ValidationError::ResolutionMismatch),
        }
    }
}

/// Where a paused submission picks up, and the overrides already confirmed
/// for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resume {
    pub(crate) kind: ResumeKind,
    pub(crate) overrides: ConflictOverrides,
}

impl Resume {
    #[must_use]
    pub fn overrides(&self) -> ConflictOverrides {
        self.overrides
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResumeKind {
    Edit {
        plan: EditPlan,
        stage: EditStage,
        /// `client_updated_at` for the next update call.
        lock_token: i64,
    },
    BulkAssign {
        payload: BulkAssignMoves,
    },
}

/// An edit as decided at submit time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EditPlan {
    pub(crate) original: MoveRequest,
    pub(crate) fields: MoveFields,
    pub(crate) assignment: AssignmentTarget,
    pub(crate) assignment_changed: bool,
}

impl EditPlan {
    pub(crate) fn new(
        original: MoveRequest,
        fields: MoveFields,
        assignment: AssignmentTarget,
    ) -> Self {
        let assignment_changed = assignment.shift_id() != original.assigned_shift()
            || assignment.user_id() != original.assigned_user();
        Self {
            original,
            fields,
            assignment,
            assignment_changed,
        }
    }

    pub(crate) fn first_stage(&self) -> EditStage {
        if self.assignment_changed {
            EditStage::FieldsUpdate
        } else {
            EditStage::Combined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EditStage {
    /// Assignment unchanged: one update re-asserting it.
    Combined,
    /// Assignment changed: the standalone fields update, skipped when
    /// nothing but the assignment differs.
    FieldsUpdate,
    /// Assignment changed: assign-to-shift, assign-to-user or unassign.
    Assignment,
}
