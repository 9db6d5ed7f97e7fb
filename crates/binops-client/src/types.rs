//! Request payloads sent to the backend.
//!
//! Response shapes live in `binops-core`; only the write side is modelled
//! here. Every optional field is omitted from the JSON when unset. In
//! [`MoveRequestUpdate`] the destination, disposal and assignment fields are
//! tri-state: omitted means "leave as is" and `null` means "clear".

use binops_core::{DisposalAction, InProgressAction, InsertPosition, MoveRequest, MoveType};
use serde::Serialize;

/// Operator overrides sent on a retry after a conflict was confirmed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConflictOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress_action: Option<InProgressAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirm_active_shift_change: Option<bool>,
}

impl ConflictOverrides {
    /// Combines two sets of overrides; values in `other` win.
    #[must_use]
    pub fn merged(self, other: ConflictOverrides) -> ConflictOverrides {
        ConflictOverrides {
            in_progress_action: other.in_progress_action.or(self.in_progress_action),
            confirm_active_shift_change: other
                .confirm_active_shift_change
                .or(self.confirm_active_shift_change),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateMoveRequest {
    pub bin_id: String,
    pub scheduled_date: i64,
    pub move_type: MoveType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_zip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposal_action: Option<DisposalAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update of a move request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoveRequestUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_type: Option<MoveType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_street: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_city: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_zip: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_latitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_longitude: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposal_action: Option<Option<DisposalAction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_shift_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment_type: Option<Option<String>>,
    /// Optimistic-lock precondition: the `updated_at` the caller last saw.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_updated_at: Option<i64>,
    #[serde(flatten)]
    pub overrides: ConflictOverrides,
}

impl MoveRequestUpdate {
    /// Re-sends the request's current assignment so the backend does not read
    /// omitted fields as "clear".
    #[must_use]
    pub fn reasserting_assignment_of(mut self, original: &MoveRequest) -> Self {
        self.assigned_user_id = Some(original.assigned_user_id.clone());
        self.assigned_shift_id = Some(original.assigned_shift_id.clone());
        self.assignment_type = Some(original.assignment_type.clone());
        self
    }

    /// Explicitly clears all three assignment fields.
    #[must_use]
    pub fn clearing_assignment(mut self) -> Self {
        self.assigned_user_id = Some(None);
        self.assigned_shift_id = Some(None);
        self.assignment_type = Some(None);
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: ConflictOverrides) -> Self {
        self.overrides = self.overrides.merged(overrides);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignToUser {
    pub move_request_id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub overrides: ConflictOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignToShift {
    pub move_request_id: String,
    pub shift_id: String,
    /// Anchor stop; required when the shift is active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_after_bin_id: Option<String>,
    /// Coarse position; used when the shift has not started.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_position: Option<InsertPosition>,
    #[serde(flatten)]
    pub overrides: ConflictOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkAssignMoves {
    pub move_request_ids: Vec<String>,
    pub shift_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_after_bin_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_position: Option<InsertPosition>,
    #[serde(flatten)]
    pub overrides: ConflictOverrides,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelMoveRequest {
    pub reason: String,
}
