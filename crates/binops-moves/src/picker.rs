//! Secondary choice when assigning into a shift: a coarse position for a
//! route that has not started, or an anchor stop for a live one.

use binops_client::ClientError;
use binops_core::{InsertPosition, Shift, ShiftDetails, Waypoint};

use crate::api::MoveRequestApi;
use crate::form::AssignmentChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftMode {
    /// Route not started; insert at the start or end.
    Future,
    /// Driver is on the route; insert after a remaining stop.
    Active,
}

impl ShiftMode {
    #[must_use]
    pub fn of(shift: &Shift) -> Self {
        if shift.is_active() {
            Self::Active
        } else {
            Self::Future
        }
    }
}

/// Where in a route a move request lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftInsertion {
    AfterBin(String),
    Position(InsertPosition),
}

impl ShiftInsertion {
    #[must_use]
    pub fn insert_after_bin_id(&self) -> Option<String> {
        match self {
            Self::AfterBin(bin_id) => Some(bin_id.clone()),
            Self::Position(_) => None,
        }
    }

    #[must_use]
    pub fn insert_position(&self) -> Option<InsertPosition> {
        match self {
            Self::AfterBin(_) => None,
            Self::Position(position) => Some(*position),
        }
    }
}

/// The choices available for one shift.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftPicker {
    shift_id: String,
    mode: ShiftMode,
    remaining: Vec<Waypoint>,
}

impl ShiftPicker {
    #[must_use]
    pub fn future(shift_id: impl Into<String>) -> Self {
        Self {
            shift_id: shift_id.into(),
            mode: ShiftMode::Future,
            remaining: Vec::new(),
        }
    }

    /// Builds an active-shift picker from the driver's current route,
    /// keeping only stops that are not completed.
    #[must_use]
    pub fn active(shift_id: impl Into<String>, details: &ShiftDetails) -> Self {
        Self {
            shift_id: shift_id.into(),
            mode: ShiftMode::Active,
            remaining: details.remaining(),
        }
    }

    #[must_use]
    pub fn shift_id(&self) -> &str {
        &self.shift_id
    }

    #[must_use]
    pub fn mode(&self) -> ShiftMode {
        self.mode
    }

    /// Stops that can serve as an insertion anchor. Always empty for a
    /// future shift.
    #[must_use]
    pub fn anchors(&self) -> &[Waypoint] {
        &self.remaining
    }

    /// `false` when an active shift has nothing left to insert after.
    #[must_use]
    pub fn can_insert(&self) -> bool {
        self.mode == ShiftMode::Future || !self.remaining.is_empty()
    }

    /// Turns the operator's secondary choice into an assignment. The value
    /// that does not apply to this shift's mode is ignored.
    #[must_use]
    pub fn choose(
        &self,
        insert_after_bin_id: Option<&str>,
        insert_position: Option<InsertPosition>,
    ) -> AssignmentChoice {
        match self.mode {
            ShiftMode::Active => AssignmentChoice::ActiveShift {
                shift_id: self.shift_id.clone(),
                remaining: self.remaining.clone(),
                insert_after_bin_id: insert_after_bin_id.map(str::to_owned),
            },
            ShiftMode::Future => AssignmentChoice::FutureShift {
                shift_id: self.shift_id.clone(),
                insert_position,
            },
        }
    }
}

/// Loads the picker for `shift`. Only an active shift needs a backend call,
/// to read the driver's current route.
///
/// # Errors
///
/// Returns the client error if the route lookup fails.
pub async fn load_picker<A: MoveRequestApi>(
    api: &A,
    shift: &Shift,
) -> Result<ShiftPicker, ClientError> {
    match ShiftMode::of(shift) {
        ShiftMode::Future => Ok(ShiftPicker::future(&shift.id)),
        ShiftMode::Active => {
            let details = api.get_shift_details_by_driver_id(&shift.driver_id).await?;
            let picker = ShiftPicker::active(&shift.id, &details);
            tracing::debug!(
                shift_id = %shift.id,
                remaining = picker.anchors().len(),
                "loaded active shift route"
            );
            Ok(picker)
        }
    }
}
