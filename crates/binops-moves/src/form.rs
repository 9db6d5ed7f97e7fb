//! The move-request form: what the operator is editing, the fields they
//! filled in, and where the request should be assigned.
//!
//! Each entry mode and assignment mode is a variant carrying exactly the
//! data it needs; [`MoveForm::validate`] checks the per-variant requirements
//! and produces a [`ValidatedForm`] the editor can submit.

use binops_client::{CreateMoveRequest, MoveRequestUpdate};
use binops_core::{Destination, DisposalAction, InsertPosition, MoveRequest, MoveType, Waypoint};
use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::picker::ShiftInsertion;

/// A bin the request is created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinTarget {
    pub bin_id: String,
    pub bin_number: Option<i64>,
}

impl BinTarget {
    #[must_use]
    pub fn new(bin_id: impl Into<String>) -> Self {
        Self {
            bin_id: bin_id.into(),
            bin_number: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryMode {
    /// Opened from a single bin.
    CreateSingle { bin: BinTarget },
    /// Scheduling the same move for several bins at once.
    CreateBulk { bins: Vec<BinTarget> },
    /// Opened without a bin; the operator picks one in the form.
    CreateStandalone { bin: Option<BinTarget> },
    Edit { original: MoveRequest },
}

/// Quick date choices. They only fill in `scheduled_date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePreset {
    Tomorrow,
    InThreeDays,
    InAWeek,
}

impl DatePreset {
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Tomorrow => 1,
            Self::InThreeDays => 3,
            Self::InAWeek => 7,
        }
    }

    /// Unix timestamp `days()` after `now`.
    #[must_use]
    pub fn from_now(self, now: DateTime<Utc>) -> i64 {
        (now + Duration::days(self.days())).timestamp()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DestinationDraft {
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Raw, possibly incomplete field values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveDraft {
    pub scheduled_date: Option<i64>,
    pub move_type: Option<MoveType>,
    pub destination: DestinationDraft,
    pub disposal_action: Option<DisposalAction>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl MoveDraft {
    /// Prefills the draft from an existing request.
    #[must_use]
    pub fn from_existing(original: &MoveRequest) -> Self {
        Self {
            scheduled_date: Some(original.scheduled_date),
            move_type: Some(original.move_type),
            destination: DestinationDraft {
                street: original.new_street.clone(),
                city: original.new_city.clone(),
                zip: original.new_zip.clone(),
                latitude: original.new_latitude,
                longitude: original.new_longitude,
            },
            disposal_action: original.disposal_action,
            reason: original.reason.clone(),
            notes: original.notes.clone(),
        }
    }

    pub fn apply_preset(&mut self, preset: DatePreset, now: DateTime<Utc>) {
        self.scheduled_date = Some(preset.from_now(now));
    }

    /// Checks the fields required by the chosen move type.
    ///
    /// `unchanged_date` is the date already on record when editing; keeping
    /// it is allowed even if it has passed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(
        &self,
        today: NaiveDate,
        unchanged_date: Option<i64>,
    ) -> Result<MoveFields, ValidationError> {
        let scheduled_date = self
            .scheduled_date
            .ok_or(ValidationError::MissingScheduledDate)?;
        if unchanged_date != Some(scheduled_date) {
            let date = DateTime::from_timestamp(scheduled_date, 0)
                .ok_or(ValidationError::InvalidScheduledDate(scheduled_date))?
                .date_naive();
            if date < today {
                return Err(ValidationError::ScheduledDateInPast { date });
            }
        }

        let move_type = self.move_type.ok_or(ValidationError::MissingMoveType)?;
        let details = match move_type {
            MoveType::Relocation => MoveDetails::Relocation(self.validate_destination()?),
            MoveType::Store => MoveDetails::Store {
                disposal_action: self
                    .disposal_action
                    .ok_or(ValidationError::MissingDisposalAction(move_type))?,
            },
            MoveType::PickupOnly => MoveDetails::PickupOnly {
                disposal_action: self
                    .disposal_action
                    .ok_or(ValidationError::MissingDisposalAction(move_type))?,
            },
        };

        Ok(MoveFields {
            scheduled_date,
            details,
            reason: non_blank(self.reason.as_deref()),
            notes: non_blank(self.notes.as_deref()),
        })
    }

    fn validate_destination(&self) -> Result<Destination, ValidationError> {
        let d = &self.destination;
        let street = non_blank(d.street.as_deref());
        let city = non_blank(d.city.as_deref());
        let zip = non_blank(d.zip.as_deref());

        let mut missing = Vec::new();
        if street.is_none() {
            missing.push("street");
        }
        if city.is_none() {
            missing.push("city");
        }
        if zip.is_none() {
            missing.push("zip");
        }
        let (Some(street), Some(city), Some(zip)) = (street, city, zip) else {
            return Err(ValidationError::IncompleteDestination { missing });
        };

        let lat_ok = d.latitude.is_none_or(|lat| (-90.0..=90.0).contains(&lat));
        let lng_ok = d.longitude.is_none_or(|lng| (-180.0..=180.0).contains(&lng));
        if !lat_ok || !lng_ok {
            return Err(ValidationError::InvalidCoordinates);
        }

        Ok(Destination {
            street,
            city,
            zip,
            latitude: d.latitude,
            longitude: d.longitude,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Type-specific part of a validated move.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveDetails {
    Store { disposal_action: DisposalAction },
    Relocation(Destination),
    PickupOnly { disposal_action: DisposalAction },
}

impl MoveDetails {
    #[must_use]
    pub fn move_type(&self) -> MoveType {
        match self {
            Self::Store { .. } => MoveType::Store,
            Self::Relocation(_) => MoveType::Relocation,
            Self::PickupOnly { .. } => MoveType::PickupOnly,
        }
    }

    #[must_use]
    pub fn destination(&self) -> Option<&Destination> {
        match self {
            Self::Relocation(destination) => Some(destination),
            Self::Store { .. } | Self::PickupOnly { .. } => None,
        }
    }

    #[must_use]
    pub fn disposal_action(&self) -> Option<DisposalAction> {
        match self {
            Self::Store { disposal_action } | Self::PickupOnly { disposal_action } => {
                Some(*disposal_action)
            }
            Self::Relocation(_) => None,
        }
    }
}

/// The non-assignment fields of a move request, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveFields {
    pub scheduled_date: i64,
    pub details: MoveDetails,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl MoveFields {
    #[must_use]
    pub fn create_payload(&self, bin_id: &str) -> CreateMoveRequest {
        let destination = self.details.destination();
        CreateMoveRequest {
            bin_id: bin_id.to_owned(),
            scheduled_date: self.scheduled_date,
            move_type: self.details.move_type(),
            new_street: destination.map(|d| d.street.clone()),
            new_city: destination.map(|d| d.city.clone()),
            new_zip: destination.map(|d| d.zip.clone()),
            new_latitude: destination.and_then(|d| d.latitude),
            new_longitude: destination.and_then(|d| d.longitude),
            disposal_action: self.details.disposal_action(),
            reason: self.reason.clone(),
            notes: self.notes.clone(),
        }
    }

    /// The full non-assignment field set plus the lock token. Blank reason
    /// and notes are sent as empty strings so a cleared value is cleared.
    /// Destination and disposal fields that do not apply to the move type
    /// are sent as `null`, so switching types drops the old values.
    #[must_use]
    pub fn update_payload(&self, client_updated_at: i64) -> MoveRequestUpdate {
        let destination = self.details.destination();
        MoveRequestUpdate {
            scheduled_date: Some(self.scheduled_date),
            move_type: Some(self.details.move_type()),
            new_street: Some(destination.map(|d| d.street.clone())),
            new_city: Some(destination.map(|d| d.city.clone())),
            new_zip: Some(destination.map(|d| d.zip.clone())),
            new_latitude: Some(destination.and_then(|d| d.latitude)),
            new_longitude: Some(destination.and_then(|d| d.longitude)),
            disposal_action: Some(self.details.disposal_action()),
            reason: Some(self.reason.clone().unwrap_or_default()),
            notes: Some(self.notes.clone().unwrap_or_default()),
            client_updated_at: Some(client_updated_at),
            ..MoveRequestUpdate::default()
        }
    }

    /// `true` when any field differs from what is on record.
    #[must_use]
    pub fn differs_from(&self, original: &MoveRequest) -> bool {
        let same_details = match &self.details {
            MoveDetails::Relocation(d) => {
                original.move_type == MoveType::Relocation
                    && original.destination().as_ref() == Some(d)
            }
            MoveDetails::Store { disposal_action } | MoveDetails::PickupOnly { disposal_action } => {
                original.move_type == self.details.move_type()
                    && original.disposal_action == Some(*disposal_action)
            }
        };
        !(same_details
            && original.scheduled_date == self.scheduled_date
            && non_blank(original.reason.as_deref()) == self.reason
            && non_blank(original.notes.as_deref()) == self.notes)
    }
}

/// Where the operator wants the request to go.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentChoice {
    Unassigned,
    /// One-off manual assignment.
    User { user_id: String },
    /// Insert into a route that is executing; needs an anchor among the
    /// driver's remaining stops.
    ActiveShift {
        shift_id: String,
        remaining: Vec<Waypoint>,
        insert_after_bin_id: Option<String>,
    },
    /// Insert into a route that has not started.
    FutureShift {
        shift_id: String,
        insert_position: Option<InsertPosition>,
    },
}

impl AssignmentChoice {
    /// The choice matching a request's current assignment, used to prefill
    /// an edit.
    #[must_use]
    pub fn current(original: &MoveRequest) -> Self {
        if let Some(shift_id) = original.assigned_shift() {
            Self::FutureShift {
                shift_id: shift_id.to_owned(),
                insert_position: None,
            }
        } else if let Some(user_id) = original.assigned_user() {
            Self::User {
                user_id: user_id.to_owned(),
            }
        } else {
            Self::Unassigned
        }
    }

    /// Validates the choice. Re-selecting `current_shift` (the shift the
    /// request is already in) needs no insertion point.
    ///
    /// # Errors
    ///
    /// Returns the [`ValidationError`] for a missing user, shift, anchor or
    /// position, or for an active shift with no stops left.
    pub fn validate(
        &self,
        current_shift: Option<&str>,
    ) -> Result<AssignmentTarget, ValidationError> {
        match self {
            Self::Unassigned => Ok(AssignmentTarget::Unassigned),
            Self::User { user_id } => {
                let user_id =
                    non_blank(Some(user_id.as_str())).ok_or(ValidationError::MissingUser)?;
                Ok(AssignmentTarget::User(user_id))
            }
            Self::ActiveShift {
                shift_id,
                remaining,
                insert_after_bin_id,
            } => {
                let shift_id =
                    non_blank(Some(shift_id.as_str())).ok_or(ValidationError::MissingShift)?;
                if current_shift == Some(shift_id.as_str()) {
                    return Ok(AssignmentTarget::Shift {
                        shift_id,
                        insertion: None,
                    });
                }
                // Completed stops cannot anchor an insertion.
                let mut open_stops = remaining.iter().filter(|w| !w.is_completed()).peekable();
                if open_stops.peek().is_none() {
                    return Err(ValidationError::NoRemainingStops { shift_id });
                }
                let anchor = insert_after_bin_id
                    .as_deref()
                    .ok_or(ValidationError::MissingInsertAnchor)?;
                if !open_stops.any(|w| w.bin_id == anchor) {
                    return Err(ValidationError::UnknownInsertAnchor {
                        bin_id: anchor.to_owned(),
                    });
                }
                Ok(AssignmentTarget::Shift {
                    shift_id,
                    insertion: Some(ShiftInsertion::AfterBin(anchor.to_owned())),
                })
            }
            Self::FutureShift {
                shift_id,
                insert_position,
            } => {
                let shift_id =
                    non_blank(Some(shift_id.as_str())).ok_or(ValidationError::MissingShift)?;
                if current_shift == Some(shift_id.as_str()) {
                    return Ok(AssignmentTarget::Shift {
                        shift_id,
                        insertion: None,
                    });
                }
                let position = insert_position.ok_or(ValidationError::MissingInsertPosition)?;
                Ok(AssignmentTarget::Shift {
                    shift_id,
                    insertion: Some(ShiftInsertion::Position(position)),
                })
            }
        }
    }
}

/// A validated assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTarget {
    Unassigned,
    User(String),
    /// `insertion` is `None` only when the request already sits in this shift.
    Shift {
        shift_id: String,
        insertion: Option<ShiftInsertion>,
    },
}

impl AssignmentTarget {
    #[must_use]
    pub fn shift_id(&self) -> Option<&str> {
        match self {
            Self::Shift { shift_id, .. } => Some(shift_id),
            Self::Unassigned | Self::User(_) => None,
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::User(user_id) => Some(user_id),
            Self::Unassigned | Self::Shift { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoveForm {
    pub mode: EntryMode,
    pub draft: MoveDraft,
    pub assignment: AssignmentChoice,
}

impl MoveForm {
    /// A blank form for creating requests.
    #[must_use]
    pub fn create(mode: EntryMode) -> Self {
        Self {
            mode,
            draft: MoveDraft::default(),
            assignment: AssignmentChoice::Unassigned,
        }
    }

    /// A form prefilled from an existing request.
    #[must_use]
    pub fn edit(original: MoveRequest) -> Self {
        Self {
            draft: MoveDraft::from_existing(&original),
            assignment: AssignmentChoice::current(&original),
            mode: EntryMode::Edit { original },
        }
    }

    /// Validates entry mode, fields and assignment, in that order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidatedForm, ValidationError> {
        let (targets, unchanged_date, current_shift) = match &self.mode {
            EntryMode::CreateSingle { bin } => {
                if bin.bin_id.trim().is_empty() {
                    return Err(ValidationError::MissingBin);
                }
                (SubmitTargets::Create(vec![bin.clone()]), None, None)
            }
            EntryMode::CreateStandalone { bin } => {
                let bin = bin
                    .as_ref()
                    .filter(|b| !b.bin_id.trim().is_empty())
                    .ok_or(ValidationError::MissingBin)?;
                (SubmitTargets::Create(vec![bin.clone()]), None, None)
            }
            EntryMode::CreateBulk { bins } => {
                let bins: Vec<BinTarget> = bins
                    .iter()
                    .filter(|b| !b.bin_id.trim().is_empty())
                    .cloned()
                    .collect();
                if bins.is_empty() {
                    return Err(ValidationError::NoBinsSelected);
                }
                (SubmitTargets::Create(bins), None, None)
            }
            EntryMode::Edit { original } => {
                if original.status.is_terminal() {
                    return Err(ValidationError::NotEditable {
                        status: original.status,
                    });
                }
                (
                    SubmitTargets::Edit(original.clone()),
                    Some(original.scheduled_date),
                    original.assigned_shift(),
                )
            }
        };

        let fields = self.draft.validate(today, unchanged_date)?;
        let assignment = self.assignment.validate(current_shift)?;

        Ok(ValidatedForm {
            targets,
            fields,
            assignment,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitTargets {
    /// Bins to create one request for each, in the order supplied.
    Create(Vec<BinTarget>),
    Edit(MoveRequest),
}

/// A form that passed validation and can be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    pub targets: SubmitTargets,
    pub fields: MoveFields,
    pub assignment: AssignmentTarget,
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
