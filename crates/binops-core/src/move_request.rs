//! Move requests: instructions to store, relocate or pick up a bin.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happens to the bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveType {
    Store,
    Relocation,
    PickupOnly,
}

impl MoveType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Relocation => "relocation",
            Self::PickupOnly => "pickup_only",
        }
    }
}

impl FromStr for MoveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "store" => Ok(Self::Store),
            "relocation" => Ok(Self::Relocation),
            "pickup_only" => Ok(Self::PickupOnly),
            other => Err(format!(
                "unknown move type \"{other}\" (expected store, relocation or pickup_only)"
            )),
        }
    }
}

impl std::fmt::Display for MoveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fate of a picked-up bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisposalAction {
    Retire,
    Store,
}

impl DisposalAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retire => "retire",
            Self::Store => "store",
        }
    }
}

impl FromStr for DisposalAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retire" => Ok(Self::Retire),
            "store" => Ok(Self::Store),
            other => Err(format!(
                "unknown disposal action \"{other}\" (expected retire or store)"
            )),
        }
    }
}

/// Backend-owned lifecycle state.
///
/// `InProgress` means a driver is executing the move right now. Unrecognised
/// states deserialize as `Unknown` rather than failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl MoveStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }

    /// `true` once the request can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown move status \"{other}\"")),
        }
    }
}

/// How the operator wants a bin handled when its driver is already at the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InProgressAction {
    /// Drop the bin from the driver's live route immediately.
    RemoveFromRoute,
    /// Keep it queued right after the driver finishes the current stop.
    InsertAfterCurrent,
    /// Let the backend re-sequence the driver's remaining stops.
    ReoptimizeRoute,
}

impl InProgressAction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RemoveFromRoute => "remove_from_route",
            Self::InsertAfterCurrent => "insert_after_current",
            Self::ReoptimizeRoute => "reoptimize_route",
        }
    }
}

impl FromStr for InProgressAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "remove_from_route" => Ok(Self::RemoveFromRoute),
            "insert_after_current" => Ok(Self::InsertAfterCurrent),
            "reoptimize_route" => Ok(Self::ReoptimizeRoute),
            other => Err(format!(
                "unknown in-progress action \"{other}\" (expected remove_from_route, \
                 insert_after_current or reoptimize_route)"
            )),
        }
    }
}

/// Coarse insertion point in a route that has not started yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    Start,
    End,
}

impl InsertPosition {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl FromStr for InsertPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            other => Err(format!(
                "unknown insert position \"{other}\" (expected start or end)"
            )),
        }
    }
}

/// Destination address of a relocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub street: String,
    pub city: String,
    pub zip: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A pending or historical instruction to move, retire or relocate a bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub id: String,
    pub bin_id: String,
    #[serde(default)]
    pub bin_number: Option<i64>,
    #[serde(default)]
    pub bin_street: Option<String>,
    #[serde(default)]
    pub bin_fill_percentage: Option<f64>,
    /// Unix timestamp, seconds.
    pub scheduled_date: i64,
    pub move_type: MoveType,
    #[serde(default)]
    pub new_street: Option<String>,
    #[serde(default)]
    pub new_city: Option<String>,
    #[serde(default)]
    pub new_zip: Option<String>,
    #[serde(default)]
    pub new_latitude: Option<f64>,
    #[serde(default)]
    pub new_longitude: Option<f64>,
    #[serde(default)]
    pub disposal_action: Option<DisposalAction>,
    #[serde(default)]
    pub assigned_user_id: Option<String>,
    #[serde(default)]
    pub assigned_shift_id: Option<String>,
    #[serde(default)]
    pub assignment_type: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: MoveStatus,
    /// Optimistic-lock token echoed back as `client_updated_at`.
    pub updated_at: i64,
}

impl MoveRequest {
    /// The shift this request is queued into, if any. Empty ids count as unset.
    #[must_use]
    pub fn assigned_shift(&self) -> Option<&str> {
        self.assigned_shift_id.as_deref().filter(|s| !s.is_empty())
    }

    /// The user this request is manually assigned to, if any.
    #[must_use]
    pub fn assigned_user(&self) -> Option<&str> {
        self.assigned_user_id.as_deref().filter(|s| !s.is_empty())
    }

    /// The relocation destination, when a complete address is on record.
    #[must_use]
    pub fn destination(&self) -> Option<Destination> {
        match (&self.new_street, &self.new_city, &self.new_zip) {
            (Some(street), Some(city), Some(zip)) => Some(Destination {
                street: street.clone(),
                city: city.clone(),
                zip: zip.clone(),
                latitude: self.new_latitude,
                longitude: self.new_longitude,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn scheduled_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.scheduled_date, 0)
    }
}
