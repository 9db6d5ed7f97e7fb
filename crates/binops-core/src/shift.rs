//! Driver shifts and their ordered route waypoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Planned for the future; the route has not started.
    Scheduled,
    /// The driver is on the route right now.
    Active,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl ShiftStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

/// A driver's planned or active route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: String,
    pub driver_id: String,
    #[serde(default)]
    pub driver_name: Option<String>,
    pub date: String,
    #[serde(default)]
    pub start_time: Option<String>,
    pub status: ShiftStatus,
    #[serde(default)]
    pub bin_count: i64,
    #[serde(default)]
    pub bins_collected: i64,
}

impl Shift {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ShiftStatus::Active
    }

    /// Driver name for display, falling back to the driver id.
    #[must_use]
    pub fn driver_label(&self) -> &str {
        self.driver_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.driver_id)
    }
}

/// One stop on a shift's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub bin_id: String,
    #[serde(default)]
    pub bin_number: Option<i64>,
    #[serde(default)]
    pub current_street: Option<String>,
    pub sequence_order: i32,
    /// `0` or `1` on the wire.
    #[serde(default)]
    pub is_completed: i64,
}

impl Waypoint {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.is_completed != 0
    }
}

/// Response of the shift-details-by-driver lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftDetails {
    #[serde(default)]
    pub bins: Vec<Waypoint>,
}

impl ShiftDetails {
    /// Waypoints the driver has not completed yet, in route order.
    #[must_use]
    pub fn remaining(&self) -> Vec<Waypoint> {
        let mut remaining: Vec<Waypoint> = self
            .bins
            .iter()
            .filter(|w| !w.is_completed())
            .cloned()
            .collect();
        remaining.sort_by_key(|w| w.sequence_order);
        remaining
    }
}
