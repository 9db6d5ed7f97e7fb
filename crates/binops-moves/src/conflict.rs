//! Classification of backend rejection messages.
//!
//! The backend reports live-route conflicts only as prose, so every pattern
//! that reads that prose lives here.

use std::sync::LazyLock;

use binops_client::ClientError;
use regex::Regex;

static AT_LOCATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<driver>[^.,:;()\n]*?)\s*\bis currently at this location")
        .expect("valid at-location regex")
});

static STOP_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bstop\s+(?P<current>\d+)\s+of\s+(?P<total>\d+)\b").expect("valid stop regex")
});

static ACTIVE_ROUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)active (route|shift)").expect("valid active-route regex"));

/// A driver is servicing the bin right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InProgressConflict {
    pub driver_name: Option<String>,
    /// e.g. `"Stop 3 of 8"`.
    pub stop_label: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    InProgress(InProgressConflict),
    ActiveShift,
    Other,
}

/// Sorts a backend error message into one of the two recoverable conflict
/// kinds, or `Other`.
///
/// The in-progress check runs first: its messages often also mention the
/// active route.
#[must_use]
pub fn classify_error(message: &str) -> ErrorClass {
    let at_location = AT_LOCATION.captures(message);
    let stop = STOP_OF.captures(message);

    if at_location.is_some() || stop.is_some() {
        let driver_name = at_location
            .and_then(|c| c.name("driver"))
            .map(|m| clean_driver_name(m.as_str()))
            .filter(|name| !name.is_empty());
        let stop_label = stop.map(|c| format!("Stop {} of {}", &c["current"], &c["total"]));
        return ErrorClass::InProgress(InProgressConflict {
            driver_name,
            stop_label,
            message: message.to_owned(),
        });
    }

    if ACTIVE_ROUTE.is_match(message) {
        return ErrorClass::ActiveShift;
    }

    ErrorClass::Other
}

/// Classifies a client error. Only backend rejections carry a message worth
/// reading; transport failures are always `Other`.
#[must_use]
pub fn classify_client_error(err: &ClientError) -> ErrorClass {
    match err {
        ClientError::Api { message, .. } => classify_error(message),
        _ => ErrorClass::Other,
    }
}

/// `true` for an optimistic-lock rejection (HTTP 409 that is not a route
/// conflict).
#[must_use]
pub fn is_stale_update(err: &ClientError) -> bool {
    matches!(err, ClientError::Api { status: 409, .. })
        && classify_client_error(err) == ErrorClass::Other
}

fn clean_driver_name(raw: &str) -> String {
    // A spaced dash separates leading context; a hyphen inside a name does not.
    let tail = raw.rsplit(" - ").next().unwrap_or(raw);
    let tail = tail.rsplit(['\u{2013}', '\u{2014}']).next().unwrap_or(tail);
    let trimmed = tail.trim();
    let lower = trimmed.to_ascii_lowercase();
    let without_prefix = ["the driver ", "driver "]
        .iter()
        .find_map(|prefix| {
            lower
                .rfind(prefix)
                .map(|idx| &trimmed[idx + prefix.len()..])
        })
        .unwrap_or(trimmed);
    without_prefix.trim().to_owned()
}

#[cfg(test)]
#[path = "conflict_test.rs"]
mod tests;
