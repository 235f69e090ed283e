//! # Shared Entities
//!
//! Identifiers and time values passed between subsystems.

use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operator identifier. Unique and case-sensitive across the credential store.
pub type Handle = String;

/// Server-side timestamp (`last_used`, `created_at`).
pub type Timestamp = DateTime<Utc>;

/// Layout of a date-time group: `YYYY-MM-DD HH:MM`.
pub const DATETIME_GROUP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Date-time group of a report, carried as opaque text.
///
/// Values produced by [`DatetimeGroup::at_offset`] follow
/// [`DATETIME_GROUP_FORMAT`]. Values supplied by an operator are stored as
/// given; no calendar validation is performed.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatetimeGroup(String);

impl DatetimeGroup {
    /// Wrap operator-supplied text.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Format `instant` in the civil zone `utc_offset_minutes` east of UTC.
    ///
    /// Offsets outside ±24h fall back to UTC.
    pub fn at_offset(instant: Timestamp, utc_offset_minutes: i32) -> Self {
        let offset = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix());
        Self(
            instant
                .with_timezone(&offset)
                .format(DATETIME_GROUP_FORMAT)
                .to_string(),
        )
    }

    /// Current wall-clock time in the given civil zone.
    pub fn now(utc_offset_minutes: i32) -> Self {
        Self::at_offset(Utc::now(), utc_offset_minutes)
    }

    /// Borrow the raw text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the value is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DatetimeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatetimeGroup {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DatetimeGroup {
    fn from(value: String) -> Self {
        Self(value)
    }
}
