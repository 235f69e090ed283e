//! # Time Sources
//!
//! Abstract clock so services stamp `last_used` and default date-time groups
//! deterministically under test.

use crate::entities::Timestamp;
use chrono::Utc;

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;
}

/// Default time source using system time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Time source frozen at one instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedTimeSource(pub Timestamp);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.0
    }
}
