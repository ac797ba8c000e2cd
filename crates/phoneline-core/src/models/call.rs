//! Call record model
//!
//! A single completed call as seen by the billing contracts.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Seconds in a billing minute
pub const SECONDS_PER_MINUTE: u32 = 60;

/// Completed call
///
/// Only the duration and the timestamp matter for pricing; the numbers are
/// carried so the driver can route the call to the owning line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Call {
    /// Unique identifier
    pub id: Uuid,

    /// Caller number (the line that is billed)
    pub caller_number: String,

    /// Called number
    pub called_number: String,

    /// When the call started
    pub time: DateTime<Utc>,

    /// Call duration in seconds
    pub duration_seconds: u32,
}

impl Call {
    /// Create a call record for the given caller
    pub fn new(caller_number: impl Into<String>, time: DateTime<Utc>, duration_seconds: u32) -> Self {
        Self {
            caller_number: caller_number.into(),
            time,
            duration_seconds,
            ..Default::default()
        }
    }

    /// Minutes charged for this call
    ///
    /// Partial minutes always round up: 1 second is one minute, 60 seconds is
    /// one minute, 61 seconds is two.
    #[inline]
    pub fn billable_minutes(&self) -> u32 {
        self.duration_seconds.div_ceil(SECONDS_PER_MINUTE)
    }

    /// Calendar month (1-12) the call belongs to
    #[inline]
    pub fn month(&self) -> u32 {
        self.time.month()
    }

    /// Calendar year the call belongs to
    #[inline]
    pub fn year(&self) -> i32 {
        self.time.year()
    }
}

impl Default for Call {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            caller_number: String::new(),
            called_number: String::new(),
            time: Utc::now(),
            duration_seconds: 0,
        }
    }
}
