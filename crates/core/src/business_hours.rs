//! Business hours window used to pick the chatbot greeting.
//!
//! The window is a weekday range (Monday-Friday) and an hour range
//! `[start_hour, end_hour)` evaluated in the office's local timezone.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::CoreError;

/// Default opening hour (8 AM local time).
pub const DEFAULT_START_HOUR: u32 = 8;

/// Default closing hour (5 PM local time, exclusive).
pub const DEFAULT_END_HOUR: u32 = 17;

/// Default office timezone.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// Greeting shown when the office is open.
pub const GREETING_OPEN: &str =
    "Hi! I'm MH Construction's AI assistant. How can I help with your construction project?";

/// Greeting shown outside business hours.
pub const GREETING_CLOSED: &str = "Hi! I'm MH Construction's AI assistant. Our team is currently offline, but I'm here 24/7 to help with your construction questions!";

/// Follow-up appended after [`GREETING_CLOSED`].
pub const GREETING_CLOSED_FOLLOW_UP: &str = "I can provide project information, cost estimates, and schedule a consultation for you. What type of construction project are you planning?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
    pub timezone: Tz,
}

impl BusinessHours {
    /// Build a window, rejecting hours outside `0..=24` or an empty range.
    pub fn new(start_hour: u32, end_hour: u32, timezone: Tz) -> Result<Self, CoreError> {
        if end_hour > 24 || start_hour >= end_hour {
            return Err(CoreError::Validation(format!(
                "Invalid business hours window {start_hour}..{end_hour}"
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
            timezone,
        })
    }

    /// Parse an IANA timezone name such as `America/Los_Angeles`.
    pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
        name.parse::<Tz>()
            .map_err(|_| CoreError::Validation(format!("Unknown timezone '{name}'")))
    }

    /// Whether the office is open at the given instant.
    pub fn is_open_at(&self, at: DateTime<Utc>) -> bool {
        let local = at.with_timezone(&self.timezone);
        let weekday = !matches!(local.weekday(), Weekday::Sat | Weekday::Sun);
        let hour = local.hour();
        weekday && hour >= self.start_hour && hour < self.end_hour
    }

    /// Greeting messages for a session started at `at`, in display order.
    pub fn greeting_at(&self, at: DateTime<Utc>) -> &'static [&'static str] {
        if self.is_open_at(at) {
            &[GREETING_OPEN]
        } else {
            &[GREETING_CLOSED, GREETING_CLOSED_FOLLOW_UP]
        }
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
