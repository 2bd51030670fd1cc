use chrono::{DateTime, Utc};
use serde::Serialize;

/// Per-key counter for the current fixed window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitEntry {
    pub count: u32,
    pub window_end: DateTime<Utc>,
}

impl RateLimitEntry {
    pub fn open(window_end: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            window_end,
        }
    }

    /// A window is still live at exactly `window_end`; it expires strictly after.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.window_end < now
    }
}

/// Outcome of a rate-limit check, surfaced to clients as response metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_time: DateTime<Utc>,
}
