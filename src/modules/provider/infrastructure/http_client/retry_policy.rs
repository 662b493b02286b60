//! Retry policy for upstream lookups
//!
//! Only rate-limit responses are retried, after a fixed backoff. Every other
//! failure is reported once and left to the caller's fallback logic.

use std::time::Duration;

use crate::shared::config::FetchSettings;

/// Configuration for HTTP retry behavior
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Fixed wait after a 429 response before the next attempt
    pub backoff: Duration,
    /// Per-attempt deadline covering send and body read
    pub timeout: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration, timeout: Duration) -> Self {
        Self {
            max_retries,
            backoff,
            timeout,
        }
    }

    pub fn from_settings(settings: &FetchSettings) -> Self {
        Self::new(settings.max_retries, settings.backoff, settings.timeout)
    }

    /// Total attempts including the first one
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether a response status should be retried
    pub fn is_retryable_status(&self, status: u16) -> bool {
        status == 429
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&FetchSettings::default())
    }
}
