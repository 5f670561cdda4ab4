//! Retry Logic with Exponential Backoff
//!
//! Governs the one-shot connection establishment against the volatile store at
//! process startup. Connection attempts are capped at a small fixed count with
//! exponentially growing delays; once the cap is reached the cache stays
//! disabled for the process lifetime.
//!
//! ## Exponential Backoff
//!
//! Delays between attempts grow exponentially to avoid hammering a store that
//! is coming up or is down:
//! - Attempt 1: No delay (immediate)
//! - Attempt 2: 200ms delay
//! - Attempt 3: 400ms delay (2x)
//! - Attempt 4: 800ms delay (2x)
//! - Capped at max_backoff_ms
//!
//! ## Configuration Example
//!
//! ```yaml
//! cache:
//!   connect:
//!     max_attempts: 3
//!     initial_backoff_ms: 200
//!     max_backoff_ms: 2000
//! ```

use std::time::Duration;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt)
    pub max_attempts: u32,
    /// Initial backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Maximum backoff delay in milliseconds (cap for exponential growth)
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 200,
            max_backoff_ms: 2000,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(max_attempts: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Calculate backoff delay for a given attempt number (0-indexed)
    ///
    /// # Arguments
    /// * `attempt` - The attempt number (0 = first attempt, 1 = first retry, etc.)
    ///
    /// # Returns
    /// Duration to wait before the next attempt (0 for first attempt)
    pub fn backoff_duration(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            // First attempt: no delay
            return Duration::from_millis(0);
        }

        // Exponential backoff: initial_backoff * 2^(attempt-1)
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2u64.saturating_pow(attempt - 1))
            .min(self.max_backoff_ms);

        Duration::from_millis(backoff_ms)
    }

    /// Check if another attempt is allowed after the given attempt number (0-indexed)
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }
}
