/**
 * Retry Policy and Outcome Classification
 *
 * Each provider call ends in an `Outcome`. Only `FailureKind::Transient`
 * (quota or rate limiting on the provider side) is retried; empty output
 * and every other provider error end the operation immediately.
 *
 * The delay before retry `n` is `initial_delay * multiplier^(n-1)`, capped
 * at `max_delay`. The client stops once `max_attempts` calls were made or
 * the next sleep would cross `deadline`.
 */

use std::time::Duration;

use crate::backend::generation::provider::ProviderError;

/// Substrings (lowercase) that mark a provider error as quota/rate limiting
const TRANSIENT_MARKERS: &[&str] = &[
    "quota",
    "rate limit",
    "rate-limit",
    "ratelimit",
    "resource_exhausted",
    "resource exhausted",
    "too many requests",
];

/// Spacing and bounds for retrying transient provider failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
    /// Factor applied to the delay after each failed attempt
    pub multiplier: f64,
    /// Wall-clock budget for the whole operation
    pub deadline: Duration,
    /// Total number of provider calls allowed
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            multiplier: 2.0,
            deadline: Duration::from_secs(60),
            max_attempts: 3,
        }
    }
}

impl RetryPolicy {
    /// Delay slept before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let scaled = self.initial_delay.as_nanos() as f64 * self.multiplier.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_delay.as_nanos() as f64 {
            return self.max_delay;
        }
        Duration::from_nanos(scaled.max(0.0).round() as u64)
    }

    /// Whether another attempt may follow attempt number `attempt`
    ///
    /// `elapsed` is the time spent on the operation so far.
    pub fn allows_retry(&self, attempt: u32, elapsed: Duration) -> bool {
        attempt < self.max_attempts && elapsed + self.delay_for(attempt) <= self.deadline
    }
}

/// Why a provider call did not produce usable text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The provider answered but the text was blank
    Empty,
    /// Quota or rate limiting; worth retrying
    Transient(String),
    /// Anything else
    Fatal(String),
}

impl FailureKind {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::Transient(_))
    }
}

/// Classified result of one provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure(FailureKind),
}

/// Whether a provider error signals quota exhaustion or rate limiting
pub fn is_transient(error: &ProviderError) -> bool {
    if error.status == Some(429) {
        return true;
    }
    let message = error.message.to_lowercase();
    TRANSIENT_MARKERS.iter().any(|marker| message.contains(marker))
}

/// Classify the result of a provider call
///
/// Successful text is passed through unmodified.
pub fn classify(result: Result<String, ProviderError>) -> Outcome {
    match result {
        Ok(text) if text.trim().is_empty() => Outcome::Failure(FailureKind::Empty),
        Ok(text) => Outcome::Success(text),
        Err(error) if is_transient(&error) => {
            Outcome::Failure(FailureKind::Transient(error.to_string()))
        }
        Err(error) => Outcome::Failure(FailureKind::Fatal(error.to_string())),
    }
}
