//! Fixed-budget retry driver.
//!
//! The policy is fixed: up to [`MAX_ATTEMPTS`]
//! attempts with a constant [`RETRY_DELAY`] before each retry. Sleeping goes
//! through the [`Sleeper`] trait so tests can observe the delays without
//! waiting for them.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{HttpClientError, Result};

/// Maximum number of attempts, including the first one.
pub const MAX_ATTEMPTS: u32 = 10;

/// Delay before each retry. No delay precedes the first attempt.
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Suspends the driver between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Phase of a retry run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPhase {
    /// No attempt has completed yet.
    Pending,
    /// At least one attempt failed and budget remains.
    Retrying,
    /// An attempt succeeded.
    Succeeded,
    /// The final attempt failed.
    Exhausted,
}

/// Bookkeeping for a single retry run.
#[derive(Debug)]
pub struct RetryState {
    attempts_remaining: u32,
    last_error: Option<HttpClientError>,
    phase: RetryPhase,
}

impl RetryState {
    /// Start a run with the full attempt budget.
    pub fn new() -> Self {
        Self {
            attempts_remaining: MAX_ATTEMPTS,
            last_error: None,
            phase: RetryPhase::Pending,
        }
    }

    /// Attempts left, counting the one about to run.
    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    /// One-based number of the current attempt.
    pub fn attempt_number(&self) -> u32 {
        MAX_ATTEMPTS - self.attempts_remaining + 1
    }

    /// Current phase.
    pub fn phase(&self) -> RetryPhase {
        self.phase
    }

    /// Error from the most recent failed attempt.
    pub fn last_error(&self) -> Option<&HttpClientError> {
        self.last_error.as_ref()
    }

    /// Record a successful attempt.
    pub fn record_success(&mut self) {
        self.phase = RetryPhase::Succeeded;
    }

    /// Record a failed attempt and return the resulting phase.
    ///
    /// The budget shrinks by one unless this was the final attempt, in which
    /// case the run becomes exhausted.
    pub fn record_failure(&mut self, error: HttpClientError) -> RetryPhase {
        if let Some(error) = self.fail(error) {
            self.last_error = Some(error);
        }
        self.phase
    }

    /// Record a failed attempt, handing the error back once the run is
    /// exhausted.
    fn fail(&mut self, error: HttpClientError) -> Option<HttpClientError> {
        if self.attempts_remaining > 1 {
            self.attempts_remaining -= 1;
            self.phase = RetryPhase::Retrying;
            self.last_error = Some(error);
            None
        } else {
            self.phase = RetryPhase::Exhausted;
            Some(error)
        }
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a successful retry run.
#[derive(Debug)]
pub struct RetryReport<T> {
    /// Value produced by the successful attempt.
    pub value: T,
    /// Number of attempts made, including the successful one.
    pub attempts: u32,
}

/// Runs an operation until it succeeds or the attempt budget is spent.
#[derive(Debug, Clone, Default)]
pub struct RetryDriver<S = TokioSleeper> {
    sleeper: S,
}

impl RetryDriver<TokioSleeper> {
    /// Create a driver that sleeps on the tokio timer.
    pub fn new() -> Self {
        Self::with_sleeper(TokioSleeper)
    }
}

impl<S: Sleeper> RetryDriver<S> {
    /// Create a driver with a custom sleeper.
    pub fn with_sleeper(sleeper: S) -> Self {
        Self { sleeper }
    }

    /// Get the sleeper.
    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Run `operation` until it returns `Ok` or [`MAX_ATTEMPTS`] attempts fail.
    ///
    /// The closure receives the one-based attempt number. Every error is
    /// treated as retryable. When the budget runs out the last error is
    /// returned inside [`HttpClientError::RetryExhausted`].
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<RetryReport<T>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut state = RetryState::new();

        loop {
            let attempt = state.attempt_number();
            debug!(attempt, max_attempts = MAX_ATTEMPTS, "Starting attempt");

            match operation(attempt).await {
                Ok(value) => {
                    state.record_success();
                    return Ok(RetryReport {
                        value,
                        attempts: attempt,
                    });
                }
                Err(error) => {
                    warn!(attempt, error = %error, "Attempt failed");

                    if let Some(last_error) = state.fail(error) {
                        return Err(HttpClientError::RetryExhausted {
                            attempts: attempt,
                            last_error: Box::new(last_error),
                        });
                    }

                    debug!(
                        remaining = state.attempts_remaining(),
                        delay = ?RETRY_DELAY,
                        "Waiting before next attempt"
                    );
                    self.sleeper.sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}
