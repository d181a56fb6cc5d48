//! Retry decisions for the request loop.
//!
//! Each attempt's result is classified into an [`AttemptOutcome`], and
//! [`RetryPolicy::next_step`] turns that outcome plus the attempt index into
//! either a final result or a backoff delay. Timeouts are fatal: they end the
//! operation without touching the remaining budget.

use std::time::Duration;

use crate::error::ClientError;

/// Base delay of the exponential backoff.
pub const BACKOFF_BASE_MS: u64 = 1000;

/// Delay before the attempt following `attempt` (0-indexed): 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt);
    Duration::from_millis(factor.saturating_mul(BACKOFF_BASE_MS))
}

/// Classified result of a single attempt.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    Success(T),
    Retryable(ClientError),
    Fatal(ClientError),
}

impl<T> From<Result<T, ClientError>> for AttemptOutcome<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => AttemptOutcome::Success(value),
            Err(err) if err.is_retryable() => AttemptOutcome::Retryable(err),
            Err(err) => AttemptOutcome::Fatal(err),
        }
    }
}

/// What the loop does after an attempt.
#[derive(Debug)]
pub enum Step<T> {
    Done(Result<T, ClientError>),
    Retry { error: ClientError, delay: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn next_step<T>(&self, attempt: u32, outcome: AttemptOutcome<T>) -> Step<T> {
        match outcome {
            AttemptOutcome::Success(value) => Step::Done(Ok(value)),
            AttemptOutcome::Fatal(err) => Step::Done(Err(err)),
            AttemptOutcome::Retryable(err) if attempt >= self.max_retries => Step::Done(Err(err)),
            AttemptOutcome::Retryable(error) => Step::Retry {
                error,
                delay: backoff_delay(attempt),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_error() -> ClientError {
        ClientError::Http {
            status: 500,
            message: "API request failed: 500 Internal Server Error".to_string(),
        }
    }

    #[test]
    fn test_backoff_delay_doubles() {
        assert_eq!(backoff_delay(0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1), Duration::from_secs(2));
        assert_eq!(backoff_delay(2), Duration::from_secs(4));
        assert_eq!(backoff_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_delay_saturates() {
        assert_eq!(backoff_delay(200), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_outcome_from_result() {
        assert!(matches!(
            AttemptOutcome::from(Ok::<_, ClientError>(1)),
            AttemptOutcome::Success(1)
        ));
        assert!(matches!(
            AttemptOutcome::<()>::from(Err(server_error())),
            AttemptOutcome::Retryable(_)
        ));
        assert!(matches!(
            AttemptOutcome::<()>::from(Err(ClientError::Timeout { timeout_ms: 100 })),
            AttemptOutcome::Fatal(ClientError::Timeout { timeout_ms: 100 })
        ));
    }

    #[test]
    fn test_success_is_done() {
        let policy = RetryPolicy::new(3);
        let step = policy.next_step(0, AttemptOutcome::Success("ok"));
        assert!(matches!(step, Step::Done(Ok("ok"))));
    }

    #[test]
    fn test_retryable_waits_with_backoff() {
        let policy = RetryPolicy::new(3);
        for attempt in 0..3 {
            match policy.next_step::<()>(attempt, AttemptOutcome::Retryable(server_error())) {
                Step::Retry { delay, .. } => assert_eq!(delay, backoff_delay(attempt)),
                other => panic!("Expected retry, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_retryable_on_last_attempt_is_done() {
        let policy = RetryPolicy::new(3);
        let step = policy.next_step::<()>(3, AttemptOutcome::Retryable(server_error()));
        assert!(matches!(
            step,
            Step::Done(Err(ClientError::Http { status: 500, .. }))
        ));
    }

    #[test]
    fn test_timeout_is_done_on_first_attempt() {
        let policy = RetryPolicy::new(3);
        let step = policy.next_step::<()>(0, AttemptOutcome::Fatal(ClientError::Timeout { timeout_ms: 50 }));
        assert!(matches!(step, Step::Done(Err(ClientError::Timeout { .. }))));
    }

    #[test]
    fn test_zero_retries_allows_single_attempt() {
        let policy = RetryPolicy::new(0);
        assert_eq!(policy.total_attempts(), 1);
        let step = policy.next_step::<()>(0, AttemptOutcome::Retryable(server_error()));
        assert!(matches!(step, Step::Done(Err(_))));
    }
}
