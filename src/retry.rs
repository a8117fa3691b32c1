//! Retry strategies and predicates for handling transient failures.
//!
//! Every request the crate sends goes through the same retry loop in
//! [`Session`](crate::Session). The [`RetryStrategy`] decides how long to wait
//! between attempts and when to give up; the [`RetryPredicate`] decides which
//! errors are worth another attempt at all.

use crate::Error;
use rand::Rng;
use std::time::Duration;

/// Total number of attempts made for each request by default.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// Defines when and how to retry failed requests.
///
/// # Examples
///
/// ```
/// use blaseball::RetryStrategy;
/// use std::time::Duration;
///
/// // No retries
/// let no_retry = RetryStrategy::None;
///
/// // Exponential backoff: 100ms, 200ms, 400ms, 800ms
/// let exponential = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_millis(100),
///     max_delay: Duration::from_secs(30),
///     max_retries: 4,
///     jitter: false,
/// };
/// assert_eq!(exponential.max_attempts(), 5);
/// ```
#[derive(Debug, Clone)]
pub enum RetryStrategy {
    /// Do not retry failed requests.
    None,

    /// Retry with exponentially increasing delays.
    ///
    /// Each retry waits for `initial_delay * 2^(retry - 1)` (capped at `max_delay`).
    /// Jitter scales each delay by a random factor between 0.5 and 1.0.
    ExponentialBackoff {
        /// The delay before the first retry.
        initial_delay: Duration,
        /// The maximum delay between retries.
        max_delay: Duration,
        /// The maximum number of retries after the first attempt.
        max_retries: usize,
        /// Whether to add random jitter to delays.
        jitter: bool,
    },

    /// Retry with a fixed delay between attempts.
    Linear {
        /// The delay between retry attempts.
        delay: Duration,
        /// The maximum number of retries after the first attempt.
        max_retries: usize,
    },
}

impl Default for RetryStrategy {
    /// One second doubling up to a minute, [`DEFAULT_MAX_ATTEMPTS`] attempts in total.
    fn default() -> Self {
        RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            max_retries: DEFAULT_MAX_ATTEMPTS - 1,
            jitter: true,
        }
    }
}

impl RetryStrategy {
    /// Returns the delay before the given retry, or `None` if retries are exhausted.
    ///
    /// # Arguments
    ///
    /// * `retry` - The retry number (1-indexed, so 1 = first retry after the
    ///   initial attempt failed)
    pub fn delay_for_attempt(&self, retry: usize) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                max_retries,
                jitter,
            } => {
                if retry > *max_retries {
                    return None;
                }

                let multiplier = 2u32.saturating_pow(retry.saturating_sub(1) as u32);
                let delay = initial_delay.saturating_mul(multiplier).min(*max_delay);

                if *jitter {
                    let jitter_factor = rand::thread_rng().gen_range(0.5..=1.0);
                    Some(delay.mul_f64(jitter_factor))
                } else {
                    Some(delay)
                }
            }
            RetryStrategy::Linear { delay, max_retries } => {
                if retry > *max_retries {
                    None
                } else {
                    Some(*delay)
                }
            }
        }
    }

    /// Returns the maximum number of retries after the first attempt.
    pub fn max_retries(&self) -> usize {
        match self {
            RetryStrategy::None => 0,
            RetryStrategy::ExponentialBackoff { max_retries, .. } => *max_retries,
            RetryStrategy::Linear { max_retries, .. } => *max_retries,
        }
    }

    /// Returns the total number of attempts, counting the first one.
    pub fn max_attempts(&self) -> usize {
        self.max_retries() + 1
    }
}

/// Trait for determining whether a failed request should be retried.
///
/// # Examples
///
/// ```
/// use blaseball::{Error, RetryPredicate};
///
/// struct RetryOnBadGateway;
///
/// impl RetryPredicate for RetryOnBadGateway {
///     fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
///         matches!(
///             error,
///             Error::HttpError { status, .. } if status.as_u16() == 502
///         )
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// Determines whether the request should be retried based on the error.
    ///
    /// `attempt` is the 1-indexed number of the attempt that just failed.
    fn should_retry(&self, error: &Error, attempt: usize) -> bool;
}

/// Retry any failure status, client errors included.
///
/// A login rejected with 401 is retried just like a 503.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnHttpError;

impl RetryPredicate for RetryOnHttpError {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::HttpError { .. })
    }
}

/// Retry all errors that [`Error::is_retryable`] accepts.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnRetryable;

impl RetryPredicate for RetryOnRetryable {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// Retry only on 5xx server errors.
#[derive(Debug, Clone, Copy)]
pub struct RetryOn5xx;

impl RetryPredicate for RetryOn5xx {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::HttpError { status, .. } if status.is_server_error())
    }
}

/// Retry only on timeout errors.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnTimeout;

impl RetryPredicate for RetryOnTimeout {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::Timeout)
    }
}

/// Retry only on network/connection errors.
#[derive(Debug, Clone, Copy)]
pub struct RetryOnConnectionError;

impl RetryPredicate for RetryOnConnectionError {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::Network(_))
    }
}

/// Combine multiple retry predicates with OR logic.
///
/// Retries if ANY of the predicates return `true`.
pub struct OrPredicate {
    predicates: Vec<Box<dyn RetryPredicate>>,
}

impl OrPredicate {
    /// Creates a new `OrPredicate` from a list of predicates.
    pub fn new(predicates: Vec<Box<dyn RetryPredicate>>) -> Self {
        Self { predicates }
    }
}

impl RetryPredicate for OrPredicate {
    fn should_retry(&self, error: &Error, attempt: usize) -> bool {
        self.predicates
            .iter()
            .any(|p| p.should_retry(error, attempt))
    }
}

/// Combine multiple retry predicates with AND logic.
///
/// Retries only if ALL of the predicates return `true`.
///
/// # Examples
///
/// ```
/// use blaseball::retry::{AndPredicate, RetryOnHttpError};
/// use blaseball::{Error, RetryPredicate};
///
/// struct FirstAttemptOnly;
///
/// impl RetryPredicate for FirstAttemptOnly {
///     fn should_retry(&self, _error: &Error, attempt: usize) -> bool {
///         attempt == 1
///     }
/// }
///
/// // Retry a failure status once, then give up
/// let predicate = AndPredicate::new(vec![
///     Box::new(RetryOnHttpError),
///     Box::new(FirstAttemptOnly),
/// ]);
/// ```
pub struct AndPredicate {
    predicates: Vec<Box<dyn RetryPredicate>>,
}

impl AndPredicate {
    /// Creates a new `AndPredicate` from a list of predicates.
    pub fn new(predicates: Vec<Box<dyn RetryPredicate>>) -> Self {
        Self { predicates }
    }
}

impl RetryPredicate for AndPredicate {
    fn should_retry(&self, error: &Error, attempt: usize) -> bool {
        self.predicates
            .iter()
            .all(|p| p.should_retry(error, attempt))
    }
}

/// The predicate sessions use unless told otherwise.
///
/// Retries every failure status plus connection errors and timeouts.
/// Malformed bodies are never retried since the same request would
/// produce the same payload.
pub fn default_predicate() -> Box<dyn RetryPredicate> {
    Box::new(OrPredicate::new(vec![
        Box::new(RetryOnHttpError),
        Box::new(RetryOnConnectionError),
        Box::new(RetryOnTimeout),
    ]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Method, StatusCode};

    fn http_error(status: StatusCode) -> Error {
        Error::HttpError {
            method: Method::GET,
            url: "https://blaseball.com/database/allTeams".parse().unwrap(),
            status,
            raw_response: String::new(),
        }
    }

    #[test]
    fn test_exponential_backoff_delays() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            max_retries: 4,
            jitter: false,
        };

        assert_eq!(
            strategy.delay_for_attempt(1),
            Some(Duration::from_millis(100))
        );
        assert_eq!(
            strategy.delay_for_attempt(2),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            strategy.delay_for_attempt(3),
            Some(Duration::from_millis(400))
        );
        assert_eq!(
            strategy.delay_for_attempt(4),
            Some(Duration::from_millis(800))
        );
        assert_eq!(strategy.delay_for_attempt(5), None);
    }

    #[test]
    fn test_exponential_backoff_caps_at_max_delay() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(3),
            max_retries: 10,
            jitter: false,
        };

        assert_eq!(strategy.delay_for_attempt(3), Some(Duration::from_secs(3)));
        assert_eq!(strategy.delay_for_attempt(10), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(400),
            max_delay: Duration::from_secs(10),
            max_retries: 4,
            jitter: true,
        };

        for _ in 0..50 {
            let delay = strategy.delay_for_attempt(2).unwrap();
            assert!(delay >= Duration::from_millis(400));
            assert!(delay <= Duration::from_millis(800));
        }
    }

    #[test]
    fn test_linear_delays() {
        let strategy = RetryStrategy::Linear {
            delay: Duration::from_secs(1),
            max_retries: 3,
        };

        assert_eq!(strategy.delay_for_attempt(1), Some(Duration::from_secs(1)));
        assert_eq!(strategy.delay_for_attempt(3), Some(Duration::from_secs(1)));
        assert_eq!(strategy.delay_for_attempt(4), None);
    }

    #[test]
    fn test_no_retry() {
        let strategy = RetryStrategy::None;
        assert_eq!(strategy.delay_for_attempt(1), None);
        assert_eq!(strategy.max_attempts(), 1);
    }

    #[test]
    fn test_default_strategy_makes_five_attempts() {
        assert_eq!(RetryStrategy::default().max_attempts(), DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn test_default_predicate_retries_client_errors_but_not_decoding() {
        let predicate = default_predicate();

        assert!(predicate.should_retry(&http_error(StatusCode::UNAUTHORIZED), 1));
        assert!(predicate.should_retry(&http_error(StatusCode::INTERNAL_SERVER_ERROR), 1));
        assert!(predicate.should_retry(&Error::Timeout, 1));
        assert!(!predicate.should_retry(
            &Error::DeserializationFailed {
                raw_response: "<html>".to_string(),
                serde_error: "expected value".to_string(),
                status: StatusCode::OK,
            },
            1
        ));
    }

    #[test]
    fn test_and_predicate_requires_all() {
        let predicate = AndPredicate::new(vec![Box::new(RetryOn5xx), Box::new(RetryOnRetryable)]);

        assert!(predicate.should_retry(&http_error(StatusCode::SERVICE_UNAVAILABLE), 1));
        assert!(!predicate.should_retry(&http_error(StatusCode::TOO_MANY_REQUESTS), 1));
        assert!(!predicate.should_retry(&Error::Timeout, 1));
    }
}
