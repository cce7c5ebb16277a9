//! Fixed-delay retry loop for arbitrary fallible operations (uploads).

use std::fmt;
use std::time::Duration;

/// Attempt count and fixed pause between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokePolicy {
    /// Number of attempts before giving up. With 0 the operation is never called.
    pub retries: u32,
    /// Pause between attempts. Does not grow.
    pub delay: Duration,
}

impl Default for InvokePolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl InvokePolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    pub fn attempts(&self) -> u32 {
        self.retries
    }
}

/// Every attempt of `operation` failed; `last` is the final attempt's error,
/// or `None` when the policy allowed no attempts.
#[derive(Debug, thiserror::Error)]
#[error("{operation} failed after {attempts} attempts")]
pub struct InvokeError<E> {
    pub operation: String,
    pub attempts: u32,
    #[source]
    pub last: Option<E>,
}

/// Calls `f` until it succeeds or `policy.attempts()` attempts have failed,
/// sleeping `policy.delay` between attempts.
pub fn invoke_with_retry<T, E, F>(
    policy: &InvokePolicy,
    operation: &str,
    f: F,
) -> Result<T, InvokeError<E>>
where
    F: FnMut() -> Result<T, E>,
    E: fmt::Display,
{
    invoke_with_retry_and_sleep(policy, operation, f, std::thread::sleep)
}

/// Like [`invoke_with_retry`] with a caller-supplied sleep.
pub fn invoke_with_retry_and_sleep<T, E, F, S>(
    policy: &InvokePolicy,
    operation: &str,
    mut f: F,
    mut sleep: S,
) -> Result<T, InvokeError<E>>
where
    F: FnMut() -> Result<T, E>,
    E: fmt::Display,
    S: FnMut(Duration),
{
    let attempts = policy.attempts();
    if attempts == 0 {
        tracing::warn!(operation, "no attempts allowed");
        return Err(InvokeError {
            operation: operation.to_string(),
            attempts,
            last: None,
        });
    }
    let mut attempt = 1u32;
    loop {
        match f() {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(operation, attempt, "succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) => {
                tracing::warn!(operation, attempt, error = %e, "attempt {} failed: {}", attempt, e);
                if attempt >= attempts {
                    return Err(InvokeError {
                        operation: operation.to_string(),
                        attempts,
                        last: Some(e),
                    });
                }
                sleep(policy.delay);
                attempt += 1;
            }
        }
    }
}
