use std::time::Duration;

/// Status codes for which a `Retry-After` header overrides the computed backoff.
pub const RETRY_AFTER_STATUSES: [u16; 3] = [413, 429, 503];

/// High-level classification of a failed GET for retry purposes.
///
/// Each kind draws from its own budget (plus the shared `total` budget),
/// so connect and read failures are limited independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Could not establish a connection (refused, DNS, TLS handshake).
    Connect,
    /// Connection was made but the response could not be read in full.
    Read,
    /// The server answered with this status code.
    Status(u16),
    /// Anything else (malformed URL, unsupported protocol). Never retried.
    Other,
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this failure.
    NoRetry,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff policy for outbound GETs.
///
/// `total`, `connect` and `read` count retries, not attempts: a policy with
/// `total = 5` makes at most six requests.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRetryPolicy {
    /// Retries allowed across all failure kinds.
    pub total: u32,
    /// Retries allowed for connection failures.
    pub connect: u32,
    /// Retries allowed for read failures.
    pub read: u32,
    /// Delay before retry n is `backoff_factor * 2^(n-1)` seconds.
    pub backoff_factor: f64,
    /// Upper bound on the computed backoff.
    pub backoff_max: Duration,
    /// Response statuses that count as transient.
    pub status_forcelist: Vec<u16>,
    /// Honor `Retry-After` (integer seconds) on 413/429/503.
    pub respect_retry_after: bool,
    /// When status retries run out, fail instead of returning the last response.
    pub raise_on_status: bool,
}

impl Default for TransportRetryPolicy {
    fn default() -> Self {
        Self {
            total: 5,
            connect: 5,
            read: 5,
            backoff_factor: 0.3,
            backoff_max: Duration::from_secs(120),
            status_forcelist: vec![500, 502, 504],
            respect_retry_after: true,
            raise_on_status: true,
        }
    }
}

/// Remaining budgets for one logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    pub total_left: u32,
    pub connect_left: u32,
    pub read_left: u32,
    /// Retries granted so far (drives the backoff exponent).
    pub retries: u32,
}

impl TransportRetryPolicy {
    /// Fresh budgets for a new request.
    pub fn start(&self) -> RetryState {
        RetryState {
            total_left: self.total,
            connect_left: self.connect,
            read_left: self.read,
            retries: 0,
        }
    }

    pub fn is_retryable_status(&self, code: u16) -> bool {
        self.status_forcelist.contains(&code)
    }

    /// Backoff before retry `n` (1-based): `backoff_factor * 2^(n-1)`, capped at `backoff_max`.
    pub fn backoff(&self, n: u32) -> Duration {
        let exp = n.saturating_sub(1).min(62) as i32;
        let secs = self.backoff_factor.max(0.0) * 2f64.powi(exp);
        if !secs.is_finite() || secs >= self.backoff_max.as_secs_f64() {
            return self.backoff_max;
        }
        Duration::from_secs_f64(secs)
    }

    /// Consume one retry for `kind` and return how long to wait, or `NoRetry`
    /// if the failure is not transient or a budget it draws from is spent.
    pub fn decide(&self, state: &mut RetryState, kind: FailureKind) -> RetryDecision {
        let class_left = match kind {
            FailureKind::Other => return RetryDecision::NoRetry,
            FailureKind::Status(code) if !self.is_retryable_status(code) => {
                return RetryDecision::NoRetry
            }
            FailureKind::Status(_) => None,
            FailureKind::Connect => Some(&mut state.connect_left),
            FailureKind::Read => Some(&mut state.read_left),
        };

        if state.total_left == 0 {
            return RetryDecision::NoRetry;
        }
        if let Some(left) = class_left {
            if *left == 0 {
                return RetryDecision::NoRetry;
            }
            *left -= 1;
        }
        state.total_left -= 1;
        state.retries += 1;
        RetryDecision::RetryAfter(self.backoff(state.retries))
    }
}
