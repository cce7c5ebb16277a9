//! Blocking HTTP GET with retry.
//!
//! Uses the curl crate (libcurl). Connection failures, read failures and
//! statuses in the policy's forcelist are retried with exponential backoff;
//! every other response is handed back to the caller as-is.

mod error;
mod response;

pub use error::FetchError;
pub use response::Response;

use crate::retry::{
    classify_curl_error, classify_status, RetryDecision, TransportRetryPolicy,
    RETRY_AFTER_STATUSES,
};
use std::str;
use std::time::Duration;

/// Outcome of one attempt that did not end the request.
enum Attempt {
    Response(Response),
    Failed(curl::Error),
}

/// GET client carrying a retry policy and timeouts.
#[derive(Debug, Clone)]
pub struct Transport {
    policy: TransportRetryPolicy,
    connect_timeout: Duration,
    timeout: Duration,
}

impl Transport {
    pub fn new(policy: TransportRetryPolicy) -> Self {
        Self {
            policy,
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    pub fn policy(&self) -> &TransportRetryPolicy {
        &self.policy
    }

    /// GET `url`, retrying transient failures per the policy.
    ///
    /// Returns the first response whose status is not retryable (which may be
    /// an error status such as 404; check it with `error_for_status`). When
    /// status retries run out, returns `RetriesExhausted` or, with
    /// `raise_on_status = false`, the last response.
    pub fn get(&self, url: &str) -> Result<Response, FetchError> {
        let mut state = self.policy.start();
        let mut attempt = 1u32;
        loop {
            let (kind, last) = match self.get_once(url) {
                Ok(resp) => match classify_status(resp.status, &self.policy) {
                    None => return Ok(resp),
                    Some(kind) => (kind, Attempt::Response(resp)),
                },
                Err(e) => (classify_curl_error(&e), Attempt::Failed(e)),
            };

            match self.policy.decide(&mut state, kind) {
                RetryDecision::NoRetry => {
                    return match last {
                        Attempt::Response(resp) if self.policy.raise_on_status => {
                            Err(FetchError::RetriesExhausted {
                                url: url.to_string(),
                                status: resp.status,
                                attempts: attempt,
                            })
                        }
                        Attempt::Response(resp) => Ok(resp),
                        Attempt::Failed(source) => Err(FetchError::Curl {
                            url: url.to_string(),
                            attempts: attempt,
                            source,
                        }),
                    };
                }
                RetryDecision::RetryAfter(backoff) => {
                    let delay = match &last {
                        Attempt::Response(resp)
                            if self.policy.respect_retry_after
                                && RETRY_AFTER_STATUSES.contains(&resp.status) =>
                        {
                            resp.retry_after().unwrap_or(backoff)
                        }
                        _ => backoff,
                    };
                    match &last {
                        Attempt::Response(resp) => tracing::warn!(
                            url,
                            attempt,
                            status = resp.status,
                            delay_ms = delay.as_millis() as u64,
                            "GET returned retryable status, retrying"
                        ),
                        Attempt::Failed(e) => tracing::warn!(
                            url,
                            attempt,
                            kind = ?kind,
                            error = %e,
                            delay_ms = delay.as_millis() as u64,
                            "GET failed, retrying"
                        ),
                    }
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    /// One GET, body buffered in memory.
    fn get_once(&self, url: &str) -> Result<Response, curl::Error> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.useragent(concat!("bikefeed/", env!("CARGO_PKG_VERSION")))?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()? as u16;
        tracing::debug!(url, status, bytes = body.len(), "GET completed");
        Ok(Response {
            url: url.to_string(),
            status,
            headers: response::parse_header_lines(&header_lines),
            body,
        })
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(TransportRetryPolicy::default())
    }
}
