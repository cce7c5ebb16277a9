//! Feed fetch error type.

/// Error returned by a GET through [`super::Transport`] or by decoding its response.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Curl failed (connect/read) and the retry budget for that failure is spent,
    /// or the failure was not retryable at all.
    #[error("GET {url} failed after {attempts} attempt(s): {source}")]
    Curl {
        url: String,
        attempts: u32,
        #[source]
        source: curl::Error,
    },
    /// Every attempt answered with a retryable status and the budget ran out.
    #[error("GET {url} still returned HTTP {status} after {attempts} attempts")]
    RetriesExhausted { url: String, status: u16, attempts: u32 },
    /// Response had a non-2xx status (see `Response::error_for_status`).
    #[error("GET {url} returned HTTP {status}")]
    Http { url: String, status: u16 },
    /// Body was not valid JSON. Never retried.
    #[error("invalid JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
