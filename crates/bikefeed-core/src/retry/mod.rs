//! Retry policies.
//!
//! Two independent strategies live here. The transport policy retries GETs on
//! connection/read failures and transient statuses with exponential backoff.
//! The invoker retries any fallible operation a fixed number of times with a
//! fixed delay.

mod classify;
mod invoke;
mod policy;

pub use classify::{classify_curl_error, classify_status};
pub use invoke::{invoke_with_retry, invoke_with_retry_and_sleep, InvokeError, InvokePolicy};
pub use policy::{
    FailureKind, RetryDecision, RetryState, TransportRetryPolicy, RETRY_AFTER_STATUSES,
};
