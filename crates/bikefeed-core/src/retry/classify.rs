//! Classify curl errors and HTTP statuses into transport failure kinds.

use crate::retry::policy::{FailureKind, TransportRetryPolicy};

/// Classify a curl error for retry decisions.
///
/// Failures before the request reached the server count against the connect
/// budget; failures while waiting for or reading the response count against
/// the read budget.
pub fn classify_curl_error(e: &curl::Error) -> FailureKind {
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
    {
        return FailureKind::Connect;
    }
    if e.is_operation_timedout()
        || e.is_recv_error()
        || e.is_read_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return FailureKind::Read;
    }
    FailureKind::Other
}

/// Classify a response status. Returns `None` for statuses the policy treats
/// as final (success or non-transient errors such as 404).
pub fn classify_status(code: u16, policy: &TransportRetryPolicy) -> Option<FailureKind> {
    policy
        .is_retryable_status(code)
        .then_some(FailureKind::Status(code))
}
