//! Shared helpers for the HTTP agent client.

use cr_domain::error::Error;

/// Convert a [`reqwest::Error`] raised while opening an invocation into the
/// domain [`Error`] type.
pub(crate) fn unavailable(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::AgentUnavailable(format!("timed out: {e}"))
    } else if e.is_connect() {
        Error::AgentUnavailable(format!("connection failed: {e}"))
    } else {
        Error::AgentUnavailable(e.to_string())
    }
}

/// Convert a [`reqwest::Error`] raised while reading the event stream.
pub(crate) fn interrupted(e: reqwest::Error) -> Error {
    Error::UnexpectedAgentEvent(format!("event stream interrupted: {e}"))
}
