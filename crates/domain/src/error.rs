/// Shared error type used across all ChatRelay crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("id_token header is missing")]
    MissingToken,

    /// Structurally malformed or expired identity token. The message is
    /// caller-facing and already carries its context.
    #[error("{0}")]
    InvalidToken(String),

    #[error("Missing user information (email or username)")]
    MissingUserInfo,

    /// Missing or malformed request body. Caller-facing message.
    #[error("{0}")]
    Validation(String),

    #[error("agent unavailable: {0}")]
    AgentUnavailable(String),

    #[error("unexpected event: {0}")]
    UnexpectedAgentEvent(String),

    #[error("error saving chat: {0}")]
    Persistence(String),
}

impl Error {
    /// `true` for failures the caller can fix by changing the request
    /// (400-class). Everything else is an internal fault (500-class).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingToken
                | Error::InvalidToken(_)
                | Error::MissingUserInfo
                | Error::Validation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_fixable_errors_are_client_errors() {
        assert!(Error::MissingToken.is_client_error());
        assert!(Error::InvalidToken("Invalid id_token: bad".into()).is_client_error());
        assert!(Error::MissingUserInfo.is_client_error());
        assert!(Error::Validation("Field 'prompt' is required.".into()).is_client_error());
    }

    #[test]
    fn downstream_failures_are_internal() {
        assert!(!Error::AgentUnavailable("connect refused".into()).is_client_error());
        assert!(!Error::UnexpectedAgentEvent("{}".into()).is_client_error());
        assert!(!Error::Persistence("disk full".into()).is_client_error());
    }

    #[test]
    fn display_messages_match_wire_text() {
        assert_eq!(Error::MissingToken.to_string(), "id_token header is missing");
        assert_eq!(
            Error::MissingUserInfo.to_string(),
            "Missing user information (email or username)"
        );
        assert_eq!(
            Error::Validation("Request body is missing.".into()).to_string(),
            "Request body is missing."
        );
    }
}
