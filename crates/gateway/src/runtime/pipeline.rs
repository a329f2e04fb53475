//! The chat pipeline.
//!
//! Split into an authentication step and the main flow so the HTTP layer
//! can shape errors from the two stages differently:
//!
//! 1. [`authenticate`]: `id_token` header → [`UserIdentity`]
//! 2. [`run_chat`]: body validation → agent invocation → record
//!    composition → persistence → [`ChatReply`]
//!
//! Nothing is retried. The first failure ends the request.

use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use cr_domain::chat::ChatRecord;
use cr_domain::error::{Error, Result};
use cr_domain::trace::TraceEvent;
use cr_identity::{decode, extract_identity, UserIdentity};

use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A validated chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInput {
    pub prompt: String,
    pub chat_id: String,
}

/// Successful pipeline output, serialized as the 200 response body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: Option<String>,
    pub chat: ChatRecord,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Authentication
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Resolve the caller from the raw `id_token` header value.
///
/// An absent or empty header is [`Error::MissingToken`]. The token is
/// decoded without signature verification.
pub fn authenticate(id_token: Option<&str>) -> Result<UserIdentity> {
    let token = id_token.filter(|t| !t.is_empty()).ok_or(Error::MissingToken)?;
    let claims = decode(token)?;
    extract_identity(&claims)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Body validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Validate the raw request body.
///
/// The body must be a JSON object with a non-empty string `prompt`.
/// `chat_id` is optional; when absent or `null` a fresh UUIDv4 is used.
pub fn parse_body(body: &[u8]) -> Result<ChatInput> {
    if body.is_empty() {
        return Err(Error::Validation("Request body is missing.".into()));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| Error::Validation(format!("Request body is not valid JSON: {e}")))?;
    let Value::Object(mut fields) = value else {
        return Err(Error::Validation("Request body must be a JSON object.".into()));
    };

    let prompt = match fields.remove("prompt") {
        Some(Value::String(p)) if !p.is_empty() => p,
        _ => return Err(Error::Validation("Field 'prompt' is required.".into())),
    };

    let chat_id = match fields.remove("chat_id") {
        None | Some(Value::Null) => Uuid::new_v4().to_string(),
        Some(Value::String(id)) => id,
        Some(_) => return Err(Error::Validation("Field 'chat_id' must be a string.".into())),
    };

    Ok(ChatInput { prompt, chat_id })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Main flow
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run one chat exchange for an authenticated caller.
///
/// The agent stream is consumed completely before anything is written.
/// If persistence fails the answer is dropped with the error.
pub async fn run_chat(state: &AppState, user: &UserIdentity, body: &[u8]) -> Result<ChatReply> {
    let input = parse_body(body)?;

    let session_id = Uuid::new_v4().to_string();
    tracing::debug!(
        chat_id = %input.chat_id,
        session_id = %session_id,
        user_id = %user.id,
        "invoking agent"
    );

    let answer = cr_agent::invoke(
        state.agent.as_ref(),
        &state.config.agent.agent_id,
        &state.config.agent.agent_alias_id,
        &session_id,
        &input.prompt,
    )
    .await?;

    let chat = ChatRecord::compose(
        input.chat_id,
        user.id.clone(),
        &input.prompt,
        answer.clone(),
        Utc::now(),
    );

    let start = Instant::now();
    state.store.put(&chat).await.map_err(|e| match e {
        Error::Persistence(_) => e,
        other => Error::Persistence(other.to_string()),
    })?;
    TraceEvent::ChatPersisted {
        chat_id: chat.id.clone(),
        user_id: chat.user_id.clone(),
        backend: state.store.backend().to_owned(),
        duration_ms: start.elapsed().as_millis() as u64,
    }
    .emit();

    Ok(ChatReply {
        response: answer,
        chat,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_missing() {
        let err = parse_body(b"").unwrap_err();
        assert_eq!(err.to_string(), "Request body is missing.");
    }

    #[test]
    fn empty_object_needs_prompt() {
        let err = parse_body(b"{}").unwrap_err();
        assert_eq!(err.to_string(), "Field 'prompt' is required.");
        assert!(err.is_client_error());
    }

    #[test]
    fn empty_or_non_string_prompt_is_rejected() {
        for body in [r#"{"prompt":""}"#, r#"{"prompt":42}"#, r#"{"prompt":null}"#] {
            let err = parse_body(body.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{body}");
        }
    }

    #[test]
    fn invalid_json_and_non_objects_are_validation_errors() {
        assert!(matches!(parse_body(b"{nope").unwrap_err(), Error::Validation(_)));
        assert!(matches!(parse_body(b"[1,2]").unwrap_err(), Error::Validation(_)));
    }

    #[test]
    fn explicit_chat_id_is_kept() {
        let input = parse_body(br#"{"prompt":"Hi","chat_id":"test-chat-123"}"#).unwrap();
        assert_eq!(
            input,
            ChatInput {
                prompt: "Hi".into(),
                chat_id: "test-chat-123".into()
            }
        );
    }

    #[test]
    fn absent_or_null_chat_id_gets_a_uuid() {
        for body in [r#"{"prompt":"Hi"}"#, r#"{"prompt":"Hi","chat_id":null}"#] {
            let input = parse_body(body.as_bytes()).unwrap();
            let id = Uuid::parse_str(&input.chat_id).unwrap();
            assert_eq!(id.get_version_num(), 4);
        }
    }

    #[test]
    fn non_string_chat_id_is_rejected() {
        let err = parse_body(br#"{"prompt":"Hi","chat_id":7}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn missing_or_empty_header_is_missing_token() {
        assert!(matches!(authenticate(None).unwrap_err(), Error::MissingToken));
        assert!(matches!(authenticate(Some("")).unwrap_err(), Error::MissingToken));
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = authenticate(Some("not-a-jwt")).unwrap_err();
        assert!(matches!(err, Error::InvalidToken(_)));
        assert!(err.to_string().starts_with("Invalid id_token: "));
    }
}
