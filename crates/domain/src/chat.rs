//! The persisted chat transcript model.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::title::summarize;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Messages
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of a chat transcript.
///
/// `content` is `None` for an assistant message when the agent stream
/// finished without producing any chunk; it serializes as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
        }
    }

    pub fn assistant(content: Option<String>) -> Self {
        Self {
            role: Role::Assistant,
            content,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat record
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The persisted unit: one prompt/response exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    /// UTC, ISO-8601.
    pub created_at: String,
    /// Equal to `created_at` when the record is first composed.
    pub updated_at: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatRecord {
    /// Compose a fresh record for a single exchange stamped with `now`.
    ///
    /// The title is derived from the prompt; the transcript is always
    /// `[user, assistant]`.
    pub fn compose(
        id: String,
        user_id: String,
        prompt: &str,
        answer: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let stamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
        Self {
            id,
            user_id,
            title: summarize(prompt),
            created_at: stamp.clone(),
            updated_at: stamp,
            messages: vec![ChatMessage::user(prompt), ChatMessage::assistant(answer)],
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn compose_builds_user_then_assistant() {
        let rec = ChatRecord::compose(
            "chat-1".into(),
            "user-1".into(),
            "Hello, how are you?",
            Some("I am fine".into()),
            fixed_now(),
        );
        assert_eq!(rec.messages.len(), 2);
        assert_eq!(rec.messages[0], ChatMessage::user("Hello, how are you?"));
        assert_eq!(rec.messages[1].role, Role::Assistant);
        assert_eq!(rec.messages[1].content.as_deref(), Some("I am fine"));
    }

    #[test]
    fn compose_uses_one_timestamp_for_both_fields() {
        let rec = ChatRecord::compose("c".into(), "u".into(), "hi", None, fixed_now());
        assert_eq!(rec.created_at, rec.updated_at);
        assert_eq!(rec.created_at, "2024-05-01T12:30:00.000000Z");
    }

    #[test]
    fn compose_titles_from_prompt() {
        let rec = ChatRecord::compose(
            "c".into(),
            "u".into(),
            "This is a very long message",
            None,
            fixed_now(),
        );
        assert_eq!(rec.title, "This is a very");
    }

    #[test]
    fn missing_answer_serializes_as_null() {
        let rec = ChatRecord::compose("c".into(), "u".into(), "hi", None, fixed_now());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert!(json["messages"][1]["content"].is_null());
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
