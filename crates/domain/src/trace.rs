use serde::Serialize;

/// Structured trace events emitted across all ChatRelay crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    IdentityResolved {
        user_id: String,
        username: String,
    },
    AgentInvoked {
        agent_id: String,
        agent_alias_id: String,
        session_id: String,
        chunks: usize,
        traces: usize,
        answered: bool,
        duration_ms: u64,
    },
    AgentTrace {
        session_id: String,
        trace: serde_json::Value,
    },
    ChatPersisted {
        chat_id: String,
        user_id: String,
        backend: String,
        duration_ms: u64,
    },
    StoreCall {
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "cr_event");
    }
}
