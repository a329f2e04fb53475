use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Agent backend connection
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Environment variable holding the agent identifier.
pub const AGENT_ID_ENV: &str = "AGENT_ID";
/// Environment variable holding the agent alias identifier.
pub const AGENT_ALIAS_ID_ENV: &str = "AGENT_ALIAS_ID";

/// Connection settings for the remote conversational-agent service.
///
/// `agent_id` and `agent_alias_id` are normally supplied through the
/// `AGENT_ID` / `AGENT_ALIAS_ID` environment variables (see
/// [`super::Config::apply_env`]). They default to empty strings and are not
/// checked before use; an empty id surfaces as an invocation failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "d_agent_url")]
    pub base_url: String,
    #[serde(default)]
    pub agent_id: String,
    #[serde(default)]
    pub agent_alias_id: String,
    /// Environment variable holding an optional bearer key for the agent
    /// endpoint. Unset or empty means no `Authorization` header is sent.
    #[serde(default = "d_agent_key_env")]
    pub api_key_env: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: d_agent_url(),
            agent_id: String::new(),
            agent_alias_id: String::new(),
            api_key_env: d_agent_key_env(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_agent_url() -> String {
    "http://localhost:8100".into()
}
fn d_agent_key_env() -> String {
    "CR_AGENT_API_KEY".into()
}
