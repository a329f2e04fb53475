//! HTTP adapter for the agent backend.
//!
//! One invocation is one `POST` to
//! `{base_url}/agents/{agentId}/agentAliases/{aliasId}/sessions/{sessionId}/text`
//! with `{"inputText": ...}`; the backend replies with an SSE stream of
//! chunk/trace payloads (see [`crate::event::AgentEvent`]).

use reqwest::{Client, Url};

use cr_domain::config::AgentConfig;
use cr_domain::error::{Error, Result};
use cr_domain::stream::BoxStream;

use crate::client::{AgentClient, InvokeAgentRequest};
use crate::event::AgentEvent;
use crate::sse::event_stream;
use crate::util::unavailable;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Production [`AgentClient`] over HTTP + SSE.
///
/// Built once at startup and shared by all requests. No request timeout is
/// set: an invocation runs until the backend closes the stream.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpAgentClient {
    /// Build a client from config, reading the bearer key from the
    /// environment variable named by `cfg.api_key_env`.
    pub fn new(cfg: &AgentConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.is_empty());
        Self::with_api_key(cfg, api_key)
    }

    pub fn with_api_key(cfg: &AgentConfig, api_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::AgentUnavailable(format!("failed to initialize agent client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key,
        })
    }

    /// Build the invocation URL, percent-encoding each id as a path segment.
    fn invoke_url(&self, req: &InvokeAgentRequest) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::AgentUnavailable(format!("invalid agent base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::AgentUnavailable("agent base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend([
                "agents",
                req.agent_id.as_str(),
                "agentAliases",
                req.agent_alias_id.as_str(),
                "sessions",
                req.session_id.as_str(),
                "text",
            ]);
        Ok(url)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait::async_trait]
impl AgentClient for HttpAgentClient {
    async fn invoke_agent(
        &self,
        req: &InvokeAgentRequest,
    ) -> Result<BoxStream<'static, Result<AgentEvent>>> {
        let url = self.invoke_url(req)?;
        tracing::debug!(url = %url, session_id = %req.session_id, "invoking agent");

        let mut rb = self
            .http
            .post(url)
            .header("Accept", "text/event-stream")
            .json(&serde_json::json!({ "inputText": req.input_text }));
        if let Some(ref key) = self.api_key {
            rb = rb.bearer_auth(key);
        }

        let resp = rb.send().await.map_err(unavailable)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::AgentUnavailable(format!(
                "agent backend returned {status}: {body}"
            )));
        }

        Ok(event_stream(resp))
    }
}
