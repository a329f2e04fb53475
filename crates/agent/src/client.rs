use cr_domain::error::Result;
use cr_domain::stream::BoxStream;

use crate::event::AgentEvent;

/// Parameters for one agent invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeAgentRequest {
    pub agent_id: String,
    pub agent_alias_id: String,
    /// Fresh per request; correlates the invocation on the backend.
    pub session_id: String,
    pub input_text: String,
}

/// Connection to the conversational-agent backend.
///
/// Implementations open the invocation and hand back its events in
/// delivery order. Failing to open the invocation is reported as
/// `Error::AgentUnavailable`; problems while reading the stream are
/// yielded as stream items.
#[async_trait::async_trait]
pub trait AgentClient: Send + Sync {
    async fn invoke_agent(
        &self,
        req: &InvokeAgentRequest,
    ) -> Result<BoxStream<'static, Result<AgentEvent>>>;
}
