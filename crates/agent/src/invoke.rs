//! Drive one agent invocation to completion.

use std::time::Instant;

use futures_util::StreamExt;

use cr_domain::error::{Error, Result};
use cr_domain::trace::TraceEvent;

use crate::client::{AgentClient, InvokeAgentRequest};
use crate::event::AgentEvent;

/// Send `prompt` to the agent and return its final answer.
///
/// The event stream is consumed to its natural end, in order. Each chunk
/// replaces the answer seen so far (chunks are not concatenated); trace
/// events are logged and otherwise ignored; any other event aborts with
/// [`Error::UnexpectedAgentEvent`]. A stream without chunks yields
/// `Ok(None)`.
pub async fn invoke(
    client: &dyn AgentClient,
    agent_id: &str,
    agent_alias_id: &str,
    session_id: &str,
    prompt: &str,
) -> Result<Option<String>> {
    let req = InvokeAgentRequest {
        agent_id: agent_id.to_owned(),
        agent_alias_id: agent_alias_id.to_owned(),
        session_id: session_id.to_owned(),
        input_text: prompt.to_owned(),
    };

    let start = Instant::now();
    let mut events = client.invoke_agent(&req).await?;

    let mut final_answer: Option<String> = None;
    let mut chunks = 0usize;
    let mut traces = 0usize;

    while let Some(event) = events.next().await {
        match event? {
            AgentEvent::Chunk { bytes } => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    Error::UnexpectedAgentEvent(format!("chunk is not valid UTF-8: {e}"))
                })?;
                tracing::info!(session_id = %session_id, answer = %text, "agent chunk received");
                chunks += 1;
                final_answer = Some(text);
            }
            AgentEvent::Trace { trace } => {
                traces += 1;
                TraceEvent::AgentTrace {
                    session_id: session_id.to_owned(),
                    trace,
                }
                .emit();
            }
            AgentEvent::Other { payload } => {
                tracing::warn!(session_id = %session_id, payload = %payload, "unexpected agent event");
                return Err(Error::UnexpectedAgentEvent(payload.to_string()));
            }
        }
    }

    TraceEvent::AgentInvoked {
        agent_id: req.agent_id,
        agent_alias_id: req.agent_alias_id,
        session_id: req.session_id,
        chunks,
        traces,
        answered: final_answer.is_some(),
        duration_ms: start.elapsed().as_millis() as u64,
    }
    .emit();

    Ok(final_answer)
}
