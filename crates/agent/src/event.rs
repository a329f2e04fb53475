use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;

use cr_domain::error::{Error, Result};

/// One event from an agent invocation stream.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// A piece of answer text, still raw bytes.
    Chunk { bytes: Vec<u8> },
    /// Diagnostic metadata about the agent's reasoning.
    Trace { trace: Value },
    /// Any other event shape. Never valid in a completion stream.
    Other { payload: Value },
}

impl AgentEvent {
    /// Classify a decoded wire payload.
    ///
    /// Payloads are JSON objects keyed by event kind:
    /// `{"chunk": {"bytes": "<base64>"}}` or `{"trace": {...}}`. A `chunk`
    /// key wins over `trace` when both are present.
    pub fn from_payload(payload: Value) -> Result<Self> {
        if let Some(chunk) = payload.get("chunk") {
            let encoded = chunk
                .get("bytes")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    Error::UnexpectedAgentEvent(format!("chunk without bytes: {payload}"))
                })?;
            let bytes = STANDARD
                .decode(encoded)
                .map_err(|e| Error::UnexpectedAgentEvent(format!("chunk bytes: {e}")))?;
            return Ok(AgentEvent::Chunk { bytes });
        }

        if let Some(trace) = payload.get("trace") {
            return Ok(AgentEvent::Trace {
                trace: trace.clone(),
            });
        }

        Ok(AgentEvent::Other { payload })
    }

    /// Build a chunk event from text.
    pub fn chunk(text: impl Into<String>) -> Self {
        AgentEvent::Chunk {
            bytes: text.into().into_bytes(),
        }
    }
}
