//! SSE framing for agent invocation streams.
//!
//! The backend answers an invocation with `text/event-stream`. Each event
//! block carries one `data:` line holding a JSON payload, which is turned
//! into an [`AgentEvent`]:
//! - [`drain_data_lines`] -- pull complete `data:` payloads from a buffer
//! - [`event_stream`] -- build a `BoxStream` of events from a response

use cr_domain::error::{Error, Result};
use cr_domain::stream::BoxStream;

use crate::event::AgentEvent;
use crate::util::interrupted;

/// Extract complete `data:` payloads from an SSE byte buffer.
///
/// SSE events are delimited by `\n\n`. Only `data:` lines are kept;
/// `event:`, `id:` and `retry:` lines are skipped.
///
/// The buffer holds raw bytes so a UTF-8 sequence split across network
/// reads is only decoded once its event block is complete. Consumed bytes
/// are removed and any trailing partial event remains for the next call.
pub(crate) fn drain_data_lines(buffer: &mut Vec<u8>) -> Vec<String> {
    let mut data_lines = Vec::new();

    while let Some(pos) = buffer.windows(2).position(|w| w == b"\n\n") {
        let block: Vec<u8> = buffer.drain(..pos + 2).collect();
        let block = String::from_utf8_lossy(&block[..pos]);

        for line in block.lines() {
            let line = line.trim();
            if let Some(data) = line.strip_prefix("data:") {
                let data = data.trim();
                if !data.is_empty() {
                    data_lines.push(data.to_string());
                }
            }
        }
    }

    data_lines
}

/// Parse one `data:` payload into an event.
pub(crate) fn parse_payload(data: &str) -> Result<AgentEvent> {
    let value: serde_json::Value = serde_json::from_str(data)
        .map_err(|e| Error::UnexpectedAgentEvent(format!("payload is not JSON: {e}: {data}")))?;
    AgentEvent::from_payload(value)
}

/// Build a [`BoxStream`] of agent events from an SSE `reqwest::Response`.
///
/// Events are yielded in delivery order. The stream ends when the response
/// body closes; a trailing event without its blank-line terminator is
/// still flushed. A transport error mid-stream is yielded once and ends the
/// stream.
pub(crate) fn event_stream(response: reqwest::Response) -> BoxStream<'static, Result<AgentEvent>> {
    let stream = async_stream::stream! {
        let mut response = response;
        let mut buffer: Vec<u8> = Vec::new();

        loop {
            match response.chunk().await {
                Ok(Some(bytes)) => {
                    buffer.extend_from_slice(&bytes);
                    for data in drain_data_lines(&mut buffer) {
                        yield parse_payload(&data);
                    }
                }
                Ok(None) => {
                    if !buffer.iter().all(u8::is_ascii_whitespace) {
                        buffer.extend_from_slice(b"\n\n");
                        for data in drain_data_lines(&mut buffer) {
                            yield parse_payload(&data);
                        }
                    }
                    break;
                }
                Err(e) => {
                    yield Err(interrupted(e));
                    break;
                }
            }
        }
    };

    Box::pin(stream)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
