//! `cr-agent`: client side of the conversational-agent backend.
//!
//! [`AgentClient`] abstracts the backend connection; [`HttpAgentClient`] is
//! the production implementation that opens an SSE stream per invocation.
//! [`invoke`] drives one invocation to completion and reduces the event
//! stream to the final answer.

pub mod client;
pub mod event;
pub mod http;
pub mod invoke;
pub(crate) mod sse;
pub(crate) mod util;

pub use client::{AgentClient, InvokeAgentRequest};
pub use event::AgentEvent;
pub use http::HttpAgentClient;
pub use invoke::invoke;
