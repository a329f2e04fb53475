//! `cr-gateway`: the ChatRelay HTTP gateway.
//!
//! Wires the identity, agent and store crates into a single `POST /v1/chat`
//! pipeline and exposes it through an axum router. The `chatrelay` binary
//! in `main.rs` adds tracing setup, CORS and graceful shutdown.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod runtime;
pub mod state;
