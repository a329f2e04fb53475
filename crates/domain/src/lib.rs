//! `cr-domain`: shared types for the ChatRelay crates.
//!
//! Holds the error taxonomy, configuration structs, the persisted chat
//! model, the title summarizer and the structured trace events that every
//! other crate in the workspace builds on.

pub mod chat;
pub mod config;
pub mod error;
pub mod stream;
pub mod title;
pub mod trace;
