//! Request runtime: the chat pipeline the HTTP handlers drive.

pub mod pipeline;

pub use pipeline::{authenticate, parse_body, run_chat, ChatInput, ChatReply};
