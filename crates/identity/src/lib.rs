//! Identity-token handling for ChatRelay.
//!
//! Tokens arrive in the `id_token` header as JWT compact strings. The
//! signature is **not** verified here: an upstream gateway owns that trust
//! boundary. This crate only decodes the claims, rejects expired tokens and
//! derives the [`UserIdentity`] the rest of the request works with.

pub mod claims;
pub mod identity;

pub use claims::{decode, decode_at, Claims};
pub use identity::{extract_identity, UserIdentity};
