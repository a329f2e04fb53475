pub mod chat;
pub mod cors;
pub mod health;
pub mod response;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the API router.
///
/// `/v1/chat` authenticates per request through the `id_token` header, so
/// there is no router-level auth layer.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/health", get(health::health))
        .route("/v1/chat", post(chat::chat))
}
