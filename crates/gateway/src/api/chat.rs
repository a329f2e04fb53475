//! `POST /v1/chat`: one prompt in, one answer and stored chat out.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};

use crate::api::response::ApiError;
use crate::runtime::{authenticate, run_chat};
use crate::state::AppState;

/// Header carrying the caller's identity token.
pub const ID_TOKEN_HEADER: &str = "id_token";

pub async fn chat(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    // A header value that is not visible ASCII is treated as absent.
    let token = headers
        .get(ID_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let user = match authenticate(token) {
        Ok(user) => user,
        Err(e) => return ApiError::auth(e).into_response(),
    };

    match run_chat(&state, &user, &body).await {
        Ok(reply) => {
            tracing::info!(chat_id = %reply.chat.id, user_id = %user.id, "chat completed");
            Json(reply).into_response()
        }
        Err(e) => ApiError::pipeline(e).into_response(),
    }
}
