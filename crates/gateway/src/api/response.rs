//! Error → HTTP response mapping for the chat endpoint.
//!
//! | Stage    | Client error (400)  | Internal fault (500)                                    |
//! |----------|---------------------|---------------------------------------------------------|
//! | auth     | `{"error": msg}`    | `{"error": "Internal server error", "message": msg}`    |
//! | pipeline | `{"error": msg}`    | `{"error": msg}`                                        |
//!
//! Auth-stage responses also carry permissive CORS headers so browser
//! callers can read why they were rejected.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};

use cr_domain::error::Error;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, id_token, Authorization";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Auth,
    Pipeline,
}

/// A pipeline failure tagged with the stage it happened in.
#[derive(Debug)]
pub struct ApiError {
    pub stage: Stage,
    pub error: Error,
}

impl ApiError {
    pub fn auth(error: Error) -> Self {
        Self {
            stage: Stage::Auth,
            error,
        }
    }

    pub fn pipeline(error: Error) -> Self {
        Self {
            stage: Stage::Pipeline,
            error,
        }
    }

    pub fn status(&self) -> StatusCode {
        if self.error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.error.to_string();

        if status.is_server_error() {
            tracing::error!(stage = ?self.stage, error = %message, "chat request failed");
        } else {
            tracing::info!(stage = ?self.stage, error = %message, "chat request rejected");
        }

        match self.stage {
            Stage::Auth => {
                let body = if status.is_server_error() {
                    serde_json::json!({ "error": "Internal server error", "message": message })
                } else {
                    serde_json::json!({ "error": message })
                };
                let mut resp = (status, Json(body)).into_response();
                let headers = resp.headers_mut();
                for (name, value) in [
                    (header::ACCESS_CONTROL_ALLOW_ORIGIN, CORS_ALLOW_ORIGIN),
                    (header::ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS),
                    (header::ACCESS_CONTROL_ALLOW_HEADERS, CORS_ALLOW_HEADERS),
                ] {
                    headers.insert(name, HeaderValue::from_static(value));
                }
                resp
            }
            Stage::Pipeline => (status, Json(serde_json::json!({ "error": message }))).into_response(),
        }
    }
}
