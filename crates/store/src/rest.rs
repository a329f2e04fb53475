//! REST implementation of [`ChatStore`].
//!
//! `RestChatStore` wraps a `reqwest::Client` and maps the store operations
//! onto a key-value document service:
//!
//! | Operation | Request                                   |
//! |-----------|-------------------------------------------|
//! | `put`     | `PUT {base_url}/tables/{table}/items/{id}` with the record as JSON |
//! | `get`     | `GET {base_url}/tables/{table}/items/{id}` (404 = absent) |
//!
//! Writes are attempted exactly once.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use uuid::Uuid;

use cr_domain::chat::ChatRecord;
use cr_domain::config::StoreConfig;
use cr_domain::error::{Error, Result};
use cr_domain::trace::TraceEvent;

use crate::store::ChatStore;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the chat document service.
///
/// Created once and shared by every request; the underlying
/// `reqwest::Client` keeps a connection pool.
#[derive(Debug, Clone)]
pub struct RestChatStore {
    http: Client,
    base_url: String,
    table: String,
    api_key: Option<String>,
}

impl RestChatStore {
    /// Build a client from config, reading the API key from the environment
    /// variable named by `cfg.api_key_env`.
    pub fn new(cfg: &StoreConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|k| !k.is_empty());
        Self::with_api_key(cfg, api_key)
    }

    pub fn with_api_key(cfg: &StoreConfig, api_key: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .map_err(|e| Error::Persistence(format!("failed to initialize store client: {e}")))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            table: cfg.table.clone(),
            api_key,
        })
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Decorate a `RequestBuilder` with the standard ChatRelay headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        let trace_id = Uuid::new_v4().to_string();
        let mut rb = rb
            .header("X-Client-Type", "chatrelay")
            .header("X-Trace-Id", &trace_id);

        if let Some(ref key) = self.api_key {
            rb = rb.header("X-Api-Key", key);
        }
        rb
    }

    /// URL of the item with `id`, each part encoded as one path segment.
    fn item_url(&self, id: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Persistence(format!("invalid store base_url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| Error::Persistence("store base_url cannot be a base".into()))?
            .pop_if_empty()
            .extend(["tables", self.table.as_str(), "items", id]);
        Ok(url)
    }

    /// Send once and record a `StoreCall` trace event.
    async fn send(&self, endpoint: &str, rb: RequestBuilder) -> Result<reqwest::Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let status = match &result {
            Ok(resp) => resp.status().as_u16(),
            Err(e) => e.status().map(|s| s.as_u16()).unwrap_or(0),
        };
        TraceEvent::StoreCall {
            endpoint: endpoint.to_owned(),
            status,
            duration_ms,
        }
        .emit();

        result.map_err(|e| Error::Persistence(format!("{endpoint}: {e}")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl ChatStore for RestChatStore {
    async fn put(&self, record: &ChatRecord) -> Result<()> {
        let url = self.item_url(&record.id)?;
        let resp = self.send("PUT item", self.http.put(url).json(record)).await?;

        let status = resp.status();
        if !status.is_success() {
            // The body may echo the rejected record; it stays in the logs.
            let body = resp.text().await.unwrap_or_default();
            tracing::error!(
                chat_id = %record.id,
                status = status.as_u16(),
                body = %body,
                "store rejected chat write"
            );
            return Err(Error::Persistence(format!(
                "store rejected write ({})",
                status.as_u16()
            )));
        }
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ChatRecord>> {
        let url = self.item_url(id)?;
        let resp = self.send("GET item", self.http.get(url)).await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Persistence(format!("reading store response: {e}")))?;
        if !status.is_success() {
            tracing::error!(chat_id = %id, status = status.as_u16(), body = %body, "store rejected chat read");
            return Err(Error::Persistence(format!(
                "store rejected read ({})",
                status.as_u16()
            )));
        }
        serde_json::from_str(&body).map(Some).map_err(|e| {
            tracing::error!(chat_id = %id, error = %e, body = %body, "unreadable chat record");
            Error::Persistence(format!("unreadable chat record: {e}"))
        })
    }

    fn backend(&self) -> &'static str {
        "rest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base_url: &str, table: &str) -> RestChatStore {
        let cfg = StoreConfig {
            base_url: base_url.into(),
            table: table.into(),
            ..StoreConfig::default()
        };
        RestChatStore::with_api_key(&cfg, None).unwrap()
    }

    #[test]
    fn item_url_layout() {
        let url = store("http://docs.local/", "test-chat").item_url("abc").unwrap();
        assert_eq!(url.as_str(), "http://docs.local/tables/test-chat/items/abc");
    }

    #[test]
    fn item_url_encodes_ids() {
        let url = store("http://docs.local", "chats").item_url("a b/c").unwrap();
        assert_eq!(url.path(), "/tables/chats/items/a%20b%2Fc");
    }
}
