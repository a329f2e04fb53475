use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON file under `path`, one object keyed by chat id.
    File,
    /// Remote key-value document service over HTTP.
    Rest,
    /// Process-local map; contents are lost on exit.
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::File => "file",
            StoreBackend::Rest => "rest",
            StoreBackend::Memory => "memory",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "d_backend")]
    pub backend: StoreBackend,
    /// State directory for the `file` backend.
    #[serde(default = "d_path")]
    pub path: PathBuf,
    /// Table (collection) name records are written to.
    #[serde(default = "d_table")]
    pub table: String,
    /// Base URL for the `rest` backend.
    #[serde(default = "d_store_url")]
    pub base_url: String,
    /// Environment variable holding an optional API key for the `rest`
    /// backend, sent as `X-Api-Key`.
    #[serde(default = "d_store_key_env")]
    pub api_key_env: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: d_backend(),
            path: d_path(),
            table: d_table(),
            base_url: d_store_url(),
            api_key_env: d_store_key_env(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_backend() -> StoreBackend {
    StoreBackend::File
}
fn d_path() -> PathBuf {
    PathBuf::from("./data")
}
fn d_table() -> String {
    "chats".into()
}
fn d_store_url() -> String {
    "http://localhost:8000".into()
}
fn d_store_key_env() -> String {
    "CR_STORE_API_KEY".into()
}
