//! File-backed chat store.
//!
//! Keeps every record of one table in `{state_path}/{table}.json`, a JSON
//! object keyed by chat id. Each `put` rewrites the file through a temp
//! file and rename, so a reader never sees a half-written table. The write
//! runs on the blocking pool and puts are serialized by a write gate.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use cr_domain::chat::ChatRecord;
use cr_domain::error::{Error, Result};

use crate::store::ChatStore;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// File store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct FileChatStore {
    table_path: PathBuf,
    records: RwLock<HashMap<String, ChatRecord>>,
    /// Held across a whole `put` so table writes land in call order.
    write_gate: tokio::sync::Mutex<()>,
}

impl FileChatStore {
    /// Load or create the table file at `state_path/{table}.json`.
    pub fn new(state_path: &Path, table: &str) -> Result<Self> {
        std::fs::create_dir_all(state_path).map_err(|e| {
            Error::Persistence(format!("creating {}: {e}", state_path.display()))
        })?;

        let table_path = state_path.join(format!("{table}.json"));
        let records: HashMap<String, ChatRecord> = if table_path.exists() {
            let raw = std::fs::read_to_string(&table_path).map_err(|e| {
                Error::Persistence(format!("reading {}: {e}", table_path.display()))
            })?;
            serde_json::from_str(&raw).map_err(|e| {
                Error::Persistence(format!("parsing {}: {e}", table_path.display()))
            })?
        } else {
            HashMap::new()
        };

        tracing::info!(
            chats = records.len(),
            path = %table_path.display(),
            "chat store loaded"
        );

        Ok(Self {
            table_path,
            records: RwLock::new(records),
            write_gate: tokio::sync::Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.table_path
    }

    /// Number of stored chats.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

}

fn write_table(table_path: &Path, records: &HashMap<String, ChatRecord>) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| Error::Persistence(format!("serializing chats: {e}")))?;

    let dir = table_path.parent().unwrap_or(Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| Error::Persistence(format!("creating temp file: {e}")))?;
    tmp.write_all(json.as_bytes())
        .map_err(|e| Error::Persistence(format!("writing temp file: {e}")))?;
    tmp.persist(table_path).map_err(|e| {
        Error::Persistence(format!("replacing {}: {}", table_path.display(), e.error))
    })?;
    Ok(())
}

#[async_trait]
impl ChatStore for FileChatStore {
    async fn put(&self, record: &ChatRecord) -> Result<()> {
        let _gate = self.write_gate.lock().await;

        // Memory only changes once the table on disk has been replaced.
        let mut snapshot = self.records.read().clone();
        snapshot.insert(record.id.clone(), record.clone());

        let table_path = self.table_path.clone();
        let snapshot = tokio::task::spawn_blocking(move || {
            write_table(&table_path, &snapshot)?;
            Ok::<_, Error>(snapshot)
        })
        .await
        .map_err(|e| Error::Persistence(format!("write task failed: {e}")))??;

        *self.records.write() = snapshot;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ChatRecord>> {
        Ok(self.records.read().get(id).cloned())
    }

    fn backend(&self) -> &'static str {
        "file"
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
