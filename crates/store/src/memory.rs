//! Process-local chat store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use cr_domain::chat::ChatRecord;
use cr_domain::error::Result;

use crate::store::ChatStore;

/// In-memory [`ChatStore`]. Records are lost when the process exits.
#[derive(Default)]
pub struct MemoryChatStore {
    records: RwLock<HashMap<String, ChatRecord>>,
}

impl MemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn put(&self, record: &ChatRecord) -> Result<()> {
        self.records
            .write()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<ChatRecord>> {
        Ok(self.records.read().get(id).cloned())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
