//! The `ChatStore` trait defines the interface for all chat persistence
//! backends (file, REST, in-memory, test doubles).

use async_trait::async_trait;
use cr_domain::chat::ChatRecord;
use cr_domain::error::Result;

/// Keyed storage for finished chat records.
///
/// `put` is a single unconditional write keyed by `record.id`: an existing
/// record with the same id is replaced without any check. Every backend
/// failure is reported as `Error::Persistence`.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Write `record`, replacing any record with the same id.
    async fn put(&self, record: &ChatRecord) -> Result<()>;

    /// Read a record back by id.
    async fn get(&self, id: &str) -> Result<Option<ChatRecord>>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}
