//! `cr-store`: chat persistence for ChatRelay.
//!
//! Provides the [`ChatStore`] trait and three backends:
//!
//! | Backend  | Implementation     | Best for                          |
//! |----------|--------------------|-----------------------------------|
//! | `file`   | [`FileChatStore`]  | Single-node deployments (default) |
//! | `rest`   | [`RestChatStore`]  | Shared document service           |
//! | `memory` | [`MemoryChatStore`]| Tests and throwaway runs          |
//!
//! Use [`create_store`] to build the one selected by `store.backend`.

pub mod file;
pub mod memory;
pub mod rest;
pub mod store;

pub use file::FileChatStore;
pub use memory::MemoryChatStore;
pub use rest::RestChatStore;
pub use store::ChatStore;

use std::sync::Arc;

use cr_domain::config::{StoreBackend, StoreConfig};
use cr_domain::error::Result;

/// Create the [`ChatStore`] selected by `cfg.backend`.
pub fn create_store(cfg: &StoreConfig) -> Result<Arc<dyn ChatStore>> {
    let store: Arc<dyn ChatStore> = match cfg.backend {
        StoreBackend::File => Arc::new(FileChatStore::new(&cfg.path, &cfg.table)?),
        StoreBackend::Rest => {
            tracing::info!(base_url = %cfg.base_url, table = %cfg.table, "using REST chat store");
            Arc::new(RestChatStore::new(cfg)?)
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory chat store; chats are lost on restart");
            Arc::new(MemoryChatStore::new())
        }
    };
    tracing::info!(backend = cfg.backend.as_str(), table = %cfg.table, "chat store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_honours_backend() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = StoreConfig {
            path: dir.path().to_path_buf(),
            ..StoreConfig::default()
        };
        assert_eq!(create_store(&cfg).unwrap().backend(), "file");

        cfg.backend = StoreBackend::Memory;
        assert_eq!(create_store(&cfg).unwrap().backend(), "memory");

        cfg.backend = StoreBackend::Rest;
        assert_eq!(create_store(&cfg).unwrap().backend(), "rest");
    }

    #[test]
    fn configured_name_matches_built_backend() {
        let dir = tempfile::tempdir().unwrap();
        for backend in [StoreBackend::File, StoreBackend::Rest, StoreBackend::Memory] {
            let cfg = StoreConfig {
                backend,
                path: dir.path().to_path_buf(),
                ..StoreConfig::default()
            };
            assert_eq!(create_store(&cfg).unwrap().backend(), cfg.backend.as_str());
        }
    }
}
