//! StoreFactory - CacheConfig から FeedStore を組み立てる

use std::sync::Arc;

use tracing::info;

use crate::config::{CacheConfig, StoreBackend};
use crate::domain::StoreError;
use crate::impls::{FileFeedStore, InMemoryFeedStore};
use crate::ports::FeedStore;

/// FeedStore の生成
pub struct StoreFactory;

impl StoreFactory {
    /// `sqlite` backend は `database` feature が必要。
    /// feature なしで選ばれた場合は `StoreError::Io`（Unsupported）を返す。
    pub async fn create(config: &CacheConfig) -> Result<Arc<dyn FeedStore>, StoreError> {
        info!(backend = ?config.backend, path = %config.store_path.display(), "opening feed store");
        match config.backend {
            StoreBackend::Memory => Ok(Arc::new(InMemoryFeedStore::new())),
            StoreBackend::File => {
                if let Some(parent) = config.store_path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| StoreError::io(parent, e))?;
                }
                Ok(Arc::new(FileFeedStore::new(config.store_path.clone())?))
            }
            #[cfg(feature = "database")]
            StoreBackend::Sqlite => Ok(Arc::new(
                crate::impls::SqliteFeedStore::open(&config.store_path).await?,
            )),
            #[cfg(not(feature = "database"))]
            StoreBackend::Sqlite => Err(StoreError::io(
                &config.store_path,
                std::io::Error::new(
                    std::io::ErrorKind::Unsupported,
                    "sqlite backend requires the `database` feature",
                ),
            )),
        }
    }
}
