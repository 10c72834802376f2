//! InMemoryFeedStore - 開発用の FeedStore
//!
//! # 学習ポイント
//! - tokio::sync::Mutex は待ち行列が FIFO（公平）なので、直列化の道具になる
//! - ロックを保持したまま await しない

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::{CachedFeed, LocalFeedImage, StoreError};
use crate::ports::FeedStore;

/// InMemoryFeedStore はプロセス内だけで生きるスナップショット
///
/// # 使用例
/// ```ignore
/// let store = InMemoryFeedStore::new();
/// store.insert(feed, Utc::now()).await?;
/// let cached = store.retrieve().await?;
/// ```
#[derive(Default)]
pub struct InMemoryFeedStore {
    cache: Mutex<Option<CachedFeed>>,
}

impl InMemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedStore for InMemoryFeedStore {
    async fn delete_cached_feed(&self) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().await;
        debug!(had_cache = cache.is_some(), "deleting in-memory feed cache");
        *cache = None;
        Ok(())
    }

    async fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut cache = self.cache.lock().await;
        *cache = Some(CachedFeed::new(feed, timestamp));
        Ok(())
    }

    async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
        Ok(self.cache.lock().await.clone())
    }
}
