//! FileFeedStore - JSON ファイルに保存する FeedStore
//!
//! スナップショットは 1 つの JSON ドキュメント:
//! `{ "version": 1, "feed": [...], "timestamp": "<RFC 3339>" }`
//!
//! # 学習ポイント
//! - 全操作を専用の [`SerialQueue`] で実行する（投入順に完了）
//! - 一時ファイルに書いてから rename（読み手に書きかけを見せない）
//! - ファイルが無い = 空キャッシュ（エラーではない）

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::serial_queue::SerialQueue;
use crate::domain::{CachedFeed, LocalFeedImage, StoreError};
use crate::ports::FeedStore;

/// 書き込むスキーマバージョン。これ以外は読み込み時にエラー
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct PersistedCache {
    version: u32,
    feed: Vec<LocalFeedImage>,
    timestamp: DateTime<Utc>,
}

/// FileFeedStore は 1 つの JSON ファイルを持つ FeedStore
pub struct FileFeedStore {
    store_path: PathBuf,
    queue: SerialQueue,
}

impl FileFeedStore {
    pub fn new(store_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self {
            store_path: store_path.into(),
            queue: SerialQueue::new("feed-store-queue")?,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    fn read(path: &Path) -> Result<Option<CachedFeed>, StoreError> {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };

        let cache: PersistedCache =
            serde_json::from_slice(&data).map_err(|e| StoreError::Decode(e.to_string()))?;
        if cache.version != SCHEMA_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: cache.version,
                expected: SCHEMA_VERSION,
            });
        }

        Ok(Some(CachedFeed::new(cache.feed, cache.timestamp)))
    }

    /// 隣の一時ファイルに書き、対象へ rename する
    fn write(path: &Path, cache: &PersistedCache) -> Result<(), StoreError> {
        let data = serde_json::to_vec(cache).map_err(|e| StoreError::Encode(e.to_string()))?;

        let tmp_path = temp_path_for(path);
        if let Err(e) = fs::write(&tmp_path, &data) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::io(&tmp_path, e));
        }
        fs::rename(&tmp_path, path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            StoreError::io(path, e)
        })
    }

    fn remove(path: &Path) -> Result<(), StoreError> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl FeedStore for FileFeedStore {
    async fn delete_cached_feed(&self) -> Result<(), StoreError> {
        let path = self.store_path.clone();
        debug!(path = %path.display(), "deleting cached feed");
        let result = self.queue.run(move || Self::remove(&path)).await?;
        if let Err(e) = &result {
            warn!(error = %e, "failed to delete cached feed");
        }
        result
    }

    async fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let path = self.store_path.clone();
        debug!(path = %path.display(), images = feed.len(), %timestamp, "inserting cached feed");
        let cache = PersistedCache {
            version: SCHEMA_VERSION,
            feed,
            timestamp,
        };
        let result = self.queue.run(move || Self::write(&path, &cache)).await?;
        if let Err(e) = &result {
            warn!(error = %e, "failed to insert cached feed");
        }
        result
    }

    async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
        let path = self.store_path.clone();
        debug!(path = %path.display(), "retrieving cached feed");
        self.queue.run(move || Self::read(&path)).await?
    }
}
