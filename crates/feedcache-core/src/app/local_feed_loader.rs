//! LocalFeedLoader - ローカルキャッシュのオーケストレーター
//!
//! FeedStore・Clock・CachePolicy を組み合わせて save / load / validate_cache を実装します。
//!
//! # 副作用のルール
//! - save: delete → (成功時のみ) insert
//! - load: retrieve のみ。エラーでも期限切れでも削除しない
//! - validate_cache: retrieve → (エラー or 期限切れなら) delete
//!
//! # 破棄時の扱い
//! 各操作は `&self` を借用する future です。loader より長生きできないので、
//! loader を破棄する = 実行中の future を drop する、になります。
//! drop された future は結果を返さず、次の store 操作も発行しません。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::cache_policy::CachePolicy;
use crate::domain::{CacheError, FeedImage, LocalFeedImage};
use crate::ports::{Clock, FeedLoader, FeedStore};

/// LocalFeedLoader はキャッシュの読み書きと有効期限の判断を行う
///
/// # 使用例
/// ```ignore
/// let loader = LocalFeedLoader::new(store, Arc::new(SystemClock));
/// loader.save(&feed).await?;
/// let cached = loader.load().await?;
/// ```
pub struct LocalFeedLoader {
    store: Arc<dyn FeedStore>,
    clock: Arc<dyn Clock>,
    policy: CachePolicy,
}

impl LocalFeedLoader {
    /// デフォルトの CachePolicy（7 日）で作成
    pub fn new(store: Arc<dyn FeedStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_policy(store, clock, CachePolicy::default())
    }

    pub fn with_policy(
        store: Arc<dyn FeedStore>,
        clock: Arc<dyn Clock>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// 既存のキャッシュを削除してから feed を現在時刻付きで保存する
    ///
    /// 削除に失敗した場合は insert を試みずに `CacheError::Deletion` を返す。
    pub async fn save(&self, feed: &[FeedImage]) -> Result<(), CacheError> {
        self.store
            .delete_cached_feed()
            .await
            .map_err(CacheError::Deletion)?;

        let timestamp = self.clock.now();
        let local: Vec<LocalFeedImage> = feed.iter().map(LocalFeedImage::from).collect();
        debug!(images = local.len(), %timestamp, "inserting feed into cache");

        self.store
            .insert(local, timestamp)
            .await
            .map_err(CacheError::Insertion)
    }

    /// キャッシュされた feed を返す
    ///
    /// - 空 or 期限切れ → `Ok(vec![])`
    /// - retrieve エラー → `CacheError::Retrieval`（削除はしない）
    pub async fn load(&self) -> Result<Vec<FeedImage>, CacheError> {
        let cached = self
            .store
            .retrieve()
            .await
            .map_err(CacheError::Retrieval)?;

        match cached {
            Some(cache) if self.policy.is_valid(cache.timestamp, self.clock.now()) => {
                debug!(images = cache.feed.len(), "loaded feed from cache");
                Ok(cache.feed.into_iter().map(FeedImage::from).collect())
            }
            Some(cache) => {
                debug!(timestamp = %cache.timestamp, "cached feed expired");
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    /// 読めない・期限切れのキャッシュを削除する
    ///
    /// retrieve のエラーは呼び出し元に返さない（削除で自己修復する）。
    /// 返すのは、ここで発行した削除の結果だけ。
    pub async fn validate_cache(&self) -> Result<(), CacheError> {
        match self.store.retrieve().await {
            Err(e) => {
                warn!(error = %e, "cached feed unreadable, deleting it");
            }
            Ok(Some(cache)) if !self.policy.is_valid(cache.timestamp, self.clock.now()) => {
                info!(timestamp = %cache.timestamp, "cached feed expired, deleting it");
            }
            Ok(_) => return Ok(()),
        }

        self.store
            .delete_cached_feed()
            .await
            .map_err(CacheError::Deletion)
    }
}

#[async_trait]
impl FeedLoader for LocalFeedLoader {
    async fn load(&self) -> Result<Vec<FeedImage>, CacheError> {
        LocalFeedLoader::load(self).await
    }
}
