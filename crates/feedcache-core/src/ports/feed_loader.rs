//! FeedLoader port - フィードの取得元の抽象化
//!
//! リモート loader とローカルキャッシュが同じ trait を実装することで、
//! 呼び出し側（composition root）はどちらから読むかを意識しません。

use async_trait::async_trait;

use crate::domain::{CacheError, FeedImage};

#[async_trait]
pub trait FeedLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<FeedImage>, CacheError>;
}
