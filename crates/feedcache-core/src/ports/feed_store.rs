//! FeedStore port - フィードスナップショットの永続化
//!
//! FeedStore は「どう保存するか」だけを担当します。
//! 「いつ読む・書く・消すか」と有効期限の判断は LocalFeedLoader 側の責務です。
//!
//! # 実装
//! - **FileFeedStore**: JSON ファイル + 専用ワーカースレッド
//! - **SqliteFeedStore**: SQLite（`database` feature）
//! - **InMemoryFeedStore**: 開発・テスト用

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CachedFeed, LocalFeedImage, StoreError};

/// FeedStore はキャッシュされたフィードの retrieve / insert / delete を提供
///
/// # 並行性の契約
/// - 実装は全操作を単一の直列コンテキストで実行する（投入順 = 完了順）
/// - 完了はどのスレッドで起きてもよい。呼び出し元は実行コンテキストを仮定しないこと
///
/// # Thread Safety
/// - `Send + Sync` を要求（`Arc<dyn FeedStore>` で共有するため）
#[async_trait]
pub trait FeedStore: Send + Sync {
    /// 既存のスナップショットを削除する。空のキャッシュの削除は成功。
    async fn delete_cached_feed(&self) -> Result<(), StoreError>;

    /// スナップショットを丸ごと置き換える
    async fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// スナップショットを読む。保存されていなければ `Ok(None)`。
    async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError>;
}
