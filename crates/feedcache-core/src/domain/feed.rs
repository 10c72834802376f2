//! Feed - フィード画像のドメインモデルと永続化モデル
//!
//! # 二層構造
//! - **FeedImage**: リモート loader が生成するドメインモデル
//! - **LocalFeedImage**: FeedStore が扱う永続化モデル
//!
//! 変換は LocalFeedLoader の中だけで行います（フィールドの追加・欠落なし）。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// FeedImage はフィードに表示される 1 枚の画像
///
/// identity は `id`。値としては immutable に扱います。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedImage {
    pub id: Uuid,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Url,
}

impl FeedImage {
    pub fn new(
        id: Uuid,
        description: Option<String>,
        location: Option<String>,
        url: Url,
    ) -> Self {
        Self {
            id,
            description,
            location,
            url,
        }
    }
}

/// LocalFeedImage は FeedStore に保存される形
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFeedImage {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub url: Url,
}

impl From<&FeedImage> for LocalFeedImage {
    fn from(image: &FeedImage) -> Self {
        Self {
            id: image.id,
            description: image.description.clone(),
            location: image.location.clone(),
            url: image.url.clone(),
        }
    }
}

impl From<LocalFeedImage> for FeedImage {
    fn from(local: LocalFeedImage) -> Self {
        Self {
            id: local.id,
            description: local.description,
            location: local.location,
            url: local.url,
        }
    }
}

/// CachedFeed は最後に保存された時点のフィード（スナップショット）
///
/// retrieve の結果は「全部ある」か「何もない（None）」のどちらかで、
/// 一部だけのレコードが見えることはありません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedFeed {
    pub feed: Vec<LocalFeedImage>,
    pub timestamp: DateTime<Utc>,
}

impl CachedFeed {
    pub fn new(feed: Vec<LocalFeedImage>, timestamp: DateTime<Utc>) -> Self {
        Self { feed, timestamp }
    }
}
