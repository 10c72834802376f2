//! Domain - ドメインモデル（フィード画像、スナップショット、エラー）

pub mod errors;
pub mod feed;

pub use self::errors::{CacheError, StoreError};
pub use self::feed::{CachedFeed, FeedImage, LocalFeedImage};
