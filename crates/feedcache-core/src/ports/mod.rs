//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 永続化（ファイル、SQLite）と時刻を trait の裏に隠し、
//! LocalFeedLoader をテスト可能に保ちます。

pub mod clock;
pub mod feed_loader;
pub mod feed_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::feed_loader::FeedLoader;
pub use self::feed_store::FeedStore;
