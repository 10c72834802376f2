//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてキャッシュのロジックを実装します。
//!
//! # 主要コンポーネント
//! - **CachePolicy**: 有効期限の判断（純粋関数）
//! - **LocalFeedLoader**: save / load / validate_cache のオーケストレーション

pub mod cache_policy;
pub mod local_feed_loader;

// 主要な型を再エクスポート
pub use self::cache_policy::CachePolicy;
pub use self::local_feed_loader::LocalFeedLoader;
