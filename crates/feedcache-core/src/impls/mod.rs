//! Impls - FeedStore の実装
//!
//! # 含まれる実装
//! - **FileFeedStore**: JSON ファイル（SerialQueue で直列化）
//! - **SqliteFeedStore**: SQLite（`database` feature、専用ワーカータスクで直列化）
//! - **InMemoryFeedStore**: 開発・テスト用
//! - **StoreFactory**: CacheConfig から FeedStore を組み立てる

pub mod factory;
pub mod file_store;
pub mod inmem_store;
pub mod serial_queue;
#[cfg(feature = "database")]
pub mod sqlite_store;

#[cfg(test)]
pub(crate) mod store_specs;

// 主要な型を再エクスポート
pub use self::factory::StoreFactory;
pub use self::file_store::FileFeedStore;
pub use self::inmem_store::InMemoryFeedStore;
pub use self::serial_queue::SerialQueue;
#[cfg(feature = "database")]
pub use self::sqlite_store::SqliteFeedStore;
