//! feedcache-core
//!
//! ローカルフィードキャッシュ: 有効期限ポリシー、オーケストレーター、FeedStore 実装
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（FeedImage, LocalFeedImage, CachedFeed, errors）
//! - **ports**: 抽象化レイヤー（FeedStore, FeedLoader, Clock）
//! - **app**: アプリケーションロジック（CachePolicy, LocalFeedLoader）
//! - **impls**: FeedStore の実装（File, SQLite, InMemory）
//! - **config**: 設定（figment）

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;


pub use app::{CachePolicy, LocalFeedLoader};
pub use config::{CacheConfig, ConfigError, StoreBackend};
pub use domain::{CacheError, CachedFeed, FeedImage, LocalFeedImage, StoreError};
pub use ports::{Clock, FeedLoader, FeedStore, FixedClock, SystemClock};
