//! Errors - エラー型と分類
//!
//! - **StoreError**: FeedStore 実装が返す低レベルのエラー
//! - **CacheError**: LocalFeedLoader が呼び出し元に返すエラー（どの段階で失敗したか）
//!
//! 空キャッシュ・期限切れキャッシュはエラーではありません（成功として表現します）。

use std::path::PathBuf;

use thiserror::Error;

/// StoreError は永続化層のエラー
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode cached feed: {0}")]
    Decode(String),

    #[error("failed to encode cached feed: {0}")]
    Encode(String),

    #[error("unsupported cache schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("store queue is closed")]
    QueueClosed,

    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// CacheError は LocalFeedLoader の操作エラー
///
/// どの store 操作で失敗したかを variant で区別します。
/// リトライはしません（呼び出し元にそのまま返す）。
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to retrieve cached feed")]
    Retrieval(#[source] StoreError),

    #[error("failed to delete cached feed")]
    Deletion(#[source] StoreError),

    #[error("failed to insert feed into cache")]
    Insertion(#[source] StoreError),
}

impl CacheError {
    /// 元になった StoreError
    pub fn store_error(&self) -> &StoreError {
        match self {
            Self::Retrieval(e) | Self::Deletion(e) | Self::Insertion(e) => e,
        }
    }
}
