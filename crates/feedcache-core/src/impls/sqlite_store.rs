//! SqliteFeedStore - SQLite に保存する FeedStore（`database` feature）
//!
//! # 学習ポイント
//! - 接続は 1 本だけ。ワーカータスクが所有し、Command を channel で受け取る
//! - 送った順に 1 件ずつ処理する（FIFO）
//! - 各操作はトランザクション内で実行する

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{Connection, Row};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use super::file_store::SCHEMA_VERSION;
use crate::domain::{CachedFeed, LocalFeedImage, StoreError};
use crate::ports::FeedStore;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS feed_cache (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        version INTEGER NOT NULL,
        timestamp TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS feed_image (
        position INTEGER PRIMARY KEY,
        image_id TEXT NOT NULL,
        description TEXT,
        location TEXT,
        url TEXT NOT NULL
    );
"#;

type Reply<T> = oneshot::Sender<Result<T, StoreError>>;

enum Command {
    Retrieve(Reply<Option<CachedFeed>>),
    Insert {
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
        reply: Reply<()>,
    },
    Delete(Reply<()>),
}

/// SqliteFeedStore は SQLite データベースを持つ FeedStore
pub struct SqliteFeedStore {
    commands: mpsc::UnboundedSender<Command>,
}

impl SqliteFeedStore {
    /// データベースファイルを開く（無ければ作る）
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io(parent, e))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        Self::open_with(options).await
    }

    /// このインスタンス専用のインメモリ DB を開く
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        Self::open_with(SqliteConnectOptions::from_str("sqlite::memory:")?).await
    }

    async fn open_with(options: SqliteConnectOptions) -> Result<Self, StoreError> {
        let mut conn = SqliteConnection::connect_with(&options).await?;
        sqlx::raw_sql(SCHEMA).execute(&mut conn).await?;

        let (commands, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(conn, receiver));
        Ok(Self { commands })
    }

    async fn submit<T>(
        &self,
        command: Command,
        reply: oneshot::Receiver<Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        self.commands
            .send(command)
            .map_err(|_| StoreError::QueueClosed)?;
        reply.await.map_err(|_| StoreError::QueueClosed)?
    }
}

#[async_trait]
impl FeedStore for SqliteFeedStore {
    async fn delete_cached_feed(&self) -> Result<(), StoreError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Delete(reply), rx).await
    }

    async fn insert(
        &self,
        feed: Vec<LocalFeedImage>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let (reply, rx) = oneshot::channel();
        self.submit(
            Command::Insert {
                feed,
                timestamp,
                reply,
            },
            rx,
        )
        .await
    }

    async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Command::Retrieve(reply), rx).await
    }
}

async fn run_worker(mut conn: SqliteConnection, mut commands: mpsc::UnboundedReceiver<Command>) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Retrieve(reply) => {
                let result = retrieve(&mut conn).await;
                let _ = reply.send(result);
            }
            Command::Insert {
                feed,
                timestamp,
                reply,
            } => {
                debug!(images = feed.len(), %timestamp, "inserting cached feed");
                let result = insert(&mut conn, &feed, timestamp).await;
                if let Err(e) = &result {
                    warn!(error = %e, "failed to insert cached feed");
                }
                let _ = reply.send(result);
            }
            Command::Delete(reply) => {
                debug!("deleting cached feed");
                let result = delete(&mut conn).await;
                if let Err(e) = &result {
                    warn!(error = %e, "failed to delete cached feed");
                }
                let _ = reply.send(result);
            }
        }
    }

    if let Err(e) = conn.close().await {
        warn!(error = %e, "failed to close feed cache database");
    }
}

async fn retrieve(conn: &mut SqliteConnection) -> Result<Option<CachedFeed>, StoreError> {
    let Some(row) = sqlx::query("SELECT version, timestamp FROM feed_cache WHERE id = 1")
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    let version: i64 = row.try_get("version")?;
    if version != i64::from(SCHEMA_VERSION) {
        return Err(StoreError::UnsupportedVersion {
            found: u32::try_from(version).unwrap_or(u32::MAX),
            expected: SCHEMA_VERSION,
        });
    }
    let timestamp: String = row.try_get("timestamp")?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| StoreError::Decode(format!("timestamp: {e}")))?
        .with_timezone(&Utc);

    let rows = sqlx::query(
        "SELECT image_id, description, location, url FROM feed_image ORDER BY position",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut feed = Vec::with_capacity(rows.len());
    for row in rows {
        let id: String = row.try_get("image_id")?;
        let url: String = row.try_get("url")?;
        feed.push(LocalFeedImage {
            id: Uuid::parse_str(&id).map_err(|e| StoreError::Decode(format!("image id: {e}")))?,
            description: row.try_get("description")?,
            location: row.try_get("location")?,
            url: Url::parse(&url).map_err(|e| StoreError::Decode(format!("image url: {e}")))?,
        });
    }

    Ok(Some(CachedFeed::new(feed, timestamp)))
}

async fn insert(
    conn: &mut SqliteConnection,
    feed: &[LocalFeedImage],
    timestamp: DateTime<Utc>,
) -> Result<(), StoreError> {
    let mut tx = conn.begin().await?;

    sqlx::query("DELETE FROM feed_image").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM feed_cache").execute(&mut *tx).await?;
    sqlx::query("INSERT INTO feed_cache (id, version, timestamp) VALUES (1, ?, ?)")
        .bind(i64::from(SCHEMA_VERSION))
        .bind(timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true))
        .execute(&mut *tx)
        .await?;

    for (position, image) in feed.iter().enumerate() {
        sqlx::query(
            "INSERT INTO feed_image (position, image_id, description, location, url) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(position as i64)
        .bind(image.id.to_string())
        .bind(image.description.as_deref())
        .bind(image.location.as_deref())
        .bind(image.url.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

async fn delete(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    let mut tx = conn.begin().await?;
    sqlx::query("DELETE FROM feed_image").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM feed_cache").execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}
