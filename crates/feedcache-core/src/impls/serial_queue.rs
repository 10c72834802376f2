//! SerialQueue - 単一ワーカーの直列実行キュー
//!
//! # 学習ポイント
//! - 専用スレッド + mpsc による actor 風の直列化
//! - blocking 処理を async から呼ぶ（oneshot で結果を返す）
//! - 投入順 = 実行順 = 完了順（FIFO）

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::domain::StoreError;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// SerialQueue はジョブを 1 本のワーカースレッドで順番に実行する
///
/// # 実装詳細
/// - unbounded mpsc でジョブを送る（送信は同期なので呼び出し順に並ぶ）
/// - ワーカーは `blocking_recv` で待つ（tokio runtime の外で動く）
/// - SerialQueue を drop すると送信側が閉じ、残りを処理してからスレッドが終わる
/// - ジョブが panic してもワーカーは止まらない（そのジョブだけ `QueueClosed`）
pub struct SerialQueue {
    label: String,
    sender: mpsc::UnboundedSender<Job>,
}

impl SerialQueue {
    pub fn new(label: impl Into<String>) -> Result<Self, StoreError> {
        let label = label.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        let worker_label = label.clone();
        thread::Builder::new()
            .name(label.clone())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        warn!(queue = %worker_label, "serial queue job panicked");
                    }
                }
                debug!(queue = %worker_label, "serial queue drained");
            })
            .map_err(|e| StoreError::io(&label, e))?;

        Ok(Self { label, sender })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `op` をキューに積み、その結果を待つ future を返す
    ///
    /// 積むのは呼び出した時点（future を poll する前）。
    pub fn run<T, F>(&self, op: F) -> impl Future<Output = Result<T, StoreError>> + Send + 'static
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let submitted = self
            .sender
            .send(Box::new(move || {
                // receiver が drop 済みなら結果は捨てる
                let _ = tx.send(op());
            }))
            .map_err(|_| StoreError::QueueClosed);

        let label = self.label.clone();
        async move {
            submitted?;
            rx.await.map_err(|_| {
                warn!(queue = %label, "serial queue dropped a job without result");
                StoreError::QueueClosed
            })
        }
    }
}
