//! FeedStore 共通の契約テスト
//!
//! 各実装のテストモジュールが、新しいインスタンスに対して呼び出す。

use std::future::Future;
use std::task::Poll;

use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{CachedFeed, LocalFeedImage, StoreError};
use crate::ports::FeedStore;
use crate::test_support::unique_image_feed;

pub(crate) fn unique_local_feed() -> Vec<LocalFeedImage> {
    unique_image_feed().1
}

pub(crate) async fn insert(
    sut: &dyn FeedStore,
    feed: Vec<LocalFeedImage>,
    timestamp: DateTime<Utc>,
) -> Result<(), StoreError> {
    sut.insert(feed, timestamp).await
}

async fn expect_empty(sut: &dyn FeedStore) {
    let result = sut.retrieve().await;
    assert!(
        matches!(result, Ok(None)),
        "expected empty cache, got {result:?}"
    );
}

async fn expect_found(sut: &dyn FeedStore, expected: &CachedFeed) {
    match sut.retrieve().await {
        Ok(Some(found)) => {
            assert_eq!(found.feed, expected.feed);
            assert_eq!(found.timestamp, expected.timestamp);
        }
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}

pub(crate) async fn assert_retrieve_delivers_empty_on_empty_cache(sut: &dyn FeedStore) {
    expect_empty(sut).await;
}

pub(crate) async fn assert_retrieve_has_no_side_effects_on_empty_cache(sut: &dyn FeedStore) {
    expect_empty(sut).await;
    expect_empty(sut).await;
}

pub(crate) async fn assert_retrieve_delivers_found_values_on_non_empty_cache(
    sut: &dyn FeedStore,
) {
    let expected = CachedFeed::new(unique_local_feed(), Utc::now());
    insert(sut, expected.feed.clone(), expected.timestamp)
        .await
        .unwrap();

    expect_found(sut, &expected).await;
}

pub(crate) async fn assert_retrieve_has_no_side_effects_on_non_empty_cache(sut: &dyn FeedStore) {
    let expected = CachedFeed::new(unique_local_feed(), Utc::now());
    insert(sut, expected.feed.clone(), expected.timestamp)
        .await
        .unwrap();

    expect_found(sut, &expected).await;
    expect_found(sut, &expected).await;
}

/// store には読めないデータが入っていること
pub(crate) async fn assert_retrieve_delivers_failure(sut: &dyn FeedStore) {
    assert!(sut.retrieve().await.is_err());
}

/// store には読めないデータが入っていること
pub(crate) async fn assert_retrieve_has_no_side_effects_on_failure(sut: &dyn FeedStore) {
    assert!(sut.retrieve().await.is_err());
    assert!(sut.retrieve().await.is_err());
}

pub(crate) async fn assert_insert_delivers_no_error_on_empty_cache(sut: &dyn FeedStore) {
    let result = insert(sut, unique_local_feed(), Utc::now()).await;
    assert!(result.is_ok(), "expected to insert cache successfully");
}

pub(crate) async fn assert_insert_delivers_no_error_on_non_empty_cache(sut: &dyn FeedStore) {
    insert(sut, unique_local_feed(), Utc::now()).await.unwrap();

    let result = insert(sut, unique_local_feed(), Utc::now()).await;
    assert!(result.is_ok(), "expected to override cache successfully");
}

pub(crate) async fn assert_insert_overrides_previously_inserted_cache_values(
    sut: &dyn FeedStore,
) {
    insert(sut, unique_local_feed(), Utc::now() - TimeDelta::days(1))
        .await
        .unwrap();

    let latest = CachedFeed::new(unique_local_feed(), Utc::now());
    insert(sut, latest.feed.clone(), latest.timestamp)
        .await
        .unwrap();

    expect_found(sut, &latest).await;
}

/// store は書き込みが失敗する状態にしておくこと
pub(crate) async fn assert_insert_delivers_error(sut: &dyn FeedStore) {
    let result = insert(sut, unique_local_feed(), Utc::now()).await;
    assert!(result.is_err(), "expected cache insertion to fail");
}

pub(crate) async fn assert_delete_delivers_no_error_on_empty_cache(sut: &dyn FeedStore) {
    assert!(sut.delete_cached_feed().await.is_ok());
}

pub(crate) async fn assert_delete_has_no_side_effects_on_empty_cache(sut: &dyn FeedStore) {
    sut.delete_cached_feed().await.unwrap();
    expect_empty(sut).await;
}

pub(crate) async fn assert_delete_delivers_no_error_on_non_empty_cache(sut: &dyn FeedStore) {
    insert(sut, unique_local_feed(), Utc::now()).await.unwrap();
    assert!(sut.delete_cached_feed().await.is_ok());
}

pub(crate) async fn assert_delete_empties_previously_inserted_cache(sut: &dyn FeedStore) {
    insert(sut, unique_local_feed(), Utc::now()).await.unwrap();
    sut.delete_cached_feed().await.unwrap();
    expect_empty(sut).await;
}

/// insert -> delete -> insert, submitted back to back.
///
/// 完了順を記録する。最初の poll は投入順 (0 -> 2) で行い、以降は逆順 (2 -> 0)
/// で poll する。直列なストアなら、後の操作が完了済みと観測された時点で前の操作も
/// 完了しているので、同じ round で拾える。round 内は投入順に並べて記録する。
pub(crate) async fn assert_side_effects_run_serially(sut: &dyn FeedStore) {
    let last = CachedFeed::new(unique_local_feed(), Utc::now());

    let mut ops = [
        ("insert", sut.insert(unique_local_feed(), Utc::now())),
        ("delete", sut.delete_cached_feed()),
        ("insert", sut.insert(last.feed.clone(), last.timestamp)),
    ];
    let mut results: [Option<Result<(), StoreError>>; 3] = [None, None, None];
    let mut completed: Vec<&str> = Vec::new();
    let mut submitted = false;

    std::future::poll_fn(|cx| {
        let n = ops.len();
        let order: Vec<usize> = if submitted {
            (0..n).rev().collect()
        } else {
            submitted = true;
            (0..n).chain((0..n).rev()).collect()
        };

        let mut round = Vec::new();
        for i in order {
            if results[i].is_some() {
                continue;
            }
            if let Poll::Ready(result) = ops[i].1.as_mut().poll(cx) {
                results[i] = Some(result);
                round.push(i);
            }
        }
        round.sort_unstable();
        completed.extend(round.into_iter().map(|i| ops[i].0));

        if results.iter().all(Option::is_some) {
            Poll::Ready(())
        } else {
            Poll::Pending
        }
    })
    .await;

    assert_eq!(
        completed,
        ["insert", "delete", "insert"],
        "side effects must complete in submission order"
    );
    for result in results {
        assert!(matches!(result, Some(Ok(()))), "unexpected result {result:?}");
    }

    expect_found(sut, &last).await;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;

    /// delete は即座に、insert は遅れて完了するストア
    struct ReorderingStore;

    #[async_trait]
    impl FeedStore for ReorderingStore {
        async fn delete_cached_feed(&self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn insert(
            &self,
            _feed: Vec<LocalFeedImage>,
            _timestamp: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok(())
        }

        async fn retrieve(&self) -> Result<Option<CachedFeed>, StoreError> {
            Ok(None)
        }
    }

    #[tokio::test]
    #[should_panic(expected = "submission order")]
    async fn serial_check_rejects_out_of_order_completions() {
        assert_side_effects_run_serially(&ReorderingStore).await;
    }
}
