//! CachePolicy - キャッシュの有効期限の判断

use chrono::{DateTime, TimeDelta, Utc};

/// CachePolicy はスナップショットが有効かどうかを決める
///
/// 純粋関数。Clock も store も持たず、`now` は呼び出し側が渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// 保存してから有効な期間
    pub max_age: TimeDelta,
}

impl CachePolicy {
    pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

    pub fn new(max_age: TimeDelta) -> Self {
        Self { max_age }
    }

    pub fn with_max_age_days(days: u32) -> Self {
        Self::new(TimeDelta::days(i64::from(days)))
    }

    /// `now < timestamp + max_age` の間だけ有効
    ///
    /// 期限ちょうどは無効。`timestamp + max_age` が表現できない（overflow）場合も無効。
    pub fn is_valid(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match timestamp.checked_add_signed(self.max_age) {
            Some(expires_at) => now < expires_at,
            None => false,
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::new(TimeDelta::days(Self::DEFAULT_MAX_AGE_DAYS))
    }
}
