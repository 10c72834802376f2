//! Config - キャッシュの設定
//!
//! figment で重ねる: デフォルト → TOML ファイル（任意）→ `FEEDCACHE_*` 環境変数

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app::CachePolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid cache configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("max_age_days must be at least 1")]
    ZeroMaxAge,
}

/// どの FeedStore 実装を使うか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    File,
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_age_days: u32,
    pub backend: StoreBackend,
    pub store_path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let store_path = dirs::cache_dir()
            .map(|d| d.join("feedcache").join("feed-store.json"))
            .unwrap_or_else(|| PathBuf::from(".feedcache/feed-store.json"));
        Self {
            max_age_days: CachePolicy::DEFAULT_MAX_AGE_DAYS as u32,
            backend: StoreBackend::File,
            store_path,
        }
    }
}

impl CacheConfig {
    /// デフォルト → `config_path`（存在すれば）→ 環境変数
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(CacheConfig::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("FEEDCACHE_"));
        Self::extract(figment)
    }

    /// デフォルトに TOML 文字列を重ねる
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(CacheConfig::default()))
                .merge(Toml::string(toml)),
        )
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(Box::new)?;
        if config.max_age_days == 0 {
            return Err(ConfigError::ZeroMaxAge);
        }
        Ok(config)
    }

    pub fn policy(&self) -> CachePolicy {
        CachePolicy::with_max_age_days(self.max_age_days)
    }
}
