//! Cache construction from a configuration descriptor.

use chrono::Duration;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use super::kv::{KeyValueStore, SqliteKeyValueStore, StoreError};
use super::service::CacheService;
use super::storage::{CacheStorage, MemoryStorage, PersistedStorage};

/// Namespace used when the configuration does not name one.
pub const DEFAULT_NAMESPACE: &str = "desk365";

/// Which storage backend to construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
  #[default]
  Memory,
  Persisted,
}

/// Configuration consumed by the factory.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
  pub storage_type: StorageType,
  /// Default TTL applied to entries whose write options carry none.
  pub default_ttl: Option<Duration>,
  pub namespace: Option<String>,
}

pub struct CacheFactory;

impl CacheFactory {
  /// Construct a ready-to-use cache service.
  ///
  /// Never fails: when the persisted store cannot be opened in this
  /// environment, the factory logs a warning and falls back to the
  /// in-memory backend.
  pub fn create(config: &CacheConfig) -> CacheService {
    Self::create_with_provider(config, || {
      SqliteKeyValueStore::open().map(|s| Arc::new(s) as Arc<dyn KeyValueStore>)
    })
  }

  /// Like [`create`], with the persisted store supplied by `provider`.
  /// Seam for tests and alternative store implementations.
  ///
  /// [`create`]: CacheFactory::create
  pub fn create_with_provider<P>(config: &CacheConfig, provider: P) -> CacheService
  where
    P: FnOnce() -> Result<Arc<dyn KeyValueStore>, StoreError>,
  {
    let storage: Arc<dyn CacheStorage> = match config.storage_type {
      StorageType::Memory => Arc::new(MemoryStorage::new()),
      StorageType::Persisted => match provider() {
        Ok(store) => Arc::new(PersistedStorage::new(store)),
        Err(e) => {
          warn!(error = %e, "persisted store unavailable, falling back to in-memory cache");
          Arc::new(MemoryStorage::new())
        }
      },
    };

    let namespace = config
      .namespace
      .clone()
      .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    CacheService::new(storage, namespace, config.default_ttl)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::entry::CacheOptions;
  use serde_json::json;

  #[tokio::test]
  async fn test_default_config_builds_memory_cache() {
    let cache = CacheFactory::create(&CacheConfig::default());
    assert_eq!(cache.namespace(), DEFAULT_NAMESPACE);

    cache.set("k", &json!(1), &CacheOptions::default()).await;
    assert_eq!(cache.get::<serde_json::Value>("k").await, Some(json!(1)));
  }

  #[tokio::test]
  async fn test_explicit_namespace_is_used() {
    let config = CacheConfig {
      namespace: Some("reports".into()),
      ..Default::default()
    };
    let cache = CacheFactory::create(&config);
    assert_eq!(cache.namespace(), "reports");
  }

  #[tokio::test]
  async fn test_persisted_with_working_store() {
    let config = CacheConfig {
      storage_type: StorageType::Persisted,
      ..Default::default()
    };
    let cache = CacheFactory::create_with_provider(&config, || {
      SqliteKeyValueStore::open_in_memory().map(|s| Arc::new(s) as Arc<dyn KeyValueStore>)
    });

    cache.set("k", &json!("v"), &CacheOptions::default()).await;
    assert_eq!(cache.get::<serde_json::Value>("k").await, Some(json!("v")));
  }

  #[tokio::test]
  async fn test_persisted_falls_back_to_memory_when_store_unavailable() {
    let config = CacheConfig {
      storage_type: StorageType::Persisted,
      ..Default::default()
    };
    let cache = CacheFactory::create_with_provider(&config, || {
      Err(StoreError("no store in this environment".into()))
    });

    // Construction succeeded and the cache works
    cache.set("k", &json!(1), &CacheOptions::default()).await;
    assert_eq!(cache.get::<serde_json::Value>("k").await, Some(json!(1)));
  }

  #[test]
  fn test_storage_type_parses_from_config_text() {
    assert_eq!(
      serde_yaml::from_str::<StorageType>("memory").unwrap(),
      StorageType::Memory
    );
    assert_eq!(
      serde_yaml::from_str::<StorageType>("persisted").unwrap(),
      StorageType::Persisted
    );
  }
}
