//! Cache service: namespacing, TTL enforcement, and read-through access.

use chrono::{Duration, Utc};
use futures::future::BoxFuture;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use super::entry::{CacheEntry, CacheOptions};
use super::storage::CacheStorage;

/// Typed cache over a storage backend.
///
/// The service owns the namespace and TTL policy; physical persistence is
/// delegated to the storage. Several services may share one storage with
/// different namespaces; namespace prefixing is the only isolation between
/// them, and it applies to point lookups only (see [`invalidate_by_tag`] and
/// [`clear`]).
///
/// [`invalidate_by_tag`]: CacheService::invalidate_by_tag
/// [`clear`]: CacheService::clear
#[derive(Clone)]
pub struct CacheService {
  storage: Arc<dyn CacheStorage>,
  namespace: String,
  default_ttl: Option<Duration>,
}

impl CacheService {
  pub fn new(
    storage: Arc<dyn CacheStorage>,
    namespace: impl Into<String>,
    default_ttl: Option<Duration>,
  ) -> Self {
    Self {
      storage,
      namespace: namespace.into(),
      default_ttl,
    }
  }

  /// A second service over the same storage under a different namespace.
  pub fn with_namespace(&self, namespace: impl Into<String>) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      namespace: namespace.into(),
      default_ttl: self.default_ttl,
    }
  }

  pub fn namespace(&self) -> &str {
    &self.namespace
  }

  fn namespaced(&self, key: &str) -> String {
    format!("{}:{}", self.namespace, key)
  }

  /// Look up a value. Expired entries are deleted on access and reported as
  /// misses; there is no background sweep.
  pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let full_key = self.namespaced(key);
    let entry = self.storage.get(&full_key).await?;

    if !entry.is_live(Utc::now()) {
      debug!(key = %full_key, "entry expired, removing");
      self.storage.delete(&full_key).await;
      return None;
    }

    match serde_json::from_value(entry.value) {
      Ok(value) => {
        debug!(key = %full_key, "cache hit");
        Some(value)
      }
      Err(e) => {
        warn!(key = %full_key, error = %e, "cached value has unexpected shape");
        None
      }
    }
  }

  /// Store a value, fully replacing any prior entry at that key.
  ///
  /// The TTL comes from the options, falling back to the service default;
  /// with neither set the entry never expires.
  pub async fn set<T: Serialize>(&self, key: &str, value: &T, options: &CacheOptions) {
    let payload = match serde_json::to_value(value) {
      Ok(payload) => payload,
      Err(e) => {
        warn!(key, error = %e, "failed to serialize value, not caching");
        return;
      }
    };

    let ttl = options.ttl.or(self.default_ttl);
    let entry = CacheEntry::new(payload, ttl, options.tags.clone());
    self.storage.set(&self.namespaced(key), entry).await;
  }

  pub async fn delete(&self, key: &str) {
    self.storage.delete(&self.namespaced(key)).await;
  }

  /// Remove every entry in the underlying storage.
  ///
  /// Not namespace-scoped: entries written by other services sharing this
  /// storage are removed too.
  pub async fn clear(&self) {
    self.storage.clear().await;
  }

  /// Remove every entry carrying `tag`.
  ///
  /// Not namespace-scoped: any entry in the shared storage with this tag is
  /// removed, regardless of which service wrote it.
  pub async fn invalidate_by_tag(&self, tag: &str) {
    debug!(tag, "invalidating by tag");
    self.storage.invalidate_by_tag(tag).await;
  }

  /// Read-through lookup: on a hit the producer is never invoked; on a miss
  /// it runs once and its result is stored and returned.
  ///
  /// A failed producer propagates unchanged and leaves the cache untouched.
  /// Concurrent calls for the same missing key are not de-duplicated: both
  /// producers may run and the last write wins.
  pub async fn get_or_set<T, E, F, Fut>(
    &self,
    key: &str,
    producer: F,
    options: &CacheOptions,
  ) -> Result<T, E>
  where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
  {
    if let Some(hit) = self.get(key).await {
      return Ok(hit);
    }

    let value = producer().await?;
    self.set(key, &value, options).await;
    Ok(value)
  }
}

/// Wrap an async function in a caching layer, deriving the cache key from
/// its arguments on every call.
pub fn with_cache<Args, T, E, F, Fut, K>(
  service: Arc<CacheService>,
  f: F,
  key_fn: K,
  options: CacheOptions,
) -> impl Fn(Args) -> BoxFuture<'static, Result<T, E>>
where
  Args: Send + 'static,
  T: Serialize + DeserializeOwned + Send + Sync + 'static,
  E: Send + 'static,
  F: Fn(Args) -> Fut + Clone + Send + Sync + 'static,
  Fut: Future<Output = Result<T, E>> + Send + 'static,
  K: Fn(&Args) -> String + Send + Sync + 'static,
{
  move |args: Args| {
    let service = Arc::clone(&service);
    let f = f.clone();
    let key = key_fn(&args);
    let options = options.clone();
    Box::pin(async move { service.get_or_set(&key, || f(args), &options).await })
  }
}
