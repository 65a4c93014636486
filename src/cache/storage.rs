//! Cache storage trait with in-memory and persisted implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::warn;

use super::entry::CacheEntry;
use super::kv::KeyValueStore;

/// Physical key prefix for the persisted backend. Lets cache entries coexist
/// with unrelated data in a shared store.
const PERSISTED_PREFIX: &str = "desk-cache:";

/// Trait for cache storage backends.
///
/// Storage has no knowledge of TTL semantics; it stores and returns
/// `expires_at` verbatim. All operations are infallible from the caller's
/// point of view: a backend fault is logged and presented as a miss (`get`)
/// or a dropped write (`set`), never as an error. The cache is a performance
/// optimization, not a correctness dependency.
///
/// Backends that are synchronous under the hood still expose the async
/// contract so the service and factory can treat them interchangeably with
/// future network-backed implementations.
#[async_trait]
pub trait CacheStorage: Send + Sync {
  /// Returns the stored entry verbatim, or `None` if absent or unreadable.
  async fn get(&self, key: &str) -> Option<CacheEntry>;

  /// Persists the entry, fully replacing any prior value at that key.
  async fn set(&self, key: &str, entry: CacheEntry);

  /// Removes the key if present; no-op otherwise.
  async fn delete(&self, key: &str);

  /// Removes every key this storage instance recognizes as its own.
  async fn clear(&self);

  /// Scans all recognized keys and deletes entries carrying `tag`.
  async fn invalidate_by_tag(&self, tag: &str);
}

/// In-process storage backed by a hash map. Lifetime is bound to the owning
/// cache service; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    match self.entries.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
  async fn get(&self, key: &str) -> Option<CacheEntry> {
    self.lock().get(key).cloned()
  }

  async fn set(&self, key: &str, entry: CacheEntry) {
    self.lock().insert(key.to_string(), entry);
  }

  async fn delete(&self, key: &str) {
    self.lock().remove(key);
  }

  async fn clear(&self) {
    self.lock().clear();
  }

  async fn invalidate_by_tag(&self, tag: &str) {
    self.lock().retain(|_, entry| !entry.has_tag(tag));
  }
}

/// Storage backed by a shared synchronous key-value store.
///
/// Entries are serialized as JSON text under a fixed physical prefix.
/// Enumeration for `clear`/`invalidate_by_tag` walks the entire physical key
/// space and filters by prefix, which is O(total keys in store). Acceptable
/// at the expected scale of tens to low hundreds of entries.
pub struct PersistedStorage {
  store: Arc<dyn KeyValueStore>,
}

impl PersistedStorage {
  pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
    Self { store }
  }

  fn physical_key(key: &str) -> String {
    format!("{}{}", PERSISTED_PREFIX, key)
  }

  /// Keys belonging to this storage, in physical form.
  fn own_keys(&self) -> Vec<String> {
    match self.store.keys() {
      Ok(keys) => keys
        .into_iter()
        .filter(|k| k.starts_with(PERSISTED_PREFIX))
        .collect(),
      Err(e) => {
        warn!(error = %e, "failed to enumerate store keys");
        Vec::new()
      }
    }
  }

  fn read_entry(&self, physical_key: &str) -> Option<CacheEntry> {
    let raw = match self.store.get(physical_key) {
      Ok(raw) => raw?,
      Err(e) => {
        warn!(key = physical_key, error = %e, "store read failed, treating as miss");
        return None;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(entry) => Some(entry),
      Err(e) => {
        // Unreadable payload is a miss, not a fault
        warn!(key = physical_key, error = %e, "failed to parse cache entry");
        None
      }
    }
  }
}

#[async_trait]
impl CacheStorage for PersistedStorage {
  async fn get(&self, key: &str) -> Option<CacheEntry> {
    self.read_entry(&Self::physical_key(key))
  }

  async fn set(&self, key: &str, entry: CacheEntry) {
    let raw = match serde_json::to_string(&entry) {
      Ok(raw) => raw,
      Err(e) => {
        warn!(key, error = %e, "failed to serialize cache entry");
        return;
      }
    };

    // A failed write just means a miss next time
    if let Err(e) = self.store.set(&Self::physical_key(key), &raw) {
      warn!(key, error = %e, "store write failed, entry dropped");
    }
  }

  async fn delete(&self, key: &str) {
    if let Err(e) = self.store.remove(&Self::physical_key(key)) {
      warn!(key, error = %e, "store delete failed");
    }
  }

  async fn clear(&self) {
    for physical_key in self.own_keys() {
      if let Err(e) = self.store.remove(&physical_key) {
        warn!(key = %physical_key, error = %e, "store delete failed during clear");
      }
    }
  }

  async fn invalidate_by_tag(&self, tag: &str) {
    for physical_key in self.own_keys() {
      let Some(entry) = self.read_entry(&physical_key) else {
        continue;
      };
      if entry.has_tag(tag) {
        if let Err(e) = self.store.remove(&physical_key) {
          warn!(key = %physical_key, error = %e, "store delete failed during invalidation");
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::kv::{SqliteKeyValueStore, StoreError};
  use serde_json::json;

  fn entry(value: serde_json::Value, tags: &[&str]) -> CacheEntry {
    CacheEntry::new(value, None, tags.iter().map(|t| t.to_string()).collect())
  }

  /// Store that fails every operation, for fault-absorption tests.
  struct FaultyStore;

  impl KeyValueStore for FaultyStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
      Err(StoreError("disk on fire".into()))
    }
    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
      Err(StoreError("quota exceeded".into()))
    }
    fn remove(&self, _key: &str) -> Result<(), StoreError> {
      Err(StoreError("disk on fire".into()))
    }
    fn keys(&self) -> Result<Vec<String>, StoreError> {
      Err(StoreError("disk on fire".into()))
    }
  }

  #[tokio::test]
  async fn test_memory_set_get_delete() {
    let storage = MemoryStorage::new();
    storage.set("k", entry(json!(1), &[])).await;
    assert_eq!(storage.get("k").await.unwrap().value, json!(1));

    storage.delete("k").await;
    assert!(storage.get("k").await.is_none());
  }

  #[tokio::test]
  async fn test_memory_set_replaces_entry() {
    let storage = MemoryStorage::new();
    storage.set("k", entry(json!(1), &["old"])).await;
    storage.set("k", entry(json!(2), &[])).await;

    let current = storage.get("k").await.unwrap();
    assert_eq!(current.value, json!(2));
    assert!(current.tags.is_empty());
  }

  #[tokio::test]
  async fn test_memory_tag_invalidation() {
    let storage = MemoryStorage::new();
    storage.set("a", entry(json!("a"), &["x", "y"])).await;
    storage.set("b", entry(json!("b"), &["y"])).await;
    storage.set("c", entry(json!("c"), &["z"])).await;

    storage.invalidate_by_tag("y").await;

    assert!(storage.get("a").await.is_none());
    assert!(storage.get("b").await.is_none());
    assert!(storage.get("c").await.is_some());
  }

  #[tokio::test]
  async fn test_memory_clear() {
    let storage = MemoryStorage::new();
    storage.set("a", entry(json!(1), &[])).await;
    storage.set("b", entry(json!(2), &[])).await;
    storage.clear().await;
    assert!(storage.get("a").await.is_none());
    assert!(storage.get("b").await.is_none());
  }

  fn persisted() -> (PersistedStorage, Arc<SqliteKeyValueStore>) {
    let store = Arc::new(SqliteKeyValueStore::open_in_memory().unwrap());
    (PersistedStorage::new(store.clone()), store)
  }

  #[tokio::test]
  async fn test_persisted_roundtrip() {
    let (storage, _) = persisted();
    storage.set("k", entry(json!({"v": 1}), &["tasks"])).await;

    let back = storage.get("k").await.unwrap();
    assert_eq!(back.value, json!({"v": 1}));
    assert_eq!(back.tags, vec!["tasks".to_string()]);
  }

  #[tokio::test]
  async fn test_persisted_clear_leaves_unrelated_keys() {
    let (storage, store) = persisted();
    store.set("other-app:data", "untouched").unwrap();
    storage.set("k", entry(json!(1), &[])).await;

    storage.clear().await;

    assert!(storage.get("k").await.is_none());
    assert_eq!(
      store.get("other-app:data").unwrap(),
      Some("untouched".to_string())
    );
  }

  #[tokio::test]
  async fn test_persisted_tag_invalidation_skips_unrelated_keys() {
    let (storage, store) = persisted();
    store.set("other-app:data", "not json").unwrap();
    storage.set("a", entry(json!("a"), &["y"])).await;
    storage.set("c", entry(json!("c"), &["z"])).await;

    storage.invalidate_by_tag("y").await;

    assert!(storage.get("a").await.is_none());
    assert!(storage.get("c").await.is_some());
    assert!(store.get("other-app:data").unwrap().is_some());
  }

  #[tokio::test]
  async fn test_persisted_corrupt_payload_is_a_miss() {
    let (storage, store) = persisted();
    store.set("desk-cache:k", "{not valid json").unwrap();
    assert!(storage.get("k").await.is_none());
  }

  #[tokio::test]
  async fn test_persisted_absorbs_store_faults() {
    let storage = PersistedStorage::new(Arc::new(FaultyStore));

    // None of these may panic or surface an error
    storage.set("k", entry(json!(1), &["t"])).await;
    assert!(storage.get("k").await.is_none());
    storage.delete("k").await;
    storage.invalidate_by_tag("t").await;
    storage.clear().await;
  }
}
