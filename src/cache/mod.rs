//! Generic caching layer with TTL expiration and tag-based invalidation.
//!
//! This module is ticketing-agnostic. It provides:
//! - Pluggable storage backends (in-memory, persisted key-value store)
//! - A namespaced, typed cache service with lazy TTL expiry
//! - Tag-based invalidation via full scan (O(n) invalidation, O(1) lookup)
//! - Deterministic key construction
//! - A factory that selects a backend from configuration, with fallback

mod entry;
mod factory;
mod keys;
mod kv;
mod service;
mod storage;

pub use entry::{CacheEntry, CacheOptions};
pub use factory::{CacheConfig, CacheFactory, StorageType, DEFAULT_NAMESPACE};
pub use keys::CacheKeyGenerator;
pub use kv::{KeyValueStore, SqliteKeyValueStore, StoreError};
pub use service::{with_cache, CacheService};
pub use storage::{CacheStorage, MemoryStorage, PersistedStorage};
