//! Cache entry and write options.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A single stored cache entry.
///
/// The payload is kept as JSON so entries of any serializable type can share
/// one storage backend. TTL interpretation belongs to the service layer;
/// storage backends store and return `expires_at` verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
  /// The cached payload, opaque to the cache layer.
  pub value: serde_json::Value,
  /// Absolute expiry. `None` means the entry never expires.
  pub expires_at: Option<DateTime<Utc>>,
  /// When the entry was written. Informational only.
  pub created_at: DateTime<Utc>,
  /// Invalidation tags attached at write time.
  pub tags: Vec<String>,
}

impl CacheEntry {
  /// Build an entry expiring `ttl` from now, or never when `ttl` is `None`.
  pub fn new(value: serde_json::Value, ttl: Option<Duration>, tags: Vec<String>) -> Self {
    let now = Utc::now();
    Self {
      value,
      expires_at: ttl.map(|t| now + t),
      created_at: now,
      tags,
    }
  }

  /// An entry is live iff it has no expiry or the expiry has not passed.
  pub fn is_live(&self, now: DateTime<Utc>) -> bool {
    match self.expires_at {
      None => true,
      Some(at) => at >= now,
    }
  }

  pub fn has_tag(&self, tag: &str) -> bool {
    self.tags.iter().any(|t| t == tag)
  }
}

/// Options accepted by `set` and `get_or_set`.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
  /// Time to live. Falls back to the service default when `None`.
  pub ttl: Option<Duration>,
  /// Invalidation tags to attach to the entry.
  pub tags: Vec<String>,
  /// Accepted for forward compatibility. No background revalidation is
  /// implemented, so setting this currently changes nothing.
  pub stale_while_revalidate: bool,
}

impl CacheOptions {
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = Some(ttl);
    self
  }

  pub fn with_tags<I, S>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.tags = tags.into_iter().map(Into::into).collect();
    self
  }
}
