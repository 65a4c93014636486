//! YAML configuration for the cache and the facades.

use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::cache::{CacheConfig, StorageType};
use crate::desk::{AdminConfig, StaticFlags, TaskFacadeConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config file not found: {0}")]
  NotFound(String),
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: String,
    source: std::io::Error,
  },
  #[error("failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    source: serde_yaml::Error,
  },
}

/// Top-level configuration. Every section has defaults, so a partial file
/// (or none at all) works.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
  pub cache: CacheSettings,
  pub tasks: TaskSettings,
  pub admin: AdminSettings,
  /// Enabled feature names, feeding the static flag source.
  pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
  pub storage: StorageType,
  /// Default TTL in milliseconds for entries written without one.
  pub default_ttl_ms: Option<i64>,
  pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaskSettings {
  /// Whether the task facade uses the cache at all.
  pub enabled: bool,
  pub task_ttl_ms: i64,
  pub comments_ttl_ms: i64,
  pub attachments_ttl_ms: i64,
}

impl Default for TaskSettings {
  fn default() -> Self {
    Self {
      enabled: true,
      task_ttl_ms: 300_000,
      comments_ttl_ms: 60_000,
      attachments_ttl_ms: 300_000,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
  pub enabled: bool,
  pub tickets_ttl_ms: i64,
  pub stats_ttl_ms: i64,
}

impl Default for AdminSettings {
  fn default() -> Self {
    Self {
      enabled: true,
      tickets_ttl_ms: 120_000,
      stats_ttl_ms: 600_000,
    }
  }
}

impl DeskConfig {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./desk365.yaml (current directory)
  /// 3. platform config dir /desk-cache/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(ConfigError::NotFound(p.display().to_string()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("desk365.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check platform config directory
    if let Some(config_dir) = dirs::config_dir() {
      let path = config_dir.join("desk-cache").join("config.yaml");
      if path.exists() {
        return Some(path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.display().to_string(),
      source: e,
    })?;

    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
      path: path.display().to_string(),
      source: e,
    })
  }

  /// Flag source built from the enabled-features list.
  pub fn flags(&self) -> StaticFlags {
    StaticFlags::new(self.features.iter().cloned())
  }
}

impl CacheSettings {
  pub fn to_cache_config(&self) -> CacheConfig {
    CacheConfig {
      storage_type: self.storage,
      default_ttl: self.default_ttl_ms.map(Duration::milliseconds),
      namespace: self.namespace.clone(),
    }
  }
}

impl TaskSettings {
  pub fn to_facade_config(&self) -> TaskFacadeConfig {
    TaskFacadeConfig {
      cache_enabled: self.enabled,
      task_ttl: Duration::milliseconds(self.task_ttl_ms),
      comments_ttl: Duration::milliseconds(self.comments_ttl_ms),
      attachments_ttl: Duration::milliseconds(self.attachments_ttl_ms),
    }
  }
}

impl AdminSettings {
  pub fn to_admin_config(&self) -> AdminConfig {
    AdminConfig {
      cache_enabled: self.enabled,
      tickets_ttl: Duration::milliseconds(self.tickets_ttl_ms),
      stats_ttl: Duration::milliseconds(self.stats_ttl_ms),
    }
  }
}
