//! Cached admin service for department-level Desk365 operations.

use chrono::Duration;
use std::sync::Arc;
use tracing::debug;

use crate::cache::{CacheKeyGenerator, CacheOptions, CacheService};

use super::api_types::status_code;
use super::client::AdminApi;
use super::error::FacadeError;
use super::flags::{FeatureFlags, FEATURE_ADMIN};
use super::tags;
use super::types::{DepartmentStats, Task, TaskStatus};

/// Caching behavior of the admin service.
#[derive(Debug, Clone)]
pub struct AdminConfig {
  pub cache_enabled: bool,
  pub tickets_ttl: Duration,
  pub stats_ttl: Duration,
}

impl Default for AdminConfig {
  fn default() -> Self {
    Self {
      cache_enabled: true,
      tickets_ttl: Duration::minutes(2),
      stats_ttl: Duration::minutes(10),
    }
  }
}

/// Department reads and ticket assignment with the same flag-gate,
/// cache-aside, write-invalidate contract as the task facade.
#[derive(Clone)]
pub struct AdminService {
  api: Arc<dyn AdminApi>,
  flags: Arc<dyn FeatureFlags>,
  cache: CacheService,
  config: AdminConfig,
}

impl AdminService {
  pub fn new(
    api: Arc<dyn AdminApi>,
    flags: Arc<dyn FeatureFlags>,
    cache: CacheService,
    config: AdminConfig,
  ) -> Self {
    Self {
      api,
      flags,
      cache,
      config,
    }
  }

  fn ensure_enabled(&self) -> Result<(), FacadeError> {
    if self.flags.is_enabled(FEATURE_ADMIN) {
      Ok(())
    } else {
      Err(FacadeError::FeatureFlagDisabled(FEATURE_ADMIN.to_string()))
    }
  }

  pub async fn get_department_tickets(
    &self,
    department: &str,
    status: Option<TaskStatus>,
  ) -> Result<Vec<Task>, FacadeError> {
    self.ensure_enabled()?;

    if !self.config.cache_enabled {
      return self.fetch_department_tickets(department, status).await;
    }

    let status_text = status.map(status_code);
    let key = CacheKeyGenerator::department_tickets(department, status_text.as_deref());
    let options = CacheOptions::default()
      .with_ttl(self.config.tickets_ttl)
      .with_tags([tags::department(department), tags::DEPARTMENTS.to_string()]);

    self
      .cache
      .get_or_set(
        &key,
        || self.fetch_department_tickets(department, status),
        &options,
      )
      .await
  }

  pub async fn get_department_stats(&self) -> Result<DepartmentStats, FacadeError> {
    self.ensure_enabled()?;

    if !self.config.cache_enabled {
      return self.fetch_stats().await;
    }

    let options = CacheOptions::default()
      .with_ttl(self.config.stats_ttl)
      .with_tags([tags::DEPARTMENTS, tags::STATS]);

    self
      .cache
      .get_or_set(
        &CacheKeyGenerator::department_stats(),
        || self.fetch_stats(),
        &options,
      )
      .await
  }

  /// Move a ticket into a department and flush everything the move affects.
  pub async fn assign_department(
    &self,
    ticket_id: &str,
    department: &str,
  ) -> Result<Task, FacadeError> {
    self.ensure_enabled()?;

    let updated = self.api.assign_department(ticket_id, department).await?;
    let task = updated.into_task();

    if self.config.cache_enabled {
      debug!(ticket_id, department, "invalidating after department assignment");
      self.cache.invalidate_by_tag(tags::TASKS).await;
      self.cache.invalidate_by_tag(&tags::task(&task.id)).await;
      self.cache.invalidate_by_tag(&tags::department(department)).await;
      self.cache.invalidate_by_tag(tags::DEPARTMENTS).await;
    }

    Ok(task)
  }

  async fn fetch_department_tickets(
    &self,
    department: &str,
    status: Option<TaskStatus>,
  ) -> Result<Vec<Task>, FacadeError> {
    let status_text = status.map(status_code);
    let tickets = self
      .api
      .list_department_tickets(department, status_text.as_deref())
      .await?;
    Ok(tickets.into_iter().map(|t| t.into_task()).collect())
  }

  async fn fetch_stats(&self) -> Result<DepartmentStats, FacadeError> {
    let stats = self.api.get_department_stats().await?;
    Ok(stats.into())
  }
}
