//! Cached task facade over the Desk365 ticket API.
//!
//! Every operation checks the feature flag first, then either goes through
//! the cache (reads), or performs the remote mutation and invalidates the
//! affected tags (writes). With caching disabled each call goes straight to
//! the remote API with identical mapping and error handling.

use chrono::Duration;
use std::sync::Arc;
use tracing::debug;

use crate::cache::{CacheKeyGenerator, CacheOptions, CacheService};

use super::api_types::{ApiTicketCreate, ApiTicketUpdate};
use super::client::TicketApi;
use super::error::FacadeError;
use super::flags::{FeatureFlags, FEATURE_TASKS};
use super::tags;
use super::types::{Attachment, Comment, NewTask, Task, TaskUpdate};

/// Caching behavior of the task facade.
#[derive(Debug, Clone)]
pub struct TaskFacadeConfig {
  pub cache_enabled: bool,
  pub task_ttl: Duration,
  pub comments_ttl: Duration,
  pub attachments_ttl: Duration,
}

impl Default for TaskFacadeConfig {
  fn default() -> Self {
    Self {
      cache_enabled: true,
      task_ttl: Duration::minutes(5),
      comments_ttl: Duration::minutes(1),
      attachments_ttl: Duration::minutes(5),
    }
  }
}

/// Task operations with cache-aside reads and write invalidation.
#[derive(Clone)]
pub struct TaskFacade {
  api: Arc<dyn TicketApi>,
  flags: Arc<dyn FeatureFlags>,
  cache: CacheService,
  config: TaskFacadeConfig,
}

impl TaskFacade {
  pub fn new(
    api: Arc<dyn TicketApi>,
    flags: Arc<dyn FeatureFlags>,
    cache: CacheService,
    config: TaskFacadeConfig,
  ) -> Self {
    Self {
      api,
      flags,
      cache,
      config,
    }
  }

  fn ensure_enabled(&self) -> Result<(), FacadeError> {
    if self.flags.is_enabled(FEATURE_TASKS) {
      Ok(())
    } else {
      Err(FacadeError::FeatureFlagDisabled(FEATURE_TASKS.to_string()))
    }
  }

  // ==========================================================================
  // Reads
  // ==========================================================================

  pub async fn get_task(&self, id: &str) -> Result<Task, FacadeError> {
    self.ensure_enabled()?;

    if !self.config.cache_enabled {
      return self.fetch_task(id).await;
    }

    let options = CacheOptions::default()
      .with_ttl(self.config.task_ttl)
      .with_tags([tags::task(id), tags::TASKS.to_string()]);

    self
      .cache
      .get_or_set(&CacheKeyGenerator::task(id), || self.fetch_task(id), &options)
      .await
  }

  pub async fn list_comments(&self, task_id: &str) -> Result<Vec<Comment>, FacadeError> {
    self.ensure_enabled()?;

    if !self.config.cache_enabled {
      return self.fetch_comments(task_id).await;
    }

    let options = CacheOptions::default()
      .with_ttl(self.config.comments_ttl)
      .with_tags([tags::task(task_id), tags::COMMENTS.to_string()]);

    self
      .cache
      .get_or_set(
        &CacheKeyGenerator::task_comments(task_id),
        || self.fetch_comments(task_id),
        &options,
      )
      .await
  }

  pub async fn list_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, FacadeError> {
    self.ensure_enabled()?;

    if !self.config.cache_enabled {
      return self.fetch_attachments(task_id).await;
    }

    let options = CacheOptions::default()
      .with_ttl(self.config.attachments_ttl)
      .with_tags([tags::task(task_id), tags::ATTACHMENTS.to_string()]);

    self
      .cache
      .get_or_set(
        &CacheKeyGenerator::task_attachments(task_id),
        || self.fetch_attachments(task_id),
        &options,
      )
      .await
  }

  // ==========================================================================
  // Writes
  // ==========================================================================

  pub async fn create_task(&self, new_task: &NewTask) -> Result<Task, FacadeError> {
    self.ensure_enabled()?;

    let created = self.api.create_ticket(&ApiTicketCreate::from(new_task)).await?;
    let task = created.into_task();

    // Invalidate only after the remote mutation succeeded
    if self.config.cache_enabled {
      self.invalidate_task(&task).await;
    }

    Ok(task)
  }

  pub async fn update_task(&self, id: &str, update: &TaskUpdate) -> Result<Task, FacadeError> {
    self.ensure_enabled()?;

    let updated = self
      .api
      .update_ticket(id, &ApiTicketUpdate::from(update))
      .await?;
    let task = updated.into_task();

    if self.config.cache_enabled {
      self.invalidate_task(&task).await;
    }

    Ok(task)
  }

  pub async fn add_comment(
    &self,
    task_id: &str,
    body: &str,
    private: bool,
  ) -> Result<Comment, FacadeError> {
    self.ensure_enabled()?;

    let created = self.api.add_comment(task_id, body, private).await?;
    let comment = created.into_comment();

    if self.config.cache_enabled {
      self.cache.invalidate_by_tag(tags::COMMENTS).await;
      self.cache.invalidate_by_tag(&tags::task(task_id)).await;
    }

    Ok(comment)
  }

  pub async fn add_attachment(
    &self,
    task_id: &str,
    file_name: &str,
    content: &[u8],
  ) -> Result<Attachment, FacadeError> {
    self.ensure_enabled()?;

    let created = self.api.add_attachment(task_id, file_name, content).await?;
    let attachment = created.into_attachment();

    if self.config.cache_enabled {
      self.cache.invalidate_by_tag(tags::ATTACHMENTS).await;
      self.cache.invalidate_by_tag(&tags::task(task_id)).await;
    }

    Ok(attachment)
  }

  // ==========================================================================
  // Remote calls + mapping
  // ==========================================================================

  async fn fetch_task(&self, id: &str) -> Result<Task, FacadeError> {
    let ticket = self.api.get_ticket(id).await?;
    Ok(ticket.into_task())
  }

  async fn fetch_comments(&self, task_id: &str) -> Result<Vec<Comment>, FacadeError> {
    let comments = self.api.list_comments(task_id).await?;
    Ok(comments.into_iter().map(|c| c.into_comment()).collect())
  }

  async fn fetch_attachments(&self, task_id: &str) -> Result<Vec<Attachment>, FacadeError> {
    let attachments = self.api.list_attachments(task_id).await?;
    Ok(attachments.into_iter().map(|a| a.into_attachment()).collect())
  }

  async fn invalidate_task(&self, task: &Task) {
    debug!(task_id = %task.id, "invalidating cached entries after write");
    self.cache.invalidate_by_tag(tags::TASKS).await;
    self.cache.invalidate_by_tag(&tags::task(&task.id)).await;
    if let Some(department) = &task.department {
      self.cache.invalidate_by_tag(&tags::department(department)).await;
    }
  }
}
