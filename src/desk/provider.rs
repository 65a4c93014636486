//! Explicitly constructed service context.
//!
//! Whatever bootstraps the application builds one `ServiceProvider` and
//! passes it down; there is no global instance and nothing to tear down,
//! since the cache is process-lifetime-bound.

use std::sync::Arc;

use crate::cache::CacheFactory;
use crate::config::DeskConfig;

use super::admin::AdminService;
use super::client::{AdminApi, TicketApi};
use super::facade::TaskFacade;
use super::flags::FeatureFlags;

/// One cache, two facades.
///
/// The task facade uses the configured namespace; the admin service gets a
/// `:admin` sub-namespace over the same storage. Point lookups stay
/// isolated between the two, while tag invalidation deliberately crosses
/// the namespace boundary so a ticket write flushes department listings.
#[derive(Clone)]
pub struct ServiceProvider {
  tasks: TaskFacade,
  admin: AdminService,
}

impl ServiceProvider {
  pub fn init(
    config: &DeskConfig,
    ticket_api: Arc<dyn TicketApi>,
    admin_api: Arc<dyn AdminApi>,
    flags: Arc<dyn FeatureFlags>,
  ) -> Self {
    let cache = CacheFactory::create(&config.cache.to_cache_config());
    let admin_cache = cache.with_namespace(format!("{}:admin", cache.namespace()));

    let tasks = TaskFacade::new(
      ticket_api,
      Arc::clone(&flags),
      cache,
      config.tasks.to_facade_config(),
    );
    let admin = AdminService::new(admin_api, flags, admin_cache, config.admin.to_admin_config());

    Self { tasks, admin }
  }

  pub fn tasks(&self) -> &TaskFacade {
    &self.tasks
  }

  pub fn admin(&self) -> &AdminService {
    &self.admin
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::desk::api_types::{
    ApiAttachment, ApiComment, ApiDepartmentStats, ApiTicket, ApiTicketCreate, ApiTicketUpdate,
  };
  use crate::desk::client::ApiError;
  use crate::desk::flags::StaticFlags;
  use async_trait::async_trait;

  struct StubApi;

  #[async_trait]
  impl TicketApi for StubApi {
    async fn get_ticket(&self, id: &str) -> Result<ApiTicket, ApiError> {
      Ok(ApiTicket {
        ticket_number: id.to_string(),
        subject: "stub".into(),
        ..Default::default()
      })
    }
    async fn create_ticket(&self, _ticket: &ApiTicketCreate) -> Result<ApiTicket, ApiError> {
      Err(ApiError::status(500, "unused"))
    }
    async fn update_ticket(
      &self,
      _id: &str,
      _update: &ApiTicketUpdate,
    ) -> Result<ApiTicket, ApiError> {
      Err(ApiError::status(500, "unused"))
    }
    async fn list_comments(&self, _ticket_id: &str) -> Result<Vec<ApiComment>, ApiError> {
      Ok(vec![])
    }
    async fn add_comment(
      &self,
      _ticket_id: &str,
      _body: &str,
      _private: bool,
    ) -> Result<ApiComment, ApiError> {
      Err(ApiError::status(500, "unused"))
    }
    async fn list_attachments(&self, _ticket_id: &str) -> Result<Vec<ApiAttachment>, ApiError> {
      Ok(vec![])
    }
    async fn add_attachment(
      &self,
      _ticket_id: &str,
      _file_name: &str,
      _content: &[u8],
    ) -> Result<ApiAttachment, ApiError> {
      Err(ApiError::status(500, "unused"))
    }
  }

  #[async_trait]
  impl AdminApi for StubApi {
    async fn list_department_tickets(
      &self,
      _department: &str,
      _status: Option<&str>,
    ) -> Result<Vec<ApiTicket>, ApiError> {
      Ok(vec![])
    }
    async fn get_department_stats(&self) -> Result<ApiDepartmentStats, ApiError> {
      Ok(ApiDepartmentStats::default())
    }
    async fn assign_department(
      &self,
      ticket_id: &str,
      _department: &str,
    ) -> Result<ApiTicket, ApiError> {
      Ok(ApiTicket {
        ticket_number: ticket_id.to_string(),
        ..Default::default()
      })
    }
  }

  #[tokio::test]
  async fn test_provider_wires_both_facades() {
    let api = Arc::new(StubApi);
    let provider = ServiceProvider::init(
      &DeskConfig::default(),
      api.clone(),
      api,
      Arc::new(StaticFlags::all_enabled()),
    );

    let task = provider.tasks().get_task("1").await.unwrap();
    assert_eq!(task.id, "1");

    let tickets = provider
      .admin()
      .get_department_tickets("billing", None)
      .await
      .unwrap();
    assert!(tickets.is_empty());
  }
}
