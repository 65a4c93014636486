//! Remote API client seams.
//!
//! The actual HTTP client lives outside this crate; the facades talk to it
//! through these traits. Implementations are expected to surface failures as
//! [`ApiError`] with the remote status code attached when one exists.

use async_trait::async_trait;
use thiserror::Error;

use super::api_types::{
  ApiAttachment, ApiComment, ApiDepartmentStats, ApiTicket, ApiTicketCreate, ApiTicketUpdate,
};

/// Failure reported by the remote client.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
  /// HTTP-like status code, when the failure carries one.
  pub status: Option<u16>,
  pub message: String,
}

impl ApiError {
  pub fn status(status: u16, message: impl Into<String>) -> Self {
    Self {
      status: Some(status),
      message: message.into(),
    }
  }

  pub fn transport(message: impl Into<String>) -> Self {
    Self {
      status: None,
      message: message.into(),
    }
  }
}

/// Ticket operations of the Desk365 API.
#[async_trait]
pub trait TicketApi: Send + Sync {
  async fn get_ticket(&self, id: &str) -> Result<ApiTicket, ApiError>;
  async fn create_ticket(&self, ticket: &ApiTicketCreate) -> Result<ApiTicket, ApiError>;
  async fn update_ticket(&self, id: &str, update: &ApiTicketUpdate) -> Result<ApiTicket, ApiError>;

  async fn list_comments(&self, ticket_id: &str) -> Result<Vec<ApiComment>, ApiError>;
  async fn add_comment(
    &self,
    ticket_id: &str,
    body: &str,
    private: bool,
  ) -> Result<ApiComment, ApiError>;

  async fn list_attachments(&self, ticket_id: &str) -> Result<Vec<ApiAttachment>, ApiError>;
  async fn add_attachment(
    &self,
    ticket_id: &str,
    file_name: &str,
    content: &[u8],
  ) -> Result<ApiAttachment, ApiError>;
}

/// Department-level operations of the Desk365 API.
#[async_trait]
pub trait AdminApi: Send + Sync {
  async fn list_department_tickets(
    &self,
    department: &str,
    status: Option<&str>,
  ) -> Result<Vec<ApiTicket>, ApiError>;

  async fn get_department_stats(&self) -> Result<ApiDepartmentStats, ApiError>;

  /// Move a ticket into a department. Returns the updated ticket.
  async fn assign_department(
    &self,
    ticket_id: &str,
    department: &str,
  ) -> Result<ApiTicket, ApiError>;
}
