//! Serde types matching raw Desk365 API shapes.
//!
//! These stay separate from domain types so deserialization can be tolerant
//! of whatever the remote side sends while the domain model stays focused on
//! application needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{Attachment, Comment, DepartmentStats, Task, TaskPriority, TaskStatus};

/// Custom field key under which Desk365 carries the department.
const DEPARTMENT_FIELD: &str = "cf_department";

// ============================================================================
// Raw ticket shapes
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiTicket {
  #[serde(default)]
  pub ticket_number: String,
  #[serde(default)]
  pub subject: String,
  pub description: Option<String>,
  /// Status as the remote side spells it, e.g. "Open" or "closed".
  #[serde(default)]
  pub status: String,
  /// Priority 1-4; anything else maps to medium.
  #[serde(default)]
  pub priority: u8,
  pub assign_to: Option<String>,
  pub contact_email: Option<String>,
  pub created_on: Option<DateTime<Utc>>,
  pub updated_on: Option<DateTime<Utc>>,
  #[serde(default)]
  pub custom_fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiTicketCreate {
  pub subject: String,
  pub description: Option<String>,
  pub priority: u8,
  pub contact_email: String,
  pub custom_fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiTicketUpdate {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub subject: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub priority: Option<u8>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assign_to: Option<String>,
  #[serde(skip_serializing_if = "HashMap::is_empty")]
  pub custom_fields: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiComment {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub ticket_number: String,
  #[serde(default)]
  pub body: String,
  pub agent_email: Option<String>,
  #[serde(default)]
  pub is_private: bool,
  pub created_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiAttachment {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub ticket_number: String,
  #[serde(default)]
  pub file_name: String,
  #[serde(default)]
  pub file_size: u64,
  pub download_url: Option<String>,
  pub created_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiDepartmentStats {
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub open: u64,
  #[serde(default)]
  pub resolved: u64,
  #[serde(default)]
  pub departments: HashMap<String, u64>,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl ApiTicket {
  pub fn into_task(self) -> Task {
    let department = self
      .custom_fields
      .get(DEPARTMENT_FIELD)
      .and_then(|v| v.as_str())
      .map(String::from);

    Task {
      id: self.ticket_number,
      title: self.subject,
      description: self.description,
      status: parse_status(&self.status),
      priority: parse_priority(self.priority),
      assignee: self.assign_to,
      contact_email: self.contact_email,
      department,
      created_at: self.created_on,
      updated_at: self.updated_on,
    }
  }
}

impl ApiComment {
  pub fn into_comment(self) -> Comment {
    Comment {
      id: self.id,
      task_id: self.ticket_number,
      body: self.body,
      author: self.agent_email,
      private: self.is_private,
      created_at: self.created_on,
    }
  }
}

impl ApiAttachment {
  pub fn into_attachment(self) -> Attachment {
    Attachment {
      id: self.id,
      task_id: self.ticket_number,
      file_name: self.file_name,
      size_bytes: self.file_size,
      url: self.download_url,
      created_at: self.created_on,
    }
  }
}

impl From<ApiDepartmentStats> for DepartmentStats {
  fn from(raw: ApiDepartmentStats) -> Self {
    DepartmentStats {
      total_tickets: raw.total,
      open_tickets: raw.open,
      resolved_tickets: raw.resolved,
      by_department: raw.departments.into_iter().collect(),
    }
  }
}

// ============================================================================
// Conversions from domain types
// ============================================================================

impl From<&crate::desk::types::NewTask> for ApiTicketCreate {
  fn from(task: &crate::desk::types::NewTask) -> Self {
    let mut custom_fields = HashMap::new();
    if let Some(department) = &task.department {
      custom_fields.insert(
        DEPARTMENT_FIELD.to_string(),
        serde_json::Value::String(department.clone()),
      );
    }

    ApiTicketCreate {
      subject: task.title.clone(),
      description: task.description.clone(),
      priority: priority_code(task.priority),
      contact_email: task.contact_email.clone(),
      custom_fields,
    }
  }
}

impl From<&crate::desk::types::TaskUpdate> for ApiTicketUpdate {
  fn from(update: &crate::desk::types::TaskUpdate) -> Self {
    let mut custom_fields = HashMap::new();
    if let Some(department) = &update.department {
      custom_fields.insert(
        DEPARTMENT_FIELD.to_string(),
        serde_json::Value::String(department.clone()),
      );
    }

    ApiTicketUpdate {
      subject: update.title.clone(),
      description: update.description.clone(),
      status: update.status.map(status_code),
      priority: update.priority.map(priority_code),
      assign_to: update.assignee.clone(),
      custom_fields,
    }
  }
}

// ============================================================================
// Helpers
// ============================================================================

fn parse_status(raw: &str) -> TaskStatus {
  match raw.to_ascii_lowercase().as_str() {
    "pending" | "on hold" => TaskStatus::Pending,
    "resolved" => TaskStatus::Resolved,
    "closed" => TaskStatus::Closed,
    // Unknown statuses are treated as open rather than rejected
    _ => TaskStatus::Open,
  }
}

fn parse_priority(code: u8) -> TaskPriority {
  match code {
    1 => TaskPriority::Low,
    3 => TaskPriority::High,
    4 => TaskPriority::Urgent,
    _ => TaskPriority::Medium,
  }
}

pub(crate) fn status_code(status: TaskStatus) -> String {
  match status {
    TaskStatus::Open => "open",
    TaskStatus::Pending => "pending",
    TaskStatus::Resolved => "resolved",
    TaskStatus::Closed => "closed",
  }
  .to_string()
}

fn priority_code(priority: TaskPriority) -> u8 {
  match priority {
    TaskPriority::Low => 1,
    TaskPriority::Medium => 2,
    TaskPriority::High => 3,
    TaskPriority::Urgent => 4,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_ticket_maps_to_task() {
    let ticket = ApiTicket {
      ticket_number: "42".into(),
      subject: "Printer down".into(),
      status: "Pending".into(),
      priority: 4,
      assign_to: Some("agent@example.com".into()),
      custom_fields: HashMap::from([("cf_department".to_string(), json!("it-support"))]),
      ..Default::default()
    };

    let task = ticket.into_task();
    assert_eq!(task.id, "42");
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, TaskPriority::Urgent);
    assert_eq!(task.department.as_deref(), Some("it-support"));
  }

  #[test]
  fn test_unknown_status_and_priority_use_defaults() {
    let ticket = ApiTicket {
      status: "Escalated To Mars".into(),
      priority: 99,
      ..Default::default()
    };

    let task = ticket.into_task();
    assert_eq!(task.status, TaskStatus::Open);
    assert_eq!(task.priority, TaskPriority::Medium);
  }

  #[test]
  fn test_new_task_carries_department_as_custom_field() {
    let new_task = crate::desk::types::NewTask {
      title: "t".into(),
      description: None,
      priority: TaskPriority::Low,
      contact_email: "user@example.com".into(),
      department: Some("billing".into()),
    };

    let create = ApiTicketCreate::from(&new_task);
    assert_eq!(create.priority, 1);
    assert_eq!(create.custom_fields.get("cf_department"), Some(&json!("billing")));
  }

  #[test]
  fn test_update_serializes_only_set_fields() {
    let update = crate::desk::types::TaskUpdate {
      status: Some(TaskStatus::Resolved),
      ..Default::default()
    };

    let raw = serde_json::to_value(ApiTicketUpdate::from(&update)).unwrap();
    assert_eq!(raw, json!({"status": "resolved"}));
  }
}
