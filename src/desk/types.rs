//! Domain model for Desk365 tickets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
  Open,
  Pending,
  Resolved,
  Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
  Low,
  Medium,
  High,
  Urgent,
}

/// A support task, mapped from a Desk365 ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
  pub id: String,
  pub title: String,
  pub description: Option<String>,
  pub status: TaskStatus,
  pub priority: TaskPriority,
  pub assignee: Option<String>,
  pub contact_email: Option<String>,
  /// Owning department, when the ticket carries one.
  pub department: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

/// Fields for creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
  pub title: String,
  pub description: Option<String>,
  pub priority: TaskPriority,
  pub contact_email: String,
  pub department: Option<String>,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
  pub title: Option<String>,
  pub description: Option<String>,
  pub status: Option<TaskStatus>,
  pub priority: Option<TaskPriority>,
  pub assignee: Option<String>,
  pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub id: String,
  pub task_id: String,
  pub body: String,
  pub author: Option<String>,
  /// Private notes are visible to agents only.
  pub private: bool,
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
  pub id: String,
  pub task_id: String,
  pub file_name: String,
  pub size_bytes: u64,
  pub url: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
}

/// Ticket counts across all departments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentStats {
  pub total_tickets: u64,
  pub open_tickets: u64,
  pub resolved_tickets: u64,
  /// Per-department open counts, keyed by department name.
  pub by_department: std::collections::BTreeMap<String, u64>,
}
