//! Invalidation tag vocabulary shared by the facades.
//!
//! Tags are not namespaced: invalidating one affects matching entries from
//! every cache service sharing the storage. The facades rely on this so a
//! ticket write seen by one facade also flushes listings cached by another.

pub const TASKS: &str = "tasks";
pub const COMMENTS: &str = "comments";
pub const ATTACHMENTS: &str = "attachments";
pub const DEPARTMENTS: &str = "departments";
pub const STATS: &str = "stats";

/// Entity tag for a single task.
pub fn task(id: &str) -> String {
  format!("task:{}", id)
}

/// Grouping tag for a department's cached listings.
pub fn department(name: &str) -> String {
  format!("department:{}", name)
}
