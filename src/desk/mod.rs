//! Desk365 domain model and cached facades.
//!
//! The remote HTTP client and the feature flag source live outside this
//! crate; they plug in through the [`client::TicketApi`], [`client::AdminApi`]
//! and [`flags::FeatureFlags`] traits.

pub mod admin;
pub mod api_types;
pub mod client;
pub mod error;
pub mod facade;
pub mod flags;
pub mod provider;
pub mod tags;
pub mod types;

pub use admin::{AdminConfig, AdminService};
pub use client::{AdminApi, ApiError, TicketApi};
pub use error::FacadeError;
pub use facade::{TaskFacade, TaskFacadeConfig};
pub use flags::{FeatureFlags, StaticFlags, FEATURE_ADMIN, FEATURE_TASKS};
pub use provider::ServiceProvider;
pub use types::{
  Attachment, Comment, DepartmentStats, NewTask, Task, TaskPriority, TaskStatus, TaskUpdate,
};
