//! Generic caching layer and cached facade for the Desk365 ticketing API.
//!
//! The [`cache`] module is ticketing-agnostic: pluggable storage backends,
//! a namespaced typed cache service with TTL expiration and tag-based
//! invalidation, deterministic key construction, and a factory with
//! environment-aware fallback. The [`desk`] module wraps a remote ticket API
//! client in facades that read through the cache and invalidate on writes.
//!
//! This is a single-process, best-effort cache: no cross-process
//! coordination, no durability guarantees. A storage fault degrades into a
//! cache miss and a live remote call, never into an error.

pub mod cache;
pub mod config;
pub mod desk;

pub use config::{ConfigError, DeskConfig};
