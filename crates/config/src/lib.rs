//! Configuration loading and hot-reloading for the embed token service.
//!
//! Uses figment for YAML + environment configuration with sensible defaults,
//! and notify + arc-swap for live file watching.

pub mod schema;
pub mod watcher;

pub use schema::{Config, ENV_PREFIX, IdentityConfig, LogConfig, LogFormat, PowerBiConfig};
pub use watcher::ConfigWatcher;
