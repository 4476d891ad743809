//! Configuration system for the par-term attention engine.
//!
//! This crate provides configuration loading, saving, validation and default
//! values for attention tracking and auto-focus scheduling. It includes:
//!
//! - The [`AttentionConfig`] struct and its serde defaults
//! - Watch-mode and attention-source enums
//! - YAML persistence with atomic saves
//! - Configuration file watching (behind the `watcher` feature)
//!
//! The crate is a pure data/config crate: it knows nothing about surfaces,
//! timers or scheduling.

pub mod config;
pub mod defaults;
pub mod error;
mod types;
#[cfg(feature = "watcher")]
pub mod watcher;

// Re-export main types for convenience
pub use config::AttentionConfig;
pub use error::ConfigError;
pub use types::{AttentionSource, WatchMode};
#[cfg(feature = "watcher")]
pub use watcher::{ConfigReloadEvent, ConfigWatcher};
