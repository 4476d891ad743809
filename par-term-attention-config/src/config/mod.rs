//! Attention configuration management.
//!
//! # Sub-modules
//!
//! - [`config_struct`]: Core [`AttentionConfig`] struct, its `Default` impl and
//!   typed accessors
//! - [`persistence`]: `impl AttentionConfig` methods for load/save/path resolution
//! - [`validation`]: `impl AttentionConfig` methods for warnings and sanitising

pub mod config_struct;
pub mod persistence;
pub mod validation;

pub use config_struct::AttentionConfig;
