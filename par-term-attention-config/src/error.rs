//! Typed error variants for the par-term-attention-config crate.
//!
//! Provides structured error types for config I/O and validation operations
//! so library consumers can match on specific failure modes instead of
//! opaque `anyhow` strings.

use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
///
/// Produced by [`AttentionConfig::load_from`](crate::AttentionConfig::load_from),
/// [`AttentionConfig::save_to`](crate::AttentionConfig::save_to) and
/// [`AttentionConfig::from_yaml`](crate::AttentionConfig::from_yaml).
///
/// # Example
///
/// ```rust,no_run
/// use par_term_attention_config::{AttentionConfig, ConfigError};
///
/// match AttentionConfig::load_from(std::path::Path::new("attention.yaml")) {
///     Ok(config) => println!("auto-focus: {}", config.auto_focus_attention),
///     Err(ConfigError::Io(io)) => eprintln!("I/O error: {io}"),
///     Err(ConfigError::Parse(p)) => eprintln!("YAML parse error: {p}"),
///     Err(ConfigError::Validation(msg)) => eprintln!("Validation: {msg}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config: {0}")]
    Parse(#[from] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = ConfigError::Validation("idle must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Config validation error: idle must be positive"
        );
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;
        let err: ConfigError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error reading config"));
    }
}
