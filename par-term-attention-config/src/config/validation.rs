//! Validation and sanitising methods for `AttentionConfig`.

use super::config_struct::AttentionConfig;
use crate::error::ConfigError;

impl AttentionConfig {
    /// Normalise user-entered values in place.
    ///
    /// Providers are trimmed, lower-cased and de-duplicated (first occurrence
    /// wins). Attention sources are de-duplicated.
    pub fn sanitize(&mut self) {
        let mut providers: Vec<String> = Vec::with_capacity(self.attention_watch_providers.len());
        for provider in &self.attention_watch_providers {
            let provider = provider.trim().to_ascii_lowercase();
            if !provider.is_empty() && !providers.contains(&provider) {
                providers.push(provider);
            }
        }
        self.attention_watch_providers = providers;

        let mut sources = Vec::with_capacity(self.attention_sources.len());
        for source in &self.attention_sources {
            if !sources.contains(source) {
                sources.push(*source);
            }
        }
        self.attention_sources = sources;
    }

    /// Validate the configuration.
    ///
    /// Returns a list of warnings (not errors): every combination still
    /// loads, but some make auto-focus or cycling unable to match anything.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let mode = self.auto_focus_attention_watch_mode;

        if mode.uses_tags() && self.surface_tag_prefix.is_empty() {
            warnings.push(format!(
                "watch mode '{}' uses title tags but surface_tag_prefix is empty",
                mode.display_name()
            ));
        }
        if mode.uses_tags() && self.surface_tag_suffix.is_empty() {
            warnings.push(format!(
                "watch mode '{}' uses title tags but surface_tag_suffix is empty",
                mode.display_name()
            ));
        }
        if mode.uses_classifier() && self.attention_watch_providers.is_empty() {
            warnings.push(format!(
                "watch mode '{}' has an empty attention_watch_providers list",
                mode.display_name()
            ));
        }
        if self.auto_focus_attention && self.auto_focus_attention_idle_ms == 0 {
            warnings.push(
                "auto_focus_attention_idle_ms is 0: focus may be stolen immediately".to_string(),
            );
        }
        if self.attention_sources.is_empty() {
            warnings.push("attention_sources is empty: no surface can be marked".to_string());
        }

        warnings
    }

    /// Strict validation: fail on the first warning.
    ///
    /// Used by callers (e.g. a settings UI "apply" button) that want to
    /// reject a config instead of loading it with warnings.
    pub fn validate_strict(&self) -> Result<(), ConfigError> {
        match self.validate().into_iter().next() {
            Some(first) => Err(ConfigError::Validation(first)),
            None => Ok(()),
        }
    }
}
