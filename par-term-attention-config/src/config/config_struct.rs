//! Core `AttentionConfig` struct definition.
//!
//! Field names are snake_case in YAML. Each field also accepts the
//! kebab-case option name (`auto-focus-attention-idle`, ...) as an alias so
//! configs written against the option table keep loading.

use crate::types::{AttentionSource, WatchMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attention tracking and auto-focus configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttentionConfig {
    // ========================================================================
    // Auto-focus
    // ========================================================================
    /// Master enable for focus stealing toward surfaces that need attention
    #[serde(
        default = "crate::defaults::bool_false",
        alias = "auto-focus-attention"
    )]
    pub auto_focus_attention: bool,

    /// Input-idle time (ms) required before stealing focus when no surface
    /// is focused
    #[serde(
        default = "crate::defaults::auto_focus_idle_ms",
        alias = "auto-focus-attention-idle"
    )]
    pub auto_focus_attention_idle_ms: u64,

    /// Debounced quiet period (ms) before resuming after a reading pause ends.
    /// Any user input during the countdown restarts it.
    #[serde(
        default = "crate::defaults::auto_focus_resume_delay_ms",
        alias = "auto-focus-attention-resume-delay"
    )]
    pub auto_focus_attention_resume_delay_ms: u64,

    /// Minimum age (ms) of the pending mark before it may fire (0 = disabled)
    #[serde(
        default = "crate::defaults::auto_focus_min_age_ms",
        alias = "auto-focus-attention-min-age"
    )]
    pub auto_focus_attention_min_age_ms: u64,

    /// Treat switching focus away from the paused surface as "done reading"
    #[serde(
        default = "crate::defaults::bool_true",
        alias = "auto-focus-attention-resume-on-surface-switch"
    )]
    pub auto_focus_attention_resume_on_surface_switch: bool,

    /// Resume after this many ms of zero user input while paused on a focused
    /// surface. `None` lets a reading pause last forever.
    #[serde(default, alias = "auto-focus-attention-resume-on-focused-idle")]
    pub auto_focus_attention_resume_on_focused_idle_ms: Option<u64>,

    // ========================================================================
    // Watch filter
    // ========================================================================
    /// Which surfaces count toward cycling and auto-focus
    /// - all: every surface
    /// - marked: surfaces with an explicit title tag
    /// - agents: surfaces classified as a watched provider
    /// - agents_or_marked: either of the above
    #[serde(
        default = "crate::defaults::watch_mode",
        alias = "auto-focus-attention-watch-mode"
    )]
    pub auto_focus_attention_watch_mode: WatchMode,

    /// Provider allow-list for the agent watch modes and for title tags
    #[serde(
        default = "crate::defaults::watch_providers",
        alias = "attention-watch-providers"
    )]
    pub attention_watch_providers: Vec<String>,

    /// Text that opens an explicit title tag, e.g. `[agent:`
    #[serde(
        default = "crate::defaults::surface_tag_prefix",
        alias = "surface-tag-prefix"
    )]
    pub surface_tag_prefix: String,

    /// Text that closes an explicit title tag, e.g. `]`
    #[serde(
        default = "crate::defaults::surface_tag_suffix",
        alias = "surface-tag-suffix"
    )]
    pub surface_tag_suffix: String,

    /// Accept any tag token, not only those naming a watched provider
    #[serde(
        default = "crate::defaults::bool_false",
        alias = "surface-tag-allow-any"
    )]
    pub surface_tag_allow_any: bool,

    // ========================================================================
    // Marks
    // ========================================================================
    /// Clear a surface's attention mark when the user focuses it
    #[serde(
        default = "crate::defaults::bool_true",
        alias = "clear-attention-on-focus"
    )]
    pub clear_attention_on_focus: bool,

    /// Signals allowed to mark a surface as needing attention
    #[serde(
        default = "crate::defaults::attention_sources",
        alias = "attention-sources"
    )]
    pub attention_sources: Vec<AttentionSource>,

    // ========================================================================
    // Hot reload
    // ========================================================================
    /// Debounce delay (ms) for config file change events
    #[serde(
        default = "crate::defaults::config_reload_delay_ms",
        alias = "config-reload-delay"
    )]
    pub config_reload_delay_ms: u64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            auto_focus_attention: crate::defaults::bool_false(),
            auto_focus_attention_idle_ms: crate::defaults::auto_focus_idle_ms(),
            auto_focus_attention_resume_delay_ms: crate::defaults::auto_focus_resume_delay_ms(),
            auto_focus_attention_min_age_ms: crate::defaults::auto_focus_min_age_ms(),
            auto_focus_attention_resume_on_surface_switch: crate::defaults::bool_true(),
            auto_focus_attention_resume_on_focused_idle_ms: None,
            auto_focus_attention_watch_mode: crate::defaults::watch_mode(),
            attention_watch_providers: crate::defaults::watch_providers(),
            surface_tag_prefix: crate::defaults::surface_tag_prefix(),
            surface_tag_suffix: crate::defaults::surface_tag_suffix(),
            surface_tag_allow_any: crate::defaults::bool_false(),
            clear_attention_on_focus: crate::defaults::bool_true(),
            attention_sources: crate::defaults::attention_sources(),
            config_reload_delay_ms: crate::defaults::config_reload_delay_ms(),
        }
    }
}

impl AttentionConfig {
    /// Idle wait used when no surface is focused.
    pub fn idle_wait(&self) -> Duration {
        Duration::from_millis(self.auto_focus_attention_idle_ms)
    }

    /// Debounced resume delay.
    pub fn resume_delay(&self) -> Duration {
        Duration::from_millis(self.auto_focus_attention_resume_delay_ms)
    }

    /// Minimum attention age, or `None` when disabled.
    pub fn min_age(&self) -> Option<Duration> {
        (self.auto_focus_attention_min_age_ms > 0)
            .then(|| Duration::from_millis(self.auto_focus_attention_min_age_ms))
    }

    /// Focused-idle bound, or `None` when reading pauses are unbounded.
    ///
    /// A configured value of 0 is treated as unset.
    pub fn focused_idle(&self) -> Option<Duration> {
        self.auto_focus_attention_resume_on_focused_idle_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Whether `provider` is in the watch list (ASCII case-insensitive).
    pub fn is_watched_provider(&self, provider: &str) -> bool {
        let provider = provider.trim();
        !provider.is_empty()
            && self
                .attention_watch_providers
                .iter()
                .any(|p| p.trim().eq_ignore_ascii_case(provider))
    }

    /// Whether marks from `source` are honoured.
    pub fn accepts_source(&self, source: AttentionSource) -> bool {
        self.attention_sources.contains(&source)
    }
}
