//! Default value functions for configuration.
//!
//! Each function is used as a `#[serde(default = "crate::defaults::...")]`
//! attribute on [`AttentionConfig`](crate::AttentionConfig) fields and by its
//! `Default` impl, so the two can never drift apart.

use crate::types::{AttentionSource, WatchMode};

// ── Primitive helpers ──────────────────────────────────────────────────────

pub fn bool_false() -> bool {
    false
}

pub fn bool_true() -> bool {
    true
}

// ── Auto-focus timing ──────────────────────────────────────────────────────

/// Input-idle time required before stealing focus when nothing is focused.
pub fn auto_focus_idle_ms() -> u64 {
    3000
}

/// Debounced quiet period after a reading pause ends.
pub fn auto_focus_resume_delay_ms() -> u64 {
    1000
}

/// Minimum age of a pending mark before it may fire (0 disables).
pub fn auto_focus_min_age_ms() -> u64 {
    0
}

// ── Watch filter ───────────────────────────────────────────────────────────

pub fn watch_mode() -> WatchMode {
    WatchMode::All
}

pub fn watch_providers() -> Vec<String> {
    ["claude", "codex", "gemini", "aider", "opencode"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

pub fn surface_tag_prefix() -> String {
    "[agent:".to_string()
}

pub fn surface_tag_suffix() -> String {
    "]".to_string()
}

// ── Marks ──────────────────────────────────────────────────────────────────

pub fn attention_sources() -> Vec<AttentionSource> {
    AttentionSource::all().to_vec()
}

// ── Hot reload ─────────────────────────────────────────────────────────────

/// Debounce applied to config file change events.
pub fn config_reload_delay_ms() -> u64 {
    100
}
