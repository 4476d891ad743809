//! Attention configuration enums.

use serde::{Deserialize, Serialize};

// ============================================================================
// Watch Mode
// ============================================================================

/// Which surfaces count toward attention cycling and auto-focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchMode {
    /// Every surface is watched
    #[default]
    All,
    /// Only surfaces carrying an explicit user-applied title tag
    Marked,
    /// Only surfaces whose classified provider is in the watch list
    Agents,
    /// Either of `Agents` or `Marked`
    #[serde(alias = "agents-or-marked")]
    AgentsOrMarked,
}

impl WatchMode {
    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            WatchMode::All => "All surfaces",
            WatchMode::Marked => "Tagged surfaces",
            WatchMode::Agents => "Agent surfaces",
            WatchMode::AgentsOrMarked => "Agent or tagged surfaces",
        }
    }

    /// Whether this mode consults explicit title tags.
    pub fn uses_tags(&self) -> bool {
        matches!(self, WatchMode::Marked | WatchMode::AgentsOrMarked)
    }

    /// Whether this mode consults the provider classifier.
    pub fn uses_classifier(&self) -> bool {
        matches!(self, WatchMode::Agents | WatchMode::AgentsOrMarked)
    }

    /// All available modes for UI iteration
    pub fn all() -> &'static [WatchMode] {
        &[
            WatchMode::All,
            WatchMode::Marked,
            WatchMode::Agents,
            WatchMode::AgentsOrMarked,
        ]
    }
}

// ============================================================================
// Attention Source
// ============================================================================

/// Terminal signals that can mark a surface as needing attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionSource {
    /// Bell character received (BEL / 0x07)
    Bell,
    /// Output arrived and then went idle
    #[serde(alias = "idle-output")]
    IdleOutput,
    /// Explicit notification escape (OSC 9 / OSC 777)
    Notification,
}

impl AttentionSource {
    /// Display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            AttentionSource::Bell => "Bell",
            AttentionSource::IdleOutput => "Idle Output",
            AttentionSource::Notification => "Notification",
        }
    }

    /// All available sources for UI iteration
    pub fn all() -> &'static [AttentionSource] {
        &[
            AttentionSource::Bell,
            AttentionSource::IdleOutput,
            AttentionSource::Notification,
        ]
    }
}
