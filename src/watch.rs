//! Watchability filter.
//!
//! Decides whether a surface's mark counts toward cycling and auto-focus.
//! The answer is recomputed on every call from the live config, the surface
//! title and the classifier, so config changes apply immediately.

use crate::host::SurfaceClassifier;
use crate::surface::SurfaceInfo;
use par_term_attention_config::{AttentionConfig, WatchMode};
use regex::Regex;

/// Extracts explicit `prefix<token>suffix` tags from surface titles.
///
/// Holds the compiled pattern for one prefix/suffix pair and rebuilds it
/// when the configured delimiters change.
#[derive(Debug, Clone)]
pub struct SurfaceTagMatcher {
    prefix: String,
    suffix: String,
    pattern: Option<Regex>,
}

impl SurfaceTagMatcher {
    pub fn new(prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            pattern: Self::compile(prefix, suffix),
        }
    }

    pub fn from_config(config: &AttentionConfig) -> Self {
        Self::new(&config.surface_tag_prefix, &config.surface_tag_suffix)
    }

    fn compile(prefix: &str, suffix: &str) -> Option<Regex> {
        if prefix.is_empty() || suffix.is_empty() {
            return None;
        }
        let source = format!(
            "{}(.*?){}",
            regex::escape(prefix),
            regex::escape(suffix)
        );
        match Regex::new(&source) {
            Ok(re) => Some(re),
            Err(e) => {
                log::warn!("Invalid surface tag pattern '{}': {}", source, e);
                None
            }
        }
    }

    /// Rebuild the pattern if `config` names different delimiters.
    pub fn refresh(&mut self, config: &AttentionConfig) {
        if self.prefix != config.surface_tag_prefix || self.suffix != config.surface_tag_suffix {
            *self = Self::from_config(config);
        }
    }

    /// All non-empty, trimmed tag tokens in `title`.
    pub fn tags<'a>(&self, title: &'a str) -> Vec<&'a str> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        pattern
            .captures_iter(title)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|token| !token.is_empty())
            .collect()
    }

    /// Whether `title` carries a tag that qualifies under `config`.
    ///
    /// Any token qualifies when `surface_tag_allow_any` is set; otherwise the
    /// token must name a watched provider.
    pub fn has_watch_tag(&self, title: &str, config: &AttentionConfig) -> bool {
        self.tags(title)
            .into_iter()
            .any(|token| config.surface_tag_allow_any || config.is_watched_provider(token))
    }
}

/// Whether `surface` passes the configured watch filter.
pub fn is_watchable(
    surface: &SurfaceInfo,
    config: &AttentionConfig,
    classifier: &dyn SurfaceClassifier,
    tags: &SurfaceTagMatcher,
) -> bool {
    let tagged = || tags.has_watch_tag(&surface.title, config);
    let agent = || {
        classifier
            .classify(surface.id)
            .is_some_and(|c| config.is_watched_provider(&c.provider))
    };

    match config.auto_focus_attention_watch_mode {
        WatchMode::All => true,
        WatchMode::Marked => tagged(),
        WatchMode::Agents => agent(),
        WatchMode::AgentsOrMarked => agent() || tagged(),
    }
}
