//! User activity tracking.
//!
//! Records the latest general input (keys, clicks, scrolls) and the latest
//! pointer transition into or out of the focused surface. The scheduler
//! measures its idle and debounce waits against these timestamps.

use crate::surface::SurfaceId;
use std::time::{Duration, Instant};

/// A pointer entering or leaving a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerTransition {
    pub surface: SurfaceId,
    pub inside: bool,
    pub at: Instant,
}

/// Most recent user activity.
#[derive(Debug, Default)]
pub struct ActivityTracker {
    last_input: Option<Instant>,
    last_pointer: Option<PointerTransition>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record general user input at `now`.
    pub fn record_input(&mut self, now: Instant) {
        // Host events may arrive slightly out of order; keep the latest.
        if self.last_input.is_none_or(|last| now > last) {
            self.last_input = Some(now);
        }
    }

    /// Record the pointer entering (`inside = true`) or leaving `surface`.
    pub fn record_pointer(&mut self, surface: SurfaceId, inside: bool, now: Instant) {
        self.last_pointer = Some(PointerTransition {
            surface,
            inside,
            at: now,
        });
    }

    pub fn last_input(&self) -> Option<Instant> {
        self.last_input
    }

    pub fn last_pointer_transition(&self) -> Option<PointerTransition> {
        self.last_pointer
    }

    /// Time since the last general input; `Duration::MAX` if there was none.
    pub fn since_input(&self, now: Instant) -> Duration {
        elapsed_since(self.last_input, now)
    }

    /// Time since any activity at all, pointer transitions included.
    pub fn since_quiet(&self, now: Instant) -> Duration {
        let latest = match (self.last_input, self.last_pointer.map(|p| p.at)) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        elapsed_since(latest, now)
    }
}

fn elapsed_since(at: Option<Instant>, now: Instant) -> Duration {
    at.map_or(Duration::MAX, |at| now.saturating_duration_since(at))
}

/// How much longer to wait before `elapsed` reaches `required`.
///
/// Returns `None` once the wait is satisfied.
pub fn remaining_wait(required: Duration, elapsed: Duration) -> Option<Duration> {
    (elapsed < required).then(|| required - elapsed)
}
