//! Scheduler state values.

use crate::surface::SurfaceId;
use std::fmt;
use std::time::Instant;

/// Pending auto-focus state for one scheduler.
///
/// Created empty and mutated only by the scheduler's own transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingAttention {
    /// An accepted mark is waiting to be acted on
    pub pending: bool,
    /// When the current pending window began
    pub pending_since: Option<Instant>,
    /// Surface that was focused when the current pause began
    pub paused_on: Option<SurfaceId>,
    /// Surface that was just auto-focused and must not be stolen from yet
    pub focus_lock: Option<SurfaceId>,
}

impl PendingAttention {
    /// Start (or restart) a pending window at `now`.
    pub(crate) fn begin(&mut self, now: Instant) {
        self.pending = true;
        self.pending_since = Some(now);
    }

    /// Drop the pending window. The focus lock is left alone.
    pub(crate) fn clear(&mut self) {
        self.pending = false;
        self.pending_since = None;
        self.paused_on = None;
    }

    /// `pending` implies a start time.
    pub fn is_consistent(&self) -> bool {
        !self.pending || self.pending_since.is_some()
    }
}

/// Conceptual scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    /// No pending attention
    Idle,
    /// Pending, but the user is reading a focused surface
    PausedReading,
    /// Pending with nothing focused; waiting for general input to go idle
    WaitingIdle,
    /// A pause ended; waiting out the debounced resume delay
    WaitingResume { bypass_focus_pause: bool },
    /// Pending mark is younger than the minimum attention age
    WaitingMinAge,
    /// A surface was just auto-focused; new attention is held behind it
    FocusLocked,
    /// Pending, but a precondition (frontmost, key window, modal,
    /// enabled) failed; waits for a relevant signal to re-decide
    Held,
}

impl fmt::Display for SchedulerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerPhase::Idle => write!(f, "idle"),
            SchedulerPhase::PausedReading => write!(f, "paused-reading"),
            SchedulerPhase::WaitingIdle => write!(f, "waiting-idle"),
            SchedulerPhase::WaitingResume { bypass_focus_pause } => {
                write!(f, "waiting-resume(bypass={})", bypass_focus_pause)
            }
            SchedulerPhase::WaitingMinAge => write!(f, "waiting-min-age"),
            SchedulerPhase::FocusLocked => write!(f, "focus-locked"),
            SchedulerPhase::Held => write!(f, "held"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_clear() {
        let mut state = PendingAttention::default();
        assert!(state.is_consistent());

        let now = Instant::now();
        state.begin(now);
        state.paused_on = Some(2);
        state.focus_lock = Some(9);
        assert!(state.pending);
        assert_eq!(state.pending_since, Some(now));
        assert!(state.is_consistent());

        state.clear();
        assert!(!state.pending);
        assert_eq!(state.pending_since, None);
        assert_eq!(state.paused_on, None);
        assert_eq!(state.focus_lock, Some(9));
    }

    #[test]
    fn test_inconsistent_state_detected() {
        let state = PendingAttention {
            pending: true,
            ..PendingAttention::default()
        };
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(
            SchedulerPhase::WaitingResume {
                bypass_focus_pause: false
            }
            .to_string(),
            "waiting-resume(bypass=false)"
        );
        assert_eq!(SchedulerPhase::FocusLocked.to_string(), "focus-locked");
    }
}
