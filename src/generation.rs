//! Generation counter for token-based timer cancellation.
//!
//! Host timer primitives cannot be relied on to cancel cleanly, so every
//! armed timer captures the generation that was current when it was armed.
//! When it fires, the callback is honoured only if that generation is still
//! current. Starting a new decision epoch is a single [`GenerationCounter::advance`]
//! and every older ticket silently becomes a no-op.

use std::fmt;

/// A captured generation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}

/// Monotonic generation source.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new epoch, invalidating every previously captured generation.
    pub fn advance(&mut self) -> Generation {
        self.current = self.current.wrapping_add(1);
        Generation(self.current)
    }

    /// The live generation.
    pub fn current(&self) -> Generation {
        Generation(self.current)
    }

    /// Whether `generation` is still the live one.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }
}

/// What a timer was armed to re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Nothing focused: wait for general input to go idle.
    Idle,
    /// The pending mark is younger than the configured minimum age.
    MinAge {
        /// Re-check continues on the resume path rather than the idle path.
        from_resume: bool,
        /// Carried through from the resume that armed it.
        bypass_focus_pause: bool,
    },
    /// Debounced resume after a reading pause ended.
    Resume {
        /// Skip the "pointer re-entered the focused surface" check.
        bypass_focus_pause: bool,
    },
    /// Bounded reading pause with zero user input.
    FocusedIdle,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerKind::Idle => write!(f, "idle"),
            TimerKind::MinAge { from_resume, .. } => {
                write!(f, "min-age(resume={})", from_resume)
            }
            TimerKind::Resume { bypass_focus_pause } => {
                write!(f, "resume(bypass={})", bypass_focus_pause)
            }
            TimerKind::FocusedIdle => write!(f, "focused-idle"),
        }
    }
}

/// Handle given to the host when a timer is armed; handed back on fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerTicket {
    pub generation: Generation,
    pub kind: TimerKind,
}

impl TimerTicket {
    pub fn new(generation: Generation, kind: TimerKind) -> Self {
        Self { generation, kind }
    }
}
