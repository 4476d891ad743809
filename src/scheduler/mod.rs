//! Auto-focus scheduler.
//!
//! Decides when focus may be moved automatically toward the most recent
//! surface that needs attention, without disrupting active use. The
//! scheduler is a timer-driven state machine:
//!
//! - A surface is focused and the pointer is inside it: the user is reading,
//!   so wait ([`SchedulerPhase::PausedReading`]), optionally bounded by a
//!   focused-idle timer.
//! - A surface is focused but the pointer is outside: the user is done
//!   reading, so wait out a debounced resume delay
//!   ([`SchedulerPhase::WaitingResume`]).
//! - Nothing is focused: wait for general input to go idle
//!   ([`SchedulerPhase::WaitingIdle`]).
//! - A fresh mark may also have to age first ([`SchedulerPhase::WaitingMinAge`]).
//! - After a commit the chosen surface is locked
//!   ([`SchedulerPhase::FocusLocked`]) so the next mark elsewhere cannot
//!   steal focus while the pointer is still inside it.
//!
//! "Waiting" is always arming a timer through [`HostCommand::ArmTimer`] and
//! returning. Every armed ticket carries the generation current at arm time;
//! a ticket that fires after a newer generation exists is dropped. Every
//! timer fire re-checks all guards from scratch, so an unmet precondition
//! just leaves the attention pending until the next relevant signal.

mod pending;


pub use pending::{PendingAttention, SchedulerPhase};

use crate::activity::{ActivityTracker, remaining_wait};
use crate::cycler::{CandidateSource, most_recent_candidate};
use crate::debug::{ATTN, TIMER};
use crate::generation::{Generation, GenerationCounter, TimerKind, TimerTicket};
use crate::host::{HostCommand, HostFocusQuery};
use crate::surface::SurfaceId;
use crate::watch::is_watchable;
use par_term_attention_config::AttentionConfig;
use std::fmt;
use std::time::{Duration, Instant};

/// Why an attention event or timer was not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    /// Auto-focus is switched off
    Disabled,
    /// The host no longer knows the surface
    UnknownSurface,
    /// The watch filter rejects the surface
    NotWatchable,
    /// The surface lives outside the key container's group
    OtherGroup,
    /// The host application is not frontmost
    NotFrontmost,
    /// No container is key
    NoKeyContainer,
    /// A blocking modal is open
    ModalOpen,
}

impl fmt::Display for Ineligible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Ineligible::Disabled => "auto-focus disabled",
            Ineligible::UnknownSurface => "unknown surface",
            Ineligible::NotWatchable => "not watchable",
            Ineligible::OtherGroup => "outside the key group",
            Ineligible::NotFrontmost => "app not frontmost",
            Ineligible::NoKeyContainer => "no key window",
            Ineligible::ModalOpen => "modal open",
        };
        f.write_str(text)
    }
}

/// Everything a scheduling decision reads.
///
/// Rebuilt for every call so configuration and host state are never stale.
pub struct SchedulerContext<'a> {
    pub now: Instant,
    pub config: &'a AttentionConfig,
    pub host: &'a dyn HostFocusQuery,
    pub activity: &'a ActivityTracker,
    pub candidates: CandidateSource<'a>,
}

/// Timer-driven auto-focus state machine.
#[derive(Debug)]
pub struct AutoFocusScheduler {
    state: PendingAttention,
    phase: SchedulerPhase,
    generation: GenerationCounter,
}

impl Default for AutoFocusScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AutoFocusScheduler {
    pub fn new() -> Self {
        Self {
            state: PendingAttention::default(),
            phase: SchedulerPhase::Idle,
            generation: GenerationCounter::new(),
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn pending(&self) -> &PendingAttention {
        &self.state
    }

    pub fn generation(&self) -> Generation {
        self.generation.current()
    }

    // ── Inbound signals ────────────────────────────────────────────────────

    /// An attention mark arrived on `surface`.
    ///
    /// The mark is accepted only when auto-focus is enabled, the app is
    /// frontmost with a key container and no modal, and the surface is
    /// watchable inside the key container's group. Accepting starts
    /// a new pending window and a new decision epoch.
    pub fn on_mark(
        &mut self,
        surface: SurfaceId,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) -> Result<(), Ineligible> {
        if let Err(why) = Self::check_mark(surface, ctx) {
            crate::debug_log!(ATTN, "drop mark surface={} reason={}", surface, why);
            return Err(why);
        }

        crate::debug_info!(ATTN, "accept mark surface={} phase={}", surface, self.phase);
        self.state.begin(ctx.now);
        self.schedule(ctx, out);
        Ok(())
    }

    /// The pointer entered (`inside = true`) or left `surface`.
    ///
    /// Only transitions on the focused surface matter.
    pub fn on_pointer(
        &mut self,
        surface: SurfaceId,
        inside: bool,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) {
        if ctx.host.focused_surface() != Some(surface) {
            return;
        }

        // Any pointer transition on the locked surface hands it back to the
        // ordinary reading rules.
        if self.state.focus_lock == Some(surface) {
            self.state.focus_lock = None;
            crate::debug_log!(ATTN, "lock on surface {} released by pointer", surface);
        }

        if !self.state.pending {
            if self.phase == SchedulerPhase::FocusLocked {
                self.phase = SchedulerPhase::Idle;
            }
            return;
        }

        if inside {
            self.enter_paused(surface, ctx, out);
        } else {
            self.state.paused_on = Some(surface);
            self.start_resume(false, ctx, out);
        }
    }

    /// Focus moved to `surface` (or to nothing).
    pub fn on_focus(
        &mut self,
        surface: Option<SurfaceId>,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) {
        let mut lock_released = false;
        if let Some(lock) = self.state.focus_lock
            && surface != Some(lock)
        {
            self.state.focus_lock = None;
            lock_released = true;
            crate::debug_log!(ATTN, "lock on surface {} released by focus change", lock);
        }

        if !self.state.pending {
            if lock_released && self.phase == SchedulerPhase::FocusLocked {
                self.phase = SchedulerPhase::Idle;
            }
            return;
        }

        if lock_released {
            self.schedule(ctx, out);
            return;
        }

        // The surface being read was closed; nothing will end that pause.
        let reading_gone = self.phase == SchedulerPhase::PausedReading
            && self
                .state
                .paused_on
                .is_none_or(|paused_on| ctx.host.surface(paused_on).is_none());
        if reading_gone && surface.is_some() {
            crate::debug_log!(ATTN, "paused surface is gone, deciding afresh");
            self.schedule(ctx, out);
            return;
        }

        match (surface, self.state.paused_on) {
            (None, Some(_)) if self.phase == SchedulerPhase::PausedReading => {
                crate::debug_log!(ATTN, "paused surface lost focus");
                self.start_resume(false, ctx, out);
            }
            (Some(new), Some(paused_on))
                if new != paused_on
                    && ctx.config.auto_focus_attention_resume_on_surface_switch =>
            {
                crate::debug_log!(
                    ATTN,
                    "surface switch {} -> {} counts as done reading",
                    paused_on,
                    new
                );
                self.start_resume(false, ctx, out);
            }
            _ => {}
        }
    }

    /// A timer armed by this scheduler fired.
    pub fn on_timer(
        &mut self,
        ticket: TimerTicket,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) {
        if !self.generation.is_current(ticket.generation) {
            crate::debug_trace!(
                TIMER,
                "stale {} ticket {} (live {})",
                ticket.kind,
                ticket.generation,
                self.generation.current()
            );
            return;
        }
        crate::debug_trace!(TIMER, "fire {} ticket {}", ticket.kind, ticket.generation);

        if !self.state.pending {
            return;
        }
        if let Err(why) = Self::check_guards(ctx) {
            self.hold(why);
            return;
        }

        match ticket.kind {
            TimerKind::Idle
            | TimerKind::MinAge {
                from_resume: false, ..
            } => self.continue_idle(ctx, out),
            TimerKind::Resume { bypass_focus_pause }
            | TimerKind::MinAge {
                from_resume: true,
                bypass_focus_pause,
            } => self.continue_resume(bypass_focus_pause, ctx, out),
            TimerKind::FocusedIdle => self.continue_focused_idle(ctx, out),
        }
    }

    /// Re-run the scheduling decision if attention is pending.
    ///
    /// Called when a blocking condition may have lifted (app re-activated,
    /// modal closed, config changed).
    pub fn reschedule(&mut self, ctx: &SchedulerContext<'_>, out: &mut Vec<HostCommand>) {
        if self.state.pending {
            self.schedule(ctx, out);
        }
    }

    /// Invalidate every in-flight timer without touching pending state.
    ///
    /// Called when a blocking condition starts (app deactivated, modal
    /// shown, auto-focus disabled).
    pub fn suspend(&mut self, why: Ineligible) {
        self.generation.advance();
        if self.state.pending {
            self.hold(why);
        }
    }

    /// Drop the pending window if no watchable mark is left anywhere.
    pub fn on_marks_cleared(&mut self, ctx: &SchedulerContext<'_>) {
        if self.state.pending && most_recent_candidate(&ctx.candidates).is_none() {
            crate::debug_log!(ATTN, "no candidates left, dropping pending attention");
            self.reset_to_idle();
        }
    }

    /// Forget every reference to a closed surface.
    ///
    /// Closing the surface the user was reading ends that pause, so pending
    /// attention is decided afresh.
    pub fn forget_surface(
        &mut self,
        surface: SurfaceId,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) {
        let was_reading = self.state.paused_on == Some(surface);
        if was_reading {
            self.state.paused_on = None;
        }
        if self.state.focus_lock == Some(surface) {
            self.state.focus_lock = None;
            if !self.state.pending && self.phase == SchedulerPhase::FocusLocked {
                self.phase = SchedulerPhase::Idle;
            }
        }

        if was_reading
            && self.state.pending
            && matches!(
                self.phase,
                SchedulerPhase::PausedReading | SchedulerPhase::FocusLocked
            )
        {
            crate::debug_log!(ATTN, "read surface {} closed", surface);
            self.schedule(ctx, out);
        }
    }

    // ── Guards ─────────────────────────────────────────────────────────────

    fn check_guards(ctx: &SchedulerContext<'_>) -> Result<(), Ineligible> {
        if !ctx.config.auto_focus_attention {
            return Err(Ineligible::Disabled);
        }
        if !ctx.host.is_frontmost() {
            return Err(Ineligible::NotFrontmost);
        }
        if ctx.host.key_container().is_none() {
            return Err(Ineligible::NoKeyContainer);
        }
        if ctx.host.is_modal_open() {
            return Err(Ineligible::ModalOpen);
        }
        Ok(())
    }

    fn check_mark(surface: SurfaceId, ctx: &SchedulerContext<'_>) -> Result<(), Ineligible> {
        Self::check_guards(ctx)?;
        let info = ctx.host.surface(surface).ok_or(Ineligible::UnknownSurface)?;
        let source = &ctx.candidates;
        if !is_watchable(&info, ctx.config, source.classifier, source.tags) {
            return Err(Ineligible::NotWatchable);
        }
        if ctx.host.current_group() != Some(info.group) {
            return Err(Ineligible::OtherGroup);
        }
        Ok(())
    }

    // ── Transitions ────────────────────────────────────────────────────────

    /// Fresh decision for the current pending window.
    fn schedule(&mut self, ctx: &SchedulerContext<'_>, out: &mut Vec<HostCommand>) {
        self.generation.advance();
        if !self.state.pending {
            self.set_phase(SchedulerPhase::Idle);
            return;
        }
        if let Err(why) = Self::check_guards(ctx) {
            self.hold(why);
            return;
        }

        let Some(focused) = ctx.host.focused_surface() else {
            self.state.paused_on = None;
            self.set_phase(SchedulerPhase::WaitingIdle);
            self.arm(TimerKind::Idle, ctx.config.idle_wait(), out);
            return;
        };

        // The lock only holds while the user is still reading the surface.
        if self.state.focus_lock == Some(focused) && ctx.host.is_pointer_inside(focused) {
            self.enter_locked(focused, ctx, out);
            return;
        }
        if let Some(lock) = self.state.focus_lock.take() {
            crate::debug_log!(ATTN, "lock on surface {} released, not being read", lock);
        }

        if ctx.host.is_pointer_inside(focused) {
            self.enter_paused(focused, ctx, out);
        } else {
            self.state.paused_on = Some(focused);
            self.start_resume(false, ctx, out);
        }
    }

    fn enter_paused(
        &mut self,
        surface: SurfaceId,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) {
        self.generation.advance();
        self.state.paused_on = Some(surface);
        self.set_phase(SchedulerPhase::PausedReading);
        self.arm_focused_idle(ctx, out);
    }

    fn enter_locked(
        &mut self,
        surface: SurfaceId,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) {
        self.generation.advance();
        self.state.paused_on = Some(surface);
        self.set_phase(SchedulerPhase::FocusLocked);
        self.arm_focused_idle(ctx, out);
    }

    fn arm_focused_idle(&self, ctx: &SchedulerContext<'_>, out: &mut Vec<HostCommand>) {
        if let Some(bound) = ctx.config.focused_idle() {
            self.arm(TimerKind::FocusedIdle, bound, out);
        }
    }

    fn start_resume(
        &mut self,
        bypass_focus_pause: bool,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) {
        self.generation.advance();
        self.set_phase(SchedulerPhase::WaitingResume { bypass_focus_pause });
        self.arm(
            TimerKind::Resume { bypass_focus_pause },
            ctx.config.resume_delay(),
            out,
        );
    }

    /// Idle path: nothing was focused when the wait began.
    fn continue_idle(&mut self, ctx: &SchedulerContext<'_>, out: &mut Vec<HostCommand>) {
        if ctx.host.focused_surface().is_some() {
            // Something got focused while we waited; decide afresh.
            self.schedule(ctx, out);
            return;
        }

        if let Some(remaining) = self.min_age_remaining(ctx) {
            self.set_phase(SchedulerPhase::WaitingMinAge);
            self.arm(
                TimerKind::MinAge {
                    from_resume: false,
                    bypass_focus_pause: false,
                },
                remaining,
                out,
            );
            return;
        }

        let idle = ctx.activity.since_input(ctx.now);
        if let Some(remaining) = remaining_wait(ctx.config.idle_wait(), idle) {
            self.set_phase(SchedulerPhase::WaitingIdle);
            self.arm(TimerKind::Idle, remaining, out);
            return;
        }

        self.commit(ctx, out);
    }

    /// Resume path: a reading pause ended.
    fn continue_resume(
        &mut self,
        bypass_focus_pause: bool,
        ctx: &SchedulerContext<'_>,
        out: &mut Vec<HostCommand>,
    ) {
        if !bypass_focus_pause
            && let Some(focused) = ctx.host.focused_surface()
            && ctx.host.is_pointer_inside(focused)
        {
            crate::debug_log!(ATTN, "reading resumed on surface {}", focused);
            self.enter_paused(focused, ctx, out);
            return;
        }

        // True debounce: any activity during the countdown pushes it out.
        let quiet = ctx.activity.since_quiet(ctx.now);
        if let Some(remaining) = remaining_wait(ctx.config.resume_delay(), quiet) {
            self.set_phase(SchedulerPhase::WaitingResume { bypass_focus_pause });
            self.arm(TimerKind::Resume { bypass_focus_pause }, remaining, out);
            return;
        }

        if let Some(remaining) = self.min_age_remaining(ctx) {
            self.set_phase(SchedulerPhase::WaitingMinAge);
            self.arm(
                TimerKind::MinAge {
                    from_resume: true,
                    bypass_focus_pause,
                },
                remaining,
                out,
            );
            return;
        }

        self.commit(ctx, out);
    }

    /// Focused-idle bound: the user went quiet while paused.
    fn continue_focused_idle(&mut self, ctx: &SchedulerContext<'_>, out: &mut Vec<HostCommand>) {
        if !matches!(
            self.phase,
            SchedulerPhase::PausedReading | SchedulerPhase::FocusLocked
        ) {
            return;
        }
        let Some(bound) = ctx.config.focused_idle() else {
            return;
        };

        let quiet = ctx.activity.since_quiet(ctx.now);
        if let Some(remaining) = remaining_wait(bound, quiet) {
            self.arm(TimerKind::FocusedIdle, remaining, out);
            return;
        }

        crate::debug_log!(ATTN, "no input for {:?} while paused, resuming", bound);
        self.state.focus_lock = None;
        self.start_resume(true, ctx, out);
    }

    /// Focus the most recent watchable candidate, current group first.
    fn commit(&mut self, ctx: &SchedulerContext<'_>, out: &mut Vec<HostCommand>) {
        let Some(target) = most_recent_candidate(&ctx.candidates) else {
            crate::debug_log!(ATTN, "commit found no candidates");
            self.reset_to_idle();
            return;
        };

        self.generation.advance();
        self.state.clear();
        self.state.focus_lock = Some(target.id);
        self.set_phase(SchedulerPhase::FocusLocked);

        log::info!(
            "Auto-focusing surface {} in container {}",
            target.id,
            target.container
        );
        crate::debug_info!(ATTN, "commit surface={} container={}", target.id, target.container);
        out.push(HostCommand::FocusSurface {
            surface: target.id,
            container: target.container,
        });
    }

    // ── Helpers ────────────────────────────────────────────────────────────

    fn min_age_remaining(&self, ctx: &SchedulerContext<'_>) -> Option<Duration> {
        let min_age = ctx.config.min_age()?;
        let since = self.state.pending_since?;
        remaining_wait(min_age, ctx.now.saturating_duration_since(since))
    }

    fn reset_to_idle(&mut self) {
        self.generation.advance();
        self.state.clear();
        self.set_phase(if self.state.focus_lock.is_some() {
            SchedulerPhase::FocusLocked
        } else {
            SchedulerPhase::Idle
        });
    }

    fn hold(&mut self, why: Ineligible) {
        crate::debug_log!(ATTN, "holding pending attention: {}", why);
        self.set_phase(SchedulerPhase::Held);
    }

    fn set_phase(&mut self, phase: SchedulerPhase) {
        if self.phase != phase {
            crate::debug_log!(ATTN, "phase {} -> {}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn arm(&self, kind: TimerKind, after: Duration, out: &mut Vec<HostCommand>) {
        let ticket = TimerTicket::new(self.generation.current(), kind);
        crate::debug_trace!(TIMER, "arm {} ticket {} in {:?}", kind, ticket.generation, after);
        out.push(HostCommand::ArmTimer { after, ticket });
    }
}
