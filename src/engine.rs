//! Attention engine facade.
//!
//! [`AttentionEngine`] owns every piece of attention state (marks, activity,
//! cycle cursors, the auto-focus scheduler) and exposes one sans-IO entry
//! point: [`AttentionEngine::handle`] takes a host event plus the current
//! time and returns the commands the host must carry out. It never sleeps,
//! spawns or touches the UI itself.

use crate::activity::ActivityTracker;
use crate::cycler::{CandidateSource, CycleCursorRegistry, CycleDirection, CycleScope, cycle};
use crate::debug::ATTN;
use crate::generation::{Generation, TimerTicket};
use crate::host::{HostCommand, HostFocusQuery, NoClassifier, SurfaceClassifier};
use crate::marks::{AttentionMarkStore, ClearReason};
use crate::scheduler::{
    AutoFocusScheduler, Ineligible, PendingAttention, SchedulerContext, SchedulerPhase,
};
use crate::surface::SurfaceId;
use crate::watch::SurfaceTagMatcher;
use arc_swap::ArcSwap;
use par_term_attention_config::{AttentionConfig, AttentionSource};
use std::sync::Arc;
use std::time::Instant;

/// Shared, hot-swappable configuration.
///
/// Every decision loads the current value, so a store from any thread takes
/// effect on the next event.
pub type ConfigHandle = Arc<ArcSwap<AttentionConfig>>;

/// Build a [`ConfigHandle`] from an initial config.
pub fn config_handle(config: AttentionConfig) -> ConfigHandle {
    Arc::new(ArcSwap::from_pointee(config))
}

/// Inbound event from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttentionEvent {
    /// A surface rang the bell or otherwise asked for attention
    Mark {
        surface: SurfaceId,
        source: AttentionSource,
    },
    /// The user dismissed a surface's attention mark
    Dismiss { surface: SurfaceId },
    /// A surface closed
    SurfaceClosed { surface: SurfaceId },
    /// First responder changed (`None` when nothing is focused)
    FocusChanged { surface: Option<SurfaceId> },
    PointerEntered { surface: SurfaceId },
    PointerExited { surface: SurfaceId },
    /// Any key press, click or scroll
    InputActivity,
    AppActivationChanged { active: bool },
    ModalShown,
    ModalHidden,
    /// The shared config was replaced
    ConfigChanged,
    /// A timer armed through [`HostCommand::ArmTimer`] elapsed
    TimerFired(TimerTicket),
    /// "Go to next/previous attention" command
    Cycle {
        direction: CycleDirection,
        scope: CycleScope,
    },
}

/// Point-in-time view of engine state for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct AttentionSnapshot {
    pub phase: SchedulerPhase,
    pub pending: PendingAttention,
    pub generation: Generation,
    pub marked: Vec<SurfaceId>,
    pub auto_focus_enabled: bool,
}

/// Attention tracking and auto-focus engine.
pub struct AttentionEngine {
    config: ConfigHandle,
    marks: AttentionMarkStore,
    activity: ActivityTracker,
    cursors: CycleCursorRegistry,
    scheduler: AutoFocusScheduler,
    tags: SurfaceTagMatcher,
    classifier: Box<dyn SurfaceClassifier + Send>,
    /// Enable flag seen by the previous event, to spot it being switched off
    auto_focus_enabled: bool,
}

impl AttentionEngine {
    pub fn new(config: AttentionConfig) -> Self {
        Self::with_handle(config_handle(config))
    }

    /// Engine sharing an existing config handle.
    pub fn with_handle(config: ConfigHandle) -> Self {
        let current = config.load();
        let tags = SurfaceTagMatcher::from_config(&current);
        let auto_focus_enabled = current.auto_focus_attention;
        drop(current);

        Self {
            config,
            marks: AttentionMarkStore::new(),
            activity: ActivityTracker::new(),
            cursors: CycleCursorRegistry::new(),
            scheduler: AutoFocusScheduler::new(),
            tags,
            classifier: Box::new(NoClassifier),
            auto_focus_enabled,
        }
    }

    /// Replace the classifier used by the `agents` watch modes.
    pub fn with_classifier(mut self, classifier: impl SurfaceClassifier + Send + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn config_handle(&self) -> ConfigHandle {
        Arc::clone(&self.config)
    }

    pub fn config(&self) -> Arc<AttentionConfig> {
        self.config.load_full()
    }

    /// Swap in a new config and re-run any pending decision against it.
    pub fn update_config(
        &mut self,
        config: AttentionConfig,
        now: Instant,
        host: &dyn HostFocusQuery,
    ) -> Vec<HostCommand> {
        self.config.store(Arc::new(config));
        self.handle(AttentionEvent::ConfigChanged, now, host)
    }

    pub fn marks(&self) -> &AttentionMarkStore {
        &self.marks
    }

    pub fn activity(&self) -> &ActivityTracker {
        &self.activity
    }

    pub fn cursors(&self) -> &CycleCursorRegistry {
        &self.cursors
    }

    pub fn scheduler(&self) -> &AutoFocusScheduler {
        &self.scheduler
    }

    pub fn needs_attention(&self, surface: SurfaceId) -> bool {
        self.marks.needs_attention(surface)
    }

    pub fn snapshot(&self) -> AttentionSnapshot {
        let mut marked: Vec<SurfaceId> = self.marks.marked_surfaces().map(|(id, _)| id).collect();
        marked.sort_unstable();
        AttentionSnapshot {
            phase: self.scheduler.phase(),
            pending: self.scheduler.pending().clone(),
            generation: self.scheduler.generation(),
            marked,
            auto_focus_enabled: self.auto_focus_enabled,
        }
    }

    /// Process one host event at `now`.
    pub fn handle(
        &mut self,
        event: AttentionEvent,
        now: Instant,
        host: &dyn HostFocusQuery,
    ) -> Vec<HostCommand> {
        let config = self.config.load_full();
        self.tags.refresh(&config);
        let mut out = Vec::new();

        match event {
            AttentionEvent::Mark { surface, source } => {
                if !config.accepts_source(source) {
                    crate::debug_log!(
                        ATTN,
                        "ignoring {} on surface {}",
                        source.display_name(),
                        surface
                    );
                    return out;
                }
                self.marks.mark(surface, source, now);
                // Rejection is already logged by the scheduler; the mark stays
                // for manual cycling either way.
                let _ = self.drive(&config, now, host, &mut out, |s, ctx, out| {
                    s.on_mark(surface, ctx, out)
                });
            }
            AttentionEvent::Dismiss { surface } => {
                if self.marks.clear(surface, ClearReason::Dismissed) {
                    self.drive(&config, now, host, &mut out, |s, ctx, _| {
                        s.on_marks_cleared(ctx)
                    });
                }
            }
            AttentionEvent::SurfaceClosed { surface } => {
                self.marks.forget(surface);
                self.cursors.forget_surface(surface);
                self.drive(&config, now, host, &mut out, |s, ctx, out| {
                    s.on_marks_cleared(ctx);
                    s.forget_surface(surface, ctx, out);
                });
            }
            AttentionEvent::FocusChanged { surface } => {
                let cleared = config.clear_attention_on_focus
                    && surface.is_some_and(|s| self.marks.clear(s, ClearReason::FocusedByUser));
                self.drive(&config, now, host, &mut out, |s, ctx, out| {
                    s.on_focus(surface, ctx, out);
                    if cleared {
                        s.on_marks_cleared(ctx);
                    }
                });
            }
            AttentionEvent::PointerEntered { surface } => {
                self.pointer(surface, true, &config, now, host, &mut out);
            }
            AttentionEvent::PointerExited { surface } => {
                self.pointer(surface, false, &config, now, host, &mut out);
            }
            AttentionEvent::InputActivity => {
                // Pending timers re-read activity when they fire.
                self.activity.record_input(now);
            }
            AttentionEvent::AppActivationChanged { active: true } | AttentionEvent::ModalHidden => {
                self.drive(&config, now, host, &mut out, |s, ctx, out| {
                    s.reschedule(ctx, out)
                });
            }
            AttentionEvent::AppActivationChanged { active: false } => {
                self.scheduler.suspend(Ineligible::NotFrontmost);
            }
            AttentionEvent::ModalShown => {
                self.scheduler.suspend(Ineligible::ModalOpen);
            }
            AttentionEvent::ConfigChanged => {
                let was_enabled = self.auto_focus_enabled;
                self.auto_focus_enabled = config.auto_focus_attention;
                log::info!(
                    "Attention config applied (auto-focus {})",
                    if config.auto_focus_attention { "on" } else { "off" }
                );
                if was_enabled && !config.auto_focus_attention {
                    self.scheduler.suspend(Ineligible::Disabled);
                } else {
                    self.drive(&config, now, host, &mut out, |s, ctx, out| {
                        s.reschedule(ctx, out)
                    });
                }
            }
            AttentionEvent::TimerFired(ticket) => {
                self.drive(&config, now, host, &mut out, |s, ctx, out| {
                    s.on_timer(ticket, ctx, out)
                });
            }
            AttentionEvent::Cycle { direction, scope } => {
                let source = CandidateSource {
                    marks: &self.marks,
                    host,
                    classifier: self.classifier.as_ref(),
                    config: &config,
                    tags: &self.tags,
                };
                if let Some(target) = cycle(&mut self.cursors, direction, scope, &source) {
                    out.push(HostCommand::FocusSurface {
                        surface: target.id,
                        container: target.container,
                    });
                }
            }
        }

        out
    }

    fn pointer(
        &mut self,
        surface: SurfaceId,
        inside: bool,
        config: &AttentionConfig,
        now: Instant,
        host: &dyn HostFocusQuery,
        out: &mut Vec<HostCommand>,
    ) {
        if host.focused_surface() == Some(surface) {
            self.activity.record_pointer(surface, inside, now);
        }
        self.drive(config, now, host, out, |s, ctx, out| {
            s.on_pointer(surface, inside, ctx, out)
        });
    }

    /// Run `f` against the scheduler with a freshly built context.
    fn drive<R>(
        &mut self,
        config: &AttentionConfig,
        now: Instant,
        host: &dyn HostFocusQuery,
        out: &mut Vec<HostCommand>,
        f: impl FnOnce(&mut AutoFocusScheduler, &SchedulerContext<'_>, &mut Vec<HostCommand>) -> R,
    ) -> R {
        let ctx = SchedulerContext {
            now,
            config,
            host,
            activity: &self.activity,
            candidates: CandidateSource {
                marks: &self.marks,
                host,
                classifier: self.classifier.as_ref(),
                config,
                tags: &self.tags,
            },
        };
        f(&mut self.scheduler, &ctx, out)
    }
}

impl std::fmt::Debug for AttentionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttentionEngine")
            .field("marks", &self.marks)
            .field("scheduler", &self.scheduler)
            .field("auto_focus_enabled", &self.auto_focus_enabled)
            .finish_non_exhaustive()
    }
}
