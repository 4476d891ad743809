//! Shared integration test helpers for the attention engine.
//!
//! Provides a scriptable [`FakeHost`] and a [`Sim`] that drives an
//! [`AttentionEngine`] on a virtual clock, firing armed timers in time order.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::{Sim, enabled_config};
//! ```
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attribute
//! suppresses warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use par_term_attention::{
    AttentionConfig, AttentionEngine, AttentionEvent, AttentionSource, ContainerId, GroupId,
    HostCommand, HostFocusQuery, SurfaceId, SurfaceInfo, TimerTicket,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Mutable host state behind [`FakeHost`].
#[derive(Debug, Clone)]
pub struct HostState {
    pub frontmost: bool,
    pub key: Option<ContainerId>,
    pub modal: bool,
    pub focused: Option<SurfaceId>,
    pub pointer_inside: Option<SurfaceId>,
    pub surfaces: Vec<SurfaceInfo>,
}

/// Scriptable host with interior mutability, shareable with the runtime.
///
/// Default layout:
/// ```text
/// group 1: container 10 -> surfaces 1, 3
///          container 11 -> surface 2
/// group 2: container 20 -> surface 4
/// ```
/// Container 10 is key; a container's group is `container / 10`.
#[derive(Debug)]
pub struct FakeHost {
    state: Mutex<HostState>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(HostState {
                frontmost: true,
                key: Some(10),
                modal: false,
                focused: None,
                pointer_inside: None,
                surfaces: vec![
                    SurfaceInfo::new(1, 1, 10),
                    SurfaceInfo::new(2, 1, 11),
                    SurfaceInfo::new(3, 1, 10),
                    SurfaceInfo::new(4, 2, 20),
                ],
            }),
        }
    }

    pub fn set_focused(&self, surface: Option<SurfaceId>) {
        self.state.lock().focused = surface;
    }

    pub fn set_pointer_inside(&self, surface: Option<SurfaceId>) {
        self.state.lock().pointer_inside = surface;
    }

    pub fn set_frontmost(&self, frontmost: bool) {
        self.state.lock().frontmost = frontmost;
    }

    pub fn set_modal(&self, modal: bool) {
        self.state.lock().modal = modal;
    }

    pub fn set_key(&self, key: Option<ContainerId>) {
        self.state.lock().key = key;
    }

    pub fn set_title(&self, surface: SurfaceId, title: &str) {
        let mut state = self.state.lock();
        if let Some(info) = state.surfaces.iter_mut().find(|s| s.id == surface) {
            info.title = title.to_string();
        }
    }

    pub fn add_surface(&self, info: SurfaceInfo) {
        self.state.lock().surfaces.push(info);
    }

    pub fn remove_surface(&self, surface: SurfaceId) {
        self.state.lock().surfaces.retain(|s| s.id != surface);
    }

    pub fn snapshot(&self) -> HostState {
        self.state.lock().clone()
    }
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostFocusQuery for FakeHost {
    fn is_frontmost(&self) -> bool {
        self.state.lock().frontmost
    }

    fn key_container(&self) -> Option<ContainerId> {
        self.state.lock().key
    }

    fn container_group(&self, container: ContainerId) -> Option<GroupId> {
        Some(container / 10)
    }

    fn is_modal_open(&self) -> bool {
        self.state.lock().modal
    }

    fn focused_surface(&self) -> Option<SurfaceId> {
        self.state.lock().focused
    }

    fn is_pointer_inside(&self, surface: SurfaceId) -> bool {
        self.state.lock().pointer_inside == Some(surface)
    }

    fn surface(&self, id: SurfaceId) -> Option<SurfaceInfo> {
        self.state.lock().surfaces.iter().find(|s| s.id == id).cloned()
    }
}

/// Auto-focus enabled with the given idle wait and resume delay (ms).
pub fn enabled_config(idle_ms: u64, resume_ms: u64) -> AttentionConfig {
    AttentionConfig {
        auto_focus_attention: true,
        auto_focus_attention_idle_ms: idle_ms,
        auto_focus_attention_resume_delay_ms: resume_ms,
        ..AttentionConfig::default()
    }
}

/// A temp dir plus the path of an `attention.yaml` inside it.
///
/// The `TempDir` must outlive every use of the path.
pub fn config_path_in_tmp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("attention.yaml");
    (temp_dir, path)
}

/// Engine plus fake host on a virtual clock.
///
/// Focus commands are applied to the host and reported back as
/// `FocusChanged`, the way a real UI echoes the change.
pub struct Sim {
    pub engine: AttentionEngine,
    pub host: FakeHost,
    pub start: Instant,
    pub now: Instant,
    timers: Vec<(Instant, TimerTicket)>,
    /// `(ms since start, surface, container)` for every focus command
    pub focused: Vec<(u64, SurfaceId, ContainerId)>,
    /// Apply focus commands to the host (on by default)
    pub apply_focus: bool,
}

impl Sim {
    pub fn new(config: AttentionConfig) -> Self {
        let start = Instant::now();
        Self {
            engine: AttentionEngine::new(config),
            host: FakeHost::new(),
            start,
            now: start,
            timers: Vec::new(),
            focused: Vec::new(),
            apply_focus: true,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now.duration_since(self.start).as_millis() as u64
    }

    /// Deliver `event` at the current virtual time.
    pub fn send(&mut self, event: AttentionEvent) {
        let commands = self.engine.handle(event, self.now, &self.host);
        self.apply(commands);
    }

    fn apply(&mut self, commands: Vec<HostCommand>) {
        let at = self.elapsed_ms();
        for command in commands {
            match command {
                HostCommand::ArmTimer { after, ticket } => {
                    self.timers.push((self.now + after, ticket));
                }
                HostCommand::FocusSurface { surface, container } => {
                    self.focused.push((at, surface, container));
                    if self.apply_focus {
                        self.host.set_focused(Some(surface));
                        self.send(AttentionEvent::FocusChanged {
                            surface: Some(surface),
                        });
                    }
                }
            }
        }
    }

    pub fn bell(&mut self, surface: SurfaceId) {
        self.send(AttentionEvent::Mark {
            surface,
            source: AttentionSource::Bell,
        });
    }

    pub fn input(&mut self) {
        self.send(AttentionEvent::InputActivity);
    }

    /// User focuses `surface` (host state plus event).
    pub fn focus(&mut self, surface: Option<SurfaceId>) {
        self.host.set_focused(surface);
        self.send(AttentionEvent::FocusChanged { surface });
    }

    pub fn pointer_enter(&mut self, surface: SurfaceId) {
        self.host.set_pointer_inside(Some(surface));
        self.send(AttentionEvent::PointerEntered { surface });
    }

    pub fn pointer_exit(&mut self, surface: SurfaceId) {
        self.host.set_pointer_inside(None);
        self.send(AttentionEvent::PointerExited { surface });
    }

    /// Fire every timer due up to `ms` after start, in time order.
    pub fn advance_to(&mut self, ms: u64) {
        let target = self.start + Duration::from_millis(ms);
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, (due, _))| *due <= target)
                .min_by_key(|(_, (due, _))| *due)
                .map(|(i, _)| i);
            let Some(index) = next else {
                break;
            };
            let (due, ticket) = self.timers.remove(index);
            self.now = due;
            self.send(AttentionEvent::TimerFired(ticket));
        }
        self.now = target;
    }

    /// Timers still queued (live or stale).
    pub fn queued_timers(&self) -> Vec<(u64, TimerTicket)> {
        self.timers
            .iter()
            .map(|(due, ticket)| (due.duration_since(self.start).as_millis() as u64, *ticket))
            .collect()
    }

    /// Surfaces focused by the engine, in order.
    pub fn commits(&self) -> Vec<SurfaceId> {
        self.focused.iter().map(|(_, surface, _)| *surface).collect()
    }
}
