//! Contracts between the attention engine and its host UI.
//!
//! The engine never touches windows, views or timers directly. Everything it
//! needs to know about the host goes through [`HostFocusQuery`] and
//! [`SurfaceClassifier`]; everything it wants the host to do comes back as a
//! [`HostCommand`]. Tests drive the engine with fake implementations.

use crate::generation::TimerTicket;
use crate::surface::{ContainerId, GroupId, SurfaceId, SurfaceInfo};
use std::time::Duration;

/// Read-only view of host focus, window and pointer state.
///
/// All methods take `&self` and must be cheap: the scheduler calls them on
/// every decision instead of caching their answers.
pub trait HostFocusQuery {
    /// Returns `true` if the host application is the frontmost app.
    fn is_frontmost(&self) -> bool;

    /// The key (active) container, if any.
    fn key_container(&self) -> Option<ContainerId>;

    /// The group a container belongs to.
    fn container_group(&self, container: ContainerId) -> Option<GroupId>;

    /// Returns `true` while a blocking modal (command palette, sheet) is open.
    fn is_modal_open(&self) -> bool;

    /// The surface that is first responder in the key container, if any.
    fn focused_surface(&self) -> Option<SurfaceId>;

    /// Returns `true` if the mouse pointer is inside `surface`.
    fn is_pointer_inside(&self, surface: SurfaceId) -> bool;

    /// Fresh snapshot of a surface, or `None` once it has closed.
    fn surface(&self, id: SurfaceId) -> Option<SurfaceInfo>;

    /// Group of the key container: the "current group" for scoping.
    fn current_group(&self) -> Option<GroupId> {
        self.key_container()
            .and_then(|container| self.container_group(container))
    }
}

/// Best-effort status reported by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentStatus {
    #[default]
    Unknown,
    /// The program is producing output or thinking
    Working,
    /// The program is waiting for the user
    Waiting,
    /// The program finished
    Idle,
}

/// Classifier output for one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Provider label such as "claude" or "codex"
    pub provider: String,
    pub status: AgentStatus,
}

impl Classification {
    pub fn new(provider: impl Into<String>, status: AgentStatus) -> Self {
        Self {
            provider: provider.into(),
            status,
        }
    }
}

/// Opaque classifier deciding what program runs in a surface.
pub trait SurfaceClassifier {
    fn classify(&self, surface: SurfaceId) -> Option<Classification>;
}

/// Classifier that never recognises anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClassifier;

impl SurfaceClassifier for NoClassifier {
    fn classify(&self, _surface: SurfaceId) -> Option<Classification> {
        None
    }
}

/// Command the host must carry out on the engine's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Focus `surface` and activate its owning container.
    FocusSurface {
        surface: SurfaceId,
        container: ContainerId,
    },
    /// Deliver `ticket` back to the engine after `after` has elapsed.
    ///
    /// The host need not cancel earlier timers; stale tickets are ignored.
    ArmTimer { after: Duration, ticket: TimerTicket },
}

impl HostCommand {
    /// The surface targeted by a focus command.
    pub fn focus_target(&self) -> Option<SurfaceId> {
        match self {
            HostCommand::FocusSurface { surface, .. } => Some(*surface),
            HostCommand::ArmTimer { .. } => None,
        }
    }
}
