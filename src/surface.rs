//! Surface identity and grouping types.
//!
//! A surface is a single terminal pane. Surfaces live in a container (a
//! window) and containers belong to a group (a tab group). The host UI owns
//! every surface; the engine only ever holds ids and asks the host for a
//! fresh [`SurfaceInfo`] when it needs grouping or title data.

/// Unique identifier for a surface (terminal pane)
pub type SurfaceId = u64;

/// Unique identifier for a group of containers (tab group)
pub type GroupId = u64;

/// Unique identifier for a container (window)
pub type ContainerId = u64;

/// Host-provided snapshot of a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceInfo {
    /// Surface id
    pub id: SurfaceId,
    /// Group the surface's container belongs to
    pub group: GroupId,
    /// Container (window) holding the surface
    pub container: ContainerId,
    /// Current title, scanned for explicit watch tags
    pub title: String,
}

impl SurfaceInfo {
    pub fn new(id: SurfaceId, group: GroupId, container: ContainerId) -> Self {
        Self {
            id,
            group,
            container,
            title: String::new(),
        }
    }

    /// Builder-style title setter.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
