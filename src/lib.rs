// Library exports for the attention engine
//
// # Threading
//
// The engine itself is single-threaded and sans-IO: `AttentionEngine::handle`
// is a plain synchronous call that returns host commands. The only shared
// state is the configuration, held in an `arc_swap::ArcSwap` so any thread can
// publish a new config without locking the decision path. The trace log file
// in `debug` is guarded by a `parking_lot::Mutex`.
//
// `runtime` wraps the engine in a single tokio task for hosts that want an
// async driver; hosts with their own event loop call `handle` directly.

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[macro_use]
pub mod debug;

pub mod activity;
pub mod cycler;
pub mod engine;
pub mod generation;
pub mod host;
pub mod marks;
pub mod runtime;
pub mod scheduler;
pub mod surface;
pub mod watch;

// Re-export config types for convenience
pub use par_term_attention_config::{AttentionConfig, AttentionSource, ConfigError, WatchMode};

pub use activity::ActivityTracker;
pub use cycler::{CycleCursorRegistry, CycleDirection, CycleScope, CycleScopeKey};
pub use engine::{AttentionEngine, AttentionEvent, AttentionSnapshot, ConfigHandle, config_handle};
pub use generation::{Generation, GenerationCounter, TimerKind, TimerTicket};
pub use host::{
    AgentStatus, Classification, HostCommand, HostFocusQuery, NoClassifier, SurfaceClassifier,
};
pub use marks::{AttentionMark, AttentionMarkStore, ClearReason};
pub use runtime::{AttentionHandle, AttentionRuntime, FocusRequest, RuntimeError};
pub use scheduler::{AutoFocusScheduler, Ineligible, PendingAttention, SchedulerPhase};
pub use surface::{ContainerId, GroupId, SurfaceId, SurfaceInfo};
pub use watch::{SurfaceTagMatcher, is_watchable};
