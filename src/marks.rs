//! Per-surface "needs attention" marks.
//!
//! A mark is the flag plus the monotonic time it was last set. Presence in
//! the store is the flag, so `needs_attention == false` always implies there
//! is no timestamp. The store has no side effects: it knows nothing about
//! scheduling or filtering.

use crate::surface::SurfaceId;
use par_term_attention_config::AttentionSource;
use std::collections::HashMap;
use std::time::Instant;

/// Why a mark was cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    /// The user focused the surface
    FocusedByUser,
    /// Explicit dismissal
    Dismissed,
    /// The surface went away
    SurfaceClosed,
}

/// A live attention mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttentionMark {
    /// When the surface was last marked
    pub marked_at: Instant,
    /// Signal behind the latest mark
    pub source: AttentionSource,
}

/// Attention flags for every surface.
#[derive(Debug, Default)]
pub struct AttentionMarkStore {
    marks: HashMap<SurfaceId, AttentionMark>,
}

impl AttentionMarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `surface` as needing attention.
    ///
    /// Re-marking only refreshes the timestamp and source. Returns `true`
    /// when the surface was not already marked.
    pub fn mark(&mut self, surface: SurfaceId, source: AttentionSource, now: Instant) -> bool {
        let newly_marked = self
            .marks
            .insert(
                surface,
                AttentionMark {
                    marked_at: now,
                    source,
                },
            )
            .is_none();
        crate::debug_log!(
            crate::debug::ATTN,
            "mark surface={} source={:?} new={}",
            surface,
            source,
            newly_marked
        );
        newly_marked
    }

    /// Clear the mark on `surface`. Returns `true` if it was marked.
    pub fn clear(&mut self, surface: SurfaceId, reason: ClearReason) -> bool {
        let was_marked = self.marks.remove(&surface).is_some();
        if was_marked {
            crate::debug_log!(
                crate::debug::ATTN,
                "clear surface={} reason={:?}",
                surface,
                reason
            );
        }
        was_marked
    }

    /// Drop everything known about a closed surface.
    pub fn forget(&mut self, surface: SurfaceId) -> bool {
        self.clear(surface, ClearReason::SurfaceClosed)
    }

    pub fn needs_attention(&self, surface: SurfaceId) -> bool {
        self.marks.contains_key(&surface)
    }

    pub fn marked_at(&self, surface: SurfaceId) -> Option<Instant> {
        self.marks.get(&surface).map(|mark| mark.marked_at)
    }

    pub fn get(&self, surface: SurfaceId) -> Option<&AttentionMark> {
        self.marks.get(&surface)
    }

    /// Every marked surface, in no particular order.
    pub fn marked_surfaces(&self) -> impl Iterator<Item = (SurfaceId, &AttentionMark)> + '_ {
        self.marks.iter().map(|(id, mark)| (*id, mark))
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}
