//! Manual "go to next/previous attention" cycling.
//!
//! Candidates are marked, watchable surfaces ordered most recent first
//! (`marked_at` descending, ties by ascending surface id). Each scope keeps
//! its own last-visited cursor so repeated presses walk the list instead of
//! bouncing back to the newest mark.

use crate::host::{HostFocusQuery, SurfaceClassifier};
use crate::marks::AttentionMarkStore;
use crate::surface::{GroupId, SurfaceId, SurfaceInfo};
use crate::watch::{SurfaceTagMatcher, is_watchable};
use par_term_attention_config::AttentionConfig;
use std::collections::HashMap;
use std::time::Instant;

/// Direction to cycle in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    /// Toward older marks (starts at the most recent)
    Next,
    /// Toward newer marks (starts at the least recent)
    Previous,
}

/// Which surfaces to consider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleScope {
    /// The key container's group, falling back to all groups when empty
    CurrentGroup,
    AllGroups,
}

/// Key under which a cycle cursor is remembered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleScopeKey {
    Group(GroupId),
    AllGroups,
}

/// Last-visited surface per scope.
///
/// Owned by whoever manages groups and passed by reference into
/// [`cycle`]; lives for the whole process.
#[derive(Debug, Default)]
pub struct CycleCursorRegistry {
    cursors: HashMap<CycleScopeKey, SurfaceId>,
}

impl CycleCursorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self, scope: CycleScopeKey) -> Option<SurfaceId> {
        self.cursors.get(&scope).copied()
    }

    pub fn record(&mut self, scope: CycleScopeKey, surface: SurfaceId) {
        self.cursors.insert(scope, surface);
    }

    /// Drop every cursor pointing at `surface`.
    pub fn forget_surface(&mut self, surface: SurfaceId) {
        self.cursors.retain(|_, cursor| *cursor != surface);
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}

/// Ordered candidates for one effective scope.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    /// Scope the candidates were drawn from, after any fallback
    pub scope: CycleScopeKey,
    /// Most recent first
    pub surfaces: Vec<SurfaceInfo>,
}

/// Everything needed to gather candidates.
#[derive(Clone, Copy)]
pub struct CandidateSource<'a> {
    pub marks: &'a AttentionMarkStore,
    pub host: &'a dyn HostFocusQuery,
    pub classifier: &'a dyn SurfaceClassifier,
    pub config: &'a AttentionConfig,
    pub tags: &'a SurfaceTagMatcher,
}

impl CandidateSource<'_> {
    /// Marked, watchable, still-open surfaces in `group` (or all groups),
    /// sorted most recent first.
    fn collect(&self, group: Option<GroupId>) -> Vec<SurfaceInfo> {
        let mut found: Vec<(SurfaceInfo, Instant)> = self
            .marks
            .marked_surfaces()
            .filter_map(|(id, mark)| self.host.surface(id).map(|info| (info, mark.marked_at)))
            .filter(|(info, _)| group.is_none_or(|g| info.group == g))
            .filter(|(info, _)| is_watchable(info, self.config, self.classifier, self.tags))
            .collect();

        found.sort_by(|(a, a_at), (b, b_at)| b_at.cmp(a_at).then(a.id.cmp(&b.id)));
        found.into_iter().map(|(info, _)| info).collect()
    }

    /// Candidates for `scope`, falling back from the current group to all
    /// groups when the current group has none.
    pub fn candidates(&self, scope: CycleScope) -> CandidateSet {
        if scope == CycleScope::CurrentGroup
            && let Some(group) = self.host.current_group()
        {
            let surfaces = self.collect(Some(group));
            if !surfaces.is_empty() {
                return CandidateSet {
                    scope: CycleScopeKey::Group(group),
                    surfaces,
                };
            }
        }
        CandidateSet {
            scope: CycleScopeKey::AllGroups,
            surfaces: self.collect(None),
        }
    }
}

/// The most recent candidate, preferring the current group.
///
/// Used by the auto-focus commit, which never follows the user's cursor.
pub fn most_recent_candidate(source: &CandidateSource<'_>) -> Option<SurfaceInfo> {
    source
        .candidates(CycleScope::CurrentGroup)
        .surfaces
        .into_iter()
        .next()
}

/// Pick the next surface to visit and remember it as the scope's cursor.
///
/// Returns `None` when nothing needs attention anywhere.
pub fn cycle(
    cursors: &mut CycleCursorRegistry,
    direction: CycleDirection,
    scope: CycleScope,
    source: &CandidateSource<'_>,
) -> Option<SurfaceInfo> {
    let CandidateSet { scope, surfaces } = source.candidates(scope);
    let n = surfaces.len();
    if n == 0 {
        crate::debug_log!(crate::debug::CYCLE, "cycle {:?}: no candidates", direction);
        return None;
    }

    let previous = cursors
        .cursor(scope)
        .and_then(|cursor| surfaces.iter().position(|s| s.id == cursor));
    let index = match (previous, direction) {
        (None, CycleDirection::Next) => 0,
        (None, CycleDirection::Previous) => n - 1,
        (Some(i), CycleDirection::Next) => (i + 1) % n,
        (Some(i), CycleDirection::Previous) => (i + n - 1) % n,
    };

    let chosen = surfaces.into_iter().nth(index)?;
    cursors.record(scope, chosen.id);
    crate::debug_log!(
        crate::debug::CYCLE,
        "cycle {:?} scope={:?} -> surface {} ({}/{})",
        direction,
        scope,
        chosen.id,
        index + 1,
        n
    );
    Some(chosen)
}
