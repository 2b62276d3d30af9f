//! # Children Collector
//!
//! Maintains the filtered, ordered list of layout-participating children
//! for one container. Membership and ordering are decided by the tree (it
//! owns activity, hierarchy indices, and descriptors); the collector owns
//! the caching discipline: rebuild membership lazily when marked stale,
//! re-sort only when a sort-affecting property changed, and purge
//! despawned entries before every read.

use crate::tree::ElementId;

#[derive(Debug, Clone, Default)]
pub struct ChildrenCollector {
    entries: Vec<ElementId>,
    needs_rebuild: bool,
    needs_sort: bool,
}

impl ChildrenCollector {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            needs_rebuild: true,
            needs_sort: true,
        }
    }

    pub fn mark_rebuild(&mut self) {
        self.needs_rebuild = true;
    }

    pub fn mark_sort(&mut self) {
        self.needs_sort = true;
    }

    /// Incremental add on a child-activated/attached event. No-op if the
    /// child is already tracked.
    pub fn note_added(&mut self, id: ElementId) {
        if !self.entries.contains(&id) {
            self.entries.push(id);
            self.needs_sort = true;
        }
    }

    /// Incremental removal on a child-deactivated/detached event.
    pub fn note_removed(&mut self, id: ElementId) {
        self.entries.retain(|&e| e != id);
    }

    /// Drop entries whose element no longer exists.
    pub fn purge(&mut self, alive: impl Fn(ElementId) -> bool) {
        self.entries.retain(|&e| alive(e));
    }

    /// The ordered participating children. `rebuild` produces the filtered
    /// membership from scratch; `sort_key` returns
    /// `(override_order, hierarchy_index)` for one entry.
    pub fn read(
        &mut self,
        rebuild: impl FnOnce() -> Vec<ElementId>,
        sort_key: impl Fn(ElementId) -> (i32, i32),
    ) -> &[ElementId] {
        if self.needs_rebuild {
            self.needs_rebuild = false;
            self.needs_sort = false;
            self.entries = rebuild();
            self.entries.sort_by_key(|&e| sort_key(e));
        } else if self.needs_sort {
            self.needs_sort = false;
            self.entries.sort_by_key(|&e| sort_key(e));
        }
        &self.entries
    }
}
