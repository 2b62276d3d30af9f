//! # Element Tree
//!
//! The arena that stands in for the host scene graph at the engine
//! boundary: it owns the rect elements, their parent/child links and
//! activity flags, the per-container layout state, and the notification
//! entry points the host would call. Elements are addressed by
//! generational ids, so every cross-reference (collector entries, cached
//! container owners, match-other targets) is a weak reference revalidated
//! on use, never an owning pointer.
//!
//! Rebuilds are cooperative and single-threaded: `update()` runs on the
//! thread that owns the tree, solving dirty containers parents-first. A
//! parent's pass writes each child's box exactly once; a child that is
//! itself a container reacts to the size it was handed by scheduling its
//! own rebuild, which a later pass of the same `update()` picks up.

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::animate::{ApplyMode, TweenOutbox, TweenRequest};
use crate::error::CadreError;
use crate::layout::collector::ChildrenCollector;
use crate::layout::projector;
use crate::layout::scheduler::{RebuildScheduler, SolveDecision};
use crate::layout::{self, ChildBox, ChildSpec, SolveOutput};
use crate::model::{Anchors, RectElement, Vec2};
use crate::style::{LayoutSlot, LayoutStyle, MatchOtherConfig, SizingPolicy};

/// Writes from a parent's pass can re-dirty containers below (and, through
/// fit-to-children, above); passes repeat until the tree settles, bounded
/// so a misconfigured cycle cannot spin forever.
const MAX_UPDATE_PASSES: usize = 8;

/// Generational handle to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    pub fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Layout container state: one per container element, never shared.
#[derive(Debug)]
struct Container {
    style: LayoutStyle,
    apply: ApplyMode,
    collector: ChildrenCollector,
    scheduler: RebuildScheduler,
}

impl Container {
    fn new(style: LayoutStyle) -> Self {
        Self {
            style,
            apply: ApplyMode::Immediate,
            collector: ChildrenCollector::new(),
            scheduler: RebuildScheduler::new(),
        }
    }
}

#[derive(Debug)]
struct Element {
    name: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    hierarchy_index: i32,
    active: bool,
    rect: RectElement,
    /// Degrees, written by the radial solver's face-outward mode.
    rotation: f32,
    slot: Option<LayoutSlot>,
    /// Lazily resolved nearest ancestor container, invalidated on
    /// re-parenting.
    cached_owner: Option<ElementId>,
    container: Option<Container>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    element: Option<Element>,
}

/// The element tree and everything the engine schedules on it.
#[derive(Debug, Default)]
pub struct UiTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<ElementId>,
    outbox: TweenOutbox,
}

impl UiTree {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Element access ─────────────────────────────────────────

    fn get(&self, id: ElementId) -> Option<&Element> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_ref()
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.element.as_mut()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    pub fn rect(&self, id: ElementId) -> Option<&RectElement> {
        self.get(id).map(|e| &e.rect)
    }

    pub fn width(&self, id: ElementId) -> f32 {
        self.rect(id).map_or(0.0, |r| r.width)
    }

    pub fn height(&self, id: ElementId) -> f32 {
        self.rect(id).map_or(0.0, |r| r.height)
    }

    pub fn anchors(&self, id: ElementId) -> Option<Anchors> {
        self.rect(id).map(|r| r.anchors)
    }

    pub fn anchored_offset(&self, id: ElementId) -> Vec2 {
        self.rect(id).map_or(Vec2::ZERO, |r| r.anchored_offset)
    }

    pub fn rotation(&self, id: ElementId) -> f32 {
        self.get(id).map_or(0.0, |e| e.rotation)
    }

    pub fn name(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|e| e.name.as_str())
    }

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).and_then(|e| e.parent)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map_or(&[], |e| e.children.as_slice())
    }

    pub fn layout(&self, id: ElementId) -> Option<&LayoutStyle> {
        self.get(id).and_then(|e| e.container.as_ref()).map(|c| &c.style)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(element) = &slot.element {
                if element.name == name {
                    return Some(ElementId::from_raw(index as u32, slot.generation));
                }
            }
        }
        None
    }

    pub fn is_active_in_hierarchy(&self, id: ElementId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            match self.get(c) {
                Some(element) if element.active => current = element.parent,
                _ => return false,
            }
        }
        true
    }

    // ── Spawning and structure ─────────────────────────────────

    fn allocate(&mut self, element: Element) -> ElementId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.element = Some(element);
            ElementId::from_raw(index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 1,
                element: Some(element),
            });
            ElementId::from_raw(self.slots.len() as u32 - 1, 1)
        }
    }

    fn make_element(name: &str, width: f32, height: f32) -> Element {
        Element {
            name: name.to_string(),
            parent: None,
            children: Vec::new(),
            hierarchy_index: 0,
            active: true,
            rect: RectElement::new(width, height),
            rotation: 0.0,
            slot: None,
            cached_owner: None,
            container: None,
        }
    }

    /// Spawn a root element.
    pub fn spawn(&mut self, name: &str, width: f32, height: f32) -> ElementId {
        let id = self.allocate(Self::make_element(name, width, height));
        self.roots.push(id);
        id
    }

    /// Spawn a child under `parent`, appended at the end of the sibling
    /// order.
    pub fn spawn_child(
        &mut self,
        parent: ElementId,
        name: &str,
        width: f32,
        height: f32,
    ) -> Result<ElementId, CadreError> {
        if !self.contains(parent) {
            return Err(CadreError::StaleElement);
        }
        let id = self.allocate(Self::make_element(name, width, height));
        let index = self.get(parent).map_or(0, |p| p.children.len() as i32);
        if let Some(parent_el) = self.get_mut(parent) {
            parent_el.children.push(id);
        }
        if let Some(child_el) = self.get_mut(id) {
            child_el.parent = Some(parent);
            child_el.hierarchy_index = index;
        }
        self.child_membership_event(parent, id, true);
        Ok(id)
    }

    /// Remove an element and its whole subtree.
    pub fn despawn(&mut self, id: ElementId) -> Result<(), CadreError> {
        if !self.contains(id) {
            return Err(CadreError::StaleElement);
        }
        if let Some(parent) = self.parent(id) {
            if let Some(parent_el) = self.get_mut(parent) {
                parent_el.children.retain(|&c| c != id);
            }
            self.child_membership_event(parent, id, false);
        } else {
            self.roots.retain(|&r| r != id);
        }
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: ElementId) {
        let children = self.children(id).to_vec();
        for child in children {
            self.free_subtree(child);
        }
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation && slot.element.is_some() {
                slot.element = None;
                slot.generation += 1;
                self.free.push(id.index);
            }
        }
    }

    /// Re-parent an element. Owner caches below the moved subtree are
    /// invalidated and re-resolved lazily.
    pub fn attach(&mut self, child: ElementId, new_parent: ElementId) -> Result<(), CadreError> {
        if !self.contains(child) || !self.contains(new_parent) {
            return Err(CadreError::StaleElement);
        }
        // Reject attaching into the element's own subtree.
        let mut cursor = Some(new_parent);
        while let Some(c) = cursor {
            if c == child {
                return Err(CadreError::AttachCycle);
            }
            cursor = self.parent(c);
        }

        if let Some(old_parent) = self.parent(child) {
            if old_parent == new_parent {
                return Ok(());
            }
            if let Some(parent_el) = self.get_mut(old_parent) {
                parent_el.children.retain(|&c| c != child);
            }
            self.child_membership_event(old_parent, child, false);
        } else {
            self.roots.retain(|&r| r != child);
        }

        let index = self.get(new_parent).map_or(0, |p| p.children.len() as i32);
        if let Some(parent_el) = self.get_mut(new_parent) {
            parent_el.children.push(child);
        }
        if let Some(child_el) = self.get_mut(child) {
            child_el.parent = Some(new_parent);
            child_el.hierarchy_index = index;
        }
        self.invalidate_owner_caches(child);
        self.child_membership_event(new_parent, child, true);
        Ok(())
    }

    fn invalidate_owner_caches(&mut self, id: ElementId) {
        if let Some(element) = self.get_mut(id) {
            element.cached_owner = None;
        }
        for child in self.children(id).to_vec() {
            self.invalidate_owner_caches(child);
        }
    }

    // ── Host notifications ─────────────────────────────────────

    pub fn set_active(&mut self, id: ElementId, active: bool) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        if element.active == active {
            return Ok(());
        }
        element.active = active;
        // The element's own container must re-collect once it is shown
        // again.
        if let Some(container) = self.get_mut(id).and_then(|e| e.container.as_mut()) {
            container.scheduler.mark_children_dirty();
        }
        if let Some(parent) = self.parent(id) {
            self.child_membership_event(parent, id, active);
        }
        Ok(())
    }

    pub fn set_hierarchy_index(&mut self, id: ElementId, index: i32) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        if element.hierarchy_index == index {
            return Ok(());
        }
        element.hierarchy_index = index;
        if let Some(parent) = self.parent(id) {
            if let Some(container) = self.get_mut(parent).and_then(|e| e.container.as_mut()) {
                container.collector.mark_sort();
                container.scheduler.mark_layout_dirty();
            }
            self.cascade_to_ancestor(parent);
        }
        Ok(())
    }

    pub fn set_width(&mut self, id: ElementId, width: f32) -> Result<(), CadreError> {
        if !self.contains(id) {
            return Err(CadreError::StaleElement);
        }
        self.write_width(id, width);
        Ok(())
    }

    pub fn set_height(&mut self, id: ElementId, height: f32) -> Result<(), CadreError> {
        if !self.contains(id) {
            return Err(CadreError::StaleElement);
        }
        self.write_height(id, height);
        Ok(())
    }

    pub fn set_size(&mut self, id: ElementId, size: Vec2) -> Result<(), CadreError> {
        self.set_width(id, size.x)?;
        self.set_height(id, size.y)
    }

    pub fn set_anchors(&mut self, id: ElementId, anchors: Anchors) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        if element.rect.anchors == anchors {
            return Ok(());
        }
        element.rect.anchors = anchors;
        self.on_dimensions_changed(id, true, false);
        Ok(())
    }

    pub fn set_pivot(&mut self, id: ElementId, pivot: Vec2) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        if element.rect.pivot == pivot {
            return Ok(());
        }
        element.rect.pivot = pivot;
        self.on_dimensions_changed(id, true, false);
        Ok(())
    }

    pub fn set_anchored_offset(&mut self, id: ElementId, offset: Vec2) -> Result<(), CadreError> {
        if !self.contains(id) {
            return Err(CadreError::StaleElement);
        }
        self.write_offset(id, offset);
        Ok(())
    }

    pub fn set_scale(&mut self, id: ElementId, scale: Vec2) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        if element.rect.scale == scale {
            return Ok(());
        }
        element.rect.scale = scale;
        self.on_dimensions_changed(id, false, true);
        Ok(())
    }

    // ── Descriptors and containers ─────────────────────────────

    pub fn set_slot(&mut self, id: ElementId, slot: LayoutSlot) -> Result<(), CadreError> {
        self.update_slot(id, |s| *s = slot)
    }

    pub fn slot(&self, id: ElementId) -> Option<&LayoutSlot> {
        self.get(id).and_then(|e| e.slot.as_ref())
    }

    /// Edit the element's descriptor in place, creating a default one if
    /// absent. Membership-affecting edits (IgnoreLayout, override order)
    /// mark the owning container's children dirty; anything else is a pure
    /// layout invalidation. With no ancestor container yet, the edit is
    /// kept and binding is retried on the next structural event.
    pub fn update_slot(
        &mut self,
        id: ElementId,
        edit: impl FnOnce(&mut LayoutSlot),
    ) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        let slot = element.slot.get_or_insert_with(LayoutSlot::default);
        let was_ignored = slot.policy == SizingPolicy::IgnoreLayout;
        let old_order = slot.override_order;
        edit(slot);
        let now_ignored = slot.policy == SizingPolicy::IgnoreLayout;
        let new_order = slot.override_order;

        let Some(owner) = self.owner_container(id) else {
            return Ok(());
        };
        let participates = !now_ignored && self.is_active_in_hierarchy(id);
        if let Some(container) = self.get_mut(owner).and_then(|e| e.container.as_mut()) {
            if was_ignored != now_ignored {
                if participates {
                    container.collector.note_added(id);
                } else {
                    container.collector.note_removed(id);
                }
                container.scheduler.mark_children_dirty();
            } else if old_order != new_order {
                container.collector.mark_sort();
                container.scheduler.mark_layout_dirty();
            } else {
                container.scheduler.mark_layout_dirty();
            }
        }
        self.cascade_to_ancestor(owner);
        Ok(())
    }

    /// Make (or replace) this element's layout container.
    pub fn set_layout(&mut self, id: ElementId, style: LayoutStyle) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        match element.container.as_mut() {
            Some(container) => {
                container.style = style;
                container.scheduler.mark_children_dirty();
            }
            None => element.container = Some(Container::new(style)),
        }
        self.cascade_to_ancestor(id);
        Ok(())
    }

    /// Edit the container's style in place.
    pub fn update_layout(
        &mut self,
        id: ElementId,
        edit: impl FnOnce(&mut LayoutStyle),
    ) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        let Some(container) = element.container.as_mut() else {
            return Ok(());
        };
        edit(&mut container.style);
        container.scheduler.mark_layout_dirty();
        self.cascade_to_ancestor(id);
        Ok(())
    }

    pub fn clear_layout(&mut self, id: ElementId) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        element.container = None;
        Ok(())
    }

    pub fn set_apply_mode(&mut self, id: ElementId, apply: ApplyMode) -> Result<(), CadreError> {
        let element = self.get_mut(id).ok_or(CadreError::StaleElement)?;
        if let Some(container) = element.container.as_mut() {
            container.apply = apply;
        }
        Ok(())
    }

    // ── Animation boundary ─────────────────────────────────────

    /// Pull every pending request for the external tween subsystem.
    pub fn drain_tween_requests(&mut self) -> Vec<TweenRequest> {
        self.outbox.drain()
    }

    /// The tween subsystem finished every tween for this container. Runs
    /// exactly one deferred solver pass if one was recorded.
    pub fn notify_tween_complete(&mut self, container: ElementId) {
        let Some(c) = self.get_mut(container).and_then(|e| e.container.as_mut()) else {
            return;
        };
        if c.scheduler.complete_animation() {
            self.rebuild_container(container);
        }
    }

    /// Stop this container's in-flight tweens immediately, without waiting
    /// for the completion callback.
    pub fn cancel_animations(&mut self, container: ElementId) {
        let Some(c) = self.get_mut(container).and_then(|e| e.container.as_mut()) else {
            return;
        };
        c.scheduler.cancel_animation();
        self.outbox.push_cancel(container);
    }

    /// Force a fresh rebuild now, canceling any in-flight animation first.
    pub fn force_rebuild(&mut self, container: ElementId) {
        self.cancel_animations(container);
        if let Some(c) = self.get_mut(container).and_then(|e| e.container.as_mut()) {
            c.scheduler.mark_children_dirty();
        }
        self.rebuild_container(container);
    }

    // ── Rebuild driving ────────────────────────────────────────

    /// Run the per-tick rebuild pass: solve every dirty container,
    /// parents first, repeating until the tree settles.
    pub fn update(&mut self) {
        for _ in 0..MAX_UPDATE_PASSES {
            let dirty: Vec<ElementId> = self
                .containers_breadth_first()
                .into_iter()
                .filter(|&id| {
                    self.is_active_in_hierarchy(id)
                        && self
                            .get(id)
                            .and_then(|e| e.container.as_ref())
                            .is_some_and(|c| c.scheduler.wants_solve())
                })
                .collect();
            if dirty.is_empty() {
                return;
            }
            for id in dirty {
                self.rebuild_container(id);
            }
        }
        debug!("layout did not settle within {MAX_UPDATE_PASSES} passes");
    }

    fn containers_breadth_first(&self) -> Vec<ElementId> {
        let mut queue: Vec<ElementId> = self.roots.clone();
        let mut out = Vec::new();
        let mut head = 0;
        while head < queue.len() {
            let id = queue[head];
            head += 1;
            if let Some(element) = self.get(id) {
                if element.container.is_some() {
                    out.push(id);
                }
                queue.extend_from_slice(&element.children);
            }
        }
        out
    }

    fn rebuild_container(&mut self, id: ElementId) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        let Some(mut container) = element.container.take() else {
            return;
        };
        self.rebuild_taken(id, &mut container);
        if let Some(element) = self.get_mut(id) {
            element.container = Some(container);
        }
    }

    fn rebuild_taken(&mut self, id: ElementId, container: &mut Container) {
        if container.scheduler.take_children_rebuild() {
            container.collector.mark_rebuild();
        }
        container.collector.purge(|e| self.contains(e));
        let supports_override = container.style.supports_override_order();
        let entries: Vec<ElementId> = {
            let tree = &*self;
            container
                .collector
                .read(
                    || tree.collect_membership(id),
                    |e| tree.sort_key(e, supports_override),
                )
                .to_vec()
        };

        match container.scheduler.begin_solve() {
            SolveDecision::Clean => return,
            SolveDecision::Deferred => {
                trace!("container {:?} deferred rebuild during animation", id);
                return;
            }
            SolveDecision::Run => {}
        }

        let Some(size) = self.rect(id).map(|r| r.size()) else {
            return;
        };
        let specs: Vec<ChildSpec> = entries
            .iter()
            .filter_map(|&e| self.get(e))
            .map(|el| ChildSpec {
                size: el.rect.size(),
                scale: el.rect.scale,
                anchors: el.rect.anchors,
                slot: el.slot.clone().unwrap_or_default(),
            })
            .collect();

        let output = match &container.style {
            LayoutStyle::MatchOther(cfg) => self.solve_match_other(id, cfg, size),
            style => layout::solve(style, size, &specs),
        };
        trace!(
            "container {:?} solved: {} children, fitted={}",
            id,
            output.boxes.len(),
            output.container_size.is_some()
        );

        self.apply_output(id, container, &entries, output);
    }

    fn collect_membership(&self, id: ElementId) -> Vec<ElementId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.participates(c))
            .collect()
    }

    fn participates(&self, id: ElementId) -> bool {
        let Some(element) = self.get(id) else {
            return false;
        };
        if !self.is_active_in_hierarchy(id) {
            return false;
        }
        element
            .slot
            .as_ref()
            .map_or(true, |s| s.policy != SizingPolicy::IgnoreLayout)
    }

    fn sort_key(&self, id: ElementId, supports_override: bool) -> (i32, i32) {
        let Some(element) = self.get(id) else {
            return (0, 0);
        };
        let order = if supports_override {
            element.slot.as_ref().map_or(0, |s| s.override_order)
        } else {
            0
        };
        (order, element.hierarchy_index)
    }

    fn solve_match_other(&self, id: ElementId, cfg: &MatchOtherConfig, size: Vec2) -> SolveOutput {
        // A missing or self-referential target is a silent no-op, retried
        // whenever the target shows up.
        let target = self
            .find_by_name(&cfg.target)
            .filter(|&t| t != id && self.contains(t));
        let Some(target) = target else {
            return SolveOutput::empty();
        };
        let target_size = self.rect(target).map(|r| r.size()).unwrap_or(Vec2::ZERO);
        let mut rect = size;
        if cfg.match_width {
            rect.x = target_size.x + cfg.additional.x;
        }
        if cfg.match_height {
            rect.y = target_size.y + cfg.additional.y;
        }
        SolveOutput {
            boxes: Vec::new(),
            container_size: Some(rect),
        }
    }

    // ── Applying solver output ─────────────────────────────────

    fn apply_output(
        &mut self,
        id: ElementId,
        container: &mut Container,
        entries: &[ElementId],
        output: SolveOutput,
    ) {
        let apply = container.apply;
        let outbox_before = self.outbox.len();
        if matches!(apply, ApplyMode::Animated { .. }) {
            // Stale tweens from the previous pass must not fight the new
            // targets.
            self.outbox.push_cancel(id);
        }

        if let Some(new_size) = output.container_size {
            self.apply_self_size(id, new_size, apply);
        }

        let container_size = self.rect(id).map(|r| r.size()).unwrap_or(Vec2::ZERO);
        let anchor_target = container.style.child_anchor();
        for (&entry, child_box) in entries.iter().zip(output.boxes.iter()) {
            self.apply_child_box(id, entry, child_box, anchor_target, container_size, apply);
        }

        // Only actual tween traffic (beyond the cancel) arms the
        // animation-pending state.
        let cancel_only = matches!(apply, ApplyMode::Animated { .. }) as usize;
        if self.outbox.len() > outbox_before + cancel_only {
            container.scheduler.begin_animation();
        }
    }

    fn apply_self_size(&mut self, id: ElementId, new_size: Vec2, apply: ApplyMode) {
        let Some(rect) = self.rect(id) else {
            return;
        };
        let current = rect.size();
        let change_x = new_size.x != current.x;
        let change_y = new_size.y != current.y;
        if !change_x && !change_y {
            return;
        }
        // A layout may not write an extent while the axis is stretched.
        if let Some(element) = self.get_mut(id) {
            projector::coerce_point_anchor(
                &mut element.rect.anchors,
                Vec2::new(0.5, 0.5),
                change_x,
                change_y,
            );
        }
        match apply {
            ApplyMode::Immediate => {
                if change_x {
                    self.write_width(id, new_size.x);
                }
                if change_y {
                    self.write_height(id, new_size.y);
                }
            }
            ApplyMode::Animated { duration } => {
                if change_x {
                    self.outbox.push_width(id, id, new_size.x, duration);
                }
                if change_y {
                    self.outbox.push_height(id, id, new_size.y, duration);
                }
            }
        }
    }

    fn apply_child_box(
        &mut self,
        container_id: ElementId,
        entry: ElementId,
        child_box: &ChildBox,
        anchor_target: Vec2,
        container_size: Vec2,
        apply: ApplyMode,
    ) {
        let Some(element) = self.get_mut(entry) else {
            return;
        };
        projector::coerce_point_anchor(&mut element.rect.anchors, anchor_target, true, true);
        let anchor = element.rect.anchors.min;
        let pivot = element.rect.pivot;
        if let Some(rotation) = child_box.rotation {
            element.rotation = rotation;
        }

        let offset = projector::project(
            child_box.offset,
            child_box.size,
            pivot,
            anchor,
            container_size,
        );

        match apply {
            ApplyMode::Immediate => {
                self.write_offset(entry, offset);
                if child_box.write_width {
                    self.write_width(entry, child_box.size.x);
                }
                if child_box.write_height {
                    self.write_height(entry, child_box.size.y);
                }
            }
            ApplyMode::Animated { duration } => {
                if self.anchored_offset(entry) != offset {
                    self.outbox.push_offset(container_id, entry, offset, duration);
                }
                if child_box.write_width && self.width(entry) != child_box.size.x {
                    self.outbox
                        .push_width(container_id, entry, child_box.size.x, duration);
                }
                if child_box.write_height && self.height(entry) != child_box.size.y {
                    self.outbox
                        .push_height(container_id, entry, child_box.size.y, duration);
                }
            }
        }
    }

    // ── Write paths with dimension fan-out ─────────────────────

    fn write_width(&mut self, id: ElementId, value: f32) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        if element.rect.width == value {
            return;
        }
        element.rect.width = value;
        self.on_dimensions_changed(id, false, true);
    }

    fn write_height(&mut self, id: ElementId, value: f32) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        if element.rect.height == value {
            return;
        }
        element.rect.height = value;
        self.on_dimensions_changed(id, false, true);
    }

    fn write_offset(&mut self, id: ElementId, value: Vec2) {
        let Some(element) = self.get_mut(id) else {
            return;
        };
        if element.rect.anchored_offset == value {
            return;
        }
        element.rect.anchored_offset = value;
        self.on_dimensions_changed(id, true, false);
    }

    fn on_dimensions_changed(&mut self, id: ElementId, position_changed: bool, size_changed: bool) {
        // The element's own container re-solves when its extent changed.
        if size_changed {
            if let Some(container) = self.get_mut(id).and_then(|e| e.container.as_mut()) {
                container.scheduler.mark_layout_dirty();
            }
        }

        // The parent container reacts per layout kind.
        if let Some(parent) = self.parent(id) {
            let triggers = self
                .get(parent)
                .and_then(|e| e.container.as_ref())
                .is_some_and(|c| {
                    reacts_to_child_dimensions(&c.style, position_changed, size_changed)
                });
            if triggers && self.is_active_in_hierarchy(id) {
                if let Some(container) = self.get_mut(parent).and_then(|e| e.container.as_mut()) {
                    container.scheduler.mark_layout_dirty();
                }
            }
        }

        // Containers mirroring this element by name.
        if size_changed {
            let Some(name) = self.name(id).map(str::to_owned) else {
                return;
            };
            if name.is_empty() {
                return;
            }
            for watcher in self.match_other_watchers(&name, id) {
                if let Some(container) = self.get_mut(watcher).and_then(|e| e.container.as_mut()) {
                    container.scheduler.mark_layout_dirty();
                }
            }
        }
    }

    fn match_other_watchers(&self, name: &str, changed: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(element) = &slot.element else {
                continue;
            };
            let id = ElementId::from_raw(index as u32, slot.generation);
            if id == changed {
                continue;
            }
            if let Some(Container {
                style: LayoutStyle::MatchOther(cfg),
                ..
            }) = element.container.as_ref()
            {
                if cfg.target == name {
                    out.push(id);
                }
            }
        }
        out
    }

    // ── Dirty propagation ──────────────────────────────────────

    /// Structural membership event for `parent`'s container, incremental
    /// like the host notifications it mirrors, then cascaded upward.
    fn child_membership_event(&mut self, parent: ElementId, child: ElementId, added: bool) {
        let participates = added && self.participates(child);
        if let Some(container) = self.get_mut(parent).and_then(|e| e.container.as_mut()) {
            if participates {
                container.collector.note_added(child);
            } else {
                container.collector.note_removed(child);
            }
            container.scheduler.mark_children_dirty();
        }
        self.cascade_to_ancestor(parent);
    }

    /// Geometry of `from` may change; the nearest container above it must
    /// re-solve.
    fn cascade_to_ancestor(&mut self, from: ElementId) {
        let mut cursor = self.parent(from);
        while let Some(id) = cursor {
            if let Some(container) = self.get_mut(id).and_then(|e| e.container.as_mut()) {
                container.scheduler.mark_layout_dirty();
                return;
            }
            cursor = self.parent(id);
        }
    }

    /// Nearest ancestor container, cached on the element and re-resolved
    /// after re-parenting.
    fn owner_container(&mut self, id: ElementId) -> Option<ElementId> {
        if let Some(cached) = self.get(id).and_then(|e| e.cached_owner) {
            if self.get(cached).is_some_and(|e| e.container.is_some()) {
                return Some(cached);
            }
        }
        let mut cursor = self.parent(id);
        while let Some(c) = cursor {
            if self.get(c).is_some_and(|e| e.container.is_some()) {
                if let Some(element) = self.get_mut(id) {
                    element.cached_owner = Some(c);
                }
                return Some(c);
            }
            cursor = self.parent(c);
        }
        None
    }
}

/// Whether a layout kind re-solves when one of its children moves or
/// resizes on its own.
fn reacts_to_child_dimensions(
    style: &LayoutStyle,
    position_changed: bool,
    size_changed: bool,
) -> bool {
    match style {
        // Expanded children are owned by the layout; only native sizes
        // feed back.
        LayoutStyle::Linear(cfg) => size_changed && !cfg.expand_main,
        LayoutStyle::PanelBox(_)
        | LayoutStyle::PanelFlexGrid(_)
        | LayoutStyle::PanelUniformGrid(_) => position_changed || size_changed,
        LayoutStyle::FitChildren(_) => size_changed,
        LayoutStyle::Grid(_)
        | LayoutStyle::FlexGrid(_)
        | LayoutStyle::Radial(_)
        | LayoutStyle::MatchOther(_) => false,
    }
}

// ── Scene description ──────────────────────────────────────────

/// One node of a declarative scene description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneNode {
    pub name: String,
    pub width: f32,
    pub height: f32,
    pub active: bool,
    pub pivot: Vec2,
    pub anchors: Anchors,
    pub layout: Option<LayoutStyle>,
    pub apply: ApplyMode,
    pub slot: Option<LayoutSlot>,
    pub children: Vec<SceneNode>,
}

impl Default for SceneNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 100.0,
            height: 100.0,
            active: true,
            pivot: Vec2::splat(0.5),
            anchors: Anchors::default(),
            layout: None,
            apply: ApplyMode::Immediate,
            slot: None,
            children: Vec::new(),
        }
    }
}

/// A complete scene ready to build a tree from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDoc {
    pub children: Vec<SceneNode>,
}

impl UiTree {
    /// Build a tree from a JSON scene description. The result still needs
    /// an `update()` to run the first layout pass.
    pub fn from_json(json: &str) -> Result<UiTree, CadreError> {
        let doc: SceneDoc = serde_json::from_str(json)?;
        let mut tree = UiTree::new();
        for node in &doc.children {
            let root = tree.spawn(&node.name, node.width, node.height);
            tree.build_scene_node(root, node);
        }
        Ok(tree)
    }

    fn build_scene_node(&mut self, id: ElementId, node: &SceneNode) {
        if let Some(element) = self.get_mut(id) {
            element.active = node.active;
            element.rect.pivot = node.pivot;
            element.rect.anchors = node.anchors;
            element.slot = node.slot.clone();
        }
        if let Some(style) = &node.layout {
            let _ = self.set_layout(id, style.clone());
            let _ = self.set_apply_mode(id, node.apply);
        }
        for child in &node.children {
            if let Ok(child_id) = self.spawn_child(id, &child.name, child.width, child.height) {
                self.build_scene_node(child_id, child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{
        FitChildrenConfig, LayoutStyle, LinearConfig, PanelBoxConfig, RadialConfig, SizeRule,
    };

    const EPS: f32 = 1e-3;

    fn expand_row(spacing: f32) -> LayoutStyle {
        LayoutStyle::Linear(LinearConfig {
            expand_main: true,
            spacing,
            ..Default::default()
        })
    }

    fn row_of(ui: &mut UiTree, width: f32, height: f32, children: usize) -> ElementId {
        let bar = ui.spawn("bar", width, height);
        ui.set_layout(bar, expand_row(0.0)).unwrap();
        for i in 0..children {
            ui.spawn_child(bar, &format!("child{i}"), 10.0, height).unwrap();
        }
        bar
    }

    #[test]
    fn expand_row_distributes_and_projects() {
        let mut ui = UiTree::new();
        let bar = row_of(&mut ui, 300.0, 50.0, 3);
        ui.update();

        let kids = ui.children(bar).to_vec();
        for (i, &kid) in kids.iter().enumerate() {
            assert!((ui.width(kid) - 100.0).abs() < EPS);
            // Pivot-centered offset from the forced left/top anchor.
            let offset = ui.anchored_offset(kid);
            assert!((offset.x - (50.0 + 100.0 * i as f32)).abs() < EPS);
            assert!((offset.y + 25.0).abs() < EPS);
        }
    }

    #[test]
    fn anchor_invariant_holds_after_rebuild() {
        let mut ui = UiTree::new();
        let bar = ui.spawn("bar", 300.0, 50.0);
        ui.set_layout(bar, expand_row(0.0)).unwrap();
        let kid = ui.spawn_child(bar, "stretchy", 10.0, 50.0).unwrap();
        ui.set_anchors(kid, Anchors::stretch_both()).unwrap();
        ui.update();

        let anchors = ui.anchors(kid).unwrap();
        assert_eq!(anchors.min.x, anchors.max.x);
        assert_eq!(anchors.min.y, anchors.max.y);
        assert_eq!(anchors.min, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn update_is_idempotent() {
        let mut ui = UiTree::new();
        let bar = row_of(&mut ui, 301.0, 47.0, 3);
        ui.update();
        let snapshot: Vec<(f32, Vec2)> = ui
            .children(bar)
            .iter()
            .map(|&k| (ui.width(k), ui.anchored_offset(k)))
            .collect();
        ui.update();
        let again: Vec<(f32, Vec2)> = ui
            .children(bar)
            .iter()
            .map(|&k| (ui.width(k), ui.anchored_offset(k)))
            .collect();
        assert_eq!(snapshot, again);
    }

    #[test]
    fn nested_container_reacts_to_parent_write_in_one_update() {
        let mut ui = UiTree::new();
        let outer = ui.spawn("outer", 200.0, 100.0);
        ui.set_layout(
            outer,
            LayoutStyle::Linear(LinearConfig {
                axis: crate::model::Axis::Vertical,
                expand_main: true,
                expand_cross: true,
                ..Default::default()
            }),
        )
        .unwrap();
        let inner = ui.spawn_child(outer, "inner", 50.0, 50.0).unwrap();
        ui.set_layout(inner, expand_row(0.0)).unwrap();
        let a = ui.spawn_child(inner, "a", 5.0, 10.0).unwrap();
        let b = ui.spawn_child(inner, "b", 5.0, 10.0).unwrap();
        ui.update();

        // Outer stretched inner to 200×100; inner split that width.
        assert!((ui.width(inner) - 200.0).abs() < EPS);
        assert!((ui.width(a) - 100.0).abs() < EPS);
        assert!((ui.width(b) - 100.0).abs() < EPS);
    }

    #[test]
    fn fit_to_children_cascades_upward() {
        let mut ui = UiTree::new();
        let outer = ui.spawn("outer", 500.0, 100.0);
        ui.set_layout(
            outer,
            LayoutStyle::FitChildren(FitChildrenConfig {
                fit_height: false,
                ..Default::default()
            }),
        )
        .unwrap();
        let inner = ui.spawn_child(outer, "inner", 100.0, 40.0).unwrap();
        ui.set_layout(
            inner,
            LayoutStyle::Linear(LinearConfig {
                fit_main: true,
                ..Default::default()
            }),
        )
        .unwrap();
        ui.spawn_child(inner, "a", 30.0, 20.0).unwrap();
        ui.spawn_child(inner, "b", 40.0, 20.0).unwrap();
        ui.update();

        assert!((ui.width(inner) - 70.0).abs() < EPS);
        assert!((ui.width(outer) - 70.0).abs() < EPS);
    }

    #[test]
    fn deactivated_children_leave_the_layout() {
        let mut ui = UiTree::new();
        let bar = row_of(&mut ui, 300.0, 50.0, 3);
        ui.update();
        let kids = ui.children(bar).to_vec();
        ui.set_active(kids[2], false).unwrap();
        ui.update();
        assert!((ui.width(kids[0]) - 150.0).abs() < EPS);
        // The hidden child keeps its last size.
        assert!((ui.width(kids[2]) - 100.0).abs() < EPS);

        ui.set_active(kids[2], true).unwrap();
        ui.update();
        assert!((ui.width(kids[0]) - 100.0).abs() < EPS);
    }

    #[test]
    fn despawn_relayouts_the_container() {
        let mut ui = UiTree::new();
        let bar = row_of(&mut ui, 300.0, 50.0, 3);
        ui.update();
        let kids = ui.children(bar).to_vec();
        ui.despawn(kids[0]).unwrap();
        ui.update();
        assert!(!ui.contains(kids[0]));
        assert!((ui.width(kids[1]) - 150.0).abs() < EPS);
        assert!((ui.anchored_offset(kids[1]).x - 75.0).abs() < EPS);
    }

    #[test]
    fn hierarchy_index_reorders_children() {
        let mut ui = UiTree::new();
        let bar = row_of(&mut ui, 300.0, 50.0, 2);
        ui.update();
        let kids = ui.children(bar).to_vec();
        let first_x = ui.anchored_offset(kids[0]).x;
        // Move the first child behind the second.
        ui.set_hierarchy_index(kids[0], 5).unwrap();
        ui.update();
        assert!((ui.anchored_offset(kids[1]).x - first_x).abs() < EPS);
        assert!(ui.anchored_offset(kids[0]).x > ui.anchored_offset(kids[1]).x);
    }

    #[test]
    fn override_order_applies_in_panels() {
        let mut ui = UiTree::new();
        let panel = ui.spawn("panel", 200.0, 40.0);
        ui.set_layout(panel, LayoutStyle::PanelBox(PanelBoxConfig::default()))
            .unwrap();
        let a = ui.spawn_child(panel, "a", 10.0, 10.0).unwrap();
        let b = ui.spawn_child(panel, "b", 10.0, 10.0).unwrap();
        for id in [a, b] {
            ui.set_slot(
                id,
                LayoutSlot {
                    desired_size: Vec2::new(50.0, 40.0),
                    size_rule: SizeRule::Auto,
                    ..Default::default()
                },
            )
            .unwrap();
        }
        // Bias "a" after its zero-order sibling.
        ui.update_slot(a, |s| s.override_order = 1).unwrap();
        ui.update();
        assert!(ui.anchored_offset(a).x > ui.anchored_offset(b).x);
    }

    #[test]
    fn ignore_layout_skips_a_child() {
        let mut ui = UiTree::new();
        let bar = row_of(&mut ui, 300.0, 50.0, 3);
        let kids = ui.children(bar).to_vec();
        ui.update_slot(kids[1], |s| s.policy = SizingPolicy::IgnoreLayout)
            .unwrap();
        ui.update();
        assert!((ui.width(kids[0]) - 150.0).abs() < EPS);
        assert!((ui.width(kids[2]) - 150.0).abs() < EPS);
        assert!((ui.width(kids[1]) - 10.0).abs() < EPS);
    }

    #[test]
    fn match_other_mirrors_a_named_element() {
        let mut ui = UiTree::new();
        let source = ui.spawn("source", 120.0, 40.0);
        let mirror = ui.spawn("mirror", 10.0, 10.0);
        ui.set_layout(
            mirror,
            LayoutStyle::MatchOther(MatchOtherConfig {
                target: "source".into(),
                additional: Vec2::new(10.0, 0.0),
                ..Default::default()
            }),
        )
        .unwrap();
        ui.update();
        assert!((ui.width(mirror) - 130.0).abs() < EPS);
        assert!((ui.height(mirror) - 40.0).abs() < EPS);

        ui.set_width(source, 200.0).unwrap();
        ui.update();
        assert!((ui.width(mirror) - 210.0).abs() < EPS);
    }

    #[test]
    fn match_other_with_missing_target_is_a_silent_no_op() {
        let mut ui = UiTree::new();
        let mirror = ui.spawn("mirror", 10.0, 10.0);
        ui.set_layout(
            mirror,
            LayoutStyle::MatchOther(MatchOtherConfig {
                target: "nowhere".into(),
                ..Default::default()
            }),
        )
        .unwrap();
        ui.update();
        assert!((ui.width(mirror) - 10.0).abs() < EPS);
    }

    #[test]
    fn radial_layout_writes_rotation() {
        let mut ui = UiTree::new();
        let wheel = ui.spawn("wheel", 200.0, 200.0);
        ui.set_layout(
            wheel,
            LayoutStyle::Radial(RadialConfig {
                radius: 50.0,
                face_outward: true,
                ..Default::default()
            }),
        )
        .unwrap();
        let spoke = ui.spawn_child(wheel, "spoke", 10.0, 10.0).unwrap();
        ui.update();
        assert!((ui.rotation(spoke) + 90.0).abs() < EPS);
        assert_eq!(ui.anchors(spoke).unwrap().min, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn attach_cycle_is_rejected() {
        let mut ui = UiTree::new();
        let a = ui.spawn("a", 10.0, 10.0);
        let b = ui.spawn_child(a, "b", 10.0, 10.0).unwrap();
        assert!(matches!(ui.attach(a, b), Err(CadreError::AttachCycle)));
        assert!(matches!(ui.attach(a, a), Err(CadreError::AttachCycle)));
    }

    #[test]
    fn stale_ids_error_on_the_public_api() {
        let mut ui = UiTree::new();
        let a = ui.spawn("a", 10.0, 10.0);
        ui.despawn(a).unwrap();
        assert!(matches!(ui.set_width(a, 5.0), Err(CadreError::StaleElement)));
        assert!(ui.rect(a).is_none());
    }
}
