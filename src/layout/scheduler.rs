//! # Rebuild Scheduler
//!
//! Dirty-flag state machine for one container. Two independent dirty bits
//! track whether the children list or the geometry is stale, plus two bits
//! coordinating with the external tween subsystem: while a previous
//! rebuild's animated writes are still playing, new solver passes are
//! deferred instead of thrashing the animation, and exactly one pass runs
//! when the tween completion arrives.

use log::{debug, trace};

/// What a requested solver pass should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveDecision {
    /// Geometry is clean; nothing to do.
    Clean,
    /// Run the solver now.
    Run,
    /// An animation from the previous pass is still in flight; the request
    /// was recorded and the solver must not run.
    Deferred,
}

/// Per-container rebuild state. Lives inside the container; never shared.
#[derive(Debug, Clone, Default)]
pub struct RebuildScheduler {
    needs_children_rebuild: bool,
    needs_layout_rebuild: bool,
    animation_in_flight: bool,
    pending_rebuild_after_animation: bool,
}

impl RebuildScheduler {
    pub fn new() -> Self {
        Self {
            // A fresh container has never collected nor solved.
            needs_children_rebuild: true,
            needs_layout_rebuild: true,
            animation_in_flight: false,
            pending_rebuild_after_animation: false,
        }
    }

    /// Structural event: membership or order is stale. Children-dirty
    /// implies layout-dirty.
    pub fn mark_children_dirty(&mut self) {
        self.needs_children_rebuild = true;
        self.needs_layout_rebuild = true;
    }

    /// Pure geometry event: sizing config changed, membership intact.
    pub fn mark_layout_dirty(&mut self) {
        self.needs_layout_rebuild = true;
    }

    pub fn is_layout_dirty(&self) -> bool {
        self.needs_layout_rebuild
    }

    /// Whether a solver pass would make progress right now. False once a
    /// mid-animation request has already been recorded: re-requesting
    /// would just defer again.
    pub fn wants_solve(&self) -> bool {
        self.needs_layout_rebuild
            && !(self.animation_in_flight && self.pending_rebuild_after_animation)
    }

    pub fn is_animation_in_flight(&self) -> bool {
        self.animation_in_flight
    }

    pub fn is_rebuild_pending_after_animation(&self) -> bool {
        self.pending_rebuild_after_animation
    }

    /// Consume the children-dirty bit. The collector rebuild runs first on
    /// read; the layout bit stays up for the solver pass that follows.
    pub fn take_children_rebuild(&mut self) -> bool {
        std::mem::take(&mut self.needs_children_rebuild)
    }

    /// Decide whether a solver pass may run, consuming the layout-dirty bit
    /// when it does. A pass requested mid-animation is recorded and
    /// deferred; the in-flight tween is not canceled.
    pub fn begin_solve(&mut self) -> SolveDecision {
        if !self.needs_layout_rebuild {
            return SolveDecision::Clean;
        }
        if self.animation_in_flight {
            trace!("rebuild requested mid-animation, deferring");
            self.pending_rebuild_after_animation = true;
            return SolveDecision::Deferred;
        }
        self.needs_layout_rebuild = false;
        // A pass that actually runs satisfies any recorded deferral.
        self.pending_rebuild_after_animation = false;
        SolveDecision::Run
    }

    /// The apply layer handed animated writes to the tween subsystem.
    pub fn begin_animation(&mut self) {
        self.animation_in_flight = true;
    }

    /// Tween completion callback arrived. Returns true when a deferred
    /// rebuild was recorded and must run now (exactly once).
    pub fn complete_animation(&mut self) -> bool {
        self.animation_in_flight = false;
        let deferred = std::mem::take(&mut self.pending_rebuild_after_animation);
        if deferred {
            debug!("running rebuild deferred during animation");
            self.needs_layout_rebuild = true;
        }
        deferred
    }

    /// Explicit cancel: in-flight tweens are stopped by the host, so the
    /// animation bit clears without waiting for the completion callback.
    /// Any recorded deferred request stays pending for the next pass.
    pub fn cancel_animation(&mut self) {
        self.animation_in_flight = false;
    }
}
