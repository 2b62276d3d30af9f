//! # Anchor/Pivot Projector
//!
//! Converts a solver's local-space box into the anchored representation the
//! host scene graph expects. Solver space is top-left origin with Y growing
//! downward; anchored offsets are stored upward-positive, so the vertical
//! axis flips sign on the way out.
//!
//! Layouts never compute against stretch anchors: an axis about to be
//! controlled is first forced to a point anchor. The coercion is one-way
//! per rebuild; a child that already has a point anchor keeps it, wherever
//! it sits.

use crate::model::{Anchors, Vec2};

/// Force a point anchor on each controlled axis that is currently
/// stretched. Returns true if anything changed.
///
/// `target` is the layout-chosen anchor point in the upward-positive
/// fraction convention.
pub fn coerce_point_anchor(
    anchors: &mut Anchors,
    target: Vec2,
    control_x: bool,
    control_y: bool,
) -> bool {
    let mut changed = false;
    if control_x && anchors.is_stretched_x() {
        anchors.min.x = target.x;
        anchors.max.x = target.x;
        changed = true;
    }
    if control_y && anchors.is_stretched_y() {
        anchors.min.y = target.y;
        anchors.max.y = target.y;
        changed = true;
    }
    changed
}

/// Compute the anchored offset for a box.
///
/// * `origin` is the box's top-left corner in solver space (Y down).
/// * `anchor` is the element's point anchor, upward-positive fractions
///   (`y = 1` is the container's top edge).
/// * The result places the element's pivot relative to the anchor point,
///   upward-positive Y.
pub fn project(origin: Vec2, size: Vec2, pivot: Vec2, anchor: Vec2, container: Vec2) -> Vec2 {
    Vec2 {
        x: origin.x + pivot.x * size.x - anchor.x * container.x,
        y: -origin.y - (1.0 - pivot.y) * size.y + (1.0 - anchor.y) * container.y,
    }
}
