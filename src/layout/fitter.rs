//! # Size-To-Children Solver
//!
//! Sizes the container itself: width/height become the maximum child
//! extent plus a configurable constant. Children whose anchor is stretched
//! on an axis are excluded on that axis, since a child that stretches to
//! its parent while the parent sizes to the child is a circular
//! dependency.

use crate::model::Vec2;
use crate::style::FitChildrenConfig;

use super::{ChildSpec, SolveOutput};

pub fn solve(cfg: &FitChildrenConfig, size: Vec2, children: &[ChildSpec]) -> SolveOutput {
    if children.is_empty() {
        return SolveOutput::empty();
    }

    let mut max_width = 0.0f32;
    let mut max_height = 0.0f32;
    for child in children {
        if !child.anchors.is_stretched_x() {
            max_width = max_width.max(child.size.x);
        }
        if !child.anchors.is_stretched_y() {
            max_height = max_height.max(child.size.y);
        }
    }

    let mut rect = size;
    let mut any_fit = false;
    if cfg.fit_width {
        rect.x = max_width + cfg.additional_width;
        any_fit = true;
    }
    if cfg.fit_height {
        rect.y = max_height + cfg.additional_height;
        any_fit = true;
    }

    // This layout only moves the container; children are untouched.
    SolveOutput {
        boxes: Vec::new(),
        container_size: any_fit.then_some(rect),
    }
}
