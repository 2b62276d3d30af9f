//! # Layout Engine
//!
//! Geometry solvers, the children collector, the anchor/pivot projector,
//! and the rebuild scheduler. Solvers are pure functions of
//! `(container size, config, ordered child list)` producing per-child
//! boxes in the container's local top-left-origin space plus an optional
//! new container size when fit-to-children is enabled. All dirty tracking
//! and application of results lives in the tree, not here.

pub mod collector;
pub mod fitter;
pub mod grid;
pub mod linear;
pub mod panel;
pub mod projector;
pub mod radial;
pub mod scheduler;
pub mod tracks;

use crate::model::{Anchors, Vec2};
use crate::style::{LayoutSlot, LayoutStyle};

/// Everything a solver may read about one participating child, in layout
/// order. The slot defaults to a plain AutoSize descriptor when the child
/// carries none.
#[derive(Debug, Clone)]
pub struct ChildSpec {
    /// Current local size.
    pub size: Vec2,
    /// Current local scale (scale-weighted expand only).
    pub scale: Vec2,
    /// Current anchors (the size-to-children solver excludes stretched
    /// children on the stretched axis).
    pub anchors: Anchors,
    pub slot: LayoutSlot,
}

impl ChildSpec {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            scale: Vec2::ONE,
            anchors: Anchors::default(),
            slot: LayoutSlot::default(),
        }
    }

    pub fn with_slot(mut self, slot: LayoutSlot) -> Self {
        self.slot = slot;
        self
    }
}

/// One solved child box in container-local space: top-left origin,
/// downward-positive Y, padding already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildBox {
    pub offset: Vec2,
    pub size: Vec2,
    /// Whether the layout controls the child's width/height. Uncontrolled
    /// axes keep the child's own size; `size` still carries the value the
    /// offset math was computed against.
    pub write_width: bool,
    pub write_height: bool,
    /// Rotation in degrees, set only by the radial solver's face-outward
    /// mode.
    pub rotation: Option<f32>,
}

impl ChildBox {
    /// A box whose position is controlled but whose size is left alone.
    pub fn placed(offset: Vec2, size: Vec2) -> Self {
        Self {
            offset,
            size,
            write_width: false,
            write_height: false,
            rotation: None,
        }
    }

    /// A box fully controlled by the layout.
    pub fn sized(offset: Vec2, size: Vec2) -> Self {
        Self {
            offset,
            size,
            write_width: true,
            write_height: true,
            rotation: None,
        }
    }
}

/// Result of one solver pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolveOutput {
    /// Parallel to the input child list.
    pub boxes: Vec<ChildBox>,
    /// New container size when fit-to-children changed an axis; the
    /// untouched axis carries the input value.
    pub container_size: Option<Vec2>,
}

impl SolveOutput {
    /// The no-layout-applied result used for degenerate input.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Solve one container. `size` is the container's full size; padding is
/// part of each config.
///
/// `MatchOther` is resolved by the tree (its input is another element's
/// size, not the child list) and yields no boxes here.
pub fn solve(style: &LayoutStyle, size: Vec2, children: &[ChildSpec]) -> SolveOutput {
    match style {
        LayoutStyle::Linear(cfg) => linear::solve(cfg, size, children),
        LayoutStyle::Grid(cfg) => grid::solve(cfg, size, children),
        LayoutStyle::FlexGrid(cfg) => tracks::solve_flex_grid(cfg, size, children),
        LayoutStyle::PanelBox(cfg) => panel::solve_box(cfg, size, children),
        LayoutStyle::PanelFlexGrid(cfg) => panel::solve_flex_grid(cfg, size, children),
        LayoutStyle::PanelUniformGrid(cfg) => panel::solve_uniform_grid(cfg, size, children),
        LayoutStyle::Radial(cfg) => radial::solve(cfg, size, children),
        LayoutStyle::FitChildren(cfg) => fitter::solve(cfg, size, children),
        LayoutStyle::MatchOther(_) => SolveOutput::empty(),
    }
}
