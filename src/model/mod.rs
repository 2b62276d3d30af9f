//! # Element Model
//!
//! The geometric vocabulary of the engine: 2D vectors, edge insets, anchor
//! fractions, and the rect element itself. A rect element is the
//! positionable/sizable unit every layout works on: local size, anchor
//! min/max (fractions of the parent rect), a pivot inside its own rect, and
//! an anchored offset measured from the anchor point.
//!
//! Anchored offsets are stored in an upward-positive Y convention; solvers
//! work in a top-left-origin, downward-positive space and the projector
//! flips the sign when converting between the two.

use serde::{Deserialize, Serialize};

/// A 2D value: point, size, or fraction pair depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }
}

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Component of `v` along this axis.
    pub fn main(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    /// Component of `v` along the other axis.
    pub fn cross(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.y,
            Axis::Vertical => v.x,
        }
    }

    /// Build a vector from main/cross components.
    pub fn pack(self, main: f32, cross: f32) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(main, cross),
            Axis::Vertical => Vec2::new(cross, main),
        }
    }
}

/// Edge values (top, right, bottom, left) used for padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub fn uniform(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Total inset along the given axis.
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }

    /// Leading inset along the given axis (left or top).
    pub fn leading(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }
}

/// Anchor fractions relative to the parent rect. Equal min/max on an axis is
/// a point anchor (fixed relative position); unequal min/max is a stretch
/// anchor (size follows the parent).
///
/// Fractions use the upward-positive convention: `y = 1.0` is the parent's
/// top edge, `y = 0.0` its bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchors {
    pub min: Vec2,
    pub max: Vec2,
}

impl Anchors {
    /// A point anchor at the given parent fraction.
    pub fn point(x: f32, y: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x, y),
        }
    }

    /// Stretch across the full parent rect on both axes.
    pub fn stretch_both() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::ONE,
        }
    }

    pub fn is_stretched_x(&self) -> bool {
        self.min.x != self.max.x
    }

    pub fn is_stretched_y(&self) -> bool {
        self.min.y != self.max.y
    }

    pub fn is_stretched(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.is_stretched_x(),
            Axis::Vertical => self.is_stretched_y(),
        }
    }
}

impl Default for Anchors {
    fn default() -> Self {
        // Centered point anchor, matching a freshly placed element.
        Anchors::point(0.5, 0.5)
    }
}

/// The positionable/sizable unit of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RectElement {
    /// Local width in pixels.
    pub width: f32,
    /// Local height in pixels.
    pub height: f32,
    /// Anchor fractions within the parent rect.
    pub anchors: Anchors,
    /// Fractional point within this element's own rect used as the origin
    /// for the anchored offset.
    pub pivot: Vec2,
    /// Offset from the anchor point to the pivot, upward-positive Y.
    pub anchored_offset: Vec2,
    /// Local scale. Read only by the linear solver's scale-weighted expand.
    pub scale: Vec2,
}

impl RectElement {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for RectElement {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            anchors: Anchors::default(),
            pivot: Vec2::splat(0.5),
            anchored_offset: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }
}
