//! # Layout Configuration
//!
//! Declarative sizing vocabulary: the policies a child can declare to its
//! layout, the per-kind container configurations, and track definitions for
//! grid-style layouts. These are plain serde structs; persisted
//! configuration is consumed as-is with no separate resolve pass.
//!
//! Layout kinds form a closed tagged variant (`LayoutStyle`) dispatched
//! through a single solve function rather than a trait-object hierarchy.

use crate::model::{Axis, Edges, Vec2};
use serde::{Deserialize, Serialize};

/// The sizing policy a child declares to a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizingPolicy {
    /// Size decided by the layout's free-space distribution.
    #[default]
    AutoSize,
    /// Child does not participate in layout at all.
    IgnoreLayout,
    /// Fixed size on the layout's main axis.
    ConstantSize,
    /// Fraction of the container's spacing-free extent.
    RatioSize,
}

/// How a constant size resolves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ConstantSize {
    /// Use the element's current size on that axis.
    #[default]
    FromElement,
    /// A literal pixel value.
    Literal(f32),
}

impl ConstantSize {
    /// Resolve against the element's current extent on the axis.
    pub fn resolve(self, element_extent: f32) -> f32 {
        match self {
            ConstantSize::FromElement => element_extent,
            ConstantSize::Literal(v) => v,
        }
    }
}

/// Size rule for slot-based panel layouts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeRule {
    /// Slot occupies exactly its desired size.
    #[default]
    Auto,
    /// Slot takes a weighted share of the free space.
    Fill(f32),
}

/// Alignment of an item within a cell or of a run along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellAlign {
    Start,
    Center,
    End,
    /// Stretch to the full cell area.
    #[default]
    Fill,
}

/// Nine-way alignment of the whole child block within the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockAlign {
    #[default]
    UpperLeft,
    UpperCenter,
    UpperRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    LowerLeft,
    LowerCenter,
    LowerRight,
}

/// Alignment resolved to one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisAlign {
    Start,
    Center,
    End,
}

impl AxisAlign {
    /// Fraction of the slack placed before the content.
    pub fn factor(self) -> f32 {
        match self {
            AxisAlign::Start => 0.0,
            AxisAlign::Center => 0.5,
            AxisAlign::End => 1.0,
        }
    }
}

impl BlockAlign {
    pub fn horizontal(self) -> AxisAlign {
        match self {
            BlockAlign::UpperLeft | BlockAlign::MiddleLeft | BlockAlign::LowerLeft => {
                AxisAlign::Start
            }
            BlockAlign::UpperCenter | BlockAlign::MiddleCenter | BlockAlign::LowerCenter => {
                AxisAlign::Center
            }
            BlockAlign::UpperRight | BlockAlign::MiddleRight | BlockAlign::LowerRight => {
                AxisAlign::End
            }
        }
    }

    pub fn vertical(self) -> AxisAlign {
        match self {
            BlockAlign::UpperLeft | BlockAlign::UpperCenter | BlockAlign::UpperRight => {
                AxisAlign::Start
            }
            BlockAlign::MiddleLeft | BlockAlign::MiddleCenter | BlockAlign::MiddleRight => {
                AxisAlign::Center
            }
            BlockAlign::LowerLeft | BlockAlign::LowerCenter | BlockAlign::LowerRight => {
                AxisAlign::End
            }
        }
    }

    /// Alignment along the given axis.
    pub fn along(self, axis: Axis) -> AxisAlign {
        match axis {
            Axis::Horizontal => self.horizontal(),
            Axis::Vertical => self.vertical(),
        }
    }
}

/// One row or column slot in a grid-style layout, sized either as a literal
/// constant or as a weighted share of remaining space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TrackSize {
    Constant(f32),
    Ratio(f32),
}

impl Default for TrackSize {
    fn default() -> Self {
        TrackSize::Ratio(1.0)
    }
}

/// Per-child capability object: sizing policy plus the extra surface
/// consumed by track and slot layouts. A child without one behaves as a
/// default (AutoSize) descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSlot {
    pub policy: SizingPolicy,
    /// Constant size, resolved per axis.
    pub constant_width: ConstantSize,
    pub constant_height: ConstantSize,
    /// Fraction of free space, per axis.
    pub ratio_width: f32,
    pub ratio_height: f32,
    /// Track placement for grid-style layouts.
    pub column: usize,
    pub column_span: usize,
    pub row: usize,
    pub row_span: usize,
    /// Explicit ordering override. Nonzero values bias by sign before or
    /// after zero-order siblings; ties fall back to hierarchy index.
    pub override_order: i32,
    /// Slot surface for panel layouts.
    pub desired_size: Vec2,
    pub slot_padding: Edges,
    pub horizontal_align: CellAlign,
    pub vertical_align: CellAlign,
    pub size_rule: SizeRule,
}

impl Default for LayoutSlot {
    fn default() -> Self {
        Self {
            policy: SizingPolicy::AutoSize,
            constant_width: ConstantSize::FromElement,
            constant_height: ConstantSize::FromElement,
            ratio_width: 1.0,
            ratio_height: 1.0,
            column: 0,
            column_span: 1,
            row: 0,
            row_span: 1,
            override_order: 0,
            desired_size: Vec2::new(100.0, 100.0),
            slot_padding: Edges::default(),
            horizontal_align: CellAlign::Fill,
            vertical_align: CellAlign::Fill,
            size_rule: SizeRule::Auto,
        }
    }
}

impl LayoutSlot {
    pub fn constant(&self, axis: Axis) -> ConstantSize {
        match axis {
            Axis::Horizontal => self.constant_width,
            Axis::Vertical => self.constant_height,
        }
    }

    pub fn ratio(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.ratio_width,
            Axis::Vertical => self.ratio_height,
        }
    }

    pub fn track_index(&self, axis: Axis) -> usize {
        match axis {
            Axis::Horizontal => self.column,
            Axis::Vertical => self.row,
        }
    }

    pub fn track_span(&self, axis: Axis) -> usize {
        match axis {
            Axis::Horizontal => self.column_span,
            Axis::Vertical => self.row_span,
        }
    }

    pub fn cell_align(&self, axis: Axis) -> CellAlign {
        match axis {
            Axis::Horizontal => self.horizontal_align,
            Axis::Vertical => self.vertical_align,
        }
    }
}

// ── Container configurations ───────────────────────────────────

/// Linear box: children side by side along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinearConfig {
    pub axis: Axis,
    pub padding: Edges,
    pub spacing: f32,
    pub align: BlockAlign,
    /// Distribute the main-axis extent among children (Fill/Constant/Ratio
    /// split). Off: children keep their native size and the run is aligned.
    pub expand_main: bool,
    /// Stretch every child to the full cross-axis extent.
    pub expand_cross: bool,
    /// Weight each auto child's share by its scale on the main axis.
    pub use_child_scale: bool,
    /// Set the container's main extent to the children's total range.
    pub fit_main: bool,
    /// Set the container's cross extent from the children.
    pub fit_cross: bool,
    /// Blend for `fit_cross`: 0 sizes to the smallest child, 1 to the
    /// largest.
    pub fit_cross_blend: f32,
}

impl Default for LinearConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            padding: Edges::default(),
            spacing: 0.0,
            align: BlockAlign::UpperLeft,
            expand_main: false,
            expand_cross: false,
            use_child_scale: false,
            fit_main: false,
            fit_cross: false,
            fit_cross_blend: 1.0,
        }
    }
}

/// Wrap mode for the uniform-cell grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GridMode {
    /// Fixed item count per line; cell extent on the wrap axis is derived
    /// from the container.
    DependOnCount { line_count: usize },
    /// Fixed cell size; items per line derived by greedy packing. The count
    /// is fixed from the first line and reused for all following lines.
    DependOnSize,
}

/// Uniform-cell grid with line wrapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Horizontal: fill a row left to right, wrap downward. Vertical: fill
    /// a column top to bottom, wrap rightward.
    pub axis: Axis,
    pub mode: GridMode,
    pub cell_size: Vec2,
    /// Count mode only: stretch the cross cell extent so the lines fill the
    /// container.
    pub expand_cell: bool,
    pub spacing: Vec2,
    pub padding: Edges,
    pub align: BlockAlign,
    /// Align a partial last line independently of the block.
    pub last_line_can_align: bool,
    /// Fit the container's extent on the wrap-growth axis to the lines.
    pub fit_lines: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            mode: GridMode::DependOnCount { line_count: 1 },
            cell_size: Vec2::new(100.0, 100.0),
            expand_cell: false,
            spacing: Vec2::ZERO,
            padding: Edges::default(),
            align: BlockAlign::UpperLeft,
            last_line_can_align: false,
            fit_lines: false,
        }
    }
}

/// Flexible-track grid: children placed into ratio/constant tracks by
/// index and span, with inter-track spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlexGridConfig {
    pub columns: Vec<TrackSize>,
    pub rows: Vec<TrackSize>,
    pub spacing: Vec2,
    pub padding: Edges,
}

impl Default for FlexGridConfig {
    fn default() -> Self {
        Self {
            columns: vec![TrackSize::Ratio(1.0), TrackSize::Ratio(1.0)],
            rows: vec![TrackSize::Ratio(1.0), TrackSize::Ratio(1.0)],
            spacing: Vec2::ZERO,
            padding: Edges::default(),
        }
    }
}

/// Slot-aligned linear panel: Auto/Fill free-space split over slot desired
/// sizes, cross axis always area-fill-then-align.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelBoxConfig {
    pub axis: Axis,
    pub fit_main: bool,
    pub fit_cross: bool,
    /// Blend for `fit_cross`: 0 sizes to the smallest slot, 1 to the
    /// largest (slot padding included).
    pub fit_cross_blend: f32,
}

impl Default for PanelBoxConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Horizontal,
            fit_main: false,
            fit_cross: false,
            fit_cross_blend: 1.0,
        }
    }
}

/// Slot-aligned flexible-track grid: track partition with per-slot
/// alignment and padding inside the cell area, no inter-track spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelFlexGridConfig {
    pub columns: Vec<TrackSize>,
    pub rows: Vec<TrackSize>,
}

impl Default for PanelFlexGridConfig {
    fn default() -> Self {
        Self {
            columns: vec![TrackSize::Ratio(1.0), TrackSize::Ratio(1.0)],
            rows: vec![TrackSize::Ratio(1.0), TrackSize::Ratio(1.0)],
        }
    }
}

/// Uniform grid panel: row/column count derived from the maximum slot
/// index actually used, total size divided evenly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniformGridConfig {
    pub fit_width: bool,
    pub fit_height: bool,
    /// Blend for the fitted cell extent: 0 uses the smallest slot, 1 the
    /// largest.
    pub fit_width_blend: f32,
    pub fit_height_blend: f32,
}

impl Default for UniformGridConfig {
    fn default() -> Self {
        Self {
            fit_width: false,
            fit_height: false,
            fit_width_blend: 1.0,
            fit_height_blend: 1.0,
        }
    }
}

/// Radial arrangement around a circle of fixed radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadialConfig {
    pub radius: f32,
    /// Degrees, counter-clockwise from the positive X axis.
    pub start_angle: f32,
    pub end_angle: f32,
    /// Rotate each child to face outward along its angular position.
    pub face_outward: bool,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            start_angle: 0.0,
            end_angle: 360.0,
            face_outward: false,
        }
    }
}

/// Size the container itself from its children's extents. Stretch-anchored
/// children are excluded on the stretched axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FitChildrenConfig {
    pub fit_width: bool,
    pub additional_width: f32,
    pub fit_height: bool,
    pub additional_height: f32,
}

impl Default for FitChildrenConfig {
    fn default() -> Self {
        Self {
            fit_width: true,
            additional_width: 0.0,
            fit_height: true,
            additional_height: 0.0,
        }
    }
}

/// Mirror another element's size, each axis optionally, plus a constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchOtherConfig {
    /// Name of the element whose size is mirrored. A missing target is a
    /// silent no-op, retried on the next rebuild.
    pub target: String,
    pub match_width: bool,
    pub match_height: bool,
    pub additional: Vec2,
}

impl Default for MatchOtherConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            match_width: true,
            match_height: true,
            additional: Vec2::ZERO,
        }
    }
}

/// The closed set of layout kinds. One container holds exactly one of
/// these; one rebuild is one solver invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayoutStyle {
    Linear(LinearConfig),
    Grid(GridConfig),
    FlexGrid(FlexGridConfig),
    PanelBox(PanelBoxConfig),
    PanelFlexGrid(PanelFlexGridConfig),
    PanelUniformGrid(UniformGridConfig),
    Radial(RadialConfig),
    FitChildren(FitChildrenConfig),
    MatchOther(MatchOtherConfig),
}

impl LayoutStyle {
    /// Anchor point this layout coerces controlled children to, in the
    /// upward-positive fraction convention (x: 0 = left, y: 1 = top).
    pub fn child_anchor(&self) -> Vec2 {
        match self {
            LayoutStyle::Radial(_) => Vec2::new(0.5, 0.5),
            _ => Vec2::new(0.0, 1.0),
        }
    }

    /// Whether this layout supports a descriptor's explicit override order.
    pub fn supports_override_order(&self) -> bool {
        matches!(
            self,
            LayoutStyle::PanelBox(_)
                | LayoutStyle::PanelFlexGrid(_)
                | LayoutStyle::PanelUniformGrid(_)
        )
    }
}
