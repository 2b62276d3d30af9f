//! # Slot Panel Solvers
//!
//! Panel layouts read an explicit slot descriptor per child (desired size,
//! size rule, per-slot padding, cell alignment) instead of the child's
//! current size. Three families: the linear box panel with an Auto/Fill
//! free-space split, the flexible-track grid panel, and the uniform grid
//! panel whose row/column count is derived from the highest slot index in
//! use.
//!
//! Cell filling is always area-then-align: a desired size smaller than the
//! cell area aligns inside it (Fill stretches), a larger one is clamped to
//! the area.

use crate::model::Vec2;
use crate::style::{CellAlign, PanelBoxConfig, PanelFlexGridConfig, SizeRule, UniformGridConfig};

use super::tracks::{inverse_ratio, span_extent, totals, track_offset};
use super::{ChildBox, ChildSpec, SolveOutput};

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Place an item of `desired` extent into a cell area. Returns the final
/// extent and the offset from the area start.
fn align_in_area(desired: f32, area: f32, align: CellAlign) -> (f32, f32) {
    if desired >= area {
        return (area, 0.0);
    }
    match align {
        CellAlign::Start => (desired, 0.0),
        CellAlign::Center => (desired, (area - desired) / 2.0),
        CellAlign::End => (desired, area - desired),
        CellAlign::Fill => (area, 0.0),
    }
}

pub fn solve_box(cfg: &PanelBoxConfig, size: Vec2, children: &[ChildSpec]) -> SolveOutput {
    let n = children.len();
    if n == 0 {
        return SolveOutput::empty();
    }

    let axis = cfg.axis;
    let cross_axis = axis.other();

    let mut total_fill_ratio = 0.0f32;
    let mut total_fill_desired = 0.0f32;
    let mut total_auto = 0.0f32;
    let mut total_padding = 0.0f32;
    let mut cross_min = f32::MAX;
    let mut cross_max = f32::MIN;
    for child in children {
        let slot = &child.slot;
        let desired_main = axis.main(slot.desired_size);
        match slot.size_rule {
            SizeRule::Fill(weight) => {
                total_fill_ratio += weight;
                total_fill_desired += desired_main;
            }
            SizeRule::Auto => total_auto += desired_main,
        }
        total_padding += slot.slot_padding.along(axis);
        let cross_with_padding =
            axis.cross(slot.desired_size) + slot.slot_padding.along(cross_axis);
        cross_min = cross_min.min(cross_with_padding);
        cross_max = cross_max.max(cross_with_padding);
    }

    let mut rect_main = axis.main(size);
    let mut rect_cross = axis.cross(size);
    let mut any_fit = false;
    if cfg.fit_main {
        rect_main = total_fill_desired + total_auto + total_padding;
        any_fit = true;
    }
    if cfg.fit_cross {
        rect_cross = lerp(cross_min, cross_max, cfg.fit_cross_blend);
        any_fit = true;
    }

    let total_fill_size = rect_main - total_auto - total_padding;
    let inv_fill = if total_fill_ratio > 0.0 {
        1.0 / total_fill_ratio
    } else {
        0.0
    };

    let mut boxes = Vec::with_capacity(n);
    let mut pos_main = 0.0f32;
    for child in children {
        let slot = &child.slot;
        let area_main = match slot.size_rule {
            SizeRule::Fill(weight) => total_fill_size * weight * inv_fill,
            SizeRule::Auto => axis.main(slot.desired_size),
        };
        let area_cross = rect_cross - slot.slot_padding.along(cross_axis);

        let (item_main, main_off) =
            align_in_area(axis.main(slot.desired_size), area_main, slot.cell_align(axis));
        let (item_cross, cross_off) = align_in_area(
            axis.cross(slot.desired_size),
            area_cross,
            slot.cell_align(cross_axis),
        );

        let offset = axis.pack(
            pos_main + slot.slot_padding.leading(axis) + main_off,
            slot.slot_padding.leading(cross_axis) + cross_off,
        );
        boxes.push(ChildBox::sized(offset, axis.pack(item_main, item_cross)));

        pos_main += slot.slot_padding.along(axis) + area_main;
    }

    SolveOutput {
        boxes,
        container_size: any_fit.then(|| axis.pack(rect_main, rect_cross)),
    }
}

pub fn solve_flex_grid(
    cfg: &PanelFlexGridConfig,
    size: Vec2,
    children: &[ChildSpec],
) -> SolveOutput {
    if children.is_empty() || cfg.columns.is_empty() || cfg.rows.is_empty() {
        return SolveOutput::empty();
    }

    let col_totals = totals(&cfg.columns);
    let row_totals = totals(&cfg.rows);
    let free_w = size.x - col_totals.constant;
    let free_h = size.y - row_totals.constant;
    let inv_col = inverse_ratio(col_totals);
    let inv_row = inverse_ratio(row_totals);

    let boxes = children
        .iter()
        .map(|child| {
            let slot = &child.slot;
            let area_w = span_extent(&cfg.columns, slot.column, slot.column_span, free_w, inv_col, 0.0)
                - slot.slot_padding.horizontal();
            let area_h = span_extent(&cfg.rows, slot.row, slot.row_span, free_h, inv_row, 0.0)
                - slot.slot_padding.vertical();
            let x = track_offset(&cfg.columns, slot.column, free_w, inv_col, 0.0);
            let y = track_offset(&cfg.rows, slot.row, free_h, inv_row, 0.0);

            let (item_w, off_x) =
                align_in_area(slot.desired_size.x, area_w, slot.horizontal_align);
            let (item_h, off_y) = align_in_area(slot.desired_size.y, area_h, slot.vertical_align);

            ChildBox::sized(
                Vec2::new(
                    x + slot.slot_padding.left + off_x,
                    y + slot.slot_padding.top + off_y,
                ),
                Vec2::new(item_w, item_h),
            )
        })
        .collect();

    SolveOutput {
        boxes,
        container_size: None,
    }
}

pub fn solve_uniform_grid(
    cfg: &UniformGridConfig,
    size: Vec2,
    children: &[ChildSpec],
) -> SolveOutput {
    let n = children.len();
    if n == 0 {
        return SolveOutput::empty();
    }

    // Counts come from the highest slot index actually used, not from a
    // declared track list.
    let mut column_count = 0usize;
    let mut row_count = 0usize;
    let mut width_min = f32::MAX;
    let mut width_max = f32::MIN;
    let mut height_min = f32::MAX;
    let mut height_max = f32::MIN;
    for child in children {
        let slot = &child.slot;
        column_count = column_count.max(slot.column);
        row_count = row_count.max(slot.row);
        let w = slot.desired_size.x + slot.slot_padding.horizontal();
        let h = slot.desired_size.y + slot.slot_padding.vertical();
        width_min = width_min.min(w);
        width_max = width_max.max(w);
        height_min = height_min.min(h);
        height_max = height_max.max(h);
    }
    column_count += 1;
    row_count += 1;

    let mut rect = size;
    let mut any_fit = false;
    if cfg.fit_width {
        rect.x = lerp(width_min, width_max, cfg.fit_width_blend) * column_count as f32;
        any_fit = true;
    }
    if cfg.fit_height {
        rect.y = lerp(height_min, height_max, cfg.fit_height_blend) * row_count as f32;
        any_fit = true;
    }

    let cell_w = rect.x / column_count as f32;
    let cell_h = rect.y / row_count as f32;

    let boxes = children
        .iter()
        .map(|child| {
            let slot = &child.slot;
            let area_w = cell_w - slot.slot_padding.horizontal();
            let area_h = cell_h - slot.slot_padding.vertical();
            let (item_w, off_x) =
                align_in_area(slot.desired_size.x, area_w, slot.horizontal_align);
            let (item_h, off_y) = align_in_area(slot.desired_size.y, area_h, slot.vertical_align);
            ChildBox::sized(
                Vec2::new(
                    cell_w * slot.column as f32 + slot.slot_padding.left + off_x,
                    cell_h * slot.row as f32 + slot.slot_padding.top + off_y,
                ),
                Vec2::new(item_w, item_h),
            )
        })
        .collect();

    SolveOutput {
        boxes,
        container_size: any_fit.then_some(rect),
    }
}
