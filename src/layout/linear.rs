//! # Linear Box Solver
//!
//! Children side by side along one axis. With expand on, the main-axis
//! extent is distributed among Fill/Constant/Ratio children; with expand
//! off, children keep their native size and the whole run is aligned.
//! Cross-axis behavior is per-child alignment or a full stretch.

use crate::model::{Axis, Vec2};
use crate::style::{LinearConfig, SizingPolicy};

use super::{ChildBox, ChildSpec, SolveOutput};

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn solve(cfg: &LinearConfig, size: Vec2, children: &[ChildSpec]) -> SolveOutput {
    let n = children.len();
    if n == 0 {
        return SolveOutput::empty();
    }

    let axis = cfg.axis;
    let cross_axis = axis.other();
    let main_size = axis.main(size) - cfg.padding.along(axis);
    let cross_size = axis.cross(size) - cfg.padding.along(cross_axis);
    let spacing_total = cfg.spacing * (n - 1) as f32;

    // Resolve each child's main-axis extent.
    let mut mains: Vec<f32> = Vec::with_capacity(n);
    if cfg.expand_main {
        let size_without_spacing = main_size - spacing_total;
        let mut free = size_without_spacing;
        let mut auto_count = 0usize;
        let mut auto_scale = 0.0f32;
        for child in children {
            let main = match child.slot.policy {
                SizingPolicy::ConstantSize => {
                    child.slot.constant(axis).resolve(axis.main(child.size))
                }
                SizingPolicy::RatioSize => child.slot.ratio(axis) * size_without_spacing,
                SizingPolicy::AutoSize | SizingPolicy::IgnoreLayout => {
                    auto_count += 1;
                    auto_scale += axis.main(child.scale);
                    0.0
                }
            };
            free -= main;
            mains.push(main);
        }
        // Remaining space splits among the auto children, optionally
        // weighted by their scale.
        let unit = if cfg.use_child_scale {
            if auto_scale > 0.0 {
                free / auto_scale
            } else {
                0.0
            }
        } else if auto_count > 0 {
            free / auto_count as f32
        } else {
            0.0
        };
        for (i, child) in children.iter().enumerate() {
            if matches!(
                child.slot.policy,
                SizingPolicy::AutoSize | SizingPolicy::IgnoreLayout
            ) {
                mains[i] = if cfg.use_child_scale {
                    axis.main(child.scale) * unit
                } else {
                    unit
                };
            }
        }
    } else {
        for child in children {
            mains.push(axis.main(child.size));
        }
    }

    let actual_range: f32 = mains.iter().sum::<f32>() + spacing_total;
    let run_offset = if cfg.expand_main {
        0.0
    } else {
        (main_size - actual_range) * cfg.align.along(axis).factor()
    };

    let mut boxes = Vec::with_capacity(n);
    let mut pos_main = cfg.padding.leading(axis) + run_offset;
    for (i, child) in children.iter().enumerate() {
        let (cross_extent, cross_off) = if cfg.expand_cross {
            (cross_size, 0.0)
        } else {
            let extent = axis.cross(child.size);
            (
                extent,
                (cross_size - extent) * cfg.align.along(cross_axis).factor(),
            )
        };
        let offset = axis.pack(pos_main, cfg.padding.leading(cross_axis) + cross_off);
        let box_size = axis.pack(mains[i], cross_extent);
        let (write_width, write_height) = match axis {
            Axis::Horizontal => (cfg.expand_main, cfg.expand_cross),
            Axis::Vertical => (cfg.expand_cross, cfg.expand_main),
        };
        boxes.push(ChildBox {
            offset,
            size: box_size,
            write_width,
            write_height,
            rotation: None,
        });
        pos_main += mains[i] + cfg.spacing;
    }

    // Fit-to-children runs against the sizes resolved above; expanded axes
    // already fill the container and are left alone.
    let mut fitted = size;
    let mut any_fit = false;
    if cfg.fit_main && !cfg.expand_main {
        let new_main = actual_range + cfg.padding.along(axis);
        fitted = axis.pack(new_main, axis.cross(fitted));
        any_fit = true;
    }
    if cfg.fit_cross && !cfg.expand_cross {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for child in children {
            let extent = axis.cross(child.size);
            min = min.min(extent);
            max = max.max(extent);
        }
        let new_cross = lerp(min, max, cfg.fit_cross_blend) + cfg.padding.along(cross_axis);
        fitted = axis.pack(axis.main(fitted), new_cross);
        any_fit = true;
    }

    SolveOutput {
        boxes,
        container_size: any_fit.then_some(fitted),
    }
}
