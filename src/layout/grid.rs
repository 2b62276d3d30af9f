//! # Grid Solver
//!
//! Uniform cells with line wrapping. Two modes: depend-on-count derives the
//! cell extent from a fixed item count per line; depend-on-size keeps the
//! configured cell size and derives the per-line count by greedily packing
//! the first line. That first-line count is reused for every following
//! line, keeping the grid regular even when later lines could fit more.

use crate::model::Vec2;
use crate::style::{GridConfig, GridMode};

use super::{ChildBox, ChildSpec, SolveOutput};

/// Greedy forward pass over the first line. Always packs at least one item
/// so an oversized cell cannot loop.
fn items_per_line_by_size(count: usize, cell: f32, spacing: f32, available: f32) -> usize {
    let mut used = 0.0;
    let mut items = 0usize;
    for i in 0..count {
        let needed = if i == 0 { cell } else { spacing + cell };
        if i > 0 && used + needed > available {
            break;
        }
        used += needed;
        items += 1;
    }
    items.max(1)
}

pub fn solve(cfg: &GridConfig, size: Vec2, children: &[ChildSpec]) -> SolveOutput {
    let n = children.len();
    if n == 0 {
        return SolveOutput::empty();
    }

    let axis = cfg.axis;
    let wrap_axis = axis.other();
    let main_avail = axis.main(size) - cfg.padding.along(axis);
    let cross_avail = axis.cross(size) - cfg.padding.along(wrap_axis);
    let spacing_main = axis.main(cfg.spacing);
    let spacing_cross = axis.cross(cfg.spacing);

    let (cell_main, mut cell_cross, items_per_line) = match cfg.mode {
        GridMode::DependOnCount { line_count } => {
            if line_count == 0 {
                return SolveOutput::empty();
            }
            let cell = (main_avail - spacing_main * (line_count - 1) as f32) / line_count as f32;
            (cell, axis.cross(cfg.cell_size), line_count)
        }
        GridMode::DependOnSize => {
            let cell = axis.main(cfg.cell_size);
            (
                cell,
                axis.cross(cfg.cell_size),
                items_per_line_by_size(n, cell, spacing_main, main_avail),
            )
        }
    };

    let lines = n.div_ceil(items_per_line);
    if cfg.expand_cell && matches!(cfg.mode, GridMode::DependOnCount { .. }) {
        cell_cross = (cross_avail - spacing_cross * (lines - 1) as f32) / lines as f32;
    }

    let used_main = items_per_line as f32 * cell_main + (items_per_line - 1) as f32 * spacing_main;
    let used_cross = lines as f32 * cell_cross + (lines - 1) as f32 * spacing_cross;
    let block_main_off = (main_avail - used_main) * cfg.align.along(axis).factor();
    let block_cross_off = (cross_avail - used_cross) * cfg.align.along(wrap_axis).factor();

    // A partial last line may align independently of the block. An
    // exactly-full last line reuses the block offset.
    let last_count = n - items_per_line * (lines - 1);
    let last_main_off = if cfg.last_line_can_align && last_count < items_per_line {
        let used_last = last_count as f32 * cell_main + (last_count - 1) as f32 * spacing_main;
        (main_avail - used_last) * cfg.align.along(axis).factor()
    } else {
        block_main_off
    };

    let mut boxes = Vec::with_capacity(n);
    for i in 0..n {
        let line = i / items_per_line;
        let column = i % items_per_line;
        let main_off = if line == lines - 1 {
            last_main_off
        } else {
            block_main_off
        };
        let main = cfg.padding.leading(axis) + main_off + column as f32 * (cell_main + spacing_main);
        let cross = cfg.padding.leading(wrap_axis)
            + block_cross_off
            + line as f32 * (cell_cross + spacing_cross);
        boxes.push(ChildBox::sized(
            axis.pack(main, cross),
            axis.pack(cell_main, cell_cross),
        ));
    }

    // Fitting the wrap-growth axis only makes sense when the cross cell
    // extent is not itself derived from the container.
    let fit_allowed = matches!(cfg.mode, GridMode::DependOnSize) || !cfg.expand_cell;
    let container_size = (cfg.fit_lines && fit_allowed).then(|| {
        axis.pack(
            axis.main(size),
            used_cross + cfg.padding.along(wrap_axis),
        )
    });

    SolveOutput {
        boxes,
        container_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Axis;
    use crate::style::BlockAlign;

    const EPS: f32 = 1e-3;

    fn kids(n: usize) -> Vec<ChildSpec> {
        (0..n).map(|_| ChildSpec::new(10.0, 10.0)).collect()
    }

    fn count_cfg(line_count: usize) -> GridConfig {
        GridConfig {
            mode: GridMode::DependOnCount { line_count },
            ..Default::default()
        }
    }

    #[test]
    fn count_mode_divides_the_line_extent() {
        // Width 303, spacing 3, three per line: (303 - 3×2) / 3 = 99.
        let cfg = GridConfig {
            spacing: Vec2::splat(3.0),
            ..count_cfg(3)
        };
        let out = solve(&cfg, Vec2::new(303.0, 100.0), &kids(3));
        for b in &out.boxes {
            assert!((b.size.x - 99.0).abs() < EPS);
            assert!(b.write_width && b.write_height);
        }
        assert!((out.boxes[1].offset.x - 102.0).abs() < EPS);
    }

    #[test]
    fn size_mode_packs_the_first_line_greedily() {
        let cfg = GridConfig {
            mode: GridMode::DependOnSize,
            cell_size: Vec2::new(100.0, 40.0),
            spacing: Vec2::new(10.0, 10.0),
            ..Default::default()
        };
        // 100 + 110 + 110 = 320 fits exactly; a fourth would need 430.
        let out = solve(&cfg, Vec2::new(320.0, 200.0), &kids(5));
        assert!((out.boxes[2].offset.y - 0.0).abs() < EPS);
        assert!((out.boxes[3].offset.y - 50.0).abs() < EPS); // second line
        assert!((out.boxes[3].offset.x - 0.0).abs() < EPS);
    }

    #[test]
    fn size_mode_wrap_count_is_deterministic() {
        let cfg = GridConfig {
            mode: GridMode::DependOnSize,
            cell_size: Vec2::new(70.0, 30.0),
            spacing: Vec2::new(5.0, 5.0),
            ..Default::default()
        };
        let children = kids(9);
        let size = Vec2::new(310.0, 300.0);
        let first = solve(&cfg, size, &children);
        for _ in 0..3 {
            assert_eq!(solve(&cfg, size, &children), first);
        }
    }

    #[test]
    fn oversized_cell_still_gets_one_item_per_line() {
        let cfg = GridConfig {
            mode: GridMode::DependOnSize,
            cell_size: Vec2::new(500.0, 40.0),
            ..Default::default()
        };
        let out = solve(&cfg, Vec2::new(200.0, 300.0), &kids(2));
        assert!((out.boxes[1].offset.y - 40.0).abs() < EPS);
    }

    #[test]
    fn partial_last_line_centers_independently() {
        // Seven children, three per line, centered: line 3 holds one item
        // and centers on its own.
        let cfg = GridConfig {
            align: BlockAlign::UpperCenter,
            last_line_can_align: true,
            ..count_cfg(3)
        };
        let out = solve(&cfg, Vec2::new(300.0, 400.0), &kids(7));
        // Full lines span the whole extent, so the block offset is zero.
        assert!((out.boxes[0].offset.x - 0.0).abs() < EPS);
        assert!((out.boxes[3].offset.x - 0.0).abs() < EPS);
        // Last line: one 100-wide cell centered in 300.
        assert!((out.boxes[6].offset.x - 100.0).abs() < EPS);
    }

    #[test]
    fn exactly_full_last_line_reuses_the_block_offset() {
        let cfg = GridConfig {
            align: BlockAlign::UpperCenter,
            last_line_can_align: true,
            ..count_cfg(3)
        };
        let out = solve(&cfg, Vec2::new(300.0, 400.0), &kids(6));
        assert!((out.boxes[3].offset.x - out.boxes[0].offset.x).abs() < EPS);
        assert!((out.boxes[5].offset.x - out.boxes[2].offset.x).abs() < EPS);
    }

    #[test]
    fn expand_cell_fills_the_cross_extent() {
        let cfg = GridConfig {
            expand_cell: true,
            ..count_cfg(2)
        };
        let out = solve(&cfg, Vec2::new(100.0, 100.0), &kids(4));
        // Two lines of two: each cell is 50×50.
        assert!((out.boxes[0].size.y - 50.0).abs() < EPS);
        assert!((out.boxes[2].offset.y - 50.0).abs() < EPS);
    }

    #[test]
    fn fit_lines_sizes_the_wrap_axis() {
        let cfg = GridConfig {
            mode: GridMode::DependOnSize,
            cell_size: Vec2::new(100.0, 40.0),
            spacing: Vec2::new(0.0, 10.0),
            fit_lines: true,
            ..Default::default()
        };
        let out = solve(&cfg, Vec2::new(200.0, 500.0), &kids(5));
        // Three lines: 3×40 + 2×10 = 140.
        assert!((out.container_size.unwrap().y - 140.0).abs() < EPS);
        assert!((out.container_size.unwrap().x - 200.0).abs() < EPS);
    }

    #[test]
    fn vertical_grid_wraps_into_new_columns() {
        let cfg = GridConfig {
            axis: Axis::Vertical,
            cell_size: Vec2::new(25.0, 10.0),
            ..count_cfg(2)
        };
        let out = solve(&cfg, Vec2::new(100.0, 100.0), &kids(3));
        // Two per column, cells 50 tall; third child starts column two.
        assert!((out.boxes[1].offset.y - 50.0).abs() < EPS);
        assert!((out.boxes[2].offset.x - 25.0).abs() < EPS);
        assert!((out.boxes[2].offset.y - 0.0).abs() < EPS);
    }

    #[test]
    fn zero_line_count_is_a_no_op() {
        let out = solve(&count_cfg(0), Vec2::new(100.0, 100.0), &kids(3));
        assert!(out.boxes.is_empty());
    }
}
