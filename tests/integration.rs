//! Integration tests for the full layout pipeline.
//!
//! These exercise the path from tree construction (API or JSON scene)
//! through scheduling, solving, anchor projection, and the apply layer:
//! - free-space distribution and wrapping end to end
//! - the anchor-consistency invariant after rebuilds
//! - deferred rebuilds while tweens are in flight
//! - scene descriptions loaded from JSON

use cadre::style::{
    CellAlign, FitChildrenConfig, GridConfig, GridMode, LayoutSlot, LayoutStyle, LinearConfig,
    PanelBoxConfig, SizeRule, TrackSize,
};
use cadre::{Anchors, ApplyMode, ElementId, TweenRequest, UiTree, Vec2};

const EPS: f32 = 1e-3;

// ─── Helpers ────────────────────────────────────────────────────

fn expand_row(spacing: f32) -> LayoutStyle {
    LayoutStyle::Linear(LinearConfig {
        expand_main: true,
        spacing,
        ..Default::default()
    })
}

fn spawn_children(ui: &mut UiTree, parent: ElementId, count: usize) -> Vec<ElementId> {
    (0..count)
        .map(|i| {
            ui.spawn_child(parent, &format!("child{i}"), 10.0, 10.0)
                .unwrap()
        })
        .collect()
}

// ─── Free-space distribution ────────────────────────────────────

#[test]
fn horizontal_box_splits_container_width_evenly() {
    // Three AutoSize children, width 300, spacing 0, expand on.
    let mut ui = UiTree::new();
    let bar = ui.spawn("bar", 300.0, 50.0);
    ui.set_layout(bar, expand_row(0.0)).unwrap();
    let kids = spawn_children(&mut ui, bar, 3);
    ui.update();
    for &kid in &kids {
        assert!((ui.width(kid) - 100.0).abs() < EPS);
    }
}

#[test]
fn grid_by_count_resolves_the_cell_width() {
    // Count 3, width 303, spacing 3: (303 − 3×2) / 3 = 99.
    let mut ui = UiTree::new();
    let grid = ui.spawn("grid", 303.0, 200.0);
    ui.set_layout(
        grid,
        LayoutStyle::Grid(GridConfig {
            mode: GridMode::DependOnCount { line_count: 3 },
            spacing: Vec2::splat(3.0),
            ..Default::default()
        }),
    )
    .unwrap();
    let kids = spawn_children(&mut ui, grid, 3);
    ui.update();
    for &kid in &kids {
        assert!((ui.width(kid) - 99.0).abs() < EPS);
    }
}

#[test]
fn flexible_grid_spans_sum_their_columns() {
    // Two Ratio(1.0) columns over a 200-wide fill: 100 each; a child
    // spanning both gets 200.
    let mut ui = UiTree::new();
    let grid = ui.spawn("grid", 200.0, 80.0);
    ui.set_layout(
        grid,
        LayoutStyle::FlexGrid(cadre::style::FlexGridConfig {
            columns: vec![TrackSize::Ratio(1.0), TrackSize::Ratio(1.0)],
            rows: vec![TrackSize::Ratio(1.0)],
            ..Default::default()
        }),
    )
    .unwrap();
    let single = ui.spawn_child(grid, "single", 1.0, 1.0).unwrap();
    let spanning = ui.spawn_child(grid, "spanning", 1.0, 1.0).unwrap();
    ui.set_slot(
        spanning,
        LayoutSlot {
            column: 0,
            column_span: 2,
            ..Default::default()
        },
    )
    .unwrap();
    ui.update();
    assert!((ui.width(single) - 100.0).abs() < EPS);
    assert!((ui.width(spanning) - 200.0).abs() < EPS);
}

#[test]
fn size_to_children_skips_stretched_children() {
    // Children of widths 50 and 80; the 80 one stretches horizontally,
    // so the container resolves to 50.
    let mut ui = UiTree::new();
    let fitter = ui.spawn("fitter", 300.0, 300.0);
    ui.set_layout(
        fitter,
        LayoutStyle::FitChildren(FitChildrenConfig {
            fit_height: false,
            ..Default::default()
        }),
    )
    .unwrap();
    ui.spawn_child(fitter, "narrow", 50.0, 10.0).unwrap();
    let wide = ui.spawn_child(fitter, "wide", 80.0, 10.0).unwrap();
    ui.set_anchors(
        wide,
        Anchors {
            min: Vec2::new(0.0, 0.5),
            max: Vec2::new(1.0, 0.5),
        },
    )
    .unwrap();
    ui.update();
    assert!((ui.width(fitter) - 50.0).abs() < EPS);
}

#[test]
fn grid_centers_a_partial_last_line() {
    // Seven children, three per line, center alignment with last-line
    // alignment on: line three holds one centered item.
    let mut ui = UiTree::new();
    let grid = ui.spawn("grid", 300.0, 400.0);
    ui.set_layout(
        grid,
        LayoutStyle::Grid(GridConfig {
            mode: GridMode::DependOnCount { line_count: 3 },
            align: cadre::style::BlockAlign::UpperCenter,
            last_line_can_align: true,
            ..Default::default()
        }),
    )
    .unwrap();
    let kids = spawn_children(&mut ui, grid, 7);
    ui.update();
    // Cells are 100 wide; the lone item on line three is centered, so its
    // pivot lands at x = 150 while the first column sits at 50.
    assert!((ui.anchored_offset(kids[0]).x - 50.0).abs() < EPS);
    assert!((ui.anchored_offset(kids[3]).x - 50.0).abs() < EPS);
    assert!((ui.anchored_offset(kids[6]).x - 150.0).abs() < EPS);
}

// ─── Invariants ─────────────────────────────────────────────────

#[test]
fn all_controlled_children_end_with_point_anchors() {
    let mut ui = UiTree::new();
    let bar = ui.spawn("bar", 300.0, 60.0);
    ui.set_layout(bar, expand_row(4.0)).unwrap();
    let kids = spawn_children(&mut ui, bar, 4);
    for (i, &kid) in kids.iter().enumerate() {
        if i % 2 == 0 {
            ui.set_anchors(kid, Anchors::stretch_both()).unwrap();
        }
    }
    ui.update();
    for &kid in &kids {
        let anchors = ui.anchors(kid).unwrap();
        assert_eq!(anchors.min.x, anchors.max.x);
        assert_eq!(anchors.min.y, anchors.max.y);
    }
}

#[test]
fn conservation_holds_for_a_fitted_row() {
    let mut ui = UiTree::new();
    let bar = ui.spawn("bar", 1000.0, 50.0);
    ui.set_layout(
        bar,
        LayoutStyle::Linear(LinearConfig {
            spacing: 6.0,
            padding: cadre::Edges::symmetric(0.0, 4.0),
            fit_main: true,
            ..Default::default()
        }),
    )
    .unwrap();
    let kids = spawn_children(&mut ui, bar, 3);
    for (i, &kid) in kids.iter().enumerate() {
        ui.set_width(kid, 20.0 + 10.0 * i as f32).unwrap();
    }
    ui.update();
    let children_total: f32 = kids.iter().map(|&k| ui.width(k)).sum();
    assert!((children_total + 2.0 * 6.0 + 8.0 - ui.width(bar)).abs() < EPS);
}

#[test]
fn repeated_updates_are_bit_identical() {
    let mut ui = UiTree::new();
    let grid = ui.spawn("grid", 317.0, 211.0);
    ui.set_layout(
        grid,
        LayoutStyle::Grid(GridConfig {
            mode: GridMode::DependOnSize,
            cell_size: Vec2::new(71.0, 37.0),
            spacing: Vec2::new(3.0, 5.0),
            ..Default::default()
        }),
    )
    .unwrap();
    let kids = spawn_children(&mut ui, grid, 11);
    ui.update();
    let snapshot: Vec<Vec2> = kids.iter().map(|&k| ui.anchored_offset(k)).collect();
    for _ in 0..3 {
        ui.update();
        let again: Vec<Vec2> = kids.iter().map(|&k| ui.anchored_offset(k)).collect();
        assert_eq!(snapshot, again);
    }
}

// ─── Animation coupling ─────────────────────────────────────────

#[test]
fn animated_apply_emits_tween_requests_instead_of_writing() {
    let mut ui = UiTree::new();
    let bar = ui.spawn("bar", 300.0, 50.0);
    ui.set_layout(bar, expand_row(0.0)).unwrap();
    ui.set_apply_mode(bar, ApplyMode::Animated { duration: 0.25 })
        .unwrap();
    let kids = spawn_children(&mut ui, bar, 2);
    ui.update();

    // No sizes written yet; the targets travel as requests.
    assert!((ui.width(kids[0]) - 10.0).abs() < EPS);
    let requests = ui.drain_tween_requests();
    assert!(matches!(requests[0], TweenRequest::CancelAll { .. }));
    let widths: Vec<f32> = requests
        .iter()
        .filter_map(|r| match r {
            TweenRequest::Width { value, duration, .. } => {
                assert!((duration - 0.25).abs() < EPS);
                Some(*value)
            }
            _ => None,
        })
        .collect();
    assert_eq!(widths.len(), 2);
    assert!(widths.iter().all(|w| (w - 150.0).abs() < EPS));
}

#[test]
fn rebuild_during_animation_waits_for_completion() {
    // A rebuild requested mid-animation must not run; exactly one pass
    // runs on the completion callback.
    let mut ui = UiTree::new();
    let bar = ui.spawn("bar", 300.0, 50.0);
    ui.set_layout(bar, expand_row(0.0)).unwrap();
    ui.set_apply_mode(bar, ApplyMode::Animated { duration: 0.5 })
        .unwrap();
    spawn_children(&mut ui, bar, 2);
    ui.update();
    ui.drain_tween_requests();

    // The tween is in flight; a config change only records the request.
    ui.update_layout(bar, |style| {
        if let LayoutStyle::Linear(cfg) = style {
            cfg.spacing = 10.0;
        }
    })
    .unwrap();
    ui.update();
    assert!(ui.drain_tween_requests().is_empty());

    ui.notify_tween_complete(bar);
    let requests = ui.drain_tween_requests();
    assert!(!requests.is_empty());
}

#[test]
fn cancel_allows_an_immediate_fresh_rebuild() {
    let mut ui = UiTree::new();
    let bar = ui.spawn("bar", 300.0, 50.0);
    ui.set_layout(bar, expand_row(0.0)).unwrap();
    ui.set_apply_mode(bar, ApplyMode::Animated { duration: 0.5 })
        .unwrap();
    spawn_children(&mut ui, bar, 2);
    ui.update();
    ui.drain_tween_requests();

    ui.update_layout(bar, |style| {
        if let LayoutStyle::Linear(cfg) = style {
            cfg.spacing = 10.0;
        }
    })
    .unwrap();
    ui.force_rebuild(bar);
    let requests = ui.drain_tween_requests();
    // The forced rebuild cancels and re-emits without a completion
    // callback.
    assert!(requests
        .iter()
        .any(|r| matches!(r, TweenRequest::CancelAll { .. })));
    assert!(requests
        .iter()
        .any(|r| matches!(r, TweenRequest::Width { .. })));
}

// ─── Panels ─────────────────────────────────────────────────────

#[test]
fn panel_box_fill_and_alignment_end_to_end() {
    let mut ui = UiTree::new();
    let panel = ui.spawn("panel", 200.0, 60.0);
    ui.set_layout(panel, LayoutStyle::PanelBox(PanelBoxConfig::default()))
        .unwrap();
    let label = ui.spawn_child(panel, "label", 1.0, 1.0).unwrap();
    ui.set_slot(
        label,
        LayoutSlot {
            desired_size: Vec2::new(50.0, 20.0),
            vertical_align: CellAlign::Center,
            ..Default::default()
        },
    )
    .unwrap();
    let body = ui.spawn_child(panel, "body", 1.0, 1.0).unwrap();
    ui.set_slot(
        body,
        LayoutSlot {
            desired_size: Vec2::new(10.0, 10.0),
            size_rule: SizeRule::Fill(1.0),
            ..Default::default()
        },
    )
    .unwrap();
    ui.update();

    assert!((ui.width(label) - 50.0).abs() < EPS);
    assert!((ui.height(label) - 20.0).abs() < EPS);
    // Fill slot stretches into everything the auto slot left.
    assert!((ui.width(body) - 150.0).abs() < EPS);
    assert!((ui.height(body) - 60.0).abs() < EPS);
    // Centered 20-high label in a 60-high panel: pivot at y = −30.
    assert!((ui.anchored_offset(label).y + 30.0).abs() < EPS);
}

// ─── Scene descriptions ─────────────────────────────────────────

#[test]
fn scene_json_builds_and_solves() {
    let json = r#"{
        "children": [
            {
                "name": "bar",
                "width": 300.0,
                "height": 50.0,
                "layout": {
                    "type": "Linear",
                    "expandMain": true,
                    "spacing": 0.0
                },
                "children": [
                    { "name": "a", "width": 10.0, "height": 50.0 },
                    { "name": "b", "width": 10.0, "height": 50.0 },
                    { "name": "c", "width": 10.0, "height": 50.0 }
                ]
            }
        ]
    }"#;
    let mut ui = UiTree::from_json(json).unwrap();
    ui.update();
    let bar = ui.find_by_name("bar").unwrap();
    for &kid in ui.children(bar).to_vec().iter() {
        assert!((ui.width(kid) - 100.0).abs() < EPS);
    }
}

#[test]
fn malformed_scene_json_reports_a_hint() {
    let err = UiTree::from_json("{\"children\": [").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("failed to parse scene"));
    assert!(message.contains("Hint:"));
}
