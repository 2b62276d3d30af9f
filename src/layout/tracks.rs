//! # Track Partition
//!
//! Shared math for flexible-track layouts: tracks partition the free space
//! (container extent minus constant tracks and spacing) proportionally to
//! ratio weight. A child occupying `[index, index + span)` sums the
//! resolved extents of its spanned tracks, with the span clamped to the
//! tracks that actually exist.
//!
//! Also hosts the inline flexible-grid solver; the slot/panel variants sit
//! in the panel module and reuse the same helpers.

use crate::model::Vec2;
use crate::style::{FlexGridConfig, TrackSize};

use super::{ChildBox, ChildSpec, SolveOutput};

/// Summed ratio weight and constant extent of a track list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackTotals {
    pub ratio: f32,
    pub constant: f32,
}

pub fn totals(tracks: &[TrackSize]) -> TrackTotals {
    let mut out = TrackTotals::default();
    for track in tracks {
        match *track {
            TrackSize::Ratio(w) => out.ratio += w,
            TrackSize::Constant(v) => out.constant += v,
        }
    }
    out
}

/// Reciprocal of the total ratio weight, guarded so an all-constant track
/// list resolves its ratio tracks to zero instead of NaN.
pub fn inverse_ratio(totals: TrackTotals) -> f32 {
    if totals.ratio > 0.0 {
        1.0 / totals.ratio
    } else {
        0.0
    }
}

/// Offset of a track index: running sum of all preceding tracks' resolved
/// extents plus spacing per preceding track.
pub fn track_offset(
    tracks: &[TrackSize],
    index: usize,
    free: f32,
    inv_ratio: f32,
    spacing: f32,
) -> f32 {
    let index = index.min(tracks.len().saturating_sub(1));
    let mut ratio = 0.0;
    let mut constant = 0.0;
    for track in &tracks[..index] {
        match *track {
            TrackSize::Ratio(w) => ratio += w,
            TrackSize::Constant(v) => constant += v,
        }
    }
    ratio * inv_ratio * free + constant + index as f32 * spacing
}

/// Resolved extent of a span. The span is clamped to the remaining tracks;
/// spacing between the spanned tracks is included.
pub fn span_extent(
    tracks: &[TrackSize],
    index: usize,
    span: usize,
    free: f32,
    inv_ratio: f32,
    spacing: f32,
) -> f32 {
    let start = index.min(tracks.len());
    let end = (index + span.max(1)).min(tracks.len());
    let mut ratio = 0.0;
    let mut constant = 0.0;
    for track in &tracks[start..end] {
        match *track {
            TrackSize::Ratio(w) => ratio += w,
            TrackSize::Constant(v) => constant += v,
        }
    }
    let spanned = end.saturating_sub(start);
    ratio * inv_ratio * free + constant + spanned.saturating_sub(1) as f32 * spacing
}

/// Inline flexible grid: children carry their own track index and span,
/// tracks carry inter-track spacing.
pub fn solve_flex_grid(cfg: &FlexGridConfig, size: Vec2, children: &[ChildSpec]) -> SolveOutput {
    if children.is_empty() || cfg.columns.is_empty() || cfg.rows.is_empty() {
        return SolveOutput::empty();
    }

    let inner = Vec2::new(
        size.x - cfg.padding.horizontal(),
        size.y - cfg.padding.vertical(),
    );
    let col_totals = totals(&cfg.columns);
    let row_totals = totals(&cfg.rows);
    let free_w = inner.x - col_totals.constant - cfg.spacing.x * (cfg.columns.len() - 1) as f32;
    let free_h = inner.y - row_totals.constant - cfg.spacing.y * (cfg.rows.len() - 1) as f32;
    let inv_col = inverse_ratio(col_totals);
    let inv_row = inverse_ratio(row_totals);

    let boxes = children
        .iter()
        .map(|child| {
            let slot = &child.slot;
            let width = span_extent(
                &cfg.columns,
                slot.column,
                slot.column_span,
                free_w,
                inv_col,
                cfg.spacing.x,
            );
            let height = span_extent(
                &cfg.rows,
                slot.row,
                slot.row_span,
                free_h,
                inv_row,
                cfg.spacing.y,
            );
            let x = cfg.padding.left
                + track_offset(&cfg.columns, slot.column, free_w, inv_col, cfg.spacing.x);
            let y = cfg.padding.top
                + track_offset(&cfg.rows, slot.row, free_h, inv_row, cfg.spacing.y);
            ChildBox::sized(Vec2::new(x, y), Vec2::new(width, height))
        })
        .collect();

    SolveOutput {
        boxes,
        container_size: None,
    }
}
