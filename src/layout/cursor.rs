// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Caret and hit-test queries over the laid-out model.

use core::ops::Range;

use crate::error::LayoutError;
use crate::layout::line::Line;
use crate::layout::run::{FontRun, RunKind};

/// Which side of the hit codepoint the caret belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affinity {
    /// The caret sits at the codepoint's leading edge (before it in
    /// logical order).
    Leading,
    /// The caret sits at the codepoint's trailing edge.
    Trailing,
}

/// Result of a hit test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub line_index: usize,
    /// UTF-32 index of the hit codepoint.
    pub cp_index: usize,
    pub affinity: Affinity,
}

/// Caret placement for a codepoint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Caret {
    pub x: f32,
    pub top: f32,
    pub bottom: f32,
}

/// An axis-aligned rectangle in layout coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Measured extent of a laid-out block.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Constrained width: the maximum width when set, else the content
    /// width.
    pub width: f32,
    /// Constrained height: the maximum height when set, else the content
    /// height.
    pub height: f32,
    /// Content width excluding trailing whitespace.
    pub measured_width: f32,
    /// Content height over all lines.
    pub measured_height: f32,
}

pub(crate) fn hit_test(lines: &[Line], runs: &[FontRun], x: f32, y: f32) -> Option<Hit> {
    if lines.is_empty() {
        return None;
    }
    let line_index = lines
        .iter()
        .position(|line| y < line.metrics.y + line.metrics.height)
        .unwrap_or(lines.len() - 1);
    let line = &lines[line_index];

    let mut first: Option<&FontRun> = None;
    let mut last: Option<&FontRun> = None;
    for &run_idx in &line.visual_runs {
        let run = &runs[run_idx];
        if run.is_empty() {
            continue;
        }
        if first.is_none() {
            first = Some(run);
        }
        last = Some(run);
        if x >= run.x + run.width {
            continue;
        }
        for cp in run.range() {
            let (left, right) = cp_edges(run, cp);
            if right <= left {
                // Zero-advance codepoints cannot be hit.
                continue;
            }
            if x >= left && x < right {
                let mid = left + (right - left) * 0.5;
                let on_leading_half = if run.is_rtl() { x > mid } else { x <= mid };
                let affinity = if on_leading_half {
                    Affinity::Leading
                } else {
                    Affinity::Trailing
                };
                return Some(Hit {
                    line_index,
                    cp_index: cp,
                    affinity,
                });
            }
        }
    }

    // Outside the line's content: clamp to the nearest edge.
    let clamp = |run: &FontRun, at_start: bool| -> Hit {
        let rtl = run.is_rtl();
        let (cp, affinity) = if at_start != rtl {
            (run.range().start, Affinity::Leading)
        } else {
            (run.range().end - 1, Affinity::Trailing)
        };
        Hit {
            line_index,
            cp_index: cp,
            affinity,
        }
    };
    match (first, last) {
        (Some(first), Some(last)) => {
            let line_left = runs[*line.visual_runs.first().unwrap()].x;
            if x < line_left {
                Some(clamp(first, true))
            } else {
                Some(clamp(last, false))
            }
        }
        _ => None,
    }
}

pub(crate) fn caret_info(
    lines: &[Line],
    runs: &[FontRun],
    text_len: usize,
    cp: usize,
) -> Result<Caret, LayoutError> {
    if cp > text_len {
        return Err(LayoutError::IndexOutOfBounds {
            index: cp,
            len: text_len,
        });
    }
    for line in lines {
        if !line.text_range.contains(&cp) {
            continue;
        }
        for &run_idx in &line.visual_runs {
            let run = &runs[run_idx];
            if run.kind == RunKind::Ellipsis || !run.range().contains(&cp) {
                continue;
            }
            let x = run.x + run.relative_cp_x[cp - run.start];
            return Ok(Caret {
                x,
                top: line.metrics.y,
                bottom: line.metrics.y + line.metrics.height,
            });
        }
    }
    // End of text, or content lost to truncation: the logical end edge of
    // the last line that has one.
    let Some(line) = lines.last() else {
        return Ok(Caret::default());
    };
    let caret = line
        .run_range
        .clone()
        .rev()
        .map(|i| &runs[i])
        .find(|run| run.kind != RunKind::Ellipsis && !run.is_empty())
        .map(|run| Caret {
            x: run.x + run.relative_cp_x[run.len],
            top: line.metrics.y,
            bottom: line.metrics.y + line.metrics.height,
        })
        .unwrap_or_default();
    Ok(caret)
}

pub(crate) fn selection_rects(
    lines: &[Line],
    runs: &[FontRun],
    text_len: usize,
    range: Range<usize>,
) -> Result<Vec<Rect>, LayoutError> {
    if range.end > text_len || range.start > range.end {
        return Err(LayoutError::IndexOutOfBounds {
            index: range.end,
            len: text_len,
        });
    }
    let mut rects = Vec::new();
    for line in lines {
        let y0 = line.metrics.y;
        let y1 = line.metrics.y + line.metrics.height;
        for &run_idx in &line.visual_runs {
            let run = &runs[run_idx];
            if run.kind == RunKind::Ellipsis {
                continue;
            }
            let start = run.range().start.max(range.start);
            let end = run.range().end.min(range.end);
            if start >= end {
                continue;
            }
            let (a, b) = (start - run.start, end - run.start);
            let (x0, x1) = if run.is_rtl() {
                (run.x + run.relative_cp_x[b], run.x + run.relative_cp_x[a])
            } else {
                (run.x + run.relative_cp_x[a], run.x + run.relative_cp_x[b])
            };
            if x1 > x0 {
                rects.push(Rect { x0, y0, x1, y1 });
            }
        }
    }
    Ok(rects)
}

fn cp_edges(run: &FontRun, cp: usize) -> (f32, f32) {
    let i = cp - run.start;
    let (a, b) = (run.relative_cp_x[i], run.relative_cp_x[i + 1]);
    if run.is_rtl() {
        (run.x + b, run.x + a)
    } else {
        (run.x + a, run.x + b)
    }
}
