// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font runs: the physical unit produced by shaping.

use core::ops::Range;

use crate::error::LayoutError;
use crate::layout::{Direction, Glyph};
use crate::pool::RunPool;
use crate::shape::Typeface;

/// Classification of a font run within its line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunKind {
    #[default]
    Normal,
    /// Whitespace at the logical end of a line; excluded from the line's
    /// width and overhang.
    TrailingWhitespace,
    /// A run shaped from U+2026 and appended during truncation.
    Ellipsis,
}

/// Vertical metrics for a run, scaled to the run's font size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
    /// Paint-time vertical offset for super/subscript variants.
    pub baseline_offset: f32,
}

/// A maximal contiguous codepoint range shaped with a single typeface at a
/// single direction.
///
/// Glyphs are stored in visual order; `clusters` maps each glyph to the
/// buffer index of the codepoint it renders (non-decreasing for LTR runs,
/// non-increasing for RTL). `relative_cp_x` holds the per-codepoint leading
/// edge within the run: the left edge for LTR, the right edge for RTL, so
/// an RTL run has `relative_cp_x[0] == width` and `relative_cp_x[len] == 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct FontRun {
    pub(crate) kind: RunKind,
    /// Index of the originating style run.
    pub(crate) style_index: usize,
    /// First codepoint, in UTF-32 buffer space.
    pub(crate) start: usize,
    /// Number of codepoints.
    pub(crate) len: usize,
    /// Bidi embedding level.
    pub(crate) level: u8,
    pub(crate) typeface: Typeface,
    pub(crate) metrics: RunMetrics,
    /// Line height multiplier copied from the style.
    pub(crate) line_height: f32,
    pub(crate) glyphs: Vec<Glyph>,
    /// Glyph-parallel codepoint indices into the buffer.
    pub(crate) clusters: Vec<usize>,
    /// Per-codepoint leading x within the run; length `len + 1`.
    pub(crate) relative_cp_x: Vec<f32>,
    pub(crate) width: f32,
    /// Visual left edge, absolute within the layout.
    pub(crate) x: f32,
    /// Owning line, set at line assignment.
    pub(crate) line_index: Option<usize>,
}

impl Default for FontRun {
    fn default() -> Self {
        Self {
            kind: RunKind::Normal,
            style_index: 0,
            start: 0,
            len: 0,
            level: 0,
            typeface: Typeface::null(),
            metrics: RunMetrics::default(),
            line_height: 1.0,
            glyphs: Vec::new(),
            clusters: Vec::new(),
            relative_cp_x: Vec::new(),
            width: 0.,
            x: 0.,
            line_index: None,
        }
    }
}

impl FontRun {
    /// Clears shaped contents while keeping vector capacity. This is the
    /// pool's cleaner step; it also invalidates anything cached against the
    /// previous shape.
    pub(crate) fn reset(&mut self) {
        self.kind = RunKind::Normal;
        self.style_index = 0;
        self.start = 0;
        self.len = 0;
        self.level = 0;
        self.typeface = Typeface::null();
        self.metrics = RunMetrics::default();
        self.line_height = 1.0;
        self.glyphs.clear();
        self.clusters.clear();
        self.relative_cp_x.clear();
        self.width = 0.;
        self.x = 0.;
        self.line_index = None;
    }

    pub fn kind(&self) -> RunKind {
        self.kind
    }

    pub fn style_index(&self) -> usize {
        self.style_index
    }

    /// Covered codepoint range, in UTF-32 buffer space.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn direction(&self) -> Direction {
        if self.level & 1 == 1 {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }

    pub fn is_rtl(&self) -> bool {
        self.level & 1 == 1
    }

    pub fn bidi_level(&self) -> u8 {
        self.level
    }

    pub fn typeface(&self) -> &Typeface {
        &self.typeface
    }

    pub fn metrics(&self) -> RunMetrics {
        self.metrics
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Glyph-parallel buffer indices of the codepoints each glyph renders.
    pub fn clusters(&self) -> &[usize] {
        &self.clusters
    }

    pub fn relative_cp_x(&self) -> &[f32] {
        &self.relative_cp_x
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Visual left edge of the run, absolute within the layout.
    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn line_index(&self) -> Option<usize> {
        self.line_index
    }

    /// Advance of a single codepoint.
    pub fn cp_advance(&self, cp: usize) -> f32 {
        let i = cp - self.start;
        if self.is_rtl() {
            self.relative_cp_x[i] - self.relative_cp_x[i + 1]
        } else {
            self.relative_cp_x[i + 1] - self.relative_cp_x[i]
        }
    }

    /// Distance from the run's start edge (in its own direction) to the
    /// codepoint's leading edge.
    pub fn leading_width(&self, cp: usize) -> f32 {
        let i = cp - self.start;
        if self.is_rtl() {
            self.width - self.relative_cp_x[i]
        } else {
            self.relative_cp_x[i]
        }
    }

    /// Finds the codepoint to split at so that the retained prefix fits in
    /// `max_width`.
    ///
    /// Returns the largest codepoint whose leading width is strictly less
    /// than `max_width`. When none fits and `force` is set, returns the
    /// first codepoint with a non-zero leading width; otherwise the run
    /// start.
    pub fn find_break_position(&self, max_width: f32, force: bool) -> usize {
        for i in (1..self.len).rev() {
            if self.leading_width(self.start + i) < max_width {
                return self.start + i;
            }
        }
        if force {
            for i in 1..self.len {
                if self.leading_width(self.start + i) > 0. {
                    return self.start + i;
                }
            }
        }
        self.start
    }

    /// Splits the run at codepoint `p`, strictly interior to its range.
    ///
    /// `self` retains the logically-first part `[start, p)` and the
    /// logically-second part `[p, end)` is returned; the caller inserts it
    /// after `self` to keep the flat list in logical order. Whole clusters
    /// are assigned to one side. Concatenating the two parts (after x-origin
    /// renormalization) reproduces the original glyphs, clusters and
    /// per-codepoint edges exactly.
    pub fn split(&mut self, p: usize, pool: &mut RunPool) -> Result<FontRun, LayoutError> {
        let range = self.range();
        if p <= range.start || p >= range.end {
            return Err(LayoutError::IndexOutOfBounds {
                index: p,
                len: self.len,
            });
        }
        let cp_split = p - self.start;

        let mut other = pool.checkout();
        other.kind = self.kind;
        other.style_index = self.style_index;
        other.level = self.level;
        other.typeface = self.typeface.clone();
        other.metrics = self.metrics;
        other.line_height = self.line_height;
        other.start = p;
        other.len = self.len - cp_split;

        if self.is_rtl() {
            // Clusters are non-increasing, so glyphs for [p, end) form the
            // visual-left prefix of the glyph arrays.
            let glyph_split = self.clusters.partition_point(|&c| c >= p);
            let moved_width = self.relative_cp_x[cp_split];

            other.glyphs.extend(self.glyphs.drain(..glyph_split));
            other.clusters.extend(self.clusters.drain(..glyph_split));
            other
                .relative_cp_x
                .extend_from_slice(&self.relative_cp_x[cp_split..]);
            other.width = moved_width;
            other.x = self.x;

            self.relative_cp_x.truncate(cp_split + 1);
            for edge in &mut self.relative_cp_x {
                *edge -= moved_width;
            }
            for glyph in &mut self.glyphs {
                glyph.x -= moved_width;
            }
            self.width -= moved_width;
            self.x += moved_width;
        } else {
            let glyph_split = self.clusters.partition_point(|&c| c < p);
            let left_width = self.relative_cp_x[cp_split];

            other.glyphs.extend(self.glyphs.drain(glyph_split..));
            other.clusters.extend(self.clusters.drain(glyph_split..));
            other
                .relative_cp_x
                .extend(self.relative_cp_x[cp_split..].iter().map(|x| x - left_width));
            for glyph in &mut other.glyphs {
                glyph.x -= left_width;
            }
            other.width = *other.relative_cp_x.last().unwrap_or(&0.);
            other.x = self.x + left_width;

            self.relative_cp_x.truncate(cp_split + 1);
            self.width = left_width;
        }

        self.len = cp_split;
        self.line_index = None;
        other.line_index = None;
        Ok(other)
    }

    /// True if every codepoint of the run is whitespace.
    pub(crate) fn is_all_whitespace(&self, scalars: &[u32]) -> bool {
        self.range().all(|cp| is_whitespace(scalars[cp]))
    }

    /// Distributes justification slack after each space cluster, keeping
    /// the per-codepoint edges and glyph positions consistent. Returns the
    /// total width added.
    pub(crate) fn add_justification(&mut self, per_space: f32, scalars: &[u32]) -> f32 {
        let len = self.len;
        let mut shifts = vec![0_f32; len + 1];
        let added;
        if self.is_rtl() {
            // Gaps open to the visual left of each space, so a codepoint
            // shifts by the spaces at or after it in logical order.
            let mut shift = 0.;
            for i in (0..len).rev() {
                if is_space_or_nbsp(scalars[self.start + i]) {
                    shift += per_space;
                }
                shifts[i] = shift;
            }
            added = shifts.first().copied().unwrap_or(0.);
        } else {
            let mut shift = 0.;
            for (i, slot) in shifts.iter_mut().enumerate().take(len) {
                *slot = shift;
                if is_space_or_nbsp(scalars[self.start + i]) {
                    shift += per_space;
                }
            }
            shifts[len] = shift;
            added = shift;
        }
        for (i, edge) in self.relative_cp_x.iter_mut().enumerate() {
            *edge += shifts[i];
        }
        for (glyph, &cluster) in self.glyphs.iter_mut().zip(self.clusters.iter()) {
            glyph.x += shifts[cluster - self.start];
        }
        self.width += added;
        added
    }
}

/// Whitespace classification used for trailing-run handling and
/// justification.
pub(crate) fn is_whitespace(cp: u32) -> bool {
    matches!(
        cp,
        0x09 | 0x0A | 0x0D | 0x20 | 0xA0 | 0x1680 | 0x2000..=0x200A | 0x202F | 0x205F | 0x3000
    )
}

pub(crate) fn is_space_or_nbsp(cp: u32) -> bool {
    matches!(cp, 0x20 | 0xA0)
}
