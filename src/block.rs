// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The text block: the top-level aggregate owning the buffer, styles,
//! font runs and lines.

use core::ops::Range;
use std::sync::Arc;

use hashbrown::HashSet;
use tracing::trace;

use crate::buffer::CodepointBuffer;
use crate::context::{Delegates, LayoutContext};
use crate::error::LayoutError;
use crate::layout::breaker::{BreakLines, LineLayout};
use crate::layout::cursor;
use crate::layout::{Caret, FontRun, Hit, LayoutParams, Line, Rect, Size};
use crate::shape::builder::build_runs;
use crate::shape::Typeface;
use crate::style::{Brush, StyleRunTable, TextStyle};

/// A styled block of text and its laid-out model.
///
/// A block is single-threaded: it is not safe to mutate concurrently or to
/// query during mutation. Separate blocks lay out freely in parallel since
/// sealed styles and typeface handles are shareable.
#[derive(Debug, Default)]
pub struct TextBlock<B: Brush> {
    buffer: CodepointBuffer,
    styles: StyleRunTable<B>,
    /// Flat list of font runs in logical order (plus any synthesized
    /// ellipsis run at the tail).
    runs: Vec<FontRun>,
    lines: Vec<Line>,
    base_level: u8,
    overflowed: bool,
    width: f32,
    full_width: f32,
    height: f32,
    params: LayoutParams,
}

impl<B: Brush> TextBlock<B> {
    pub fn new() -> Self {
        Self {
            buffer: CodepointBuffer::new(),
            styles: StyleRunTable::new(),
            runs: Vec::new(),
            lines: Vec::new(),
            base_level: 0,
            overflowed: false,
            width: 0.,
            full_width: 0.,
            height: 0.,
            params: LayoutParams::default(),
        }
    }

    /// Appends styled UTF-16 text, extending the buffer and style table.
    pub fn push_text(
        &mut self,
        utf16: &[u16],
        style: Arc<TextStyle<B>>,
    ) -> Result<(), LayoutError> {
        let start = self.buffer.len();
        self.buffer.append(utf16);
        self.styles.push_run(start..self.buffer.len(), style)
    }

    /// Convenience wrapper over [`push_text`](Self::push_text) for `&str`.
    pub fn push_str(&mut self, text: &str, style: Arc<TextStyle<B>>) -> Result<(), LayoutError> {
        let utf16: Vec<u16> = text.encode_utf16().collect();
        self.push_text(&utf16, style)
    }

    /// Rebuilds the font run and line tables.
    ///
    /// Layout is deterministic and idempotent: identical inputs (text,
    /// styles, parameters and delegate outputs) produce identical runs and
    /// lines.
    pub fn layout(
        &mut self,
        ctx: &mut LayoutContext,
        delegates: &Delegates<'_>,
        params: &LayoutParams,
    ) -> Result<(), LayoutError> {
        self.styles.validate(self.buffer.len())?;

        ctx.pool.release_all(self.runs.drain(..));
        self.lines.clear();
        self.overflowed = false;
        self.width = 0.;
        self.full_width = 0.;
        self.height = 0.;
        self.params = *params;

        if self.buffer.is_empty() {
            return Ok(());
        }

        let bidi = delegates
            .bidi
            .resolve(self.buffer.scalars(), params.base_direction);
        self.base_level = bidi.base_level;
        let classes = delegates.breaks.classes(self.buffer.scalars());

        build_runs(
            &self.buffer,
            &self.styles,
            &bidi,
            delegates.shaper,
            delegates.fonts,
            &mut ctx.pool,
            &mut self.runs,
        );
        trace!(runs = self.runs.len(), "shaping done");

        let LineLayout { lines, overflowed } = BreakLines::new(
            self.buffer.scalars(),
            &classes,
            &self.styles,
            &mut self.runs,
            &mut ctx.pool,
            delegates.shaper,
            delegates.fonts,
            bidi.base_level,
            params,
        )
        .break_remaining();
        self.lines = lines;
        self.overflowed = overflowed;

        for line in &self.lines {
            self.width = self.width.max(line.metrics.width());
            self.full_width = self.full_width.max(line.metrics.advance);
            self.height += line.metrics.height;
        }
        Ok(())
    }

    /// The codepoint buffer.
    pub fn buffer(&self) -> &CodepointBuffer {
        &self.buffer
    }

    /// The style run table.
    pub fn styles(&self) -> &StyleRunTable<B> {
        &self.styles
    }

    /// All font runs, in logical order.
    pub fn runs(&self) -> &[FontRun] {
        &self.runs
    }

    /// The laid-out lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Runs of a line in visual (left-to-right) order.
    pub fn runs_for_line(&self, index: usize) -> impl Iterator<Item = &FontRun> + '_ {
        self.lines
            .get(index)
            .map(|line| line.visual_runs.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.runs[i])
    }

    /// The distinct typefaces used on a line.
    pub fn fonts_for_line(&self, index: usize) -> Vec<Typeface> {
        let mut seen = HashSet::new();
        let mut fonts = Vec::new();
        for run in self.runs_for_line(index) {
            if seen.insert(run.typeface().id()) {
                fonts.push(run.typeface().clone());
            }
        }
        fonts
    }

    /// True if the dominant direction of the block is right-to-left.
    pub fn is_rtl(&self) -> bool {
        self.base_level & 1 != 0
    }

    /// True when content was dropped to satisfy the line limits.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    /// Content width excluding trailing whitespace.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Content width including trailing whitespace.
    pub fn full_width(&self) -> f32 {
        self.full_width
    }

    /// Content height over all lines.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Constrained and measured extents of the last layout.
    pub fn measured_size(&self) -> Size {
        Size {
            width: self.params.max_width.unwrap_or(self.width),
            height: self.params.max_height.unwrap_or(self.height),
            measured_width: self.width,
            measured_height: self.height,
        }
    }

    /// Maps a point to the codepoint under it.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<Hit> {
        cursor::hit_test(&self.lines, &self.runs, x, y)
    }

    /// Caret placement at the leading edge of the given codepoint (or the
    /// end-of-text caret for `cp == len`).
    pub fn caret_info(&self, cp: usize) -> Result<Caret, LayoutError> {
        cursor::caret_info(&self.lines, &self.runs, self.buffer.len(), cp)
    }

    /// Rectangles covering the given codepoint range, one per run fragment.
    pub fn selection_rects(&self, range: Range<usize>) -> Result<Vec<Rect>, LayoutError> {
        cursor::selection_rects(&self.lines, &self.runs, self.buffer.len(), range)
    }
}
