// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking, trailing whitespace handling, truncation and
//! bidi reordering.

use tracing::trace;

use crate::analysis::BreakClass;
use crate::layout::line::{BreakReason, Line};
use crate::layout::run::{is_space_or_nbsp, is_whitespace, FontRun, RunKind};
use crate::layout::{Alignment, LayoutParams};
use crate::pool::RunPool;
use crate::shape::builder::shape_single;
use crate::shape::{FontMatcher, Shaper};
use crate::style::{Brush, StyleRunTable};
use crate::util::nearly_zero;

pub(crate) const ELLIPSIS: u32 = 0x2026;

/// Result of the line building pass.
pub(crate) struct LineLayout {
    pub(crate) lines: Vec<Line>,
    pub(crate) overflowed: bool,
}

struct BreakPoint {
    /// Codepoint boundary the line would end at.
    boundary: usize,
    /// Index of the run containing the boundary (or ending exactly at it).
    run_idx: usize,
}

/// Builds lines over the logical-order run list.
///
/// Splits mutate `runs` in place, inserting the logically-second half after
/// the first so the flat list stays in logical order throughout.
pub(crate) struct BreakLines<'a, B: Brush> {
    scalars: &'a [u32],
    classes: &'a [BreakClass],
    styles: &'a StyleRunTable<B>,
    runs: &'a mut Vec<FontRun>,
    pool: &'a mut RunPool,
    shaper: &'a dyn Shaper,
    fonts: &'a dyn FontMatcher,
    base_level: u8,
    params: &'a LayoutParams,
    lines: Vec<Line>,
}

impl<'a, B: Brush> BreakLines<'a, B> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        scalars: &'a [u32],
        classes: &'a [BreakClass],
        styles: &'a StyleRunTable<B>,
        runs: &'a mut Vec<FontRun>,
        pool: &'a mut RunPool,
        shaper: &'a dyn Shaper,
        fonts: &'a dyn FontMatcher,
        base_level: u8,
        params: &'a LayoutParams,
    ) -> Self {
        Self {
            scalars,
            classes,
            styles,
            runs,
            pool,
            shaper,
            fonts,
            base_level,
            params,
            lines: Vec::new(),
        }
    }

    /// Breaks all lines and finalizes placement. This consumes the breaker.
    pub(crate) fn break_remaining(mut self) -> LineLayout {
        self.break_all();
        let mut overflowed = self.truncate_lines();
        self.compute_vertical_metrics();
        overflowed |= self.truncate_height();
        for line in &mut self.lines {
            reorder_visual(self.runs, line);
        }
        if overflowed && self.params.ellipsize {
            self.apply_ellipsis();
        }
        self.finish();
        trace!(lines = self.lines.len(), overflowed, "line building done");
        LineLayout {
            lines: self.lines,
            overflowed,
        }
    }

    /// The greedy breaking pass: walk codepoints in logical order,
    /// accumulating width and tracking the last permissible break.
    fn break_all(&mut self) {
        let max_width = self.params.max_width.unwrap_or(f32::MAX);
        let mut line_first_run = 0_usize;
        let mut x = 0_f32;
        let mut prev_break: Option<BreakPoint> = None;

        let mut run_idx = 0;
        'runs: while run_idx < self.runs.len() {
            let run_range = self.runs[run_idx].range();
            for cp in run_range {
                let advance = self.runs[run_idx].cp_advance(cp);
                let next_x = x + advance;

                if self.classes[cp] == BreakClass::Mandatory {
                    let next_run =
                        self.commit(line_first_run, run_idx, cp + 1, BreakReason::Explicit);
                    line_first_run = next_run;
                    x = 0.;
                    prev_break = None;
                    run_idx = next_run;
                    continue 'runs;
                }

                if next_x > max_width {
                    if is_whitespace(self.scalars[cp]) {
                        // Overflowing whitespace hangs, then the line breaks.
                        let next_run =
                            self.commit(line_first_run, run_idx, cp + 1, BreakReason::Regular);
                        line_first_run = next_run;
                        x = 0.;
                        prev_break = None;
                        run_idx = next_run;
                        continue 'runs;
                    }
                    if let Some(bp) = prev_break.take() {
                        let next_run = self.commit(
                            line_first_run,
                            bp.run_idx,
                            bp.boundary,
                            BreakReason::Regular,
                        );
                        line_first_run = next_run;
                        x = 0.;
                        run_idx = next_run;
                        continue 'runs;
                    }
                    if self.params.break_words {
                        let run = &self.runs[run_idx];
                        let run_start = run.start;
                        let run_start_x = x - run.leading_width(cp);
                        let available = max_width - run_start_x;
                        let p = run.find_break_position(available, true);
                        if p > run_start {
                            let next_run =
                                self.commit(line_first_run, run_idx, p, BreakReason::Emergency);
                            line_first_run = next_run;
                            x = 0.;
                            prev_break = None;
                            run_idx = next_run;
                            continue 'runs;
                        } else if run_idx > line_first_run {
                            // Nothing of this run fits; break before it.
                            let next_run = self.commit(
                                line_first_run,
                                run_idx - 1,
                                run_start,
                                BreakReason::Emergency,
                            );
                            line_first_run = next_run;
                            x = 0.;
                            prev_break = None;
                            run_idx = next_run;
                            continue 'runs;
                        }
                        // A single unbreakable codepoint wider than the
                        // line; accept the overflow.
                    }
                    // No permissible break in this line: the word goes out
                    // over-long.
                }

                x = next_x;
                // Don't record opportunities while the line is still empty,
                // so overflowing content can't force consecutive breaks.
                if self.classes[cp] == BreakClass::Allowed && x != 0. {
                    prev_break = Some(BreakPoint {
                        boundary: cp + 1,
                        run_idx,
                    });
                }
            }
            run_idx += 1;
        }

        if line_first_run < self.runs.len() {
            let last = self.runs.len() - 1;
            let end = self.runs[last].range().end;
            self.commit(line_first_run, last, end, BreakReason::None);
        }
    }

    /// Ends the current line at `boundary`, which lies inside or at the end
    /// of `last_run_idx`. Splits the run when the boundary is interior,
    /// classifies trailing whitespace, and pushes the line. Returns the
    /// index of the first run of the next line.
    fn commit(
        &mut self,
        first_run: usize,
        last_run_idx: usize,
        boundary: usize,
        reason: BreakReason,
    ) -> usize {
        let mut last = last_run_idx;
        let run_range = self.runs[last].range();
        if boundary == run_range.start {
            debug_assert!(last > first_run);
            last -= 1;
        } else if boundary < run_range.end {
            let right = self.runs[last]
                .split(boundary, self.pool)
                .expect("split point is interior");
            self.runs.insert(last + 1, right);
        }

        let line_end = self.mark_trailing_whitespace(first_run, last);

        let start = self.runs[first_run].start;
        let end = self.runs[line_end].range().end;
        self.lines.push(Line {
            run_range: first_run..line_end + 1,
            visual_runs: Vec::new(),
            text_range: start..end,
            metrics: Default::default(),
            break_reason: reason,
        });
        line_end + 1
    }

    /// Classifies the whitespace at the logical end of the line, splitting
    /// a partially-whitespace run so the trailing part becomes its own run.
    /// Returns the (possibly grown) index of the line's last run.
    fn mark_trailing_whitespace(&mut self, first_run: usize, last_run: usize) -> usize {
        let mut end = last_run;
        let mut i = last_run;
        loop {
            if self.runs[i].is_all_whitespace(self.scalars) {
                self.runs[i].kind = RunKind::TrailingWhitespace;
                if i == first_run {
                    break;
                }
                i -= 1;
                continue;
            }
            // First non-whitespace run from the end; split off any
            // whitespace suffix.
            let range = self.runs[i].range();
            let mut first_tw = range.end;
            while first_tw > range.start && is_whitespace(self.scalars[first_tw - 1]) {
                first_tw -= 1;
            }
            if first_tw < range.end && first_tw > range.start {
                let mut right = self.runs[i]
                    .split(first_tw, self.pool)
                    .expect("split point is interior");
                right.kind = RunKind::TrailingWhitespace;
                self.runs.insert(i + 1, right);
                end += 1;
            }
            break;
        }
        end
    }

    /// Drops lines past `max_lines`. Returns whether content was lost.
    fn truncate_lines(&mut self) -> bool {
        if let Some(max_lines) = self.params.max_lines {
            if self.lines.len() > max_lines {
                self.lines.truncate(max_lines);
                return true;
            }
        }
        false
    }

    /// Per-line vertical metrics: ascent/descent/leading maxima and the
    /// line height. Trailing whitespace is ignored unless the line holds
    /// nothing else.
    fn compute_vertical_metrics(&mut self) {
        for line in &mut self.lines {
            let mut have_metrics = false;
            for idx in line.run_range.clone() {
                let run = &self.runs[idx];
                if run.kind == RunKind::TrailingWhitespace {
                    continue;
                }
                let m = run.metrics;
                line.metrics.ascent = line.metrics.ascent.max(m.ascent);
                line.metrics.descent = line.metrics.descent.max(m.descent);
                line.metrics.leading = line.metrics.leading.max(m.leading);
                line.metrics.height = line
                    .metrics
                    .height
                    .max(run.line_height * (m.ascent + m.descent) + m.leading);
                have_metrics = true;
            }
            if !have_metrics {
                // Line consisting entirely of whitespace.
                if let Some(run) = line.run_range.clone().next().map(|i| &self.runs[i]) {
                    let m = run.metrics;
                    line.metrics.ascent = m.ascent;
                    line.metrics.descent = m.descent;
                    line.metrics.leading = m.leading;
                    line.metrics.height = run.line_height * (m.ascent + m.descent) + m.leading;
                }
            }
            line.metrics.baseline = line.metrics.ascent;
        }
    }

    /// Drops lines whose bottom edge exceeds `max_height`. Returns whether
    /// content was lost.
    fn truncate_height(&mut self) -> bool {
        let Some(max_height) = self.params.max_height else {
            return false;
        };
        let mut y = 0_f32;
        let mut keep = self.lines.len();
        for (i, line) in self.lines.iter().enumerate() {
            y += line.metrics.height;
            if y > max_height && i > 0 {
                keep = i;
                break;
            }
        }
        if keep < self.lines.len() {
            self.lines.truncate(keep);
            return true;
        }
        false
    }

    /// Truncation: walk the last line visual-end-inward, removing runs
    /// until an ellipsis run shaped in the terminal style fits.
    fn apply_ellipsis(&mut self) {
        let max_width = self.params.max_width.unwrap_or(f32::MAX);
        let Some(line) = self.lines.last_mut() else {
            return;
        };
        let base_rtl = self.base_level & 1 == 1;

        // Terminal style: the style of the run at the truncation point.
        // That is the reading-order end of the line, which is the visual
        // left for an RTL paragraph and the visual right otherwise.
        let terminal_run = if base_rtl {
            line.visual_runs.first()
        } else {
            line.visual_runs.last()
        };
        let style_index = terminal_run
            .map(|&i| self.runs[i].style_index)
            .unwrap_or_else(|| self.styles.len().saturating_sub(1));
        let Some(style_run) = self.styles.get(style_index) else {
            return;
        };

        let synthetic_start = line.text_range.end;
        let mut ellipsis = shape_single(
            &[ELLIPSIS],
            synthetic_start,
            style_index,
            &style_run.style,
            u8::from(base_rtl),
            self.shaper,
            self.fonts,
            self.pool,
        );
        ellipsis.kind = RunKind::Ellipsis;

        let width_of = |runs: &[FontRun], visual: &[usize]| -> f32 {
            visual.iter().map(|&i| runs[i].width).sum()
        };
        while !line.visual_runs.is_empty()
            && width_of(self.runs, &line.visual_runs) + ellipsis.width > max_width
        {
            let removed = if base_rtl {
                line.visual_runs.remove(0)
            } else {
                line.visual_runs.pop().unwrap()
            };
            self.runs[removed].line_index = None;
        }

        let ellipsis_idx = self.runs.len();
        self.runs.push(ellipsis);
        if base_rtl {
            line.visual_runs.insert(0, ellipsis_idx);
        } else {
            line.visual_runs.push(ellipsis_idx);
        }
    }

    /// Final pass: horizontal placement, alignment, justification,
    /// overhang, and vertical accumulation.
    fn finish(&mut self) {
        let max_width = self.params.max_width;
        let mut y = 0_f32;
        for (line_index, line) in self.lines.iter_mut().enumerate() {
            line.metrics.y = y;
            y += line.metrics.height;

            line.metrics.advance = line
                .visual_runs
                .iter()
                .map(|&i| self.runs[i].width)
                .sum();
            line.metrics.trailing_whitespace = line
                .visual_runs
                .iter()
                .map(|&i| &self.runs[i])
                .filter(|r| r.kind == RunKind::TrailingWhitespace)
                .map(|r| r.width)
                .sum();

            let width = line.metrics.width();
            let slack = max_width
                .map(|w| (w - width).max(0.))
                .unwrap_or(0.);
            let mut offset = match self.params.alignment {
                Alignment::Left | Alignment::Justify => 0.,
                Alignment::Right => slack,
                Alignment::Center => slack * 0.5,
            };

            if self.params.alignment == Alignment::Justify
                && line.break_reason == BreakReason::Regular
                && !nearly_zero(slack)
            {
                let num_spaces: usize = line
                    .visual_runs
                    .iter()
                    .map(|&i| &self.runs[i])
                    .filter(|r| r.kind == RunKind::Normal)
                    .map(|r| {
                        r.range()
                            .filter(|&cp| is_space_or_nbsp(self.scalars[cp]))
                            .count()
                    })
                    .sum();
                if num_spaces > 0 {
                    let per_space = slack / num_spaces as f32;
                    for &i in &line.visual_runs {
                        if self.runs[i].kind == RunKind::Normal {
                            self.runs[i].add_justification(per_space, self.scalars);
                        }
                    }
                    line.metrics.advance += slack;
                }
            }

            // Trailing whitespace of an RTL paragraph reorders to the
            // visual left; let it hang outside the line box.
            if self.base_level & 1 == 1 {
                let hang: f32 = line
                    .visual_runs
                    .iter()
                    .map(|&i| &self.runs[i])
                    .take_while(|r| r.kind == RunKind::TrailingWhitespace)
                    .map(|r| r.width)
                    .sum();
                offset -= hang;
            }

            let mut cursor = offset;
            for &i in &line.visual_runs {
                let run = &mut self.runs[i];
                run.x = cursor;
                run.line_index = Some(line_index);
                cursor += run.width;
            }

            // Overhang from per-glyph ink bounds, excluding trailing
            // whitespace.
            let mut content_left = f32::MAX;
            let mut content_right = f32::MIN;
            let mut min_ink = f32::MAX;
            let mut max_ink = f32::MIN;
            for &i in &line.visual_runs {
                let run = &self.runs[i];
                if run.kind == RunKind::TrailingWhitespace {
                    continue;
                }
                content_left = content_left.min(run.x);
                content_right = content_right.max(run.x + run.width);
                for glyph in &run.glyphs {
                    min_ink = min_ink.min(run.x + glyph.x + glyph.ink.x_min);
                    max_ink = max_ink.max(run.x + glyph.x + glyph.ink.x_max);
                }
            }
            if content_left <= content_right && min_ink <= max_ink {
                line.metrics.left_overhang = (content_left - min_ink).max(0.);
                line.metrics.right_overhang = (max_ink - content_right).max(0.);
            }
        }
    }
}

/// Populates `line.visual_runs` by applying the UAX #9 level-run reorder to
/// the line's logical runs.
fn reorder_visual(runs: &[FontRun], line: &mut Line) {
    line.visual_runs = line.run_range.clone().collect();
    let slice = &mut line.visual_runs[..];
    if slice.len() < 2 {
        return;
    }

    // Find the max level and the min odd level.
    let mut max_level = 0_u8;
    let mut lowest_odd_level = 255_u8;
    for &idx in slice.iter() {
        let level = runs[idx].level;
        if level > max_level {
            max_level = level;
        }
        if level & 1 != 0 && level < lowest_odd_level {
            lowest_odd_level = level;
        }
    }

    for level in (lowest_odd_level..=max_level).rev() {
        let mut i = 0;
        while i < slice.len() {
            if runs[slice[i]].level >= level {
                let mut end = i + 1;
                while end < slice.len() && runs[slice[end]].level >= level {
                    end += 1;
                }
                slice[i..end].reverse();
                i = end;
            }
            i += 1;
        }
    }
}
