// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font run construction: directional and font-affinity segmentation of
//! style runs, shaping, and per-codepoint measurement.

use tracing::warn;

use crate::analysis::{inherits_font, is_zero_width, joins_previous, ResolvedBidi};
use crate::buffer::CodepointBuffer;
use crate::layout::run::FontRun;
use crate::layout::{Direction, Glyph};
use crate::pool::RunPool;
use crate::shape::{FontMatcher, FontQuery, ShapeRequest, Shaper, Typeface};
use crate::style::{Brush, DirectionOverride, StyleRunTable, TextStyle};
use crate::util::nearly_zero;

const REPLACEMENT: u32 = 0xFFFD;

/// Builds the logical-order font run list for the whole buffer.
pub(crate) fn build_runs<B: Brush>(
    buffer: &CodepointBuffer,
    styles: &StyleRunTable<B>,
    bidi: &ResolvedBidi,
    shaper: &dyn Shaper,
    fonts: &dyn FontMatcher,
    pool: &mut RunPool,
    out: &mut Vec<FontRun>,
) {
    for (style_index, style_run) in styles.iter().enumerate() {
        let style = &*style_run.style;
        let range = style_run.range.clone();
        for (seg_start, seg_end, level) in
            DirectionalSegments::new(&bidi.levels, range, style.direction, bidi.base_level)
        {
            build_affinity_segments(
                buffer,
                style_index,
                style,
                seg_start,
                seg_end,
                level,
                shaper,
                fonts,
                pool,
                out,
            );
        }
    }
}

/// Iterator over maximal same-level spans of a style run.
///
/// A per-style directional override forces a uniform level for the whole
/// span; `Auto` defers to the resolved bidi levels.
struct DirectionalSegments<'a> {
    levels: &'a [u8],
    cursor: usize,
    end: usize,
    forced: Option<u8>,
}

impl<'a> DirectionalSegments<'a> {
    fn new(
        levels: &'a [u8],
        range: core::ops::Range<usize>,
        direction: DirectionOverride,
        base_level: u8,
    ) -> Self {
        let forced = match direction {
            DirectionOverride::Auto => None,
            // The override embeds at the nearest level of matching parity
            // above the paragraph level.
            DirectionOverride::Ltr => Some((base_level + 1) & !1),
            DirectionOverride::Rtl => Some(base_level | 1),
        };
        Self {
            levels,
            cursor: range.start,
            end: range.end,
            forced,
        }
    }

    fn level_at(&self, index: usize) -> u8 {
        self.forced
            .unwrap_or_else(|| self.levels.get(index).copied().unwrap_or(0))
    }
}

impl Iterator for DirectionalSegments<'_> {
    type Item = (usize, usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let start = self.cursor;
        let level = self.level_at(start);
        let mut end = start + 1;
        while end < self.end && self.level_at(end) == level {
            end += 1;
        }
        self.cursor = end;
        Some((start, end, level))
    }
}

/// Segments a directional span by font affinity and shapes each segment.
#[allow(clippy::too_many_arguments)]
fn build_affinity_segments<B: Brush>(
    buffer: &CodepointBuffer,
    style_index: usize,
    style: &TextStyle<B>,
    seg_start: usize,
    seg_end: usize,
    level: u8,
    shaper: &dyn Shaper,
    fonts: &dyn FontMatcher,
    pool: &mut RunPool,
    out: &mut Vec<FontRun>,
) {
    let query = FontQuery {
        family: &style.font_family,
        weight: style.font_weight,
        italic: style.italic,
    };

    if let Some(replacement) = style.replacement_char {
        // Every codepoint of the run shapes as the replacement scalar, so
        // there is a single affinity segment.
        let typeface = resolve_typeface(fonts, replacement, &query, style);
        let cps = vec![replacement; seg_end - seg_start];
        out.push(shape_segment(
            buffer,
            &cps,
            seg_start,
            style_index,
            style,
            level,
            &typeface,
            shaper,
            pool,
        ));
        return;
    }

    let mut cps: Vec<u32> = Vec::with_capacity(seg_end - seg_start);
    let mut current: Option<Typeface> = None;
    let mut flush_start = seg_start;
    for cp_index in seg_start..seg_end {
        let cp = buffer.get(cp_index).unwrap_or(REPLACEMENT);
        // Combining marks and joiner sequences stay with their base
        // cluster's typeface; common-script codepoints inherit it.
        if (joins_previous(cp) || inherits_font(cp)) && current.is_some() {
            cps.push(cp);
            continue;
        }
        let (effective, typeface) = match fonts.match_font(cp, &query) {
            Some(typeface) => (cp, typeface),
            None => {
                warn!(codepoint = cp, "no typeface for codepoint, substituting");
                let substitute = style.replacement_char.unwrap_or(REPLACEMENT);
                let typeface = resolve_typeface(fonts, substitute, &query, style);
                (substitute, typeface)
            }
        };
        match &current {
            Some(face) if *face == typeface => {}
            Some(_) => {
                out.push(shape_segment(
                    buffer,
                    &cps,
                    flush_start,
                    style_index,
                    style,
                    level,
                    current.as_ref().unwrap(),
                    shaper,
                    pool,
                ));
                flush_start = cp_index;
                cps.clear();
                current = Some(typeface);
            }
            None => current = Some(typeface),
        }
        cps.push(effective);
    }
    if !cps.is_empty() {
        let typeface = current.unwrap_or_else(Typeface::null);
        out.push(shape_segment(
            buffer,
            &cps,
            flush_start,
            style_index,
            style,
            level,
            &typeface,
            shaper,
            pool,
        ));
    }
}

fn resolve_typeface<B: Brush>(
    fonts: &dyn FontMatcher,
    cp: u32,
    query: &FontQuery<'_>,
    style: &TextStyle<B>,
) -> Typeface {
    fonts
        .match_font(cp, query)
        .or_else(|| {
            style
                .replacement_char
                .and_then(|rc| fonts.match_font(rc, query))
        })
        .unwrap_or_else(|| {
            warn!(codepoint = cp, "font matcher exhausted, using null typeface");
            Typeface::null()
        })
}

/// Shapes a single segment that already has a resolved typeface and level.
/// Used for ordinary segments and for the synthesized ellipsis run.
#[allow(clippy::too_many_arguments)]
pub(crate) fn shape_single<B: Brush>(
    cps: &[u32],
    start: usize,
    style_index: usize,
    style: &TextStyle<B>,
    level: u8,
    shaper: &dyn Shaper,
    fonts: &dyn FontMatcher,
    pool: &mut RunPool,
) -> FontRun {
    let query = FontQuery {
        family: &style.font_family,
        weight: style.font_weight,
        italic: style.italic,
    };
    let typeface = resolve_typeface(fonts, cps.first().copied().unwrap_or(REPLACEMENT), &query, style);
    shape_segment_inner(None, cps, start, style_index, style, level, &typeface, shaper, pool)
}

#[allow(clippy::too_many_arguments)]
fn shape_segment<B: Brush>(
    buffer: &CodepointBuffer,
    cps: &[u32],
    start: usize,
    style_index: usize,
    style: &TextStyle<B>,
    level: u8,
    typeface: &Typeface,
    shaper: &dyn Shaper,
    pool: &mut RunPool,
) -> FontRun {
    shape_segment_inner(
        Some(buffer),
        cps,
        start,
        style_index,
        style,
        level,
        typeface,
        shaper,
        pool,
    )
}

/// Shapes `cps` and builds the measured [`FontRun`].
///
/// `buffer` is used to detect newline codepoints in the original text
/// (which are stripped of glyphs and advance); it is `None` for synthetic
/// runs such as the ellipsis.
#[allow(clippy::too_many_arguments)]
fn shape_segment_inner<B: Brush>(
    buffer: Option<&CodepointBuffer>,
    cps: &[u32],
    start: usize,
    style_index: usize,
    style: &TextStyle<B>,
    level: u8,
    typeface: &Typeface,
    shaper: &dyn Shaper,
    pool: &mut RunPool,
) -> FontRun {
    let direction = if level & 1 == 1 {
        Direction::Rtl
    } else {
        Direction::Ltr
    };
    let font_size = style.scaled_font_size();
    let request = ShapeRequest {
        codepoints: cps,
        typeface,
        font_size,
        direction,
        weight: style.font_weight,
        italic: style.italic,
    };
    let shaped = match shaper.shape(&request) {
        Some(glyphs) => glyphs,
        None => {
            warn!("shaper failed, retrying with replacement characters");
            let substitute = style.replacement_char.unwrap_or(REPLACEMENT);
            let fallback: Vec<u32> = vec![substitute; cps.len()];
            let retry = ShapeRequest {
                codepoints: &fallback,
                ..request
            };
            shaper.shape(&retry).unwrap_or_default()
        }
    };

    let len = cps.len();
    let mut run = pool.checkout();
    run.style_index = style_index;
    run.start = start;
    run.len = len;
    run.level = level;
    run.typeface = typeface.clone();
    run.line_height = style.line_height;
    let em = typeface.metrics();
    run.metrics.ascent = em.ascent * font_size;
    run.metrics.descent = em.descent * font_size;
    run.metrics.leading = em.leading * font_size;
    run.metrics.baseline_offset = style.variant.baseline_offset(style.font_size);

    let is_newline = |i: usize| -> bool {
        buffer
            .and_then(|b| b.get(start + i))
            .is_some_and(|cp| cp == 0x0A || cp == 0x0D)
    };

    // Per-codepoint advances: sum the advances of glyphs in each cluster,
    // then spread ligature advances evenly over their components.
    let mut advances = vec![0_f32; len];
    let mut cluster_starts = vec![false; len];
    for glyph in &shaped {
        debug_assert!(glyph.cluster < len);
        advances[glyph.cluster] += glyph.advance;
        cluster_starts[glyph.cluster] = true;
    }
    let mut i = 0;
    while i < len {
        if !cluster_starts[i] {
            i += 1;
            continue;
        }
        let mut j = i + 1;
        while j < len && !cluster_starts[j] {
            j += 1;
        }
        if j - i > 1 && !nearly_zero(advances[i]) {
            // Spread a ligature's advance over its components, but keep
            // zero-width codepoints at zero so their edges coincide.
            let targets = 1 + (i + 1..j).filter(|&k| !is_zero_width(cps[k])).count();
            let share = advances[i] / targets as f32;
            advances[i] = share;
            for k in i + 1..j {
                advances[k] = if is_zero_width(cps[k]) { 0. } else { share };
            }
        }
        i = j;
    }

    // Newlines contribute no glyphs and no advance.
    for (i, advance) in advances.iter_mut().enumerate() {
        if is_newline(i) {
            *advance = 0.;
        }
    }

    // Letter spacing applies after each cluster boundary, never between
    // the glyphs of one cluster.
    let letter_spacing = style.letter_spacing;
    if !nearly_zero(letter_spacing) {
        for i in 0..len {
            let ends_cluster = i + 1 == len || cluster_starts[i + 1];
            if ends_cluster && !is_newline(i) {
                advances[i] += letter_spacing;
            }
        }
    }

    // Glyph placement: pen walk in visual order, dropping newline glyphs
    // and folding letter spacing into each cluster's final glyph.
    run.glyphs.reserve(shaped.len());
    run.clusters.reserve(shaped.len());
    let mut pen = 0_f32;
    let mut iter = shaped.iter().peekable();
    while let Some(glyph) = iter.next() {
        if is_newline(glyph.cluster) {
            continue;
        }
        let mut advance = glyph.advance;
        let last_of_cluster = iter.peek().map(|g| g.cluster != glyph.cluster).unwrap_or(true);
        if last_of_cluster && !nearly_zero(letter_spacing) {
            advance += letter_spacing;
        }
        run.glyphs.push(Glyph {
            id: glyph.id,
            x: pen + glyph.x_offset,
            y: glyph.y_offset,
            advance,
            ink: glyph.ink,
        });
        run.clusters.push(start + glyph.cluster);
        pen += advance;
    }

    // Leading edges from the logical prefix sums; mirrored for RTL.
    let width: f32 = advances.iter().sum();
    run.relative_cp_x.reserve(len + 1);
    let mut acc = 0_f32;
    if direction == Direction::Rtl {
        for advance in &advances {
            run.relative_cp_x.push(width - acc);
            acc += advance;
        }
        run.relative_cp_x.push(0.);
    } else {
        for advance in &advances {
            run.relative_cp_x.push(acc);
            acc += advance;
        }
        run.relative_cp_x.push(width);
    }
    run.width = width;
    run
}
