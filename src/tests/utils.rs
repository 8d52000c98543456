// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic shaping and font matching for tests.

use std::sync::Arc;

use crate::analysis::{is_zero_width, SimpleLineBreaker, UnicodeBidi};
use crate::shape::{
    FontMatcher, FontQuery, InkBounds, ShapeRequest, ShapedGlyph, Shaper, Typeface,
    TypefaceMetrics,
};
use crate::style::{StyleBuilder, TextStyle};
use crate::{Delegates, Direction, LayoutContext, LayoutParams, TextBlock};

pub(crate) const FACE_LATIN: u64 = 1;
pub(crate) const FACE_RTL: u64 = 2;
pub(crate) const FACE_WIDE: u64 = 3;

fn metrics() -> TypefaceMetrics {
    TypefaceMetrics {
        ascent: 0.8,
        descent: 0.2,
        leading: 0.1,
    }
}

fn face(id: u64) -> Typeface {
    let family = match id {
        FACE_RTL => "test-rtl",
        FACE_WIDE => "test-wide",
        _ => "test-sans",
    };
    Typeface::new(id, family, metrics())
}

fn is_wide(cp: u32) -> bool {
    matches!(cp, 0x3000..=0x9FFF | 0x1F000..=0x1FAFF | 0x2600..=0x27BF)
}

fn is_rtl_script(cp: u32) -> bool {
    matches!(cp, 0x0590..=0x08FF | 0xFB1D..=0xFDFF | 0xFE70..=0xFEFF)
}

/// Advance of one codepoint: half an em for narrow scripts, a full em for
/// wide scripts, zero for zero-width codepoints.
pub(crate) fn advance_for(cp: u32, font_size: f32) -> f32 {
    if is_zero_width(cp) {
        0.
    } else if is_wide(cp) {
        font_size
    } else {
        font_size * 0.5
    }
}

/// Shaper with fixed per-codepoint advances and identity clusters.
///
/// Glyphs come back in visual order; italic requests get ink that leans a
/// tenth of an em past the advance box.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FixedShaper {
    pub(crate) fail: bool,
}

impl Shaper for FixedShaper {
    fn shape(&self, request: &ShapeRequest<'_>) -> Option<Vec<ShapedGlyph>> {
        if self.fail {
            return None;
        }
        let n = request.codepoints.len();
        let mut glyphs = Vec::with_capacity(n);
        let indices: Vec<usize> = if request.direction == Direction::Rtl {
            (0..n).rev().collect()
        } else {
            (0..n).collect()
        };
        for i in indices {
            let cp = request.codepoints[i];
            let advance = advance_for(cp, request.font_size);
            let lean = if request.italic && advance > 0. {
                request.font_size * 0.1
            } else {
                0.
            };
            glyphs.push(ShapedGlyph {
                id: cp,
                cluster: i,
                x_offset: 0.,
                y_offset: 0.,
                advance,
                ink: InkBounds {
                    x_min: 0.,
                    x_max: advance + lean,
                },
            });
        }
        Some(glyphs)
    }
}

/// Script-table matcher: Latin, an RTL face, and a wide face for CJK and
/// emoji. `fail_on` simulates an unmatchable codepoint.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TableMatcher {
    pub(crate) fail_on: Option<u32>,
}

impl FontMatcher for TableMatcher {
    fn match_font(&self, codepoint: u32, _query: &FontQuery<'_>) -> Option<Typeface> {
        if self.fail_on == Some(codepoint) {
            return None;
        }
        let id = if is_rtl_script(codepoint) {
            FACE_RTL
        } else if is_wide(codepoint) {
            FACE_WIDE
        } else {
            FACE_LATIN
        };
        Some(face(id))
    }
}

pub(crate) static SHAPER: FixedShaper = FixedShaper { fail: false };
pub(crate) static MATCHER: TableMatcher = TableMatcher { fail_on: None };
pub(crate) static BIDI: UnicodeBidi = UnicodeBidi;
pub(crate) static BREAKS: SimpleLineBreaker = SimpleLineBreaker;

pub(crate) fn delegates() -> Delegates<'static> {
    Delegates {
        shaper: &SHAPER,
        fonts: &MATCHER,
        bidi: &BIDI,
        breaks: &BREAKS,
    }
}

pub(crate) fn default_style() -> Arc<TextStyle<()>> {
    Arc::new(StyleBuilder::new().seal())
}

/// Builds and lays out a single-style block.
pub(crate) fn layout_str(text: &str, params: &LayoutParams) -> TextBlock<()> {
    layout_styled(text, &default_style(), params)
}

pub(crate) fn layout_styled(
    text: &str,
    style: &Arc<TextStyle<()>>,
    params: &LayoutParams,
) -> TextBlock<()> {
    let mut block = TextBlock::new();
    block.push_str(text, style.clone()).unwrap();
    let mut ctx = LayoutContext::new();
    block.layout(&mut ctx, &delegates(), params).unwrap();
    block
}
