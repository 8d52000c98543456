// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegated shaping and font matching interfaces.
//!
//! The engine treats shaping and font selection as pure functions behind
//! traits so deterministic implementations can be swapped in for tests.

pub(crate) mod builder;

use std::sync::Arc;

use crate::layout::Direction;
use crate::style::FontWeight;

/// Scaled ascent/descent/leading, as fractions of the em size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TypefaceMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub leading: f32,
}

#[derive(Debug)]
struct TypefaceInner {
    id: u64,
    family: String,
    metrics: TypefaceMetrics,
}

/// Reference-counted handle to a resolved typeface.
///
/// Handles are cheap to clone and thread-safe; equality is by identity.
#[derive(Clone, Debug)]
pub struct Typeface {
    inner: Arc<TypefaceInner>,
}

impl Typeface {
    pub fn new(id: u64, family: impl Into<String>, metrics: TypefaceMetrics) -> Self {
        Self {
            inner: Arc::new(TypefaceInner {
                id,
                family: family.into(),
                metrics,
            }),
        }
    }

    /// Last-resort face used when even the replacement character cannot be
    /// matched. Renders nothing but keeps layout total.
    pub(crate) fn null() -> Self {
        Self::new(
            0,
            "",
            TypefaceMetrics {
                ascent: 0.75,
                descent: 0.25,
                leading: 0.0,
            },
        )
    }

    pub fn id(&self) -> u64 {
        self.inner.id
    }

    pub fn family(&self) -> &str {
        &self.inner.family
    }

    pub fn metrics(&self) -> TypefaceMetrics {
        self.inner.metrics
    }
}

impl PartialEq for Typeface {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Typeface {}

/// Tight horizontal ink extents of a glyph, relative to its pen origin.
///
/// `x_min` may be negative and `x_max` may exceed the advance; the
/// difference against the advance box is the glyph's overhang.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InkBounds {
    pub x_min: f32,
    pub x_max: f32,
}

/// A single glyph produced by the shaper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    pub id: u32,
    /// Index into the shaped codepoint slice of the cluster this glyph
    /// renders.
    pub cluster: usize,
    pub x_offset: f32,
    pub y_offset: f32,
    pub advance: f32,
    pub ink: InkBounds,
}

/// Input to a single shaping call.
#[derive(Clone, Copy, Debug)]
pub struct ShapeRequest<'a> {
    pub codepoints: &'a [u32],
    pub typeface: &'a Typeface,
    pub font_size: f32,
    pub direction: Direction,
    pub weight: FontWeight,
    pub italic: bool,
}

/// The shaping engine.
///
/// Implementations must return glyphs in visual order with cluster values
/// indexing `request.codepoints`: non-decreasing for LTR requests,
/// non-increasing for RTL. Returning `None` signals a transient failure;
/// the engine substitutes the replacement character and retries.
pub trait Shaper {
    fn shape(&self, request: &ShapeRequest<'_>) -> Option<Vec<ShapedGlyph>>;
}

/// A font selection query.
#[derive(Clone, Copy, Debug)]
pub struct FontQuery<'a> {
    pub family: &'a str,
    pub weight: FontWeight,
    pub italic: bool,
}

/// The font matching and fallback registry.
///
/// Returning `None` signals the codepoint cannot be rendered in any
/// matching face; the engine substitutes the replacement character.
pub trait FontMatcher {
    fn match_font(&self, codepoint: u32, query: &FontQuery<'_>) -> Option<Typeface>;
}
