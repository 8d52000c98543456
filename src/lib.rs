// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich text layout.
//!
//! Typeflow converts a styled, bidirectional character stream into a
//! geometric model of positioned glyphs suitable for painting and hit
//! testing. Shaping, font matching, bidi resolution and line-break
//! analysis are delegated through traits; the engine owns segmentation
//! into font runs, greedy line breaking, ellipsis truncation, trailing
//! whitespace handling and the UTF-16 ↔ UTF-32 offset maps.

mod block;
mod buffer;
mod context;
mod error;
mod pool;
mod util;

pub mod analysis;
pub mod layout;
pub mod shape;
pub mod style;

#[cfg(test)]
mod tests;

pub use analysis::{
    BaseDirection, BidiAnalyzer, BreakClass, LineBreakAnalyzer, ResolvedBidi, SimpleLineBreaker,
    UnicodeBidi,
};
pub use block::TextBlock;
pub use buffer::CodepointBuffer;
pub use context::{Delegates, LayoutContext};
pub use error::LayoutError;
pub use layout::{
    Affinity, Alignment, BreakReason, Caret, Direction, FontRun, Glyph, Hit, LayoutParams, Line,
    LineMetrics, Rect, RunKind, RunMetrics, Size,
};
pub use pool::RunPool;
pub use shape::{
    FontMatcher, FontQuery, InkBounds, ShapeRequest, ShapedGlyph, Shaper, Typeface,
    TypefaceMetrics,
};
pub use style::{
    Brush, DirectionOverride, FontVariant, FontWeight, StrikeKind, StrokeStyle, StyleBuilder,
    StyleRun, StyleRunTable, TextEffect, TextStyle, UnderlineKind,
};
