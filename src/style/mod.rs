// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rich styling support.

mod brush;
mod runs;

pub use brush::Brush;
pub use runs::{StyleRun, StyleRunTable};

use smallvec::SmallVec;

bitflags::bitflags! {
    /// Underline and overline decorations applied to a run of text.
    ///
    /// An empty set means no decoration. The IME variants are drawn by input
    /// methods to distinguish raw from converted composition text.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct UnderlineKind: u8 {
        const GAPPED = 1 << 0;
        const SOLID = 1 << 1;
        const OVERLINE = 1 << 2;
        const IME_RAW = 1 << 3;
        const IME_CONVERTED = 1 << 4;
    }
}

/// Strike-through decoration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrikeKind {
    #[default]
    None,
    Solid,
    Double,
}

/// Stroke pattern used for decoration lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    Wavy,
}

/// Vertical variant of the glyphs in a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FontVariant {
    #[default]
    Normal,
    Superscript,
    Subscript,
}

impl FontVariant {
    /// Scale applied to the font size for shaping and metrics.
    pub fn size_scale(self) -> f32 {
        match self {
            Self::Normal => 1.0,
            Self::Superscript | Self::Subscript => 0.65,
        }
    }

    /// Vertical glyph offset applied at paint time, relative to the baseline.
    pub fn baseline_offset(self, font_size: f32) -> f32 {
        match self {
            Self::Normal => 0.0,
            Self::Superscript => -0.35 * font_size,
            Self::Subscript => 0.10 * font_size,
        }
    }
}

/// Per-run directional override.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DirectionOverride {
    /// Defer to the resolved bidi levels and the block's base direction.
    #[default]
    Auto,
    Ltr,
    Rtl,
}

/// Weight of a font, on the usual 100-1000 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: Self = Self(400);
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// A drawn effect attached to the glyphs of a run, such as a shadow.
#[derive(Clone, Debug, PartialEq)]
pub struct TextEffect<B: Brush> {
    /// Offset of the effect from the glyph origin.
    pub offset: (f32, f32),
    /// Blur radius in layout units.
    pub blur_radius: f32,
    /// Brush used to draw the effect.
    pub brush: B,
}

/// Sealed, immutable style for a run of text.
///
/// Produced by [`StyleBuilder::seal`]; once sealed a style cannot be
/// mutated, only shared. Styles are freely shareable across threads.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle<B: Brush> {
    pub font_family: String,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub italic: bool,
    pub underline: UnderlineKind,
    pub strikethrough: StrikeKind,
    /// Line height as a multiplier over the font's natural height.
    pub line_height: f32,
    pub brush: B,
    pub background_brush: Option<B>,
    pub underline_brush: Option<B>,
    pub letter_spacing: f32,
    pub variant: FontVariant,
    pub direction: DirectionOverride,
    /// When set, every codepoint of the run is shaped as this scalar.
    pub replacement_char: Option<u32>,
    pub stroke_size: Option<f32>,
    pub underline_offset: Option<f32>,
    pub overline_offset: Option<f32>,
    pub strikethrough_offset: Option<f32>,
    pub stroke_style: StrokeStyle,
    /// Skip decoration lines over glyph ink.
    pub skip_ink: bool,
    pub effects: SmallVec<[TextEffect<B>; 2]>,
}

impl<B: Brush> Default for TextStyle<B> {
    fn default() -> Self {
        StyleBuilder::new().seal()
    }
}

impl<B: Brush> TextStyle<B> {
    /// Font size after the variant scale has been applied.
    pub(crate) fn scaled_font_size(&self) -> f32 {
        self.font_size * self.variant.size_scale()
    }
}

/// Mutable builder for a [`TextStyle`].
///
/// Sealing consumes the builder, so mutation of a sealed style is
/// unrepresentable rather than a runtime error.
#[derive(Clone, Debug)]
pub struct StyleBuilder<B: Brush> {
    style: TextStyle<B>,
}

impl<B: Brush> Default for StyleBuilder<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Brush> StyleBuilder<B> {
    pub fn new() -> Self {
        Self {
            style: TextStyle {
                font_family: String::from("sans-serif"),
                font_size: 16.0,
                font_weight: FontWeight::default(),
                italic: false,
                underline: UnderlineKind::empty(),
                strikethrough: StrikeKind::None,
                line_height: 1.0,
                brush: B::default(),
                background_brush: None,
                underline_brush: None,
                letter_spacing: 0.0,
                variant: FontVariant::Normal,
                direction: DirectionOverride::Auto,
                replacement_char: None,
                stroke_size: None,
                underline_offset: None,
                overline_offset: None,
                strikethrough_offset: None,
                stroke_style: StrokeStyle::Solid,
                skip_ink: false,
                effects: SmallVec::new(),
            },
        }
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.style.font_family = family.into();
        self
    }

    pub fn font_size(mut self, size: f32) -> Self {
        self.style.font_size = size;
        self
    }

    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.style.font_weight = weight;
        self
    }

    pub fn italic(mut self, italic: bool) -> Self {
        self.style.italic = italic;
        self
    }

    pub fn underline(mut self, kind: UnderlineKind) -> Self {
        self.style.underline = kind;
        self
    }

    pub fn strikethrough(mut self, kind: StrikeKind) -> Self {
        self.style.strikethrough = kind;
        self
    }

    pub fn line_height(mut self, multiplier: f32) -> Self {
        self.style.line_height = multiplier;
        self
    }

    pub fn brush(mut self, brush: B) -> Self {
        self.style.brush = brush;
        self
    }

    pub fn background_brush(mut self, brush: B) -> Self {
        self.style.background_brush = Some(brush);
        self
    }

    pub fn underline_brush(mut self, brush: B) -> Self {
        self.style.underline_brush = Some(brush);
        self
    }

    pub fn letter_spacing(mut self, spacing: f32) -> Self {
        self.style.letter_spacing = spacing;
        self
    }

    pub fn variant(mut self, variant: FontVariant) -> Self {
        self.style.variant = variant;
        self
    }

    pub fn direction(mut self, direction: DirectionOverride) -> Self {
        self.style.direction = direction;
        self
    }

    pub fn replacement_char(mut self, scalar: u32) -> Self {
        self.style.replacement_char = Some(scalar);
        self
    }

    pub fn stroke_size(mut self, size: f32) -> Self {
        self.style.stroke_size = Some(size);
        self
    }

    pub fn underline_offset(mut self, offset: f32) -> Self {
        self.style.underline_offset = Some(offset);
        self
    }

    pub fn overline_offset(mut self, offset: f32) -> Self {
        self.style.overline_offset = Some(offset);
        self
    }

    pub fn strikethrough_offset(mut self, offset: f32) -> Self {
        self.style.strikethrough_offset = Some(offset);
        self
    }

    pub fn stroke_style(mut self, stroke: StrokeStyle) -> Self {
        self.style.stroke_style = stroke;
        self
    }

    pub fn skip_ink(mut self, skip: bool) -> Self {
        self.style.skip_ink = skip;
        self
    }

    pub fn effect(mut self, effect: TextEffect<B>) -> Self {
        self.style.effects.push(effect);
        self
    }

    /// Seals the style, consuming the builder.
    pub fn seal(self) -> TextStyle<B> {
        self.style
    }
}
