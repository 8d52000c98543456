// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegated bidi and line-break analysis.

use unicode_bidi::{BidiInfo, Level};

/// Base paragraph direction for bidi resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BaseDirection {
    /// Detect from the first strong character.
    #[default]
    Auto,
    Ltr,
    Rtl,
}

/// Per-codepoint embedding levels plus the resolved paragraph level.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedBidi {
    /// Paragraph embedding level; odd means RTL.
    pub base_level: u8,
    /// One UAX #9 level per codepoint.
    pub levels: Vec<u8>,
}

/// The bidirectional algorithm, UAX #9.
pub trait BidiAnalyzer {
    fn resolve(&self, codepoints: &[u32], base: BaseDirection) -> ResolvedBidi;
}

/// Default analyzer backed by the `unicode-bidi` crate.
///
/// Scalars that are not valid `char`s (lone surrogates) are analyzed as
/// U+FFFD; the buffer itself is unaffected.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnicodeBidi;

impl BidiAnalyzer for UnicodeBidi {
    fn resolve(&self, codepoints: &[u32], base: BaseDirection) -> ResolvedBidi {
        let default_level = match base {
            BaseDirection::Auto => None,
            BaseDirection::Ltr => Some(Level::ltr()),
            BaseDirection::Rtl => Some(Level::rtl()),
        };
        let text: String = codepoints
            .iter()
            .map(|&cp| char::from_u32(cp).unwrap_or('\u{FFFD}'))
            .collect();
        let info = BidiInfo::new(&text, default_level);
        let base_level = info
            .paragraphs
            .first()
            .map(|para| para.level.number())
            .unwrap_or_else(|| default_level.unwrap_or(Level::ltr()).number());
        let mut levels = Vec::with_capacity(codepoints.len());
        for (byte_index, _) in text.char_indices() {
            levels.push(info.levels[byte_index].number());
        }
        ResolvedBidi { base_level, levels }
    }
}

/// Whether a line may or must break after a codepoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BreakClass {
    #[default]
    None,
    /// A permissible break opportunity after this codepoint.
    Allowed,
    /// A hard line break after this codepoint.
    Mandatory,
}

/// Line-break opportunity analysis, UAX #14.
///
/// Implementations return one class per codepoint describing whether the
/// line may break after it.
pub trait LineBreakAnalyzer {
    fn classes(&self, codepoints: &[u32]) -> Vec<BreakClass>;
}

/// Default analyzer covering the common classes: mandatory after LF,
/// allowed after spacing whitespace and between CJK ideographs.
///
/// This is not a full UAX #14 implementation; embedders with stricter
/// requirements provide their own [`LineBreakAnalyzer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SimpleLineBreaker;

impl SimpleLineBreaker {
    fn is_cjk(cp: u32) -> bool {
        matches!(cp, 0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0xF900..=0xFAFF | 0x3040..=0x30FF)
    }
}

impl LineBreakAnalyzer for SimpleLineBreaker {
    fn classes(&self, codepoints: &[u32]) -> Vec<BreakClass> {
        let mut classes = Vec::with_capacity(codepoints.len());
        for (i, &cp) in codepoints.iter().enumerate() {
            let class = match cp {
                0x0A => BreakClass::Mandatory,
                // A lone CR is preserved in the buffer but still ends a line.
                0x0D => BreakClass::Mandatory,
                0x20 | 0x09 | 0x3000 => BreakClass::Allowed,
                0x2D if i + 1 < codepoints.len() => BreakClass::Allowed,
                _ if Self::is_cjk(cp) && codepoints.get(i + 1).copied().is_some_and(Self::is_cjk) => {
                    BreakClass::Allowed
                }
                _ => BreakClass::None,
            };
            classes.push(class);
        }
        classes
    }
}

/// Returns `true` for codepoints that attach to the preceding base cluster
/// and must never be segmented away from it: combining marks, joiners and
/// variation selectors.
pub(crate) fn joins_previous(cp: u32) -> bool {
    matches!(
        cp,
        0x0300..=0x036F          // combining diacritical marks
            | 0x0591..=0x05BD    // hebrew points
            | 0x0610..=0x061A    // arabic marks
            | 0x064B..=0x065F
            | 0x0670
            | 0x06D6..=0x06DC
            | 0x0900..=0x0903    // devanagari signs
            | 0x093A..=0x094F
            | 0x0951..=0x0957
            | 0x0962..=0x0963
            | 0x1AB0..=0x1AFF
            | 0x1DC0..=0x1DFF
            | 0x200C             // zero width non-joiner
            | 0x200D             // zero width joiner
            | 0x20D0..=0x20FF
            | 0xFE00..=0xFE0F    // variation selectors
            | 0xFE20..=0xFE2F
            | 0xE0100..=0xE01EF
    )
}

/// Zero-advance codepoints that occupy no horizontal space of their own.
pub(crate) fn is_zero_width(cp: u32) -> bool {
    matches!(cp, 0x200B..=0x200F | 0x2060 | 0xFEFF) || joins_previous(cp)
}

/// Common-script codepoints (whitespace, punctuation, digits) that take on
/// the typeface already in use rather than forcing a font change.
pub(crate) fn inherits_font(cp: u32) -> bool {
    matches!(
        cp,
        0x09 | 0x0A | 0x0D | 0x20..=0x40 | 0x5B..=0x60 | 0x7B..=0x7E | 0xA0 | 0x2000..=0x206F
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_rtl_paragraph() {
        let cps: Vec<u32> = "שלום".chars().map(|c| c as u32).collect();
        let resolved = UnicodeBidi.resolve(&cps, BaseDirection::Auto);
        assert_eq!(resolved.base_level, 1);
        assert_eq!(resolved.levels.len(), cps.len());
        assert!(resolved.levels.iter().all(|&level| level & 1 == 1));
    }

    #[test]
    fn mixed_direction_levels() {
        let cps: Vec<u32> = "abc אבג def".chars().map(|c| c as u32).collect();
        let resolved = UnicodeBidi.resolve(&cps, BaseDirection::Auto);
        assert_eq!(resolved.base_level, 0);
        assert_eq!(resolved.levels[0] & 1, 0);
        assert_eq!(resolved.levels[4] & 1, 1);
        assert_eq!(resolved.levels[10] & 1, 0);
    }

    #[test]
    fn break_classes() {
        let cps: Vec<u32> = "a b\nc".chars().map(|c| c as u32).collect();
        let classes = SimpleLineBreaker.classes(&cps);
        assert_eq!(
            classes,
            vec![
                BreakClass::None,
                BreakClass::Allowed,
                BreakClass::None,
                BreakClass::Mandatory,
                BreakClass::None,
            ]
        );
    }
}
