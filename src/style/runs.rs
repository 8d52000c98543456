// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered table of styled ranges over the codepoint buffer.

use core::ops::Range;
use std::sync::Arc;

use crate::error::LayoutError;
use crate::style::{Brush, TextStyle};

/// A half-open styled range of the codepoint buffer.
#[derive(Clone, Debug)]
pub struct StyleRun<B: Brush> {
    /// Covered range, in UTF-32 indices.
    pub range: Range<usize>,
    /// The sealed style for the range.
    pub style: Arc<TextStyle<B>>,
}

/// Ordered list of maximal styled ranges.
///
/// Invariants: runs are sorted by start, disjoint, and cover
/// `[0, buffer.len())` exactly. Violations are caller contract errors and
/// fail fast.
#[derive(Clone, Debug, Default)]
pub struct StyleRunTable<B: Brush> {
    runs: Vec<StyleRun<B>>,
}

impl<B: Brush> StyleRunTable<B> {
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Appends a run. The run must start where the previous one ended.
    pub fn push_run(
        &mut self,
        range: Range<usize>,
        style: Arc<TextStyle<B>>,
    ) -> Result<(), LayoutError> {
        let expected = self.covered_len();
        if range.start != expected || range.end < range.start {
            return Err(LayoutError::MalformedStyles {
                expected,
                found: range.start,
            });
        }
        if !range.is_empty() {
            self.runs.push(StyleRun { range, style });
        }
        Ok(())
    }

    /// End of the covered prefix.
    pub fn covered_len(&self) -> usize {
        self.runs.last().map(|run| run.range.end).unwrap_or(0)
    }

    /// Verifies exact coverage of `[0, text_len)`.
    pub fn validate(&self, text_len: usize) -> Result<(), LayoutError> {
        if self.covered_len() != text_len {
            return Err(LayoutError::MalformedStyles {
                expected: text_len,
                found: self.covered_len(),
            });
        }
        Ok(())
    }

    /// Returns the style covering the given codepoint.
    pub fn style_at(&self, index: usize) -> Option<&Arc<TextStyle<B>>> {
        self.run_index_at(index).map(|i| &self.runs[i].style)
    }

    /// Returns the index of the run covering the given codepoint.
    pub fn run_index_at(&self, index: usize) -> Option<usize> {
        self.runs
            .binary_search_by(|run| {
                if index < run.range.start {
                    core::cmp::Ordering::Greater
                } else if index >= run.range.end {
                    core::cmp::Ordering::Less
                } else {
                    core::cmp::Ordering::Equal
                }
            })
            .ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleRun<B>> + '_ {
        self.runs.iter()
    }

    pub fn get(&self, index: usize) -> Option<&StyleRun<B>> {
        self.runs.get(index)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }
}
