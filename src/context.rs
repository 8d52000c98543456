// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Context for layout.

use crate::analysis::{BidiAnalyzer, LineBreakAnalyzer};
use crate::pool::RunPool;
use crate::shape::{FontMatcher, Shaper};

/// The delegated functions a layout pass depends on.
///
/// Bundling them keeps the layout entry point small and lets tests swap in
/// deterministic implementations.
#[derive(Clone, Copy)]
pub struct Delegates<'a> {
    pub shaper: &'a dyn Shaper,
    pub fonts: &'a dyn FontMatcher,
    pub bidi: &'a dyn BidiAnalyzer,
    pub breaks: &'a dyn LineBreakAnalyzer,
}

/// Reusable scratch for constructing layouts.
///
/// Owns the font run pool so allocations are amortized across re-layouts.
/// A context is single-threaded; use one per thread (or per text block)
/// rather than sharing.
#[derive(Debug, Default)]
pub struct LayoutContext {
    pub(crate) pool: RunPool,
}

impl LayoutContext {
    pub fn new() -> Self {
        Self::default()
    }
}
