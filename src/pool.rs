// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recycling pool for font run allocations.

use crate::layout::run::FontRun;

/// Free list of [`FontRun`] values, reused across layout passes to
/// amortize the glyph and cluster vector allocations.
///
/// The pool belongs to a [`LayoutContext`](crate::LayoutContext) and is
/// never shared across threads. Checkout resets the run; release keeps the
/// vector capacities but drops any shaped contents.
#[derive(Debug, Default)]
pub struct RunPool {
    free: Vec<FontRun>,
}

impl RunPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a clean run from the pool, allocating if the pool is empty.
    pub fn checkout(&mut self) -> FontRun {
        match self.free.pop() {
            Some(mut run) => {
                run.reset();
                run
            }
            None => FontRun::default(),
        }
    }

    /// Returns a run to the pool.
    pub fn release(&mut self, mut run: FontRun) {
        run.reset();
        self.free.push(run);
    }

    /// Returns every run in `runs` to the pool.
    pub fn release_all(&mut self, runs: impl IntoIterator<Item = FontRun>) {
        for run in runs {
            self.release(run);
        }
    }

    #[cfg(test)]
    pub(crate) fn free_len(&self) -> usize {
        self.free.len()
    }
}
