// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types surfaced by layout and queries.

use thiserror::Error;

/// Errors raised by caller contract violations.
///
/// Transient shaping and font matching failures are not represented here;
/// they are handled internally by substituting the replacement character.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    /// A codepoint or line index was outside the valid range.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    /// The style runs do not cover the text exactly (a gap or overlap).
    #[error("malformed style coverage: expected run boundary at {expected}, found {found}")]
    MalformedStyles { expected: usize, found: usize },
}
