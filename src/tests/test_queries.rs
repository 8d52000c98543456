// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::utils::layout_str;
use crate::{Affinity, LayoutError, LayoutParams, TextBlock};

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "{a} != {b}");
}

fn wrapped() -> TextBlock<()> {
    layout_str(
        "hello world foo",
        &LayoutParams {
            max_width: Some(100.0),
            ..Default::default()
        },
    )
}

#[test]
fn hit_test_halves_give_affinity() {
    let block = wrapped();
    let hit = block.hit_test(3.0, 5.0).unwrap();
    assert_eq!((hit.line_index, hit.cp_index, hit.affinity), (0, 0, Affinity::Leading));
    let hit = block.hit_test(5.0, 5.0).unwrap();
    assert_eq!((hit.line_index, hit.cp_index, hit.affinity), (0, 0, Affinity::Trailing));
    let hit = block.hit_test(9.0, 5.0).unwrap();
    assert_eq!((hit.line_index, hit.cp_index), (0, 1));
}

#[test]
fn hit_test_selects_line_by_y() {
    let block = wrapped();
    let line_height = block.lines()[0].metrics().height;
    let hit = block.hit_test(1.0, line_height + 1.0).unwrap();
    assert_eq!(hit.line_index, 1);
    assert_eq!(hit.cp_index, 12);
    // Below the last line clamps to it.
    let hit = block.hit_test(1.0, line_height * 10.0).unwrap();
    assert_eq!(hit.line_index, 1);
}

#[test]
fn hit_test_clamps_outside_edges() {
    let block = wrapped();
    let hit = block.hit_test(-5.0, 5.0).unwrap();
    assert_eq!((hit.cp_index, hit.affinity), (0, Affinity::Leading));
    let hit = block.hit_test(500.0, 5.0).unwrap();
    // The trailing space is the last hittable codepoint of line 0.
    assert_eq!((hit.cp_index, hit.affinity), (11, Affinity::Trailing));
}

#[test]
fn hit_test_rtl_run_mirrors_affinity() {
    let block = layout_str("abc אבג def", &LayoutParams::default());
    // x = 33 lands in the Hebrew run's visually-leftmost codepoint, which
    // is the logically-last one.
    let hit = block.hit_test(33.0, 5.0).unwrap();
    assert_eq!(hit.cp_index, 6);
    assert_eq!(hit.affinity, Affinity::Trailing);
    // Near that codepoint's right edge, the caret leads it.
    let hit = block.hit_test(39.0, 5.0).unwrap();
    assert_eq!((hit.cp_index, hit.affinity), (6, Affinity::Leading));
}

#[test]
fn caret_positions_at_leading_edges() {
    let block = wrapped();
    assert_close(block.caret_info(0).unwrap().x, 0.0);
    assert_close(block.caret_info(5).unwrap().x, 40.0);
    // First codepoint of the wrapped line.
    let caret = block.caret_info(12).unwrap();
    assert_close(caret.x, 0.0);
    assert_close(caret.top, block.lines()[0].metrics().height);
    // End-of-text caret sits after the last codepoint.
    let caret = block.caret_info(15).unwrap();
    assert_close(caret.x, 24.0);
}

#[test]
fn caret_at_bidi_boundary_has_two_positions() {
    let block = layout_str("abc אבג def", &LayoutParams::default());
    // The caret before the space (logical index 3) and the caret before
    // the first Hebrew letter (logical index 4) are far apart visually.
    assert_close(block.caret_info(3).unwrap().x, 24.0);
    assert_close(block.caret_info(4).unwrap().x, 56.0);
}

#[test]
fn caret_rejects_out_of_range() {
    let block = wrapped();
    assert_eq!(
        block.caret_info(99),
        Err(LayoutError::IndexOutOfBounds { index: 99, len: 15 })
    );
}

#[test]
fn selection_rects_cover_fragments() {
    let block = wrapped();
    let rects = block.selection_rects(3..13).unwrap();
    assert_eq!(rects.len(), 3);
    assert_close(rects[0].x0, 24.0);
    assert_close(rects[0].x1, 88.0);
    // The trailing space fragment.
    assert_close(rects[1].x0, 88.0);
    assert_close(rects[1].x1, 96.0);
    // One codepoint on line 1.
    assert_close(rects[2].x0, 0.0);
    assert_close(rects[2].x1, 8.0);
    assert_close(rects[2].y0, block.lines()[0].metrics().height);

    assert!(block.selection_rects(5..5).unwrap().is_empty());
    assert!(block.selection_rects(0..99).is_err());
}

#[test]
fn measured_size_reports_constraints_and_content() {
    let block = wrapped();
    let size = block.measured_size();
    assert_close(size.width, 100.0);
    assert_close(size.measured_width, 88.0);
    assert_close(size.measured_height, size.height);
    assert_close(size.height, 2.0 * block.lines()[0].metrics().height);
}

#[test]
fn empty_block_queries() {
    let block = layout_str("", &LayoutParams::default());
    assert!(block.hit_test(10.0, 10.0).is_none());
    assert_close(block.caret_info(0).unwrap().x, 0.0);
    assert!(block.selection_rects(0..0).unwrap().is_empty());
}
