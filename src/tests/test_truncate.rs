// Copyright 2026 the Typeflow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use super::utils::{delegates, layout_str};
use crate::style::StyleBuilder;
use crate::{LayoutContext, LayoutParams, RunKind, TextBlock};

fn assert_close(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "{a} != {b}");
}

#[test]
fn ellipsis_on_max_lines() {
    // 200 words of five codepoints each: 1000 codepoints.
    let text = "word ".repeat(200);
    let params = LayoutParams {
        max_width: Some(100.0),
        max_lines: Some(2),
        ellipsize: true,
        ..Default::default()
    };
    let block = layout_str(&text, &params);

    assert_eq!(block.lines().len(), 2);
    assert!(block.overflowed());

    let last_line = &block.lines()[1];
    let last_run = block.runs_for_line(1).last().unwrap();
    assert_eq!(last_run.kind(), RunKind::Ellipsis);
    assert_eq!(last_run.len(), 1);
    assert_eq!(last_run.glyphs().len(), 1);
    assert_eq!(last_run.glyphs()[0].id, 0x2026);
    // The ellipsis borrows the terminal run's style.
    let terminal = block
        .runs_for_line(1)
        .filter(|r| r.kind() == RunKind::Normal)
        .last()
        .unwrap();
    assert_eq!(last_run.style_index(), terminal.style_index());
    assert!(last_line.metrics().width() <= 100.0 + 1e-3);
}

#[test]
fn ellipsis_removes_runs_until_it_fits() {
    let params = LayoutParams {
        max_width: Some(40.0),
        max_lines: Some(1),
        ellipsize: true,
        ..Default::default()
    };
    let block = layout_str("abcd efgh", &params);
    assert!(block.overflowed());
    let kinds: Vec<RunKind> = block.runs_for_line(0).map(|r| r.kind()).collect();
    assert_eq!(kinds, vec![RunKind::Normal, RunKind::Ellipsis]);
    assert_close(block.lines()[0].metrics().width(), 40.0);
}

#[test]
fn rtl_ellipsis_sits_at_the_visual_left() {
    let params = LayoutParams {
        max_width: Some(100.0),
        max_lines: Some(1),
        ellipsize: true,
        ..Default::default()
    };
    let block = layout_str("שלום עולם שלום עולם", &params);
    assert!(block.is_rtl());
    assert!(block.overflowed());
    let first = block.runs_for_line(0).next().unwrap();
    assert_eq!(first.kind(), RunKind::Ellipsis);
}

#[test]
fn rtl_ellipsis_takes_the_terminal_style() {
    let small = Arc::new(StyleBuilder::new().seal());
    let large = Arc::new(StyleBuilder::<()>::new().font_size(20.0).seal());
    let mut block = TextBlock::new();
    block.push_str("שלום ", small).unwrap();
    block.push_str("עולם עולם", large).unwrap();
    let mut ctx = LayoutContext::new();
    let params = LayoutParams {
        max_width: Some(100.0),
        max_lines: Some(1),
        ellipsize: true,
        ..Default::default()
    };
    block.layout(&mut ctx, &delegates(), &params).unwrap();
    assert!(block.is_rtl());
    assert!(block.overflowed());
    // The cut falls in the second style run, whose text reads out at the
    // visual left; the ellipsis borrows that run's style, not the style
    // of the visually-rightmost (logically-first) run.
    let first = block.runs_for_line(0).next().unwrap();
    assert_eq!(first.kind(), RunKind::Ellipsis);
    assert_eq!(first.style_index(), 1);
    // Shaped at the terminal run's 20pt size: half an em wide.
    assert_close(first.width(), 10.0);
}

#[test]
fn overflow_without_ellipsis_sets_flag_only() {
    let text = "word ".repeat(50);
    let params = LayoutParams {
        max_width: Some(100.0),
        max_lines: Some(2),
        ellipsize: false,
        ..Default::default()
    };
    let block = layout_str(&text, &params);
    assert_eq!(block.lines().len(), 2);
    assert!(block.overflowed());
    assert!(block
        .runs()
        .iter()
        .all(|run| run.kind() != RunKind::Ellipsis));
}

#[test]
fn max_height_drops_lines() {
    let params = LayoutParams {
        max_height: Some(20.0),
        ..Default::default()
    };
    let block = layout_str("a\nb\nc", &params);
    // Each line is 17.6 tall; only one fits in 20.
    assert_eq!(block.lines().len(), 1);
    assert!(block.overflowed());
}

#[test]
fn exact_fit_does_not_overflow() {
    let params = LayoutParams {
        max_width: Some(200.0),
        max_lines: Some(1),
        ellipsize: true,
        ..Default::default()
    };
    let block = layout_str("short text", &params);
    assert_eq!(block.lines().len(), 1);
    assert!(!block.overflowed());
    assert!(block
        .runs()
        .iter()
        .all(|run| run.kind() != RunKind::Ellipsis));
}
