// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Reading-order reconstruction for scattered word layouts
//!
//! Words are ordered top-to-bottom, then left-to-right. Two words sit on the
//! same line when their vertical centers differ by no more than half of the
//! taller word's height. The tolerance is evaluated per pair, so the
//! resulting relation is not transitive; ordering is a heuristic, kept
//! deterministic by a stable merge sort that tolerates inconsistent answers.

use std::cmp::Ordering;

use super::types::{BoundingBox, WordToken};

/// Share of the taller word's height within which two centers count as one line
const LINE_TOLERANCE_RATIO: f64 = 0.5;

/// Word token with derived geometry
#[derive(Debug, Clone, Copy)]
pub struct PositionedWord<'a> {
    pub word: &'a WordToken,
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl<'a> PositionedWord<'a> {
    /// Derive geometry; a token without a box is placed at the origin
    pub fn new(word: &'a WordToken) -> Self {
        let bbox = word.bbox.unwrap_or_default();
        let BoundingBox { x0, y0, x1, y1 } = bbox;
        let (x0, y0, x1, y1) = (x0 as f64, y0 as f64, x1 as f64, y1 as f64);

        Self {
            word,
            center_x: x0 + (x1 - x0) / 2.0,
            center_y: y0 + (y1 - y0) / 2.0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    pub fn text(&self) -> &'a str {
        &self.word.text
    }
}

/// Pairwise reading-order comparison
pub fn compare_reading_order(a: &PositionedWord<'_>, b: &PositionedWord<'_>) -> Ordering {
    let tolerance = a.height.max(b.height) * LINE_TOLERANCE_RATIO;
    let dy = a.center_y - b.center_y;

    if dy.abs() > tolerance {
        return dy.partial_cmp(&0.0).unwrap_or(Ordering::Equal);
    }

    (a.center_x - b.center_x)
        .partial_cmp(&0.0)
        .unwrap_or(Ordering::Equal)
}

/// Order words for reading; the result is a permutation of the input
pub fn spatial_sort(words: &[WordToken]) -> Vec<PositionedWord<'_>> {
    let positioned: Vec<PositionedWord<'_>> = words.iter().map(PositionedWord::new).collect();
    merge_sort_by(positioned, compare_reading_order)
}

/// Reconstruct text in reading order
///
/// Blank tokens are dropped and the rest are joined with single spaces.
/// Returns an empty string for empty input; the caller falls back to the
/// engine's raw text.
pub fn reconstruct(words: &[WordToken]) -> String {
    if words.is_empty() {
        return String::new();
    }

    spatial_sort(words)
        .iter()
        .map(PositionedWord::text)
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stable top-down merge sort
///
/// Only asks `compare` whether the right element should go first, so any
/// answer sequence (including non-transitive ones) yields a permutation.
fn merge_sort_by<T, F>(mut items: Vec<T>, compare: F) -> Vec<T>
where
    T: Copy,
    F: Fn(&T, &T) -> Ordering + Copy,
{
    if items.len() <= 1 {
        return items;
    }

    let right = items.split_off(items.len() / 2);
    let left = merge_sort_by(items, compare);
    let right = merge_sort_by(right, compare);

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if compare(&right[j], &left[i]) == Ordering::Less {
            merged.push(right[j]);
            j += 1;
        } else {
            merged.push(left[i]);
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    merged
}
