// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear split by interval sweep ("double sorting").
//!
//! For every axis, the entries are projected to intervals and two sweeps
//! enumerate the split lines worth considering: one walks candidate lower
//! bounds of the right group upwards, the other walks candidate upper bounds
//! of the left group downwards. Each line is scored by how much the two
//! groups would overlap along that axis, relative to the axis extent.
//!
//! Once a line is chosen, entries lying entirely on one side go to that side.
//! Entries that fit either side ("common" entries) are distributed last, in
//! ascending order of the difference between their left and right penalties,
//! so the most ambiguous entries are placed first. The minimum fill still
//! applies to them.
//!
//! An axis on which any entry has an undefined (NaN) interval is never swept.

use alloc::vec::Vec;

use super::{Group, Split, SplitConfig, Splitter, check_batch, finish, max_dim};
use crate::cube::Cube;
use crate::error::Result;
use crate::util;

/// Linear interval-sweep split.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearSplit;

impl Splitter for LinearSplit {
    fn split(&self, entries: &[Cube], config: &SplitConfig) -> Result<Split> {
        check_batch(entries, config)?;
        Ok(linear_split(entries, config))
    }
}

#[derive(Copy, Clone, Debug)]
struct Interval {
    lower: f64,
    upper: f64,
}

/// A split line: entries with `upper <= left_upper` may go left, entries with
/// `lower >= right_lower` may go right.
#[derive(Copy, Clone, Debug, PartialEq)]
struct SplitLine {
    axis: usize,
    overlap: f64,
    ratio: f64,
    range: f64,
    left_upper: f64,
    right_lower: f64,
}

struct Sweep {
    n: usize,
    limit_ratio: f64,
    best: Option<SplitLine>,
}

#[inline]
fn non_negative(v: f64) -> f64 {
    if v > 0.0 { v } else { 0.0 }
}

impl Sweep {
    /// Score the line `(right_lower, left_upper)` on `axis`, where between
    /// `min_left` and `max_left` entries would land on the left.
    fn consider(
        &mut self,
        axis: usize,
        range: f64,
        right_lower: f64,
        min_left: usize,
        left_upper: f64,
        max_left: usize,
    ) {
        let n = self.n;
        let left_count = if min_left >= n.div_ceil(2) {
            min_left
        } else if max_left <= n / 2 {
            max_left
        } else {
            n / 2
        };
        let right_count = n - left_count;
        let ratio = left_count.min(right_count) as f64 / n as f64;
        if ratio < self.limit_ratio {
            return;
        }

        let overlap = (left_upper - right_lower) / range;
        let better = match &self.best {
            None => true,
            Some(best) if best.axis == axis => {
                overlap < best.overlap || (overlap == best.overlap && ratio > best.ratio)
            }
            Some(best) => {
                non_negative(overlap) < non_negative(best.overlap)
                    || (range > best.range
                        && non_negative(overlap) <= non_negative(best.overlap))
            }
        };
        log::trace!(
            "axis {axis}: line [{right_lower}, {left_upper}] overlap {overlap} ratio {ratio}{}",
            if better { " (best)" } else { "" }
        );
        if better {
            self.best = Some(SplitLine {
                axis,
                overlap,
                ratio,
                range,
                left_upper,
                right_lower,
            });
        }
    }

    fn sweep_axis(&mut self, entries: &[Cube], axis: usize, range: f64) {
        let n = entries.len();
        let mut by_lower: Vec<Interval> = entries
            .iter()
            .map(|e| {
                let (lower, upper) = e.interval(axis);
                Interval { lower, upper }
            })
            .collect();
        if by_lower.iter().any(|iv| iv.lower.is_nan() || iv.upper.is_nan()) {
            log::trace!("axis {axis}: NaN interval, not swept");
            return;
        }
        let mut by_upper = by_lower.clone();
        by_lower.sort_by(|a, b| a.lower.total_cmp(&b.lower));
        by_upper.sort_by(|a, b| a.upper.total_cmp(&b.upper));

        // Ascending: each distinct lower bound starts a candidate right group.
        let mut i1 = 0;
        let mut i2 = 0;
        let mut right_lower = by_lower[0].lower;
        let mut left_upper = by_upper[0].lower;
        loop {
            while i1 < n && by_lower[i1].lower == right_lower {
                left_upper = left_upper.max(by_lower[i1].upper);
                i1 += 1;
            }
            if i1 >= n {
                break;
            }
            right_lower = by_lower[i1].lower;
            while i2 < n && by_upper[i2].upper <= left_upper {
                i2 += 1;
            }
            self.consider(axis, range, right_lower, i1, left_upper, i2);
        }

        // Descending: each distinct upper bound ends a candidate left group.
        // `c1`/`c2` count the entries still below the sweep position.
        let mut c1 = n;
        let mut c2 = n;
        let mut right_lower = by_lower[n - 1].lower;
        let mut left_upper = by_upper[n - 1].upper;
        loop {
            while c2 > 0 && by_upper[c2 - 1].upper == left_upper {
                right_lower = right_lower.min(by_upper[c2 - 1].lower);
                c2 -= 1;
            }
            if c2 == 0 {
                break;
            }
            left_upper = by_upper[c2 - 1].upper;
            while c1 > 0 && by_lower[c1 - 1].lower >= right_lower {
                c1 -= 1;
            }
            self.consider(axis, range, right_lower, c1, left_upper, c2);
        }
    }
}

fn linear_split(entries: &[Cube], config: &SplitConfig) -> Split {
    let n = entries.len();
    let bounds = entries[1..]
        .iter()
        .fold(entries[0].clone(), |acc, e| acc.union(e));

    let mut sweep = Sweep {
        n,
        limit_ratio: config.limit_ratio,
        best: None,
    };
    for axis in 0..max_dim(entries) {
        let range = bounds.upper(axis) - bounds.lower(axis);
        // Axes without extent (or with non-finite extent) cannot be split.
        if range.is_nan() || range <= 0.0 {
            continue;
        }
        sweep.sweep_axis(entries, axis, range);
    }

    match sweep.best {
        Some(line) => {
            log::debug!(
                "linear split on axis {} between {} and {} (overlap {}, ratio {})",
                line.axis,
                line.right_lower,
                line.left_upper,
                line.overlap,
                line.ratio
            );
            distribute(entries, &line, config)
        }
        None => {
            log::debug!("no admissible split line among {n} entries; splitting in half");
            halves(entries)
        }
    }
}

/// First half of the input (by position) left, the rest right.
fn halves(entries: &[Cube]) -> Split {
    let mid = entries.len() / 2;
    let mut left = Group::default();
    let mut right = Group::default();
    for (i, e) in entries.iter().enumerate() {
        if i < mid {
            left.push(i, e);
        } else {
            right.push(i, e);
        }
    }
    finish(left, right)
}

fn distribute(entries: &[Cube], line: &SplitLine, config: &SplitConfig) -> Split {
    let mut left = Group::default();
    let mut right = Group::default();
    let mut common = Vec::new();
    for (i, e) in entries.iter().enumerate() {
        let (lower, upper) = e.interval(line.axis);
        if upper <= line.left_upper {
            if lower >= line.right_lower {
                common.push(i);
            } else {
                left.push(i, e);
            }
        } else {
            debug_assert!(
                lower >= line.right_lower,
                "entry straddles the split line"
            );
            right.push(i, e);
        }
    }
    if common.is_empty() {
        return finish(left, right);
    }

    let mut ranked: Vec<(usize, f64)> = common
        .into_iter()
        .map(|i| {
            let e = &entries[i];
            (i, util::abs(left.penalty(e) - right.penalty(e)))
        })
        .collect();
    // Ascending delta, stable: equal deltas keep input order.
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let min_fill = config.min_fill(entries.len());
    let total = ranked.len();
    for (placed, &(i, _)) in ranked.iter().enumerate() {
        let e = &entries[i];
        let remaining = total - placed;
        if left.len() + remaining <= min_fill {
            left.push(i, e);
        } else if right.len() + remaining <= min_fill {
            right.push(i, e);
        } else if left.penalty(e) < right.penalty(e) {
            left.push(i, e);
        } else {
            right.push(i, e);
        }
    }
    finish(left, right)
}
