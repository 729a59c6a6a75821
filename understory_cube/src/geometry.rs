// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometric predicates and combinators over [`Cube`]s.
//!
//! Every binary operation accepts operands of different dimensionality. The
//! narrower operand is treated as if its missing trailing axes were the
//! degenerate interval `[0, 0]`.

use core::cmp::Ordering;

use crate::cube::{CUBE_MAX_DIM, Cube};
use crate::util;

impl Cube {
    /// Smallest cube enclosing both operands.
    ///
    /// The result has the larger of the two dimensionalities and is in point
    /// form when every axis has zero width.
    pub fn union(&self, other: &Self) -> Self {
        let dim = self.dim().max(other.dim());
        Self::from_pairs((0..dim).map(|i| {
            (
                self.lower(i).min(other.lower(i)),
                self.upper(i).max(other.upper(i)),
            )
        }))
    }

    /// Per-axis intersection of the two operands.
    ///
    /// Disjoint operands do not produce an error or an "empty" marker: every
    /// axis on which the intervals do not meet collapses to `[0, 0]`. Use
    /// [`Cube::overlaps`] to tell a real intersection from that placeholder.
    pub fn intersection(&self, other: &Self) -> Self {
        let dim = self.dim().max(other.dim());
        Self::from_pairs((0..dim).map(|i| {
            let lo = self.lower(i).max(other.lower(i));
            let hi = self.upper(i).min(other.upper(i));
            if lo > hi { (0.0, 0.0) } else { (lo, hi) }
        }))
    }

    /// Whether the two cubes share at least one point (touching counts).
    pub fn overlaps(&self, other: &Self) -> bool {
        let dim = self.dim().max(other.dim());
        (0..dim).all(|i| self.lower(i) <= other.upper(i) && self.upper(i) >= other.lower(i))
    }

    /// Whether `self` contains `other`.
    ///
    /// Axes of `other` beyond `self.dim()` must be exactly zero on both bounds.
    /// Axes of `self` beyond `other.dim()` are not consulted.
    pub fn contains(&self, other: &Self) -> bool {
        if (self.dim()..other.dim()).any(|i| other.ll(i) != 0.0 || other.ur(i) != 0.0) {
            return false;
        }
        let dim = self.dim().min(other.dim());
        (0..dim).all(|i| self.lower(i) <= other.lower(i) && self.upper(i) >= other.upper(i))
    }

    /// Whether `self` is contained by `other`.
    #[inline]
    pub fn contained_by(&self, other: &Self) -> bool {
        other.contains(self)
    }

    /// Volume: the product of the axis extents. A zero-dimensional cube has volume 1.
    pub fn size(&self) -> f64 {
        (0..self.dim()).fold(1.0, |acc, i| acc * util::abs(self.ur(i) - self.ll(i)))
    }

    /// Euclidean distance between the closest points of the two cubes.
    pub fn distance(&self, other: &Self) -> f64 {
        let dim = self.dim().max(other.dim());
        let sum = (0..dim).fold(0.0, |acc, i| {
            let d = distance_1d(self.lower(i), self.upper(i), other.lower(i), other.upper(i));
            acc + d * d
        });
        util::sqrt(sum)
    }

    /// Grow the cube by `r` on every side (shrink if `r` is negative), in at least `n` dimensions.
    ///
    /// When `r > 0` and `n` exceeds the current dimensionality, new axes
    /// spanning `[-r, r]` are appended; `n` is clamped to [`CUBE_MAX_DIM`].
    /// An axis that would invert while shrinking collapses to its midpoint.
    pub fn enlarge(&self, r: f64, n: i64) -> Self {
        let n = usize::try_from(n.max(0)).unwrap_or(CUBE_MAX_DIM).min(CUBE_MAX_DIM);
        let mut dim = if r > 0.0 { n } else { 0 };
        dim = dim.max(self.dim());
        Self::from_pairs((0..dim).map(|i| {
            if i >= self.dim() {
                return (-r, r);
            }
            let (lo, hi) = self.interval(i);
            let (lo, hi) = (lo - r, hi + r);
            if lo > hi {
                let mid = (lo + hi) / 2.0;
                (mid, mid)
            } else {
                (lo, hi)
            }
        }))
    }

    /// Volume increase caused by adding `candidate` to this group's bounding box.
    #[inline]
    pub fn penalty(&self, candidate: &Self) -> f64 {
        penalty(self, candidate)
    }
}

/// Volume of an optional cube; a missing cube has volume zero.
pub fn size_opt(cube: Option<&Cube>) -> f64 {
    cube.map_or(0.0, Cube::size)
}

/// `size(union(group, candidate)) - size(group)`.
pub fn penalty(group: &Cube, candidate: &Cube) -> f64 {
    group.union(candidate).size() - group.size()
}

/// Gap between two 1-D intervals given by unordered endpoints; zero if they overlap.
pub fn distance_1d(a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    // (a) entirely on the left of (b)
    if a1 <= b1 && a2 <= b1 && a1 <= b2 && a2 <= b2 {
        return b1.min(b2) - a1.max(a2);
    }
    // (a) entirely on the right of (b)
    if a1 > b1 && a2 > b1 && a1 > b2 && a2 > b2 {
        return a1.min(a2) - b1.max(b2);
    }
    0.0
}

#[inline]
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.total_cmp(&b))
}

fn cmp_cubes(a: &Cube, b: &Cube) -> Ordering {
    let dim = a.dim().min(b.dim());
    for i in 0..dim {
        match cmp_f64(a.lower(i), b.lower(i)) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    for i in 0..dim {
        match cmp_f64(a.upper(i), b.upper(i)) {
            Ordering::Equal => {}
            ord => return ord,
        }
    }
    // Extra axes of the wider cube are compared against zero.
    let (wide, flip) = match a.dim().cmp(&b.dim()) {
        Ordering::Equal => return Ordering::Equal,
        Ordering::Greater => (a, false),
        Ordering::Less => (b, true),
    };
    let extra = || dim..wide.dim();
    let ord = extra()
        .map(|i| cmp_f64(wide.lower(i), 0.0))
        .chain(extra().map(|i| cmp_f64(wide.upper(i), 0.0)))
        .find(|o| *o != Ordering::Equal)
        // Tied on everything: the cube with more dimensions is greater.
        .unwrap_or(Ordering::Greater);
    if flip { ord.reverse() } else { ord }
}

impl Ord for Cube {
    /// Lexicographic order over normalized lower bounds, then upper bounds, of
    /// the common axes; then the wider cube's extra axes against zero; then
    /// dimensionality.
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_cubes(self, other)
    }
}

impl PartialOrd for Cube {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Cube {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cube {}
