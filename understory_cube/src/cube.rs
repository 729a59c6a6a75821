// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The variable-dimension [`Cube`] value and its constructors and accessors.

use smallvec::SmallVec;

use crate::error::{CubeError, Result};

/// Maximum number of dimensions a cube may have.
pub const CUBE_MAX_DIM: usize = 100;

/// Inline capacity of the coordinate buffer; covers 2D boxes and 4D points without allocating.
pub(crate) const INLINE_COORDS: usize = 4;

pub(crate) type Coords = SmallVec<[f64; INLINE_COORDS]>;

/// An axis-aligned box in up to [`CUBE_MAX_DIM`] dimensions, or a point.
///
/// A range cube stores `2 * dim` values: all lower-left values followed by all
/// upper-right values. A point cube stores `dim` values. Stored pairs are not
/// required to be ordered; use [`Cube::lower`]/[`Cube::upper`] for normalized bounds.
///
/// Cubes of different dimensionality may be combined freely: missing trailing
/// axes behave as the degenerate interval `[0, 0]`.
///
/// Equality and ordering follow the geometric total order described on
/// [`Cube::cmp`](Ord::cmp), so a point and a degenerate range over the same
/// coordinates compare equal.
#[derive(Clone, Debug)]
pub struct Cube {
    dim: usize,
    point: bool,
    coords: Coords,
}

impl Cube {
    /// Assemble a cube from a final-size buffer. `coords.len()` must match `dim` and `point`.
    pub(crate) fn from_parts(dim: usize, point: bool, coords: Coords) -> Self {
        debug_assert!(dim <= CUBE_MAX_DIM, "cube dimension exceeds maximum");
        debug_assert_eq!(
            coords.len(),
            if point { dim } else { 2 * dim },
            "coordinate buffer does not match layout"
        );
        Self { dim, point, coords }
    }

    /// Build a range cube from normalized-or-not corner values, collapsing to a
    /// point when every axis has zero width.
    pub(crate) fn from_pairs(pairs: impl ExactSizeIterator<Item = (f64, f64)>) -> Self {
        let dim = pairs.len();
        let mut ll = Coords::with_capacity(2 * dim);
        let mut ur = Coords::with_capacity(dim);
        let mut point = true;
        for (lo, hi) in pairs {
            if lo != hi {
                point = false;
            }
            ll.push(lo);
            ur.push(hi);
        }
        if !point {
            ll.extend_from_slice(&ur);
        }
        Self::from_parts(dim, point, ll)
    }

    fn check_dim(dim: usize) -> Result<()> {
        if dim > CUBE_MAX_DIM {
            return Err(CubeError::TooManyDimensions {
                dim,
                max: CUBE_MAX_DIM,
            });
        }
        Ok(())
    }

    /// The zero-dimensional cube.
    pub fn empty() -> Self {
        Self::from_parts(0, true, Coords::new())
    }

    /// A point cube with the given coordinates.
    pub fn point(coords: &[f64]) -> Result<Self> {
        Self::check_dim(coords.len())?;
        Ok(Self::from_parts(
            coords.len(),
            true,
            Coords::from_slice(coords),
        ))
    }

    /// A cube from lower-left and upper-right corner arrays.
    ///
    /// The arrays need not be ordered per axis. If every pair is equal the
    /// result is in point form.
    pub fn from_corners(ll: &[f64], ur: &[f64]) -> Result<Self> {
        if ll.len() != ur.len() {
            return Err(CubeError::LengthMismatch {
                ll: ll.len(),
                ur: ur.len(),
            });
        }
        Self::check_dim(ll.len())?;
        Ok(Self::from_pairs(ll.iter().copied().zip(ur.iter().copied())))
    }

    /// A point cube from a nullable array; any `None` is rejected.
    pub fn from_array_opt(coords: &[Option<f64>]) -> Result<Self> {
        let values = collect_non_null(coords)?;
        Self::point(&values)
    }

    /// A cube from nullable corner arrays; any `None` is rejected.
    pub fn from_corners_opt(ll: &[Option<f64>], ur: &[Option<f64>]) -> Result<Self> {
        let ll = collect_non_null(ll)?;
        let ur = collect_non_null(ur)?;
        Self::from_corners(&ll, &ur)
    }

    /// A one-dimensional point.
    pub fn from_value(x: f64) -> Self {
        Self::from_parts(1, true, Coords::from_slice(&[x]))
    }

    /// A one-dimensional interval; collapses to a point when `x0 == x1`.
    pub fn from_range(x0: f64, x1: f64) -> Self {
        Self::from_pairs(core::iter::once((x0, x1)))
    }

    /// Number of dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Whether the cube is stored in point form.
    #[inline]
    pub fn is_point(&self) -> bool {
        self.point
    }

    /// Raw stored coordinates: `dim` values for a point, `2 * dim` otherwise.
    #[inline]
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Raw lower-left value on 0-based axis `i`, in stored order. Panics if `i >= dim`.
    #[inline]
    pub fn ll(&self, i: usize) -> f64 {
        self.coords[i]
    }

    /// Raw upper-right value on 0-based axis `i`, in stored order. Panics if `i >= dim`.
    #[inline]
    pub fn ur(&self, i: usize) -> f64 {
        if self.point {
            self.coords[i]
        } else {
            self.coords[i + self.dim]
        }
    }

    /// Normalized lower bound on 0-based axis `i`; zero beyond `dim`.
    #[inline]
    pub fn lower(&self, i: usize) -> f64 {
        if i < self.dim {
            self.ll(i).min(self.ur(i))
        } else {
            0.0
        }
    }

    /// Normalized upper bound on 0-based axis `i`; zero beyond `dim`.
    #[inline]
    pub fn upper(&self, i: usize) -> f64 {
        if i < self.dim {
            self.ll(i).max(self.ur(i))
        } else {
            0.0
        }
    }

    /// Normalized `(lower, upper)` interval on 0-based axis `i`.
    #[inline]
    pub fn interval(&self, i: usize) -> (f64, f64) {
        (self.lower(i), self.upper(i))
    }

    /// Normalized lower bound on 1-based axis `n`, or zero when `n` is outside `[1, dim]`.
    pub fn ll_coord(&self, n: i64) -> f64 {
        match axis_from_one_based(n, self.dim) {
            Some(i) => self.lower(i),
            None => 0.0,
        }
    }

    /// Normalized upper bound on 1-based axis `n`, or zero when `n` is outside `[1, dim]`.
    pub fn ur_coord(&self, n: i64) -> f64 {
        match axis_from_one_based(n, self.dim) {
            Some(i) => self.upper(i),
            None => 0.0,
        }
    }

    /// Project onto the given 1-based axes, in order (repeats allowed).
    ///
    /// Keeps the raw stored order of each selected pair and the point form of `self`.
    pub fn subset(&self, axes: &[i64]) -> Result<Self> {
        Self::check_dim(axes.len())?;
        let mut picked: SmallVec<[usize; 8]> = SmallVec::with_capacity(axes.len());
        for &n in axes {
            let i = axis_from_one_based(n, self.dim).ok_or(CubeError::IndexOutOfBounds {
                index: n,
                dim: self.dim,
            })?;
            picked.push(i);
        }
        let dim = picked.len();
        let mut coords = Coords::with_capacity(if self.point { dim } else { 2 * dim });
        coords.extend(picked.iter().map(|&i| self.ll(i)));
        if !self.point {
            coords.extend(picked.iter().map(|&i| self.ur(i)));
        }
        Ok(Self::from_parts(dim, self.point, coords))
    }

    /// Like [`Cube::subset`], over a nullable index array.
    pub fn subset_opt(&self, axes: &[Option<i64>]) -> Result<Self> {
        let axes = axes
            .iter()
            .map(|a| a.ok_or(CubeError::NullElement))
            .collect::<Result<SmallVec<[i64; 8]>>>()?;
        self.subset(&axes)
    }

    /// Append one axis with the point value `x`. Point cubes stay points.
    pub fn with_value(&self, x: f64) -> Result<Self> {
        self.append_axis(x, x, self.point)
    }

    /// Append one axis spanning `x0..x1`. The result is a point only if `self`
    /// is a point and `x0 == x1`.
    pub fn with_range(&self, x0: f64, x1: f64) -> Result<Self> {
        self.append_axis(x0, x1, self.point && x0 == x1)
    }

    fn append_axis(&self, x0: f64, x1: f64, point: bool) -> Result<Self> {
        let dim = self.dim + 1;
        Self::check_dim(dim)?;
        let mut coords = Coords::with_capacity(if point { dim } else { 2 * dim });
        coords.extend((0..self.dim).map(|i| self.ll(i)));
        coords.push(x0);
        if !point {
            coords.extend((0..self.dim).map(|i| self.ur(i)));
            coords.push(x1);
        }
        Ok(Self::from_parts(dim, point, coords))
    }

    /// Whether every axis has zero width (regardless of storage form).
    pub fn is_degenerate(&self) -> bool {
        self.point || (0..self.dim).all(|i| self.ll(i) == self.ur(i))
    }

    /// Point form of this cube if every axis has zero width; otherwise an unchanged copy.
    pub fn to_point_form(&self) -> Self {
        if self.point || !self.is_degenerate() {
            return self.clone();
        }
        Self::from_parts(
            self.dim,
            true,
            Coords::from_slice(&self.coords[..self.dim]),
        )
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::empty()
    }
}

fn axis_from_one_based(n: i64, dim: usize) -> Option<usize> {
    let i = usize::try_from(n).ok()?.checked_sub(1)?;
    (i < dim).then_some(i)
}

fn collect_non_null(values: &[Option<f64>]) -> Result<SmallVec<[f64; 8]>> {
    values
        .iter()
        .map(|v| v.ok_or(CubeError::NullElement))
        .collect()
}
