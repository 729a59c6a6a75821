// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_cube --heading-base-level=0

//! Understory Cube: N-dimensional boxes for generalized search trees.
//!
//! A [`Cube`] is an axis-aligned box (or a point) in up to [`CUBE_MAX_DIM`]
//! dimensions. This crate provides what a generalized search tree needs to
//! index them:
//!
//! - The value type with constructors, accessors, a text syntax and a compact binary encoding.
//! - Geometric predicates and combinators: [`Cube::overlaps`], [`Cube::contains`],
//!   [`Cube::union`], [`Cube::intersection`], [`Cube::size`], [`Cube::distance`], and a total order.
//! - Two node-splitting algorithms, [`QuadraticSplit`] and [`LinearSplit`], chosen by [`pick_split`].
//! - The host callbacks in [`gist`], and a small in-memory host, [`CubeTree`].
//!
//! Cubes of different dimensionality can be mixed freely: a missing trailing
//! axis behaves as the degenerate interval `[0, 0]`.
//!
//! # Example
//!
//! ```rust
//! use understory_cube::{Cube, CubeTree, Strategy};
//!
//! let a: Cube = "(1, 2),(3, 4)".parse().unwrap();
//! assert_eq!(a.size(), 4.0);
//!
//! let b = Cube::from_corners(&[2.0, 3.0], &[5.0, 5.0]).unwrap();
//! assert!(a.overlaps(&b));
//! assert_eq!(a.union(&b).to_string(), "(1, 2),(5, 5)");
//!
//! let mut tree = CubeTree::new();
//! tree.insert(a, "a").unwrap();
//! tree.insert(b, "b").unwrap();
//! let hits = tree.search(&Cube::point(&[4.0, 4.5]).unwrap(), Strategy::Overlap);
//! assert_eq!(hits, vec![&"b"]);
//! ```
//!
//! Splitting a batch of node entries directly:
//!
//! ```rust
//! use understory_cube::{Cube, SplitConfig, pick_split};
//!
//! let entries: Vec<Cube> = (0..10)
//!     .map(|i| Cube::from_range(f64::from(i), f64::from(i) + 0.5))
//!     .collect();
//! let split = pick_split(&entries, &SplitConfig::default()).unwrap();
//! assert_eq!(split.left, vec![0, 1, 2, 3, 4]);
//! assert_eq!(split.right, vec![5, 6, 7, 8, 9]);
//! ```
//!
//! ## Features
//!
//! - `std` (default): implements `std::error::Error` for [`CubeError`].
//! - `libm`: float math for `no_std` builds. One of `std` or `libm` is required.
//!
//! ### Float semantics
//!
//! Coordinates are `f64`. NaN coordinates are accepted but not meaningful;
//! where two coordinates are unordered, the total order falls back to
//! [`f64::total_cmp`] so sorting stays well defined.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod codec;
pub mod cube;
pub mod error;
pub mod geometry;
pub mod gist;
pub mod split;
pub mod text;
pub mod tree;

mod util;

pub use codec::CoordType;
pub use cube::{CUBE_MAX_DIM, Cube};
pub use error::{CubeError, Result};
pub use gist::Strategy;
pub use split::{
    LinearSplit, QuadraticSplit, Split, SplitConfig, SplitStrategy, Splitter, pick_split,
};
pub use text::FormatOptions;
pub use tree::{CubeTree, TreeConfig};
