// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by constructors, the text parser, the codec and the splitters.

use alloc::string::String;

use thiserror::Error;

use crate::codec::CoordType;

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, CubeError>;

/// Errors produced while building, decoding or splitting cubes.
///
/// Coordinate *reads* never fail; out-of-range axes read as zero instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CubeError {
    /// A text literal could not be parsed.
    #[error("invalid cube literal: unexpected {token:?} at byte {offset}")]
    Parse {
        /// The offending token (or `"end of input"`).
        token: String,
        /// Byte offset of the token in the input.
        offset: usize,
    },

    /// A coordinate does not fit the requested coordinate type.
    #[error("cube coordinate {value} out of {ty} range")]
    OutOfRange {
        /// The rejected value.
        value: f64,
        /// The target coordinate type.
        ty: CoordType,
    },

    /// An array input contained a null element.
    #[error("cannot work with arrays containing nulls")]
    NullElement,

    /// Lower-left and upper-right arrays differ in length.
    #[error("lower-left and upper-right arrays must be of same length ({ll} vs {ur})")]
    LengthMismatch {
        /// Length of the lower-left array.
        ll: usize,
        /// Length of the upper-right array.
        ur: usize,
    },

    /// A 1-based axis index fell outside `[1, dim]`.
    #[error("axis index {index} out of bounds for a cube of dimension {dim}")]
    IndexOutOfBounds {
        /// The rejected index.
        index: i64,
        /// Dimension of the source cube.
        dim: usize,
    },

    /// A construction would exceed the maximum dimensionality.
    #[error("a cube cannot have more than {max} dimensions (requested {dim})")]
    TooManyDimensions {
        /// Requested dimensionality.
        dim: usize,
        /// The configured maximum.
        max: usize,
    },

    /// A splitter was handed fewer than two entries.
    #[error("cannot split {count} entries; at least two are required")]
    TooFewEntries {
        /// Number of entries supplied.
        count: usize,
    },

    /// The split configuration is out of range.
    #[error("split fill ratio {0} must lie in [0, 0.5]")]
    InvalidConfig(f64),

    /// A tree node capacity below two.
    #[error("node capacity {0} is too small; nodes must hold at least 2 entries")]
    NodeCapacity(usize),

    /// The encoded buffer ended early.
    #[error("encoded cube truncated: need {needed} bytes, have {available}")]
    Truncated {
        /// Bytes required.
        needed: usize,
        /// Bytes present.
        available: usize,
    },

    /// The length prefix disagrees with the payload.
    #[error("encoded cube declares {declared} bytes but the payload needs {actual}")]
    LengthField {
        /// Length stored in the prefix.
        declared: usize,
        /// Length implied by the header.
        actual: usize,
    },

    /// A legacy header carried an unknown coordinate type tag.
    #[error("unknown legacy coordinate type tag {0}")]
    UnknownCoordType(u32),
}
