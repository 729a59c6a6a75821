// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Float helpers that work with either `std` or `libm`.

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("understory_cube requires either the `std` or the `libm` feature");

#[inline]
pub(crate) fn sqrt(v: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        v.sqrt()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::sqrt(v)
    }
}

#[inline]
pub(crate) fn ceil(v: f64) -> f64 {
    #[cfg(feature = "std")]
    {
        v.ceil()
    }
    #[cfg(not(feature = "std"))]
    {
        libm::ceil(v)
    }
}

#[inline]
pub(crate) fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}

/// Minimum group size for `n` entries under the given fill ratio: `ceil(ratio * n)`.
#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "Ratio is clamped to [0, 0.5], so the product never exceeds `n`."
)]
#[allow(clippy::cast_sign_loss, reason = "Ratio and `n` are non-negative.")]
pub(crate) fn min_fill(ratio: f64, n: usize) -> usize {
    ceil(ratio * n as f64) as usize
}
