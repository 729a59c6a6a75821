// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node splitting: partition an overflowing node's entries into two groups.
//!
//! Two algorithms are provided:
//! - [`QuadraticSplit`]: Guttman's quadratic split. Robust in high dimensions.
//! - [`LinearSplit`]: a per-axis interval sweep that looks for a split line
//!   with little overlap. Cheaper and produces tighter nodes in low dimensions.
//!
//! [`pick_split`] chooses between them based on the dimensionality of the
//! batch and [`SplitConfig::quadratic_min_dim`].

use alloc::vec::Vec;

use crate::cube::Cube;
use crate::error::{CubeError, Result};
use crate::util;

pub mod linear;
pub mod quadratic;

pub use linear::LinearSplit;
pub use quadratic::QuadraticSplit;

/// Default minimum fraction of entries each side of a split must receive.
pub const DEFAULT_LIMIT_RATIO: f64 = 0.3;

/// Default dimensionality at and above which the quadratic split is used.
pub const DEFAULT_QUADRATIC_MIN_DIM: usize = 8;

/// Result of a split: two disjoint index sets covering the input, with their
/// covering boxes.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    /// Input indices assigned to the left group, ascending.
    pub left: Vec<usize>,
    /// Union of the left group's entries.
    pub left_box: Cube,
    /// Input indices assigned to the right group, ascending.
    pub right: Vec<usize>,
    /// Union of the right group's entries.
    pub right_box: Cube,
}

/// Tuning knobs for the splitters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitConfig {
    /// Minimum fraction of entries each side must receive, in `[0, 0.5]`.
    pub limit_ratio: f64,
    /// Batches whose widest entry has at least this many dimensions use the
    /// quadratic split; narrower batches use the linear split.
    pub quadratic_min_dim: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            limit_ratio: DEFAULT_LIMIT_RATIO,
            quadratic_min_dim: DEFAULT_QUADRATIC_MIN_DIM,
        }
    }
}

impl SplitConfig {
    /// Set the minimum fill ratio.
    #[must_use]
    pub fn with_limit_ratio(mut self, limit_ratio: f64) -> Self {
        self.limit_ratio = limit_ratio;
        self
    }

    /// Set the dimensionality threshold for the quadratic split.
    #[must_use]
    pub fn with_quadratic_min_dim(mut self, dim: usize) -> Self {
        self.quadratic_min_dim = dim;
        self
    }

    /// Check that `limit_ratio` lies in `[0, 0.5]`.
    pub fn validate(&self) -> Result<()> {
        if (0.0..=0.5).contains(&self.limit_ratio) {
            Ok(())
        } else {
            Err(CubeError::InvalidConfig(self.limit_ratio))
        }
    }

    /// Minimum number of entries per side for a batch of `n`; at least one.
    pub(crate) fn min_fill(&self, n: usize) -> usize {
        util::min_fill(self.limit_ratio, n).max(1)
    }
}

/// A node-splitting algorithm.
pub trait Splitter {
    /// Partition `entries` into two non-empty groups.
    ///
    /// Fails with [`CubeError::TooFewEntries`] when fewer than two entries are
    /// given and with [`CubeError::InvalidConfig`] for an out-of-range ratio.
    fn split(&self, entries: &[Cube], config: &SplitConfig) -> Result<Split>;
}

/// The algorithm selected for a batch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SplitStrategy {
    /// [`QuadraticSplit`].
    Quadratic,
    /// [`LinearSplit`].
    Linear,
}

impl SplitStrategy {
    /// Select the algorithm for a batch whose widest entry has `dim` axes.
    pub fn choose(dim: usize, config: &SplitConfig) -> Self {
        if dim >= config.quadratic_min_dim {
            Self::Quadratic
        } else {
            Self::Linear
        }
    }
}

impl Splitter for SplitStrategy {
    fn split(&self, entries: &[Cube], config: &SplitConfig) -> Result<Split> {
        match self {
            Self::Quadratic => QuadraticSplit.split(entries, config),
            Self::Linear => LinearSplit.split(entries, config),
        }
    }
}

/// Split `entries` with the algorithm suited to their dimensionality.
pub fn pick_split(entries: &[Cube], config: &SplitConfig) -> Result<Split> {
    check_batch(entries, config)?;
    let dim = max_dim(entries);
    let strategy = SplitStrategy::choose(dim, config);
    log::debug!(
        "splitting {} entries of dim {} with {:?}",
        entries.len(),
        dim,
        strategy
    );
    strategy.split(entries, config)
}

pub(crate) fn check_batch(entries: &[Cube], config: &SplitConfig) -> Result<()> {
    config.validate()?;
    if entries.len() < 2 {
        return Err(CubeError::TooFewEntries {
            count: entries.len(),
        });
    }
    Ok(())
}

pub(crate) fn max_dim(entries: &[Cube]) -> usize {
    entries.iter().map(Cube::dim).max().unwrap_or(0)
}

/// A group under construction: members plus running covering box and volume.
#[derive(Debug, Default)]
pub(crate) struct Group {
    members: Vec<usize>,
    bounds: Option<Cube>,
    volume: f64,
}

impl Group {
    pub(crate) fn with_seed(index: usize, entry: &Cube) -> Self {
        let mut group = Self::default();
        group.push(index, entry);
        group
    }

    pub(crate) fn len(&self) -> usize {
        self.members.len()
    }

    /// Volume growth from adding `entry`; against an empty group, the entry's own volume.
    pub(crate) fn penalty(&self, entry: &Cube) -> f64 {
        match &self.bounds {
            Some(b) => b.union(entry).size() - self.volume,
            None => entry.size(),
        }
    }

    pub(crate) fn push(&mut self, index: usize, entry: &Cube) {
        let bounds = match self.bounds.take() {
            Some(b) => b.union(entry),
            None => entry.clone(),
        };
        self.volume = bounds.size();
        self.bounds = Some(bounds);
        self.members.push(index);
    }

    fn finish(mut self) -> (Vec<usize>, Cube) {
        self.members.sort_unstable();
        (self.members, self.bounds.unwrap_or_default())
    }
}

pub(crate) fn finish(left: Group, right: Group) -> Split {
    debug_assert!(
        !left.members.is_empty() && !right.members.is_empty(),
        "split produced an empty group"
    );
    let (left, left_box) = left.finish();
    let (right, right_box) = right.finish();
    Split {
        left,
        left_box,
        right,
        right_box,
    }
}
