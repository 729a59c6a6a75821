// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Guttman's quadratic split.

use alloc::vec::Vec;

use super::{Group, Split, SplitConfig, Splitter, check_batch, finish};
use crate::cube::Cube;
use crate::error::Result;
use crate::util;

/// Guttman's quadratic split.
///
/// Seeds the two groups with the pair of entries that would waste the most
/// volume if placed together, then repeatedly assigns the entry with the
/// strongest preference for one group. Once a group can only reach the
/// minimum fill by taking every remaining entry, it takes them all.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct QuadraticSplit;

impl Splitter for QuadraticSplit {
    fn split(&self, entries: &[Cube], config: &SplitConfig) -> Result<Split> {
        check_batch(entries, config)?;
        Ok(quadratic_split(entries, config))
    }
}

fn pick_seeds(entries: &[Cube]) -> (usize, usize) {
    let mut best = (0, 1);
    let mut worst_waste = f64::NEG_INFINITY;
    for i in 0..entries.len() {
        for j in i + 1..entries.len() {
            let waste = entries[i].union(&entries[j]).size()
                - entries[i].intersection(&entries[j]).size();
            if waste > worst_waste {
                worst_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

fn quadratic_split(entries: &[Cube], config: &SplitConfig) -> Split {
    let n = entries.len();
    let (seed_l, seed_r) = pick_seeds(entries);
    log::trace!("quadratic seeds {seed_l} and {seed_r}");

    let mut left = Group::with_seed(seed_l, &entries[seed_l]);
    let mut right = Group::with_seed(seed_r, &entries[seed_r]);
    let mut pending: Vec<usize> = (0..n).filter(|&i| i != seed_l && i != seed_r).collect();
    let min_fill = config.min_fill(n);

    while !pending.is_empty() {
        let remaining = pending.len();
        if left.len() + remaining <= min_fill {
            for i in pending.drain(..) {
                left.push(i, &entries[i]);
            }
            break;
        }
        if right.len() + remaining <= min_fill {
            for i in pending.drain(..) {
                right.push(i, &entries[i]);
            }
            break;
        }

        // PickNext: the entry whose placement matters most.
        let mut chosen = 0;
        let mut chosen_diff = f64::NEG_INFINITY;
        let mut chosen_left = false;
        for (slot, &i) in pending.iter().enumerate() {
            let pl = left.penalty(&entries[i]);
            let pr = right.penalty(&entries[i]);
            let diff = util::abs(pl - pr);
            if diff > chosen_diff {
                chosen = slot;
                chosen_diff = diff;
                chosen_left = pl < pr;
            }
        }
        let i = pending.remove(chosen);
        if chosen_left {
            left.push(i, &entries[i]);
        } else {
            right.push(i, &entries[i]);
        }
    }

    finish(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::tests::{assert_valid_split, batch, boxed};
    use alloc::vec;
    use proptest::prelude::*;

    #[test]
    fn seeds_are_the_most_wasteful_pair() {
        let entries = vec![
            boxed(&[0.0, 0.0], &[1.0, 1.0]),
            boxed(&[0.5, 0.5], &[1.5, 1.5]),
            boxed(&[10.0, 10.0], &[11.0, 11.0]),
            boxed(&[0.2, 0.2], &[0.8, 0.8]),
        ];
        assert_eq!(pick_seeds(&entries), (0, 2));
    }

    #[test]
    fn seed_ties_keep_the_first_pair() {
        // Identical boxes waste nothing whichever pair is chosen.
        let entries = vec![boxed(&[0.0], &[1.0]); 3];
        assert_eq!(pick_seeds(&entries), (0, 1));
    }

    #[test]
    fn separates_two_clusters() {
        let mut entries = Vec::new();
        for i in 0..5 {
            let o = f64::from(i) * 0.1;
            entries.push(boxed(&[o, o], &[o + 1.0, o + 1.0]));
            entries.push(boxed(&[50.0 + o, 50.0 + o], &[51.0 + o, 51.0 + o]));
        }
        let split = QuadraticSplit.split(&entries, &SplitConfig::default()).unwrap();
        assert_valid_split(&entries, &split);
        let (near, far) = if split.left.contains(&0) {
            (&split.left, &split.right)
        } else {
            (&split.right, &split.left)
        };
        assert_eq!(near, &vec![0, 2, 4, 6, 8]);
        assert_eq!(far, &vec![1, 3, 5, 7, 9]);
    }

    #[test]
    fn min_fill_forces_remaining_entries() {
        // One outlier seeds the right group; everything else prefers left.
        let mut entries: Vec<Cube> = (0..9)
            .map(|i| {
                let o = f64::from(i) * 0.01;
                boxed(&[o, o], &[1.0 + o, 1.0 + o])
            })
            .collect();
        entries.push(boxed(&[100.0, 100.0], &[101.0, 101.0]));
        let cfg = SplitConfig::default();
        let split = QuadraticSplit.split(&entries, &cfg).unwrap();
        assert_valid_split(&entries, &split);
        assert!(split.left.len() >= 3, "left below fill: {:?}", split.left);
        assert!(split.right.len() >= 3, "right below fill: {:?}", split.right);
    }

    #[test]
    fn equal_penalties_go_right() {
        // The middle point is equidistant from both seeds.
        let p = |x: f64| Cube::point(&[x, 0.0]).unwrap();
        let entries = vec![boxed(&[0.0, 0.0], &[1.0, 1.0]), boxed(&[4.0, 0.0], &[5.0, 1.0]), p(2.5)];
        let cfg = SplitConfig::default().with_limit_ratio(0.0);
        let split = QuadraticSplit.split(&entries, &cfg).unwrap();
        assert_eq!(split.left, vec![0]);
        assert_eq!(split.right, vec![1, 2]);
    }

    proptest! {
        #[test]
        fn complete_and_filled(entries in (1_usize..12).prop_flat_map(batch), ratio in 0.0_f64..=0.5) {
            let cfg = SplitConfig::default().with_limit_ratio(ratio);
            let split = QuadraticSplit.split(&entries, &cfg).unwrap();
            assert_valid_split(&entries, &split);
            // Both sides cannot reach the fill when it exceeds half the batch.
            let m = cfg.min_fill(entries.len()).min(entries.len() / 2);
            prop_assert!(split.left.len() >= m);
            prop_assert!(split.right.len() >= m);
        }
    }
}
