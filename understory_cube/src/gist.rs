// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Callbacks a generalized search tree host calls to index cubes.
//!
//! A host keeps one covering cube per internal entry and the indexed cube per
//! leaf entry. It asks [`consistent`] whether a subtree may hold matches,
//! [`penalty`] where to insert, and [`pick_split`] how to divide an
//! overflowing node. Keys are stored as-is, so [`compress`] and
//! [`decompress`] are identities.
//!
//! [`CubeTree`](crate::tree::CubeTree) is an in-memory host built on these.

use crate::cube::Cube;
use crate::error::Result;
use crate::split::{self, Split, SplitConfig};

/// Search operators supported by the index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The key overlaps the query (`&&`).
    Overlap,
    /// The key equals the query (`=`).
    Same,
    /// The key contains the query (`@>`).
    Contains,
    /// The key is contained by the query (`<@`).
    ContainedBy,
}

impl Strategy {
    /// Host strategy number for this operator.
    pub const fn number(self) -> u16 {
        match self {
            Self::Overlap => 3,
            Self::Same => 6,
            Self::Contains => 7,
            Self::ContainedBy => 8,
        }
    }

    /// Map a host strategy number to an operator.
    ///
    /// Also accepts the legacy numbers 13 (contains) and 14 (contained by).
    pub const fn from_number(number: u16) -> Option<Self> {
        match number {
            3 => Some(Self::Overlap),
            6 => Some(Self::Same),
            7 | 13 => Some(Self::Contains),
            8 | 14 => Some(Self::ContainedBy),
            _ => None,
        }
    }
}

/// Whether an entry with `key` can satisfy `query` under `strategy`.
///
/// For leaves (`is_leaf`) this is the exact operator. For internal entries,
/// `key` covers a subtree, and the answer is `false` only when no descendant
/// can match.
pub fn consistent(key: &Cube, query: &Cube, strategy: Strategy, is_leaf: bool) -> bool {
    if is_leaf {
        match strategy {
            Strategy::Overlap => key.overlaps(query),
            Strategy::Same => key == query,
            Strategy::Contains => key.contains(query),
            Strategy::ContainedBy => key.contained_by(query),
        }
    } else {
        match strategy {
            Strategy::Overlap | Strategy::ContainedBy => key.overlaps(query),
            Strategy::Same | Strategy::Contains => key.contains(query),
        }
    }
}

/// [`consistent`] keyed by a raw host strategy number. Unknown numbers match nothing.
pub fn consistent_number(key: &Cube, query: &Cube, strategy: u16, is_leaf: bool) -> bool {
    Strategy::from_number(strategy).is_some_and(|s| consistent(key, query, s, is_leaf))
}

/// Covering cube of `entries`, or `None` for an empty slice.
pub fn union(entries: &[Cube]) -> Option<Cube> {
    let (first, rest) = entries.split_first()?;
    Some(rest.iter().fold(first.clone(), |acc, e| acc.union(e)))
}

/// Cost of inserting `new` under an entry whose key is `original`.
pub fn penalty(original: &Cube, new: &Cube) -> f64 {
    original.penalty(new)
}

/// Divide an overflowing node's entry keys into two groups.
pub fn pick_split(entries: &[Cube], config: &SplitConfig) -> Result<Split> {
    split::pick_split(entries, config)
}

/// Whether two keys are identical.
pub fn same(a: &Cube, b: &Cube) -> bool {
    a == b
}

/// Convert a cube to its stored key form (identity).
#[inline]
pub fn compress(cube: Cube) -> Cube {
    cube
}

/// Convert a stored key back to a cube (identity).
#[inline]
pub fn decompress(key: Cube) -> Cube {
    key
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn boxed(ll: &[f64], ur: &[f64]) -> Cube {
        Cube::from_corners(ll, ur).unwrap()
    }

    #[test]
    fn strategy_numbers() {
        for s in [
            Strategy::Overlap,
            Strategy::Same,
            Strategy::Contains,
            Strategy::ContainedBy,
        ] {
            assert_eq!(Strategy::from_number(s.number()), Some(s));
        }
        assert_eq!(Strategy::from_number(13), Some(Strategy::Contains));
        assert_eq!(Strategy::from_number(14), Some(Strategy::ContainedBy));
        assert_eq!(Strategy::from_number(1), None);
        assert_eq!(Strategy::from_number(12), None);
    }

    #[test]
    fn leaf_consistent_is_exact() {
        let key = boxed(&[0.0, 0.0], &[2.0, 2.0]);
        let inner = boxed(&[0.5, 0.5], &[1.0, 1.0]);
        let outer = boxed(&[-1.0, -1.0], &[3.0, 3.0]);
        let apart = boxed(&[5.0, 5.0], &[6.0, 6.0]);

        assert!(consistent(&key, &inner, Strategy::Overlap, true));
        assert!(!consistent(&key, &apart, Strategy::Overlap, true));
        assert!(consistent(&key, &inner, Strategy::Contains, true));
        assert!(!consistent(&key, &outer, Strategy::Contains, true));
        assert!(consistent(&key, &outer, Strategy::ContainedBy, true));
        assert!(!consistent(&key, &inner, Strategy::ContainedBy, true));
        assert!(consistent(&key, &key.clone(), Strategy::Same, true));
        assert!(!consistent(&key, &inner, Strategy::Same, true));
    }

    #[test]
    fn internal_consistent_is_conservative() {
        let node = boxed(&[0.0, 0.0], &[10.0, 10.0]);
        let query = boxed(&[5.0, 5.0], &[20.0, 20.0]);
        // A child of `node` could lie inside `query`.
        assert!(consistent(&node, &query, Strategy::ContainedBy, false));
        assert!(consistent(&node, &query, Strategy::Overlap, false));
        // No child of `node` can contain or equal a query `node` does not contain.
        assert!(!consistent(&node, &query, Strategy::Contains, false));
        assert!(!consistent(&node, &query, Strategy::Same, false));
        let small = boxed(&[1.0, 1.0], &[2.0, 2.0]);
        assert!(consistent(&node, &small, Strategy::Same, false));
        assert!(consistent(&node, &small, Strategy::Contains, false));
    }

    #[test]
    fn unknown_strategy_matches_nothing() {
        let key = boxed(&[0.0], &[1.0]);
        assert!(consistent_number(&key, &key, 6, true));
        assert!(consistent_number(&key, &key, 13, false));
        assert!(!consistent_number(&key, &key, 99, true));
        assert!(!consistent_number(&key, &key, 0, false));
    }

    #[test]
    fn union_penalty_same() {
        assert_eq!(union(&[]), None);
        let a = boxed(&[0.0, 0.0], &[1.0, 1.0]);
        let b = boxed(&[2.0, 2.0], &[3.0, 3.0]);
        let u = union(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(u, boxed(&[0.0, 0.0], &[3.0, 3.0]));
        assert_eq!(penalty(&a, &b), 8.0);
        assert_eq!(penalty(&u, &a), 0.0);
        assert!(same(&a, &Cube::from_corners(&[1.0, 1.0], &[0.0, 0.0]).unwrap()));
        assert!(!same(&a, &b));
        assert_eq!(decompress(compress(a.clone())).coords(), a.coords());
    }

    #[test]
    fn pick_split_partitions_keys() {
        let keys = vec![
            boxed(&[0.0, 0.0], &[1.0, 1.0]),
            boxed(&[0.0, 1.0], &[1.0, 2.0]),
            boxed(&[9.0, 9.0], &[10.0, 10.0]),
            boxed(&[9.0, 8.0], &[10.0, 9.0]),
        ];
        let split = pick_split(&keys, &SplitConfig::default()).unwrap();
        assert_eq!(split.left, vec![0, 1]);
        assert_eq!(split.right, vec![2, 3]);
    }
}
