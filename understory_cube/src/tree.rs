// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory search tree over cubes, driven by the [`gist`](crate::gist) callbacks.
//!
//! Nodes live in an arena and hold up to [`TreeConfig::max_children`]
//! entries. Insertion descends by minimum [`gist::penalty`], and overflowing
//! nodes are divided with [`gist::pick_split`]. A split of the root grows the
//! tree by one level.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{self, Debug};

use crate::cube::Cube;
use crate::error::{CubeError, Result};
use crate::gist::{self, Strategy};
use crate::split::SplitConfig;

/// Default node capacity.
pub const DEFAULT_MAX_CHILDREN: usize = 8;

/// Tree shape and split tuning.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TreeConfig {
    /// Maximum entries per node; a node holding more is split.
    pub max_children: usize,
    /// Split configuration; its `limit_ratio` sets the minimum fill of split nodes.
    pub split: SplitConfig,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_children: DEFAULT_MAX_CHILDREN,
            split: SplitConfig::default(),
        }
    }
}

impl TreeConfig {
    /// Check the node capacity and the split configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_children < 2 {
            return Err(CubeError::NodeCapacity(self.max_children));
        }
        self.split.validate()
    }
}

/// A cube index holding payloads of type `P`.
pub struct CubeTree<P> {
    config: TreeConfig,
    root: Option<NodeIdx>,
    arena: Vec<Node<P>>,
    len: usize,
    height: usize,
}

struct Node<P> {
    bbox: Cube,
    leaf: bool,
    children: Vec<Child<P>>,
}

enum Child<P> {
    Node(NodeIdx),
    Item { key: Cube, payload: P },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn get(self) -> usize {
        self.0
    }
}

impl<P> Default for CubeTree<P> {
    fn default() -> Self {
        Self {
            config: TreeConfig::default(),
            root: None,
            arena: Vec::new(),
            len: 0,
            height: 0,
        }
    }
}

impl<P> CubeTree<P> {
    /// An empty tree with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty tree with `config`, which is validated first.
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    /// Build a tree by inserting `items` in order.
    pub fn bulk_load(config: TreeConfig, items: impl IntoIterator<Item = (Cube, P)>) -> Result<Self> {
        let mut tree = Self::with_config(config)?;
        for (key, payload) in items {
            tree.insert(key, payload)?;
        }
        Ok(tree)
    }

    /// The tree's configuration.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; 0 for an empty tree, 1 for a single leaf.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cube covering every stored key, if any.
    pub fn bounds(&self) -> Option<&Cube> {
        self.root.map(|r| &self.arena[r.get()].bbox)
    }

    /// Remove every entry, keeping the configuration.
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
        self.len = 0;
        self.height = 0;
    }

    /// Insert `payload` under `key`.
    ///
    /// Fails only if a node split fails, which a validated configuration rules out.
    pub fn insert(&mut self, key: Cube, payload: P) -> Result<()> {
        let key = gist::compress(key);
        match self.root {
            None => {
                let idx = self.arena.len();
                self.arena.push(Node {
                    bbox: key.clone(),
                    leaf: true,
                    children: vec![Child::Item { key, payload }],
                });
                self.root = Some(NodeIdx(idx));
                self.height = 1;
            }
            Some(root) => {
                if let Some(right) =
                    Self::insert_node(&mut self.arena, root.get(), key, payload, &self.config)?
                {
                    let bbox = self.arena[root.get()].bbox.union(&self.arena[right].bbox);
                    let idx = self.arena.len();
                    self.arena.push(Node {
                        bbox,
                        leaf: false,
                        children: vec![Child::Node(root), Child::Node(NodeIdx(right))],
                    });
                    self.root = Some(NodeIdx(idx));
                    self.height += 1;
                    log::trace!("root split, height now {}", self.height);
                }
            }
        }
        self.len += 1;
        Ok(())
    }

    /// Payloads whose keys satisfy `query` under `strategy`.
    pub fn search(&self, query: &Cube, strategy: Strategy) -> Vec<&P> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        if !gist::consistent(&self.arena[root.get()].bbox, query, strategy, false) {
            return out;
        }
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            let node = &self.arena[i.get()];
            for child in &node.children {
                match child {
                    Child::Item { key, payload } => {
                        if gist::consistent(key, query, strategy, true) {
                            out.push(payload);
                        }
                    }
                    Child::Node(ci) => {
                        if gist::consistent(&self.arena[ci.get()].bbox, query, strategy, false) {
                            stack.push(*ci);
                        }
                    }
                }
            }
        }
        out
    }

    /// [`search`](Self::search) by host strategy number; unknown numbers match nothing.
    pub fn search_number(&self, query: &Cube, strategy: u16) -> Vec<&P> {
        match Strategy::from_number(strategy) {
            Some(s) => self.search(query, s),
            None => Vec::new(),
        }
    }

    fn child_key<'a>(arena: &'a [Node<P>], child: &'a Child<P>) -> &'a Cube {
        match child {
            Child::Node(i) => &arena[i.get()].bbox,
            Child::Item { key, .. } => key,
        }
    }

    /// Child with the least penalty for `key`; the first one wins ties.
    fn choose_child(arena: &[Node<P>], children: &[Child<P>], key: &Cube) -> usize {
        let mut best_idx = 0;
        let mut best_cost: Option<f64> = None;
        for (i, c) in children.iter().enumerate() {
            let cost = gist::penalty(Self::child_key(arena, c), key);
            if best_cost.is_none_or(|bc| cost < bc) {
                best_cost = Some(cost);
                best_idx = i;
            }
        }
        best_idx
    }

    /// Insert below `node_idx`; returns the arena index of a new right sibling
    /// if the node had to split.
    fn insert_node(
        arena: &mut Vec<Node<P>>,
        node_idx: usize,
        key: Cube,
        payload: P,
        config: &TreeConfig,
    ) -> Result<Option<usize>> {
        arena[node_idx].bbox = arena[node_idx].bbox.union(&key);
        if arena[node_idx].leaf {
            arena[node_idx].children.push(Child::Item { key, payload });
        } else {
            let idx = Self::choose_child(arena, &arena[node_idx].children, &key);
            let Child::Node(child) = arena[node_idx].children[idx] else {
                unreachable!("internal nodes only hold node children");
            };
            if let Some(right) = Self::insert_node(arena, child.get(), key, payload, config)? {
                arena[node_idx]
                    .children
                    .insert(idx + 1, Child::Node(NodeIdx(right)));
            }
        }
        if arena[node_idx].children.len() <= config.max_children {
            return Ok(None);
        }
        Self::split_node(arena, node_idx, config).map(Some)
    }

    /// Divide an overflowing node in place; the right half moves to a new node.
    fn split_node(arena: &mut Vec<Node<P>>, node_idx: usize, config: &TreeConfig) -> Result<usize> {
        let keys: Vec<Cube> = arena[node_idx]
            .children
            .iter()
            .map(|c| Self::child_key(arena, c).clone())
            .collect();
        let split = gist::pick_split(&keys, &config.split)?;

        let mut goes_right = vec![false; keys.len()];
        for &i in &split.right {
            goes_right[i] = true;
        }
        let children = core::mem::take(&mut arena[node_idx].children);
        let mut left = Vec::with_capacity(split.left.len());
        let mut right = Vec::with_capacity(split.right.len());
        for (child, to_right) in children.into_iter().zip(goes_right) {
            if to_right {
                right.push(child);
            } else {
                left.push(child);
            }
        }

        let leaf = arena[node_idx].leaf;
        log::trace!(
            "split {} node {node_idx}: {} | {}",
            if leaf { "leaf" } else { "internal" },
            left.len(),
            right.len()
        );
        let node = &mut arena[node_idx];
        node.children = left;
        node.bbox = split.left_box;
        let r_idx = arena.len();
        arena.push(Node {
            bbox: split.right_box,
            leaf,
            children: right,
        });
        Ok(r_idx)
    }
}

impl<P> Debug for CubeTree<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CubeTree")
            .field("config", &self.config)
            .field("len", &self.len)
            .field("height", &self.height)
            .field("arena_nodes", &self.arena.len())
            .finish_non_exhaustive()
    }
}
