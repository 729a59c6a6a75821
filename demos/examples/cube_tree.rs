// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a cube tree and run each search strategy.
//!
//! Run with split logging:
//! - `RUST_LOG=understory_cube=debug cargo run -p understory_examples --example cube_tree`

use understory_cube::{
    Cube, CubeError, CubeTree, LinearSplit, QuadraticSplit, SplitConfig, Splitter, Strategy,
    TreeConfig,
};

fn main() -> Result<(), CubeError> {
    env_logger::init();

    let mut items = Vec::new();
    for y in 0..6 {
        for x in 0..6 {
            let (x0, y0) = (f64::from(x) * 10.0, f64::from(y) * 10.0);
            items.push((Cube::from_corners(&[x0, y0], &[x0 + 8.0, y0 + 8.0])?, (x, y)));
        }
    }
    let config = TreeConfig {
        max_children: 4,
        ..TreeConfig::default()
    };
    let tree = CubeTree::bulk_load(config, items.iter().cloned())?;
    println!("{tree:?}");
    if let Some(bounds) = tree.bounds() {
        println!("bounds: {bounds}");
    }

    let window = Cube::from_corners(&[15.0, 15.0], &[35.0, 28.0])?;
    for strategy in [
        Strategy::Overlap,
        Strategy::ContainedBy,
        Strategy::Contains,
        Strategy::Same,
    ] {
        let mut hits: Vec<_> = tree.search(&window, strategy).into_iter().copied().collect();
        hits.sort_unstable();
        println!("{strategy:?} {window}: {hits:?}");
    }
    let cell = &items[7].0;
    println!("Same {cell}: {:?}", tree.search(cell, Strategy::Same));

    // The two splitters on the same overflowing batch.
    let batch: Vec<Cube> = items.iter().take(9).map(|(c, _)| c.clone()).collect();
    let split_config = SplitConfig::default();
    for (name, split) in [
        ("linear", LinearSplit.split(&batch, &split_config)?),
        ("quadratic", QuadraticSplit.split(&batch, &split_config)?),
    ] {
        println!(
            "{name:>9}: {:?} in {} | {:?} in {}",
            split.left, split.left_box, split.right, split.right_box
        );
    }
    Ok(())
}
