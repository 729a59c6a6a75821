// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cube values: parse, combine, compare, encode.
//!
//! Run:
//! - `cargo run -p understory_examples --example cube_basics`

use understory_cube::codec::{self, encode_legacy};
use understory_cube::{CoordType, Cube, CubeError, FormatOptions};

fn main() -> Result<(), CubeError> {
    env_logger::init();

    let a: Cube = "(1, 2),(3, 4)".parse()?;
    let b: Cube = "[(2.5, 0), (6, 3)]".parse()?;
    let p = Cube::point(&[2.0, 3.0])?;

    println!("a = {a}  size {}", a.size());
    println!("b = {b}  size {}", b.size());
    println!("a overlaps b: {}", a.overlaps(&b));
    println!("a contains {p}: {}", a.contains(&p));
    println!("union        = {}", a.union(&b));
    println!("intersection = {}", a.intersection(&b));
    println!("distance(a, (10, 10)) = {:.4}", a.distance(&Cube::point(&[10.0, 10.0])?));
    println!("a < b: {}", a < b);

    // Mixed dimensionality: missing axes are zero.
    let c3 = a.with_range(-1.0, 1.0)?;
    println!("{c3} overlaps {a}: {}", c3.overlaps(&a));
    println!("projection onto axes 2,1 = {}", c3.subset(&[2, 1])?);
    println!("enlarged by 0.5 into 4-D = {}", a.enlarge(0.5, 4));

    let third = Cube::from_value(1.0 / 3.0);
    println!(
        "1/3 with 4 digits: {}",
        third.format_with(FormatOptions::with_digits(4))
    );

    let bytes = a.encode();
    let (decoded, used) = codec::decode(&bytes)?;
    println!("encoded {} bytes, decoded {decoded} from {used}", bytes.len());

    let legacy = encode_legacy(&a, CoordType::I2)?;
    let (widened, _) = codec::decode_legacy(&legacy)?;
    println!("legacy i2 payload of {} bytes decodes to {widened}", legacy.len());

    match Cube::point_typed(&[300.0], CoordType::I1) {
        Ok(c) => println!("unexpectedly fit: {c}"),
        Err(e) => println!("typed point rejected: {e}"),
    }
    match "(1, 2),(3)".parse::<Cube>() {
        Ok(c) => println!("unexpectedly parsed: {c}"),
        Err(e) => println!("parse error: {e}"),
    }
    Ok(())
}
