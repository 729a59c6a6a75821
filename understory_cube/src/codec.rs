// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary encoding and typed coordinate conversion.
//!
//! The canonical layout is little-endian:
//!
//! ```text
//! u32  total length in bytes (including this field)
//! u32  header: bit 31 = point flag, bits 0..=30 = dimension
//! f64  × dim (point) or 2 × dim (range)
//! ```
//!
//! The legacy layout shares the length prefix, but packs the dimension into
//! bits 0..=6, a coordinate type tag into bits 28..=30 and the point flag into
//! bit 31, and stores coordinates in the tagged type. It is accepted by
//! [`decode_legacy`] and widened to `f64`.

use alloc::vec::Vec;
use core::fmt;

use bitflags::bitflags;

use crate::cube::{CUBE_MAX_DIM, Coords, Cube};
use crate::error::{CubeError, Result};

const LEN_BYTES: usize = 4;
const HEADER_BYTES: usize = 4;
const PREFIX_BYTES: usize = LEN_BYTES + HEADER_BYTES;

const DIM_MASK: u32 = 0x7fff_ffff;
const LEGACY_DIM_MASK: u32 = 0x7f;
const LEGACY_TYPE_SHIFT: u32 = 28;
const LEGACY_TYPE_MASK: u32 = 0x7000_0000;

bitflags! {
    /// Flag bits of the cube header word.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct HeaderFlags: u32 {
        /// The cube stores one value per axis.
        const POINT = 0x8000_0000;
    }
}

/// Coordinate storage types of the legacy layout, widest first.
///
/// Only used at the boundary: values are range-checked and quantized into the
/// type, then carried as `f64`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CoordType {
    /// 64-bit float.
    F8,
    /// 32-bit float.
    F4,
    /// 32-bit signed integer.
    I4,
    /// 16-bit signed integer.
    I2,
    /// 8-bit signed integer.
    I1,
}

impl CoordType {
    /// Legacy header tag of this type.
    pub const fn tag(self) -> u32 {
        match self {
            Self::F8 => 0,
            Self::F4 => 1,
            Self::I4 => 2,
            Self::I2 => 3,
            Self::I1 => 4,
        }
    }

    /// Type for a legacy header tag.
    pub fn from_tag(tag: u32) -> Result<Self> {
        Ok(match tag {
            0 => Self::F8,
            1 => Self::F4,
            2 => Self::I4,
            3 => Self::I2,
            4 => Self::I1,
            other => return Err(CubeError::UnknownCoordType(other)),
        })
    }

    /// Encoded width of one coordinate in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::F8 => 8,
            Self::F4 | Self::I4 => 4,
            Self::I2 => 2,
            Self::I1 => 1,
        }
    }

    fn bounds(self) -> Option<(f64, f64)> {
        match self {
            Self::F8 | Self::F4 => None,
            Self::I4 => Some((f64::from(i32::MIN), f64::from(i32::MAX))),
            Self::I2 => Some((f64::from(i16::MIN), f64::from(i16::MAX))),
            Self::I1 => Some((f64::from(i8::MIN), f64::from(i8::MAX))),
        }
    }

    /// Fail if `value` is outside the representable range of this type.
    pub fn check(self, value: f64) -> Result<()> {
        match self.bounds() {
            Some((lo, hi)) if value < lo || value > hi => {
                Err(CubeError::OutOfRange { value, ty: self })
            }
            _ => Ok(()),
        }
    }

    /// Range-check `value` and return it as stored in this type.
    ///
    /// Integer types truncate toward zero; `F4` rounds to the nearest `f32`.
    pub fn quantize(self, value: f64) -> Result<f64> {
        self.check(value)?;
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Narrowing is the point of typed coordinates; range is checked above."
        )]
        let q = match self {
            Self::F8 => value,
            Self::F4 => f64::from(value as f32),
            Self::I4 => f64::from(value as i32),
            Self::I2 => f64::from(value as i16),
            Self::I1 => f64::from(value as i8),
        };
        Ok(q)
    }
}

impl fmt::Display for CoordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::F8 => "f8",
            Self::F4 => "f4",
            Self::I4 => "i4",
            Self::I2 => "i2",
            Self::I1 => "i1",
        })
    }
}

impl Cube {
    /// A point cube whose coordinates are range-checked and quantized to `ty`.
    pub fn point_typed(coords: &[f64], ty: CoordType) -> Result<Self> {
        let q = coords
            .iter()
            .map(|&v| ty.quantize(v))
            .collect::<Result<Vec<f64>>>()?;
        Self::point(&q)
    }

    /// A cube from corner arrays whose values are range-checked and quantized to `ty`.
    pub fn from_corners_typed(ll: &[f64], ur: &[f64], ty: CoordType) -> Result<Self> {
        if ll.len() != ur.len() {
            return Err(CubeError::LengthMismatch {
                ll: ll.len(),
                ur: ur.len(),
            });
        }
        let ll = ll
            .iter()
            .map(|&v| ty.quantize(v))
            .collect::<Result<Vec<f64>>>()?;
        let ur = ur
            .iter()
            .map(|&v| ty.quantize(v))
            .collect::<Result<Vec<f64>>>()?;
        Self::from_corners(&ll, &ur)
    }

    /// Size in bytes of the canonical encoding.
    pub fn encoded_len(&self) -> usize {
        PREFIX_BYTES + self.coords().len() * 8
    }

    /// Append the canonical encoding of this cube to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let len = self.encoded_len();
        out.reserve(len);
        let mut header = small_u32(self.dim()) & DIM_MASK;
        if self.is_point() {
            header |= HeaderFlags::POINT.bits();
        }
        out.extend_from_slice(&small_u32(len).to_le_bytes());
        out.extend_from_slice(&header.to_le_bytes());
        for v in self.coords() {
            out.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// Canonical encoding of this cube.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }
}

/// Decode a cube in the canonical layout. Returns the cube and the number of bytes consumed.
pub fn decode(buf: &[u8]) -> Result<(Cube, usize)> {
    let (declared, header) = read_prefix(buf)?;
    let point = HeaderFlags::from_bits_truncate(header).contains(HeaderFlags::POINT);
    let dim = (header & DIM_MASK) as usize;
    decode_body(buf, declared, dim, point, CoordType::F8)
}

/// Decode a cube in the legacy typed layout, widening coordinates to `f64`.
pub fn decode_legacy(buf: &[u8]) -> Result<(Cube, usize)> {
    let (declared, header) = read_prefix(buf)?;
    let point = HeaderFlags::from_bits_truncate(header).contains(HeaderFlags::POINT);
    let dim = (header & LEGACY_DIM_MASK) as usize;
    let ty = CoordType::from_tag((header & LEGACY_TYPE_MASK) >> LEGACY_TYPE_SHIFT)?;
    decode_body(buf, declared, dim, point, ty)
}

/// Encode a cube in the legacy layout with the given coordinate type.
///
/// Coordinates are range-checked against `ty`.
pub fn encode_legacy(cube: &Cube, ty: CoordType) -> Result<Vec<u8>> {
    let len = PREFIX_BYTES + cube.coords().len() * ty.width();
    let mut out = Vec::with_capacity(len);
    let mut header = (ty.tag() << LEGACY_TYPE_SHIFT) | (small_u32(cube.dim()) & LEGACY_DIM_MASK);
    if cube.is_point() {
        header |= HeaderFlags::POINT.bits();
    }
    out.extend_from_slice(&small_u32(len).to_le_bytes());
    out.extend_from_slice(&header.to_le_bytes());
    for &v in cube.coords() {
        write_coord(&mut out, ty.quantize(v)?, ty);
    }
    Ok(out)
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Dimensions are bounded by CUBE_MAX_DIM and record lengths by a few kilobytes."
)]
fn small_u32(v: usize) -> u32 {
    v as u32
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Callers quantize `q` to the target type first."
)]
fn write_coord(out: &mut Vec<u8>, q: f64, ty: CoordType) {
    match ty {
        CoordType::F8 => out.extend_from_slice(&q.to_le_bytes()),
        CoordType::F4 => out.extend_from_slice(&(q as f32).to_le_bytes()),
        CoordType::I4 => out.extend_from_slice(&(q as i32).to_le_bytes()),
        CoordType::I2 => out.extend_from_slice(&(q as i16).to_le_bytes()),
        CoordType::I1 => out.extend_from_slice(&(q as i8).to_le_bytes()),
    }
}

fn read_u32(buf: &[u8], at: usize) -> Result<u32> {
    let bytes = buf
        .get(at..at + 4)
        .ok_or(CubeError::Truncated {
            needed: at + 4,
            available: buf.len(),
        })?;
    let mut word = [0_u8; 4];
    word.copy_from_slice(bytes);
    Ok(u32::from_le_bytes(word))
}

fn read_prefix(buf: &[u8]) -> Result<(usize, u32)> {
    let declared = read_u32(buf, 0)? as usize;
    let header = read_u32(buf, LEN_BYTES)?;
    Ok((declared, header))
}

fn decode_body(
    buf: &[u8],
    declared: usize,
    dim: usize,
    point: bool,
    ty: CoordType,
) -> Result<(Cube, usize)> {
    if dim > CUBE_MAX_DIM {
        return Err(CubeError::TooManyDimensions {
            dim,
            max: CUBE_MAX_DIM,
        });
    }
    let count = if point { dim } else { 2 * dim };
    let actual = PREFIX_BYTES + count * ty.width();
    if declared != actual {
        return Err(CubeError::LengthField { declared, actual });
    }
    if buf.len() < actual {
        return Err(CubeError::Truncated {
            needed: actual,
            available: buf.len(),
        });
    }
    let body = &buf[PREFIX_BYTES..actual];
    let mut coords = Coords::with_capacity(count);
    for chunk in body.chunks_exact(ty.width()) {
        coords.push(read_coord(chunk, ty));
    }
    Ok((Cube::from_parts(dim, point, coords), actual))
}

fn read_coord(chunk: &[u8], ty: CoordType) -> f64 {
    let mut b8 = [0_u8; 8];
    let mut b4 = [0_u8; 4];
    let mut b2 = [0_u8; 2];
    match ty {
        CoordType::F8 => {
            b8.copy_from_slice(chunk);
            f64::from_le_bytes(b8)
        }
        CoordType::F4 => {
            b4.copy_from_slice(chunk);
            f64::from(f32::from_le_bytes(b4))
        }
        CoordType::I4 => {
            b4.copy_from_slice(chunk);
            f64::from(i32::from_le_bytes(b4))
        }
        CoordType::I2 => {
            b2.copy_from_slice(chunk);
            f64::from(i16::from_le_bytes(b2))
        }
        CoordType::I1 => f64::from(i8::from_le_bytes([chunk[0]])),
    }
}
