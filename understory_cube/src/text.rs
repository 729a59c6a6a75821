// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text literal syntax for cubes.
//!
//! Output is `(x1, x2, ...)` for points and `(l1, l2, ...),(u1, u2, ...)` for
//! ranges, in stored (not normalized) order. Input additionally accepts the
//! bracketed form `[(l...),(u...)]` and a bare comma-separated list, which
//! denotes a point.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Write as _};
use core::str::FromStr;

use crate::cube::{CUBE_MAX_DIM, Cube};
use crate::error::{CubeError, Result};

/// Significant digits printed by C's `%g` for doubles (`DBL_DIG`).
pub const DBL_DIG: usize = 15;

/// Controls how coordinates are printed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Significant digits per coordinate, `%.*g` style.
    ///
    /// `None` prints the shortest representation that parses back to the same
    /// value. Values below 1 are treated as 1.
    pub digits: Option<usize>,
}

impl FormatOptions {
    /// Print with exactly `digits` significant digits (trailing zeros trimmed).
    pub const fn with_digits(digits: usize) -> Self {
        Self {
            digits: Some(digits),
        }
    }
}

impl Cube {
    /// Format this cube with the given options.
    pub fn format_with(&self, opts: FormatOptions) -> String {
        let mut out = String::new();
        let dim = self.dim();
        write_list(&mut out, (0..dim).map(|i| self.ll(i)), opts);
        if !self.is_point() {
            out.push(',');
            write_list(&mut out, (0..dim).map(|i| self.ur(i)), opts);
        }
        out
    }

    /// Parse a cube literal.
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input)?.cube()
    }
}

impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(FormatOptions::default()))
    }
}

impl FromStr for Cube {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn write_list(out: &mut String, values: impl Iterator<Item = f64>, opts: FormatOptions) {
    out.push('(');
    for (i, v) in values.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        format_g(out, v, opts.digits);
    }
    out.push(')');
}

/// Append `v` in the style of C's `%.*g`, or shortest round-trip when `digits` is `None`.
pub(crate) fn format_g(out: &mut String, v: f64, digits: Option<usize>) {
    if v.is_nan() {
        out.push_str("NaN");
        return;
    }
    if v.is_infinite() {
        out.push_str(if v < 0.0 { "-Infinity" } else { "Infinity" });
        return;
    }
    let (sci, precision) = match digits {
        Some(p) => {
            let p = p.max(1);
            (alloc::format!("{:.*e}", p - 1, v), p)
        }
        None => (alloc::format!("{v:e}"), DBL_DIG),
    };
    // `sci` looks like `-1.2345e-7`.
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (neg, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => (true, m),
        None => (false, mantissa),
    };
    let mut digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
    }
    if neg {
        out.push('-');
    }
    let p = i32::try_from(precision).unwrap_or(i32::MAX);
    if exp < -4 || exp >= p {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exp.unsigned_abs());
    } else if exp >= 0 {
        let int_len = usize::try_from(exp).unwrap_or(0) + 1;
        if digits.len() <= int_len {
            out.push_str(&digits);
            out.extend(core::iter::repeat_n('0', int_len - digits.len()));
        } else {
            out.push_str(&digits[..int_len]);
            out.push('.');
            out.push_str(&digits[int_len..]);
        }
    } else {
        out.push_str("0.");
        let zeros = usize::try_from(-exp - 1).unwrap_or(0);
        out.extend(core::iter::repeat_n('0', zeros));
        out.push_str(&digits);
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Open,
    Close,
    OpenBracket,
    CloseBracket,
    Comma,
    Number(f64),
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<(Token, usize, usize)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self> {
        let mut tokens = Vec::new();
        let bytes = input.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            let single = match c {
                b'(' => Some(Token::Open),
                b')' => Some(Token::Close),
                b'[' => Some(Token::OpenBracket),
                b']' => Some(Token::CloseBracket),
                b',' => Some(Token::Comma),
                _ => None,
            };
            if let Some(tok) = single {
                tokens.push((tok, i, i + 1));
                i += 1;
                continue;
            }
            if c.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            let start = i;
            while i < bytes.len() && !b"()[],".contains(&bytes[i]) && !bytes[i].is_ascii_whitespace()
            {
                i += 1;
            }
            let text = &input[start..i];
            let value = text.parse::<f64>().map_err(|_| CubeError::Parse {
                token: text.to_string(),
                offset: start,
            })?;
            tokens.push((Token::Number(value), start, i));
        }
        Ok(Self {
            input,
            tokens,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.0)
    }

    fn unexpected(&self) -> CubeError {
        match self.tokens.get(self.pos) {
            Some((_, start, end)) => CubeError::Parse {
                token: self.input[*start..*end].to_string(),
                offset: *start,
            },
            None => CubeError::Parse {
                token: "end of input".to_string(),
                offset: self.input.len(),
            },
        }
    }

    fn expect(&mut self, want: &Token) -> Result<()> {
        if self.peek() == Some(want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn eat(&mut self, want: &Token) -> bool {
        if self.peek() == Some(want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn cube(mut self) -> Result<Cube> {
        let cube = match self.peek() {
            Some(Token::OpenBracket) => {
                self.pos += 1;
                let ll = self.paren_list()?;
                self.expect(&Token::Comma)?;
                let ur = self.paren_list()?;
                self.expect(&Token::CloseBracket)?;
                Self::range(&ll, &ur)?
            }
            Some(Token::Open) => {
                let ll = self.paren_list()?;
                if self.eat(&Token::Comma) {
                    let ur = self.paren_list()?;
                    Self::range(&ll, &ur)?
                } else {
                    Self::checked_point(&ll)?
                }
            }
            Some(Token::Number(_)) => {
                let ll = self.list()?;
                Self::checked_point(&ll)?
            }
            _ => return Err(self.unexpected()),
        };
        if self.pos != self.tokens.len() {
            return Err(self.unexpected());
        }
        Ok(cube)
    }

    fn paren_list(&mut self) -> Result<Vec<f64>> {
        self.expect(&Token::Open)?;
        if self.eat(&Token::Close) {
            return Ok(Vec::new());
        }
        let values = self.list()?;
        self.expect(&Token::Close)?;
        Ok(values)
    }

    fn list(&mut self) -> Result<Vec<f64>> {
        let mut values = Vec::new();
        loop {
            match self.peek() {
                Some(Token::Number(v)) => {
                    values.push(*v);
                    self.pos += 1;
                }
                _ => return Err(self.unexpected()),
            }
            if values.len() > CUBE_MAX_DIM {
                return Err(CubeError::TooManyDimensions {
                    dim: values.len(),
                    max: CUBE_MAX_DIM,
                });
            }
            // A comma followed by `(` separates the two corners, not list items.
            let more = self.peek() == Some(&Token::Comma)
                && matches!(self.tokens.get(self.pos + 1), Some((Token::Number(_), ..)));
            if !more {
                return Ok(values);
            }
            self.pos += 1;
        }
    }

    fn checked_point(values: &[f64]) -> Result<Cube> {
        Cube::point(values)
    }

    fn range(ll: &[f64], ur: &[f64]) -> Result<Cube> {
        Cube::from_corners(ll, ur)
    }
}
