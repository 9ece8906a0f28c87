// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colors with alpha.
//!
//! Color arithmetic is vector arithmetic: a [`Color`] is promoted to the
//! 4-component [`Vector`] `[r, g, b, a]`, the operation runs on the vector,
//! and the result is converted back with alpha clamped to `[0, 1]`. Channel
//! values are not clamped, so intermediate deltas (which may be negative)
//! survive a round trip through the arithmetic.

use crate::arith::{Arithmetic, Vector};

/// An RGBA color. Red, green, and blue are in `[0, 255]`; alpha is in
/// `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255.0, 255.0, 255.0);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color with alpha.
    #[must_use]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Promotes the color to the vector `[r, g, b, a]`.
    #[must_use]
    pub fn to_vector(self) -> Vector {
        Vector::new([self.r, self.g, self.b, self.a])
    }

    /// Converts a vector back into a color, clamping alpha to `[0, 1]`.
    #[must_use]
    pub fn from_vector(v: &Vector) -> Self {
        Self {
            r: v.get(0),
            g: v.get(1),
            b: v.get(2),
            a: v.get(3).clamp(0.0, 1.0),
        }
    }

    /// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
    /// `rgba(r, g, b, a)` notations.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        let (body, has_alpha) = if let Some(rest) = s.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = s.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };
        let mut parts = body.split(',').map(|p| p.trim().parse::<f64>());
        let r = parts.next()?.ok()?;
        let g = parts.next()?.ok()?;
        let b = parts.next()?.ok()?;
        let a = if has_alpha { parts.next()?.ok()? } else { 1.0 };
        if parts.next().is_some() {
            return None;
        }
        Some(Self::rgba(r, g, b, a.clamp(0.0, 1.0)))
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(hex.get(i..=i)?, 16).ok();
    let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 | 4 => {
            let r = digit(0)? * 17;
            let g = digit(1)? * 17;
            let b = digit(2)? * 17;
            let a = if hex.len() == 4 { digit(3)? * 17 } else { 255 };
            (r, g, b, a)
        }
        6 | 8 => {
            let a = if hex.len() == 8 { pair(6)? } else { 255 };
            (pair(0)?, pair(2)?, pair(4)?, a)
        }
        _ => return None,
    };
    Some(Color::rgba(
        f64::from(r),
        f64::from(g),
        f64::from(b),
        f64::from(a) / 255.0,
    ))
}

impl Arithmetic for Color {
    fn zero() -> Self {
        Self::TRANSPARENT
    }

    fn single() -> Self {
        Self::rgba(1.0, 1.0, 1.0, 1.0)
    }

    fn add(&self, rhs: &Self) -> Self {
        Self::from_vector(&self.to_vector().add(&rhs.to_vector()))
    }

    fn sub(&self, rhs: &Self) -> Self {
        Self::from_vector(&self.to_vector().sub(&rhs.to_vector()))
    }

    fn scale(&self, factor: f64) -> Self {
        Self::from_vector(&self.to_vector().scale(factor))
    }

    fn div_scalar(&self, divisor: f64) -> Self {
        Self::from_vector(&self.to_vector().div_scalar(divisor))
    }

    fn ratio(&self, rhs: &Self) -> f64 {
        self.to_vector().ratio(&rhs.to_vector())
    }

    fn equals(&self, rhs: &Self) -> bool {
        self.to_vector().equals(&rhs.to_vector())
    }

    fn abs(&self) -> Self {
        Self::from_vector(&self.to_vector().abs())
    }

    fn kind(&self) -> &'static str {
        "color"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse("#ff0000"), Some(Color::rgb(255.0, 0.0, 0.0)));
        assert_eq!(Color::parse("#0f0"), Some(Color::rgb(0.0, 255.0, 0.0)));
        let c = Color::parse("#0000ff80").unwrap();
        assert_eq!((c.r, c.g, c.b), (0.0, 0.0, 255.0));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-12);
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#gg0000"), None);
    }

    #[test]
    fn parses_functional_forms() {
        assert_eq!(
            Color::parse("rgb(10, 20, 30)"),
            Some(Color::rgb(10.0, 20.0, 30.0))
        );
        assert_eq!(
            Color::parse("rgba(10,20,30,0.5)"),
            Some(Color::rgba(10.0, 20.0, 30.0, 0.5))
        );
        assert_eq!(Color::parse("rgb(1, 2)"), None);
        assert_eq!(Color::parse("hsl(1, 2, 3)"), None);
    }

    #[test]
    fn alpha_is_clamped_after_arithmetic() {
        let a = Color::rgba(100.0, 100.0, 100.0, 0.8);
        let b = Color::rgba(50.0, 50.0, 50.0, 0.6);
        let sum = a.add(&b);
        assert_eq!(sum.r, 150.0);
        assert_eq!(sum.a, 1.0);
        let diff = b.sub(&a);
        assert_eq!(diff.r, -50.0);
        assert_eq!(diff.a, 0.0);
    }

    #[test]
    fn interpolation_midpoint() {
        let from = Color::rgb(0.0, 0.0, 0.0);
        let to = Color::rgb(255.0, 0.0, 100.0);
        let mid = from.add(&to.sub(&from).scale(0.5));
        assert!(mid.equals(&Color::rgb(127.5, 0.0, 50.0)));
    }
}
