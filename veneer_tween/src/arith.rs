// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value arithmetic for interpolation.
//!
//! A tween only needs a handful of operations on the values it animates:
//! addition and subtraction to form deltas, scaling by an eased progress
//! factor, division to turn a speed into a frame count, and an approximate
//! equality to detect no-op animations. [`Arithmetic`] captures exactly that
//! set. Implementations exist for:
//!
//! - `f64` scalars,
//! - N-dimensional [`Vector`]s (missing components read as zero),
//! - [`Color`]s (promoted to a 4-vector, see [`color`](crate::color)),
//! - [`AnimValue`], the closed union used when the value kind is only known
//!   at runtime (for example, a property bag entry).

use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::color::Color;

/// Tolerance used by [`Arithmetic::equals`].
pub const EPSILON: f64 = 1e-6;

/// Numeric operations over an interpolable value kind.
pub trait Arithmetic: Clone + PartialEq + fmt::Debug {
    /// The additive identity.
    fn zero() -> Self;

    /// The unit value.
    fn single() -> Self;

    /// Returns `self + rhs`.
    #[must_use]
    fn add(&self, rhs: &Self) -> Self;

    /// Returns `self - rhs`.
    #[must_use]
    fn sub(&self, rhs: &Self) -> Self;

    /// Returns `self × factor`.
    #[must_use]
    fn scale(&self, factor: f64) -> Self;

    /// Returns `self ÷ divisor`.
    #[must_use]
    fn div_scalar(&self, divisor: f64) -> Self;

    /// Returns the component-wise maximum of `|self_i| / |rhs_i|`.
    ///
    /// Components whose divisor is zero are skipped; if every divisor is zero
    /// the ratio is `0.0`. Used to convert a per-frame speed into a frame
    /// count.
    fn ratio(&self, rhs: &Self) -> f64;

    /// Returns whether `self` and `rhs` are equal within [`EPSILON`].
    fn equals(&self, rhs: &Self) -> bool;

    /// Returns the component-wise absolute value.
    #[must_use]
    fn abs(&self) -> Self;

    /// Returns whether `self` and `other` can take part in one interpolation.
    fn compatible(&self, other: &Self) -> bool {
        _ = other;
        true
    }

    /// Short name of the value kind, used in diagnostics.
    fn kind(&self) -> &'static str;
}

fn scalar_ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 {
        None
    } else {
        Some(num.abs() / den.abs())
    }
}

impl Arithmetic for f64 {
    fn zero() -> Self {
        0.0
    }

    fn single() -> Self {
        1.0
    }

    fn add(&self, rhs: &Self) -> Self {
        self + rhs
    }

    fn sub(&self, rhs: &Self) -> Self {
        self - rhs
    }

    fn scale(&self, factor: f64) -> Self {
        self * factor
    }

    fn div_scalar(&self, divisor: f64) -> Self {
        self / divisor
    }

    fn ratio(&self, rhs: &Self) -> f64 {
        scalar_ratio(*self, *rhs).unwrap_or(0.0)
    }

    fn equals(&self, rhs: &Self) -> bool {
        (self - rhs).abs() <= EPSILON
    }

    fn abs(&self) -> Self {
        (*self).abs()
    }

    fn kind(&self) -> &'static str {
        "scalar"
    }
}

/// An N-dimensional vector of `f64` components.
///
/// Binary operations run over the longer operand's length; components missing
/// from the shorter operand read as zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vector(pub Vec<f64>);

impl Vector {
    /// Creates a vector from its components.
    #[must_use]
    pub fn new(components: impl Into<Vec<f64>>) -> Self {
        Self(components.into())
    }

    /// Returns the components.
    #[must_use]
    pub fn components(&self) -> &[f64] {
        &self.0
    }

    /// Returns the component at `i`, or zero if out of range.
    #[must_use]
    pub fn get(&self, i: usize) -> f64 {
        self.0.get(i).copied().unwrap_or(0.0)
    }

    /// Returns the Euclidean length.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.0.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    fn zip_with(&self, rhs: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let len = self.0.len().max(rhs.0.len());
        Self((0..len).map(|i| f(self.get(i), rhs.get(i))).collect())
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.iter().map(|&c| f(c)).collect())
    }
}

impl Arithmetic for Vector {
    fn zero() -> Self {
        Self(Vec::new())
    }

    fn single() -> Self {
        Self(alloc::vec![1.0])
    }

    fn add(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, |a, b| a + b)
    }

    fn sub(&self, rhs: &Self) -> Self {
        self.zip_with(rhs, |a, b| a - b)
    }

    fn scale(&self, factor: f64) -> Self {
        self.map(|c| c * factor)
    }

    fn div_scalar(&self, divisor: f64) -> Self {
        self.map(|c| c / divisor)
    }

    fn ratio(&self, rhs: &Self) -> f64 {
        let len = self.0.len().max(rhs.0.len());
        (0..len)
            .filter_map(|i| scalar_ratio(self.get(i), rhs.get(i)))
            .fold(0.0, f64::max)
    }

    fn equals(&self, rhs: &Self) -> bool {
        let len = self.0.len().max(rhs.0.len());
        (0..len).all(|i| (self.get(i) - rhs.get(i)).abs() <= EPSILON)
    }

    fn abs(&self) -> Self {
        self.map(|c| c.abs())
    }

    fn kind(&self) -> &'static str {
        "vector"
    }
}

/// A value whose interpolable kind is decided at runtime.
///
/// Two `AnimValue`s are [`compatible`](Arithmetic::compatible) only when they
/// hold the same variant. Operations on incompatible operands return `self`
/// unchanged; [`Tween`](crate::tween::Tween) rejects such pairs before
/// interpolating.
#[derive(Clone, Debug, PartialEq)]
pub enum AnimValue {
    /// A single number.
    Scalar(f64),
    /// A list of numbers.
    Vector(Vector),
    /// A color with alpha.
    Color(Color),
}

impl AnimValue {
    /// Returns the scalar value, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the color, if this is a color.
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    fn zip(
        &self,
        rhs: &Self,
        scalar: fn(&f64, &f64) -> f64,
        vector: fn(&Vector, &Vector) -> Vector,
        color: fn(&Color, &Color) -> Color,
    ) -> Self {
        match (self, rhs) {
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(scalar(a, b)),
            (Self::Vector(a), Self::Vector(b)) => Self::Vector(vector(a, b)),
            (Self::Color(a), Self::Color(b)) => Self::Color(color(a, b)),
            _ => self.clone(),
        }
    }
}

impl From<f64> for AnimValue {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vector> for AnimValue {
    fn from(value: Vector) -> Self {
        Self::Vector(value)
    }
}

impl From<Color> for AnimValue {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

impl Arithmetic for AnimValue {
    fn zero() -> Self {
        Self::Scalar(0.0)
    }

    fn single() -> Self {
        Self::Scalar(1.0)
    }

    fn add(&self, rhs: &Self) -> Self {
        self.zip(
            rhs,
            <f64 as Arithmetic>::add,
            <Vector as Arithmetic>::add,
            <Color as Arithmetic>::add,
        )
    }

    fn sub(&self, rhs: &Self) -> Self {
        self.zip(
            rhs,
            <f64 as Arithmetic>::sub,
            <Vector as Arithmetic>::sub,
            <Color as Arithmetic>::sub,
        )
    }

    fn scale(&self, factor: f64) -> Self {
        match self {
            Self::Scalar(v) => Self::Scalar(v.scale(factor)),
            Self::Vector(v) => Self::Vector(v.scale(factor)),
            Self::Color(c) => Self::Color(c.scale(factor)),
        }
    }

    fn div_scalar(&self, divisor: f64) -> Self {
        match self {
            Self::Scalar(v) => Self::Scalar(v.div_scalar(divisor)),
            Self::Vector(v) => Self::Vector(v.div_scalar(divisor)),
            Self::Color(c) => Self::Color(c.div_scalar(divisor)),
        }
    }

    fn ratio(&self, rhs: &Self) -> f64 {
        match (self, rhs) {
            (Self::Scalar(a), Self::Scalar(b)) => a.ratio(b),
            (Self::Vector(a), Self::Vector(b)) => a.ratio(b),
            (Self::Color(a), Self::Color(b)) => a.ratio(b),
            _ => 0.0,
        }
    }

    fn equals(&self, rhs: &Self) -> bool {
        match (self, rhs) {
            (Self::Scalar(a), Self::Scalar(b)) => a.equals(b),
            (Self::Vector(a), Self::Vector(b)) => a.equals(b),
            (Self::Color(a), Self::Color(b)) => a.equals(b),
            _ => false,
        }
    }

    fn abs(&self) -> Self {
        match self {
            Self::Scalar(v) => Self::Scalar(<f64 as Arithmetic>::abs(v)),
            Self::Vector(v) => Self::Vector(v.abs()),
            Self::Color(c) => Self::Color(c.abs()),
        }
    }

    fn compatible(&self, other: &Self) -> bool {
        core::mem::discriminant(self) == core::mem::discriminant(other)
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Vector(_) => "vector",
            Self::Color(_) => "color",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_ops() {
        assert_eq!(2.0_f64.add(&3.0), 5.0);
        assert_eq!(2.0_f64.sub(&3.0), -1.0);
        assert_eq!(2.0_f64.scale(4.0), 8.0);
        assert_eq!(8.0_f64.div_scalar(4.0), 2.0);
        assert_eq!((-3.0_f64).abs(), 3.0);
        assert!(1.0_f64.equals(&(1.0 + 1e-9)));
        assert!(!1.0_f64.equals(&1.1));
    }

    #[test]
    fn scalar_ratio_skips_zero_divisor() {
        assert_eq!(100.0_f64.ratio(&10.0), 10.0);
        assert_eq!(100.0_f64.ratio(&0.0), 0.0);
    }

    #[test]
    fn vector_pads_missing_components() {
        let a = Vector::new([1.0, 2.0, 3.0]);
        let b = Vector::new([1.0]);
        assert_eq!(a.add(&b), Vector::new([2.0, 2.0, 3.0]));
        assert_eq!(b.sub(&a), Vector::new([0.0, -2.0, -3.0]));
        assert!(Vector::zero().equals(&Vector::new([0.0, 0.0])));
    }

    #[test]
    fn vector_ratio_is_component_max() {
        let delta = Vector::new([100.0, 30.0]);
        let speed = Vector::new([10.0, 1.0]);
        assert_eq!(delta.ratio(&speed), 30.0);
    }

    #[test]
    fn vector_magnitude() {
        assert!((Vector::new([3.0, 4.0]).magnitude() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn anim_value_kinds_are_not_mixed() {
        let a = AnimValue::Scalar(1.0);
        let b = AnimValue::Vector(Vector::new([1.0]));
        assert!(!a.compatible(&b));
        assert!(!a.equals(&b));
        assert_eq!(a.add(&b), a);
        assert_eq!(a.kind(), "scalar");
        assert_eq!(b.kind(), "vector");
    }

    #[test]
    fn anim_value_dispatches_to_inner_kind() {
        let a = AnimValue::Scalar(10.0);
        let b = AnimValue::Scalar(4.0);
        assert_eq!(a.sub(&b), AnimValue::Scalar(6.0));
        assert_eq!(a.ratio(&b), 2.5);
        assert_eq!(AnimValue::Scalar(-2.0).abs(), AnimValue::Scalar(2.0));
    }
}
