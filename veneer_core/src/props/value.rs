// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property values and the value-kind registry.

use std::fmt;
use std::rc::Rc;

use veneer_tween::{AnimValue, Color, SharedTween, TweenInstruction, Vector};

use crate::backend::SurfaceEvent;

/// A plain, non-animated property value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// A number (points, factors, degrees; the key decides).
    Number(f64),
    /// A free-form string, such as `"50%"` or `"#ff0000"`.
    Text(String),
    /// A boolean.
    Bool(bool),
    /// A color.
    Color(Color),
    /// A list of literals.
    Array(Vec<Literal>),
    /// An enumerated keyword, such as `row` or `hidden`.
    Keyword(String),
}

impl Literal {
    /// Returns the number, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string content of a text or keyword literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Keyword(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a color for color literals and parseable color strings.
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            Self::Text(s) | Self::Keyword(s) => Color::parse(s),
            _ => None,
        }
    }

    /// Converts an animated value back into a literal for the live view.
    #[must_use]
    pub fn from_anim(value: &AnimValue) -> Self {
        match value {
            AnimValue::Scalar(n) => Self::Number(*n),
            AnimValue::Color(c) => Self::Color(*c),
            AnimValue::Vector(v) => {
                Self::Array(v.components().iter().copied().map(Self::Number).collect())
            }
        }
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Color> for Literal {
    fn from(value: Color) -> Self {
        Self::Color(value)
    }
}

/// An interpolable value kind.
///
/// [`ValueKind::REGISTRY`] lists the kinds in detection order; the first kind
/// whose [`test`](Self::test) accepts a literal decides how it is parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Plain numbers.
    Scalar,
    /// Colors, either literal or as `#hex` / `rgb()` / `rgba()` strings.
    Color,
    /// Arrays of numbers.
    Vector,
}

impl ValueKind {
    /// Every kind, in detection order.
    pub const REGISTRY: [Self; 3] = [Self::Scalar, Self::Color, Self::Vector];

    /// Returns whether `literal` is a value of this kind.
    #[must_use]
    pub fn test(self, literal: &Literal) -> bool {
        match self {
            Self::Scalar => matches!(literal, Literal::Number(_)),
            Self::Color => literal.as_color().is_some(),
            Self::Vector => match literal {
                Literal::Array(items) => items.iter().all(|i| i.as_number().is_some()),
                _ => false,
            },
        }
    }

    /// Parses `literal` as this kind.
    #[must_use]
    pub fn parse(self, literal: &Literal) -> Option<AnimValue> {
        match (self, literal) {
            (Self::Scalar, Literal::Number(n)) => Some(AnimValue::Scalar(*n)),
            (Self::Color, _) => literal.as_color().map(AnimValue::Color),
            (Self::Vector, Literal::Array(items)) => items
                .iter()
                .map(Literal::as_number)
                .collect::<Option<Vec<_>>>()
                .map(|c| AnimValue::Vector(Vector::new(c))),
            _ => None,
        }
    }

    /// Returns the first registered kind that accepts `literal`.
    #[must_use]
    pub fn detect(literal: &Literal) -> Option<Self> {
        Self::REGISTRY.into_iter().find(|k| k.test(literal))
    }
}

/// Parses a literal into an interpolable value using the kind registry.
#[must_use]
pub fn parse_anim(literal: &Literal) -> Option<AnimValue> {
    ValueKind::detect(literal).and_then(|k| k.parse(literal))
}

/// A shared event-handler reference, compared by identity.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&SurfaceEvent)>);

impl EventHandler {
    /// Wraps a closure.
    pub fn new(f: impl Fn(&SurfaceEvent) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the handler.
    pub fn call(&self, event: &SurfaceEvent) {
        (self.0)(event);
    }
}

impl PartialEq for EventHandler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// A value stored under a property key.
#[derive(Clone, Debug, PartialEq)]
pub enum PropValue {
    /// A plain value.
    Literal(Literal),
    /// An animation request, applied to the property's tween slot.
    Instruction(TweenInstruction<AnimValue>),
    /// An externally owned tween bound to the property.
    Tween(SharedTween<AnimValue>),
    /// An event handler.
    Handler(EventHandler),
}

impl PropValue {
    /// Returns the literal, if this is a literal.
    #[must_use]
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Literal> for PropValue {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Literal(Literal::Number(value))
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Literal(Literal::Text(value.into()))
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Literal(Literal::Bool(value))
    }
}

impl From<Color> for PropValue {
    fn from(value: Color) -> Self {
        Self::Literal(Literal::Color(value))
    }
}

impl From<TweenInstruction<AnimValue>> for PropValue {
    fn from(value: TweenInstruction<AnimValue>) -> Self {
        Self::Instruction(value)
    }
}

impl From<SharedTween<AnimValue>> for PropValue {
    fn from(value: SharedTween<AnimValue>) -> Self {
        Self::Tween(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        Self::Handler(value)
    }
}
