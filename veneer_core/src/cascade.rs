// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Inherited text styling.
//!
//! Each surface may set any of the [`TEXT_KEYS`](crate::props::keys::TEXT_KEYS).
//! Its effective [`TextStyle`] is its own explicit fields layered over its
//! parent's effective style, down from [`TextStyle::default`] at the root.
//!
//! The tree memoizes effective styles per surface in a [`CascadeEntry`]
//! keyed by a fingerprint of the surface's own fields combined with its
//! parent's fingerprint. A write marks the `CASCADE` dirty channel with eager
//! propagation, which stales the whole subtree; the next read recomputes
//! fingerprints top-down and rebuilds only entries whose fingerprint moved.

use std::hash::{DefaultHasher, Hash, Hasher};

use veneer_tween::Color;

use crate::error::SurfaceError;
use crate::props::Literal;

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Leading edge.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Trailing edge.
    End,
    /// Justified.
    Justify,
}

/// A fully resolved text style.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in points.
    pub font_size: f64,
    /// Font weight, 100–900.
    pub font_weight: f64,
    /// Text color.
    pub color: Color,
    /// Extra space between glyphs, in points.
    pub letter_spacing: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Whether lines wrap at word boundaries.
    pub word_wrap: bool,
    /// Alignment.
    pub text_align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".into(),
            font_size: 16.0,
            font_weight: 400.0,
            color: Color::BLACK,
            letter_spacing: 0.0,
            line_height: 1.3,
            word_wrap: false,
            text_align: TextAlign::Start,
        }
    }
}

/// The text fields a surface sets explicitly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextOverrides {
    /// `fontFamily`.
    pub font_family: Option<String>,
    /// `fontSize`.
    pub font_size: Option<f64>,
    /// `fontWeight`.
    pub font_weight: Option<f64>,
    /// `color`.
    pub color: Option<Color>,
    /// `letterSpacing`.
    pub letter_spacing: Option<f64>,
    /// `lineHeight`.
    pub line_height: Option<f64>,
    /// `wordWrap`.
    pub word_wrap: Option<bool>,
    /// `textAlign`.
    pub text_align: Option<TextAlign>,
}

fn number(key: &str, v: &Literal) -> Result<f64, SurfaceError> {
    v.as_number().ok_or_else(|| SurfaceError::invalid(key, v))
}

impl TextOverrides {
    /// Reads the text keys through `get`, which returns live values.
    pub fn read(get: impl Fn(&str) -> Option<Literal>) -> Result<Self, SurfaceError> {
        let mut o = Self::default();
        if let Some(v) = get("fontFamily") {
            let s = v.as_str().ok_or_else(|| SurfaceError::invalid("fontFamily", &v))?;
            o.font_family = Some(s.into());
        }
        if let Some(v) = get("fontSize") {
            o.font_size = Some(number("fontSize", &v)?);
        }
        if let Some(v) = get("fontWeight") {
            o.font_weight = Some(match (&v, v.as_str()) {
                (_, Some("normal")) => 400.0,
                (_, Some("bold")) => 700.0,
                (Literal::Number(n), _) => *n,
                _ => return Err(SurfaceError::invalid("fontWeight", &v)),
            });
        }
        if let Some(v) = get("color") {
            o.color = Some(v.as_color().ok_or_else(|| SurfaceError::invalid("color", &v))?);
        }
        if let Some(v) = get("letterSpacing") {
            o.letter_spacing = Some(number("letterSpacing", &v)?);
        }
        if let Some(v) = get("lineHeight") {
            o.line_height = Some(number("lineHeight", &v)?);
        }
        if let Some(v) = get("wordWrap") {
            o.word_wrap = Some(match (v.as_bool(), v.as_str()) {
                (Some(b), _) => b,
                (_, Some("break-word" | "wrap")) => true,
                (_, Some("normal" | "nowrap")) => false,
                _ => return Err(SurfaceError::invalid("wordWrap", &v)),
            });
        }
        if let Some(v) = get("textAlign") {
            o.text_align = Some(match v.as_str() {
                Some("left" | "start") => TextAlign::Start,
                Some("center") => TextAlign::Center,
                Some("right" | "end") => TextAlign::End,
                Some("justify") => TextAlign::Justify,
                _ => return Err(SurfaceError::invalid("textAlign", &v)),
            });
        }
        Ok(o)
    }

    /// Returns whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layers these fields over `parent`.
    #[must_use]
    pub fn apply(&self, parent: &TextStyle) -> TextStyle {
        TextStyle {
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| parent.font_family.clone()),
            font_size: self.font_size.unwrap_or(parent.font_size),
            font_weight: self.font_weight.unwrap_or(parent.font_weight),
            color: self.color.unwrap_or(parent.color),
            letter_spacing: self.letter_spacing.unwrap_or(parent.letter_spacing),
            line_height: self.line_height.unwrap_or(parent.line_height),
            word_wrap: self.word_wrap.unwrap_or(parent.word_wrap),
            text_align: self.text_align.unwrap_or(parent.text_align),
        }
    }

    /// Fingerprint of these fields chained onto the parent's fingerprint.
    #[must_use]
    pub fn fingerprint(&self, parent: u64) -> u64 {
        let mut h = DefaultHasher::new();
        parent.hash(&mut h);
        self.font_family.hash(&mut h);
        let bits = |v: Option<f64>| v.map(f64::to_bits);
        bits(self.font_size).hash(&mut h);
        bits(self.font_weight).hash(&mut h);
        self.color
            .map(|c| [c.r, c.g, c.b, c.a].map(f64::to_bits))
            .hash(&mut h);
        bits(self.letter_spacing).hash(&mut h);
        bits(self.line_height).hash(&mut h);
        self.word_wrap.hash(&mut h);
        self.text_align.hash(&mut h);
        h.finish()
    }
}

/// Fingerprint of the default style the root inherits from.
pub const ROOT_FINGERPRINT: u64 = 0;

/// A memoized effective style.
#[derive(Clone, Debug, PartialEq)]
pub struct CascadeEntry {
    /// Fingerprint the style was computed for.
    pub fingerprint: u64,
    /// The effective style.
    pub style: TextStyle,
}

impl CascadeEntry {
    /// Resolves the entry for a surface with `own` fields under `parent`,
    /// reusing `cached` when the fingerprint matches. Returns the entry and
    /// whether the style was rebuilt.
    #[must_use]
    pub fn resolve(
        cached: Option<&Self>,
        own: &TextOverrides,
        parent: (&TextStyle, u64),
    ) -> (Self, bool) {
        let fingerprint = own.fingerprint(parent.1);
        match cached {
            Some(c) if c.fingerprint == fingerprint => (c.clone(), false),
            _ => (
                Self {
                    fingerprint,
                    style: own.apply(parent.0),
                },
                true,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, Literal)]) -> impl Fn(&str) -> Option<Literal> {
        let owned: Vec<(String, Literal)> =
            pairs.iter().map(|(k, v)| ((*k).into(), v.clone())).collect();
        move |key: &str| owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn own_fields_override_parent() {
        let parent = TextOverrides::read(lookup(&[("fontSize", 20.0.into()), ("color", "#f00".into())]))
            .unwrap()
            .apply(&TextStyle::default());
        let child = TextOverrides::read(lookup(&[("fontSize", 12.0.into())]))
            .unwrap()
            .apply(&parent);
        assert_eq!(child.font_size, 12.0);
        assert_eq!(child.color, Color::rgb(255.0, 0.0, 0.0), "inherited");
        assert_eq!(child.font_family, "sans-serif");
    }

    #[test]
    fn keyword_values() {
        let o = TextOverrides::read(lookup(&[
            ("fontWeight", Literal::Keyword("bold".into())),
            ("textAlign", Literal::Keyword("center".into())),
            ("wordWrap", Literal::Bool(true)),
        ]))
        .unwrap();
        assert_eq!(o.font_weight, Some(700.0));
        assert_eq!(o.text_align, Some(TextAlign::Center));
        assert_eq!(o.word_wrap, Some(true));
        assert!(TextOverrides::read(lookup(&[("textAlign", "diagonal".into())])).is_err());
    }

    #[test]
    fn fingerprints_chain_through_parents() {
        let own = TextOverrides {
            font_size: Some(14.0),
            ..TextOverrides::default()
        };
        assert_eq!(own.fingerprint(1), own.fingerprint(1));
        assert_ne!(own.fingerprint(1), own.fingerprint(2), "parent change moves the child");
        assert_ne!(own.fingerprint(1), TextOverrides::default().fingerprint(1));
    }

    #[test]
    fn entries_are_reused_on_matching_fingerprint() {
        let base = TextStyle::default();
        let own = TextOverrides::default();
        let (first, rebuilt) = CascadeEntry::resolve(None, &own, (&base, ROOT_FINGERPRINT));
        assert!(rebuilt);
        let (second, rebuilt) = CascadeEntry::resolve(Some(&first), &own, (&base, ROOT_FINGERPRINT));
        assert!(!rebuilt, "same fingerprint, same style");
        assert_eq!(first, second);
    }
}
