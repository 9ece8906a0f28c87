// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property key classification.

/// The two key classes the diff engine distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyClass {
    /// `onXxx` event-handler keys, compared by identity.
    Handler,
    /// Every other key, compared by value.
    Value,
}

impl KeyClass {
    /// Classifies `key`.
    #[must_use]
    pub fn of(key: &str) -> Self {
        if is_handler_key(key) {
            Self::Handler
        } else {
            Self::Value
        }
    }
}

/// Returns whether `key` names an event handler (`on` followed by an
/// uppercase letter).
#[must_use]
pub fn is_handler_key(key: &str) -> bool {
    key.strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase())
}

/// Inherited text-style keys.
pub const TEXT_KEYS: [&str; 8] = [
    "fontFamily",
    "fontSize",
    "fontWeight",
    "color",
    "letterSpacing",
    "lineHeight",
    "wordWrap",
    "textAlign",
];

/// The key holding a text node's content.
pub const TEXT_CONTENT: &str = "text";

/// Returns whether `key` is an inherited text-style key.
#[must_use]
pub fn is_text_key(key: &str) -> bool {
    TEXT_KEYS.contains(&key)
}

/// Keys read at paint time: transforms, fills, and the effect predicates.
pub const PAINT_KEYS: [&str; 19] = [
    "backgroundColor",
    "backgroundImage",
    "borderColor",
    "borderRadius",
    "borderWidth",
    "borderTopWidth",
    "borderRightWidth",
    "borderBottomWidth",
    "borderLeftWidth",
    "overflow",
    "opacity",
    "scale",
    "scaleX",
    "scaleY",
    "rotation",
    "skewX",
    "skewY",
    "imageFit",
    "imagePosition",
];

/// Returns whether `key` affects painting.
#[must_use]
pub fn is_paint_key(key: &str) -> bool {
    PAINT_KEYS.contains(&key) || key == TEXT_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_keys() {
        assert!(is_handler_key("onClick"));
        assert!(is_handler_key("onMouseEnter"));
        assert!(!is_handler_key("on"));
        assert!(!is_handler_key("onion"));
        assert!(!is_handler_key("opacity"));
        assert_eq!(KeyClass::of("onClick"), KeyClass::Handler);
        assert_eq!(KeyClass::of("width"), KeyClass::Value);
    }

    #[test]
    fn paint_and_text_keys() {
        assert!(is_text_key("fontSize"));
        assert!(!is_text_key("width"));
        assert!(is_paint_key("imagePosition"));
        assert!(is_paint_key("text"));
        assert!(!is_paint_key("flexGrow"));
    }
}
