// Copyright 2026 the Veneer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intrinsic text sizing.

use kurbo::Size;

use crate::cascade::TextStyle;

/// Glyph advance as a fraction of the font size.
const ADVANCE: f64 = 0.6;

/// Measures a text surface's content with a monospace estimate.
///
/// Each glyph advances `font_size × 0.6 + letter_spacing`; each line is
/// `font_size × line_height` tall. With word wrap on and a definite
/// available width, words are packed greedily into lines.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMeasure {
    /// Text content.
    pub content: String,
    /// Font size in points.
    pub font_size: f64,
    /// Extra space between glyphs.
    pub letter_spacing: f64,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Whether to wrap at word boundaries.
    pub word_wrap: bool,
}

impl TextMeasure {
    /// Builds a measure for `content` under an effective style.
    #[must_use]
    pub fn new(content: impl Into<String>, style: &TextStyle) -> Self {
        Self {
            content: content.into(),
            font_size: style.font_size,
            letter_spacing: style.letter_spacing,
            line_height: style.line_height,
            word_wrap: style.word_wrap,
        }
    }

    fn advance(&self) -> f64 {
        self.font_size * ADVANCE + self.letter_spacing
    }

    fn width_of(&self, chars: usize) -> f64 {
        chars as f64 * self.advance()
    }

    /// Returns the size of the content, given any already-known dimension and
    /// the available width.
    #[must_use]
    pub fn measure(&self, known: (Option<f64>, Option<f64>), available_width: Option<f64>) -> Size {
        if let (Some(w), Some(h)) = known {
            return Size::new(w, h);
        }
        let wrap_at = if self.word_wrap {
            known.0.or(available_width)
        } else {
            None
        };
        let mut lines = 0_usize;
        let mut widest = 0_usize;
        for paragraph in self.content.split('\n') {
            for line in self.wrap(paragraph, wrap_at) {
                lines += 1;
                widest = widest.max(line);
            }
        }
        let height = lines.max(1) as f64 * self.font_size * self.line_height;
        Size::new(
            known.0.unwrap_or_else(|| self.width_of(widest)),
            known.1.unwrap_or(height),
        )
    }

    /// Splits one paragraph into line lengths, in glyphs.
    fn wrap(&self, paragraph: &str, width: Option<f64>) -> Vec<usize> {
        let full = paragraph.chars().count();
        let Some(width) = width else {
            return vec![full];
        };
        let mut lines = Vec::new();
        let mut current = 0_usize;
        for word in paragraph.split(' ') {
            let len = word.chars().count();
            let candidate = if current == 0 { len } else { current + 1 + len };
            if current > 0 && self.width_of(candidate) > width {
                lines.push(current);
                current = len;
            } else {
                current = candidate;
            }
        }
        lines.push(current);
        lines
    }
}
