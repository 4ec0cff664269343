//! Character spans and the conversion between the two span conventions.
//!
//! Annotation spans are inclusive on both ends: `[start, end]` names the
//! first and the last character of the annotated text. Token, sentence and
//! section spans are half-open: `[start, end)`. All offsets count characters
//! (Unicode scalar values), not bytes.
//!
//! ```text
//!  text:       J o h n _ m e t
//!  offset:     0 1 2 3 4 5 6 7
//!  annotation: [0,3]     "John"
//!  char span:  [0,4)     "John"
//! ```
//!
//! [`inclusive_to_half_open`] and [`half_open_to_inclusive`] are the only
//! places where a span end moves by one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Errors raised while building spans or slicing text with them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpanError {
    /// The inclusive end lies before the start.
    #[error("inverted span: end {end} is before start {start}")]
    Inverted { start: usize, end: usize },

    /// The span reaches past the end of the text.
    #[error("span {start}..{end} is out of bounds for text of {len} characters")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Convert an inclusive annotation range into a half-open character span.
///
/// Fails when `end < start`: an inclusive span always covers at least one
/// character.
pub fn inclusive_to_half_open(start: usize, end: usize) -> Result<CharSpan, SpanError> {
    if end < start {
        return Err(SpanError::Inverted { start, end });
    }
    Ok(CharSpan::new(start, end + 1))
}

/// Convert a half-open character span into an inclusive `(start, end)` pair.
///
/// Returns `None` for an empty span, which has no last character.
pub fn half_open_to_inclusive(span: CharSpan) -> Option<(usize, usize)> {
    if span.is_empty() {
        None
    } else {
        Some((span.start, span.end - 1))
    }
}

/// A half-open `[start, end)` character span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharSpan {
    /// First character (inclusive)
    pub start: usize,
    /// One past the last character (exclusive)
    pub end: usize,
}

impl CharSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true if `offset` falls inside `[start, end)`.
    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if `other` lies entirely within this span.
    pub fn contains(&self, other: &CharSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for CharSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start, self.end)
    }
}

/// An inclusive `[start, end]` annotation span with its literal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationSpan {
    /// First annotated character (inclusive)
    pub start: usize,
    /// Last annotated character (inclusive)
    pub end: usize,
    /// The text as written in the annotation file
    pub text: String,
}

impl AnnotationSpan {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// The half-open character span covering the annotated characters.
    pub fn char_span(&self) -> Result<CharSpan, SpanError> {
        inclusive_to_half_open(self.start, self.end)
    }
}

impl fmt::Display for AnnotationSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{},{}] \"{}\"",
            self.start,
            self.end,
            self.text.replace('\n', "\\n")
        )
    }
}

/// Canonical document text, addressable by character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    text: String,
    /// Byte offset of every character, plus the total byte length
    char_to_byte: Vec<usize>,
}

impl DocumentText {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self { text, char_to_byte }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of characters in the text.
    pub fn char_len(&self) -> usize {
        self.char_to_byte.len() - 1
    }

    /// Byte offset of a character offset; `char_len()` maps to the byte length.
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.char_to_byte.get(char_offset).copied()
    }

    /// Character offset of a byte offset that sits on a character boundary.
    pub fn char_offset(&self, byte_offset: usize) -> Option<usize> {
        self.char_to_byte.binary_search(&byte_offset).ok()
    }

    /// Slice the text by a half-open character span.
    pub fn slice(&self, span: CharSpan) -> Result<&str, SpanError> {
        let out_of_bounds = SpanError::OutOfBounds {
            start: span.start,
            end: span.end,
            len: self.char_len(),
        };
        if span.end < span.start {
            return Err(out_of_bounds);
        }
        match (self.byte_offset(span.start), self.byte_offset(span.end)) {
            (Some(start), Some(end)) => Ok(&self.text[start..end]),
            _ => Err(out_of_bounds),
        }
    }
}

impl From<&str> for DocumentText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

/// Undo the `&amp;` escape before comparing annotation text with document text.
pub fn normalize_entities(text: &str) -> String {
    text.replace("&amp;", "&")
}
