//! Token stream input and a built-in word tokenizer.
//!
//! The engine treats tokenization as an external collaborator: any
//! [`Tokenizer`] that yields ordered sentences of [`WordToken`]s with
//! character offsets can feed sentence placement. [`SimpleTokenizer`] is a
//! fallback for documents that arrive without a tokenization.

use crate::document::SourceDocument;
use crate::span::CharSpan;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// A word produced by a tokenizer, with half-open character offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordToken {
    pub word: String,
    pub start: usize,
    pub end: usize,
}

impl WordToken {
    pub fn new(word: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }

    pub fn span(&self) -> CharSpan {
        CharSpan::new(self.start, self.end)
    }
}

/// Ordered sentences, each an ordered list of word tokens.
pub type TokenStream = Vec<Vec<WordToken>>;

/// Splits a document into sentences of word tokens.
pub trait Tokenizer {
    fn tokenize(&self, document: &SourceDocument) -> TokenStream;
}

/// Word-boundary tokenizer with punctuation-based sentence splitting.
///
/// Sentences never cross section boundaries, so every sentence it produces
/// can be placed.
#[derive(Debug, Clone)]
pub struct SimpleTokenizer {
    terminators: Vec<String>,
}

impl Default for SimpleTokenizer {
    fn default() -> Self {
        Self {
            terminators: vec![".".into(), "!".into(), "?".into()],
        }
    }
}

impl SimpleTokenizer {
    pub fn with_terminators(terminators: &[&str]) -> Self {
        Self {
            terminators: terminators.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn is_terminator(&self, word: &str) -> bool {
        self.terminators.iter().any(|t| t == word)
    }
}

impl SimpleTokenizer {
    /// Tokenize `span`, closing a trailing sentence at its end.
    fn tokenize_span(&self, document: &SourceDocument, span: CharSpan, sentences: &mut TokenStream) {
        let text = document.text();
        let (Some(byte_start), Some(byte_end)) =
            (text.byte_offset(span.start), text.byte_offset(span.end))
        else {
            tracing::warn!(span = %span, "section outside document text, not tokenized");
            return;
        };
        if byte_end < byte_start {
            return;
        }

        let mut current = Vec::new();
        let mut char_cursor = span.start;
        let mut byte_cursor = 0;
        let span_text = &text.as_str()[byte_start..byte_end];

        for (byte_idx, segment) in span_text.split_word_bound_indices() {
            char_cursor += span_text[byte_cursor..byte_idx].chars().count();
            byte_cursor = byte_idx;
            let start = char_cursor;
            let end = start + segment.chars().count();

            if segment.trim().is_empty() {
                continue;
            }

            current.push(WordToken::new(segment, start, end));
            if self.is_terminator(segment) {
                sentences.push(std::mem::take(&mut current));
            }
        }

        if !current.is_empty() {
            sentences.push(current);
        }
    }
}

/// Parts of `span` not covered by any of `covered`, in order.
fn uncovered(span: CharSpan, covered: &[CharSpan]) -> Vec<CharSpan> {
    let mut overlapping: Vec<CharSpan> = covered
        .iter()
        .filter(|c| c.start < span.end && span.start < c.end)
        .copied()
        .collect();
    overlapping.sort_by_key(|c| c.start);

    let mut parts = Vec::new();
    let mut cursor = span.start;
    for c in overlapping {
        if c.start > cursor {
            parts.push(CharSpan::new(cursor, c.start));
        }
        cursor = cursor.max(c.end);
    }
    if cursor < span.end {
        parts.push(CharSpan::new(cursor, span.end));
    }
    parts
}

impl Tokenizer for SimpleTokenizer {
    /// Text shared by overlapping sections is tokenized once, by the first
    /// section that covers it.
    fn tokenize(&self, document: &SourceDocument) -> TokenStream {
        let mut sentences = Vec::new();
        let mut covered: Vec<CharSpan> = Vec::new();

        for section in document.sections() {
            for part in uncovered(section.span, &covered) {
                self.tokenize_span(document, part, &mut sentences);
            }
            covered.push(section.span);
        }

        sentences
    }
}
