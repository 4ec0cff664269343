//! Span alignment: character spans onto token-index ranges.
//!
//! An annotation span is inclusive on both ends; tokens are half-open. The
//! aligner scans every token of every sentence once, in document order:
//!
//! - the first token containing `span.start` fixes the start index and the
//!   tokenization the span belongs to;
//! - every token containing `span.end` moves the exclusive end index to
//!   `index + 1`; the scan does not stop at the first match.
//!
//! A span whose end lands in another sentence than its start is rejected
//! instead of being truncated.

use crate::consistency::{compare_text, TextMismatch};
use crate::document::{Tokenization, TokenizedDocument};
use crate::ids::TokenizationId;
use crate::span::{AnnotationSpan, CharSpan};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Which end of a span failed to match a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Start => f.write_str("start"),
            Boundary::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    /// A token holds the span's last character before any token holds its first.
    #[error("end found before start (end token {end_token}): {span}")]
    EndBeforeStart {
        span: AnnotationSpan,
        end_token: usize,
    },

    #[error("span crosses sentence boundary: {span}")]
    CrossesSentences {
        span: AnnotationSpan,
        start: TokenizationId,
        end: TokenizationId,
    },

    #[error("span unmatched ({boundary} not inside any token): {span}")]
    Unmatched {
        span: AnnotationSpan,
        boundary: Boundary,
    },
}

impl AlignError {
    pub fn span(&self) -> &AnnotationSpan {
        match self {
            AlignError::EndBeforeStart { span, .. }
            | AlignError::CrossesSentences { span, .. }
            | AlignError::Unmatched { span, .. } => span,
        }
    }
}

/// A span aligned onto one sentence's tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedSpan {
    pub tokenization_id: TokenizationId,
    /// Half-open token index range, never empty
    pub tokens: Range<usize>,
    /// First aligned token's start to last aligned token's end
    pub char_span: CharSpan,
}

impl AlignedSpan {
    pub fn token_indices(&self) -> Vec<usize> {
        self.tokens.clone().collect()
    }

    /// Index of the last aligned token.
    pub fn last_token_index(&self) -> usize {
        self.tokens.end - 1
    }
}

struct StartMatch {
    tokenization_id: TokenizationId,
    index: usize,
    char_start: usize,
}

/// Aligns annotation spans against a tokenized document.
#[derive(Debug, Clone, Copy)]
pub struct SpanAligner<'d> {
    document: &'d TokenizedDocument,
}

impl<'d> SpanAligner<'d> {
    pub fn new(document: &'d TokenizedDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &'d TokenizedDocument {
        self.document
    }

    /// Map an inclusive annotation span onto a token range inside one sentence.
    pub fn align(&self, span: &AnnotationSpan) -> Result<AlignedSpan, AlignError> {
        let mut start: Option<StartMatch> = None;
        let mut end: Option<(usize, usize)> = None;

        for sentence in self.document.sentences() {
            let tokenization = &sentence.tokenization;
            for token in &tokenization.tokens {
                if start.is_none() && token.span.contains_offset(span.start) {
                    start = Some(StartMatch {
                        tokenization_id: tokenization.id,
                        index: token.index,
                        char_start: token.span.start,
                    });
                }

                if token.span.contains_offset(span.end) {
                    let Some(found) = &start else {
                        return Err(AlignError::EndBeforeStart {
                            span: span.clone(),
                            end_token: token.index + 1,
                        });
                    };
                    if found.tokenization_id != tokenization.id {
                        return Err(AlignError::CrossesSentences {
                            span: span.clone(),
                            start: found.tokenization_id,
                            end: tokenization.id,
                        });
                    }
                    end = Some((token.index + 1, token.span.end));
                }
            }
        }

        let Some(start) = start else {
            return Err(AlignError::Unmatched {
                span: span.clone(),
                boundary: Boundary::Start,
            });
        };
        let Some((end_index, char_end)) = end else {
            return Err(AlignError::Unmatched {
                span: span.clone(),
                boundary: Boundary::End,
            });
        };

        let aligned = AlignedSpan {
            tokenization_id: start.tokenization_id,
            tokens: start.index..end_index,
            char_span: CharSpan::new(start.char_start, char_end),
        };

        if tracing::enabled!(tracing::Level::TRACE) {
            if let Some(tokenization) = self.document.tokenization(aligned.tokenization_id) {
                tracing::trace!(
                    "Extent ({}) in context: {}",
                    span.text.replace('\n', "\\n"),
                    render_in_context(tokenization, &aligned.tokens)
                );
            }
        }

        Ok(aligned)
    }

    /// Compare the text covered by the aligned tokens with the annotation text.
    ///
    /// Advisory only: a mismatch is logged at debug level and returned.
    pub fn check_text(
        &self,
        span: &AnnotationSpan,
        aligned: &AlignedSpan,
        mention_id: Option<&str>,
    ) -> Option<TextMismatch> {
        let mismatch = compare_text(self.document.text(), aligned.char_span, span, mention_id)?;
        tracing::debug!(
            "Mismatch between annotation span and token span (annotation / tokens): {}",
            mismatch.describe()
        );
        Some(mismatch)
    }
}

/// Render a tokenization with the given token range in brackets.
///
/// ```text
/// John [met Mary] .
/// ```
pub fn render_in_context(tokenization: &Tokenization, range: &Range<usize>) -> String {
    let mut out = String::new();
    for (i, token) in tokenization.tokens.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        if i == range.start {
            out.push('[');
        }
        out.push_str(&token.text);
        if i + 1 == range.end {
            out.push(']');
        }
    }
    out
}
