//! Consistency check between annotation text and the canonical document text.
//!
//! The check never fails a conversion. It surfaces drift between the
//! annotation source and the document text as warnings and as a
//! [`ConsistencyReport`] the caller may inspect.

use crate::annotation::AnnotationTree;
use crate::span::{normalize_entities, AnnotationSpan, CharSpan, DocumentText};
use serde::{Deserialize, Serialize};

/// An annotation whose literal text differs from the document text it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMismatch {
    /// Mention the span belongs to, when known
    pub mention_id: Option<String>,
    pub span: AnnotationSpan,
    /// Normalized document text at the span, `None` if the span is out of bounds
    pub document_text: Option<String>,
}

impl TextMismatch {
    pub fn describe(&self) -> String {
        format!(
            "{}\t{}",
            self.span.text.replace('\n', "\\n"),
            self.document_text
                .as_deref()
                .unwrap_or("<out of bounds>")
                .replace('\n', "\\n")
        )
    }
}

/// Compare an annotation span with the document text it covers.
///
/// The document text is normalized with [`normalize_entities`] first.
/// Returns `None` when the texts agree.
pub fn compare_span(
    text: &DocumentText,
    span: &AnnotationSpan,
    mention_id: Option<&str>,
) -> Option<TextMismatch> {
    match span.char_span() {
        Ok(covered) => compare_text(text, covered, span, mention_id),
        Err(_) => Some(TextMismatch {
            mention_id: mention_id.map(str::to_string),
            span: span.clone(),
            document_text: None,
        }),
    }
}

/// Compare the document text at `covered` with the annotation's literal text.
pub fn compare_text(
    text: &DocumentText,
    covered: CharSpan,
    span: &AnnotationSpan,
    mention_id: Option<&str>,
) -> Option<TextMismatch> {
    let document_text = text.slice(covered).ok().map(normalize_entities);
    if document_text.as_deref() == Some(span.text.as_str()) {
        return None;
    }

    Some(TextMismatch {
        mention_id: mention_id.map(str::to_string),
        span: span.clone(),
        document_text,
    })
}

/// Result of checking all entity mentions of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Number of mentions compared
    pub checked: usize,
    /// Mismatches in `(start, end, id)` order
    pub mismatches: Vec<TextMismatch>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Compare every entity mention extent against the document text.
///
/// Mentions are visited sorted by `(start, end, id)` so the log output is
/// deterministic regardless of annotation order.
pub fn check_entity_mentions(tree: &AnnotationTree, text: &DocumentText) -> ConsistencyReport {
    let mut order: Vec<(usize, usize, &str, &AnnotationSpan)> = tree
        .entity_mentions()
        .map(|(_, mention)| {
            (
                mention.extent.start,
                mention.extent.end,
                mention.id.as_str(),
                &mention.extent,
            )
        })
        .collect();
    order.sort_by(|a, b| (a.0, a.1, a.2).cmp(&(b.0, b.1, b.2)));

    let mut report = ConsistencyReport::default();
    for (_, _, id, extent) in order {
        report.checked += 1;
        match compare_span(text, extent, Some(id)) {
            None => {
                tracing::trace!(mention = id, extent = %extent, "entity mention text matches");
            }
            Some(mismatch) => {
                tracing::warn!(
                    mention = id,
                    extent = %extent,
                    document_text = mismatch.document_text.as_deref().unwrap_or("<out of bounds>"),
                    "mismatched entity mention"
                );
                report.mismatches.push(mismatch);
            }
        }
    }
    report
}
