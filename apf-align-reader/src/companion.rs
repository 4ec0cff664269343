//! The tokenized companion of an annotation file: text, sections and,
//! optionally, sentences from an external tokenizer.

use apf_align::{SectionSpec, SourceDocument, TokenStream, WordToken};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Companion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    pub text: String,
    /// Half-open character spans; empty means one section over the whole text
    #[serde(default)]
    pub sections: Vec<SectionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentences: Option<Vec<Vec<WordToken>>>,
}

impl Companion {
    /// Split into the source document and the external token stream, if any.
    ///
    /// `fallback_id` names the document when the companion carries no id.
    pub fn into_source(self, fallback_id: &str) -> (SourceDocument, Option<TokenStream>) {
        let id = self.doc_id.unwrap_or_else(|| fallback_id.to_string());
        let source = if self.sections.is_empty() {
            SourceDocument::single_section(id, self.text)
        } else {
            let sections = self
                .sections
                .into_iter()
                .map(|section| {
                    let spec = SectionSpec::new(section.start, section.end);
                    match section.kind {
                        Some(kind) => spec.with_kind(kind),
                        None => spec,
                    }
                })
                .collect();
            SourceDocument::new(id, self.text, sections)
        };
        (source, self.sentences)
    }
}
