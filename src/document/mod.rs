//! Document model: canonical text, sections, sentences and tokens.
//!
//! A [`SourceDocument`] carries the canonical text and its section spans but
//! no tokenization. [`place_sentences`] distributes externally produced
//! sentences over those sections and yields a [`TokenizedDocument`], which is
//! what the span aligner works against.

mod placement;

pub use placement::{place_sentences, PlacementError};

use crate::ids::TokenizationId;
use crate::span::{CharSpan, DocumentText};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A section boundary from the source markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Half-open character span of the section
    pub span: CharSpan,
    /// Markup label of the section (e.g. "passage", "headline")
    #[serde(default)]
    pub kind: Option<String>,
}

impl SectionSpec {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            span: CharSpan::new(start, end),
            kind: None,
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

/// Canonical text and section boundaries, before tokenization.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    id: String,
    text: DocumentText,
    sections: Vec<SectionSpec>,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>, sections: Vec<SectionSpec>) -> Self {
        Self {
            id: id.into(),
            text: DocumentText::new(text),
            sections,
        }
    }

    /// A document with a single section covering the whole text.
    pub fn single_section(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = DocumentText::new(text);
        let sections = vec![SectionSpec::new(0, text.char_len())];
        Self {
            id: id.into(),
            text,
            sections,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &DocumentText {
        &self.text
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }
}

/// A word token inside one sentence's tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Position within the sentence (0-based)
    pub index: usize,
    pub text: String,
    /// Half-open character span
    pub span: CharSpan,
}

/// The ordered tokens of one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokenization {
    pub id: TokenizationId,
    pub tokens: Vec<Token>,
}

impl Tokenization {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// A sentence placed into a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub id: Uuid,
    /// From the first token's start to the last token's end
    pub span: CharSpan,
    pub tokenization: Tokenization,
}

/// A section with the sentences it contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub span: CharSpan,
    pub sentences: Vec<Sentence>,
}

/// A document whose sentences have all been placed into sections.
#[derive(Debug, Clone)]
pub struct TokenizedDocument {
    id: String,
    text: DocumentText,
    sections: Vec<Section>,
}

impl TokenizedDocument {
    pub(crate) fn from_parts(id: String, text: DocumentText, sections: Vec<Section>) -> Self {
        Self { id, text, sections }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &DocumentText {
        &self.text
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// All sentences in document order.
    pub fn sentences(&self) -> impl Iterator<Item = &Sentence> {
        self.sections.iter().flat_map(|section| section.sentences.iter())
    }

    pub fn sentence_count(&self) -> usize {
        self.sections.iter().map(|section| section.sentences.len()).sum()
    }

    /// Find a tokenization by identifier.
    pub fn tokenization(&self, id: TokenizationId) -> Option<&Tokenization> {
        self.sentences()
            .map(|sentence| &sentence.tokenization)
            .find(|tokenization| tokenization.id == id)
    }

    /// Take ownership of the sections (consuming the document).
    pub fn into_sections(self) -> Vec<Section> {
        self.sections
    }
}
