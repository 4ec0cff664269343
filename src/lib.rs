//! Aligns character-offset annotations with an independent tokenization and
//! assembles an entity/event annotation graph.
//!
//! ## Pipeline
//!
//! ```text
//! token stream + sections ──> sentence placement ──> span aligner ──> graph assembler
//!                                                        ▲
//! annotation tree ───────────────────────────────────────┘
//! ```
//!
//! - [`span`] - inclusive annotation spans, half-open character spans, char offsets
//! - [`document`] - sections, sentences, tokens and sentence placement
//! - [`aligner`] - character span to token range alignment
//! - [`graph`] - the output graph and its two-stage assembler
//! - [`consistency`] - annotation text vs. document text check
//! - [`pipeline`] - one-document conversion
//!
//! ## Example
//!
//! ```
//! use apf_align::{convert, AnnotationSpan, AnnotationTree, ConvertConfig, Entity,
//!     EntityMention, MentionId, SourceDocument, WordToken};
//!
//! let source = SourceDocument::single_section("doc", "John met Mary.");
//! let sentences = vec![vec![
//!     WordToken::new("John", 0, 4),
//!     WordToken::new("met", 5, 8),
//!     WordToken::new("Mary", 9, 13),
//!     WordToken::new(".", 13, 14),
//! ]];
//!
//! let mut tree = AnnotationTree::new("doc");
//! tree.push_entity(Entity {
//!     id: "E1".into(),
//!     entity_type: "PER".into(),
//!     subtype: "Individual".into(),
//!     class: None,
//!     mentions: vec![EntityMention {
//!         id: MentionId::new("E1-1"),
//!         mention_type: "NAM".into(),
//!         ldc_type: None,
//!         extent: AnnotationSpan::new(9, 12, "Mary"),
//!         head: AnnotationSpan::new(9, 12, "Mary"),
//!     }],
//! });
//!
//! let conversion = convert(&tree, &source, &sentences, &ConvertConfig::default()).unwrap();
//! let mention = &conversion.document.entity_mention_set.mentions[0];
//! assert_eq!(mention.tokens.token_indices, vec![2]);
//! assert_eq!(mention.entity_type, "PER:Individual");
//! ```

pub mod aligner;
pub mod annotation;
pub mod config;
pub mod consistency;
mod display;
pub mod document;
mod error;
pub mod graph;
pub mod ids;
pub mod pipeline;
pub mod span;
pub mod tokenizer;

pub use aligner::{render_in_context, AlignError, AlignedSpan, Boundary, SpanAligner};
pub use annotation::{
    AnnotationTree, Argument, Entity, EntityMention, Event, EventId, EventMention,
    EventMentionRef, MentionId,
};
pub use config::{ConfigError, ConvertConfig, ReaderConfig, Suffixes};
pub use consistency::{check_entity_mentions, ConsistencyReport, TextMismatch};
pub use display::{DisplayArrow, SentenceDisplay};
pub use document::{
    place_sentences, PlacementError, Section, SectionSpec, Sentence, SourceDocument, Token,
    Tokenization, TokenizedDocument,
};
pub use error::{ConvertError, ConvertResult};
pub use graph::{
    AnnotatedDocument, AssembleError, ConversionCounts, Diagnostics, GraphAssembler,
};
pub use ids::{IdGenerator, TokenizationId};
pub use pipeline::{convert, convert_with_tokenizer, Conversion};
pub use span::{AnnotationSpan, CharSpan, DocumentText, SpanError};
pub use tokenizer::{SimpleTokenizer, TokenStream, Tokenizer, WordToken};

#[cfg(test)]
mod tests;
