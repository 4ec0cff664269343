//! One-document conversion: consistency check, sentence placement, assembly.

use crate::aligner::SpanAligner;
use crate::annotation::AnnotationTree;
use crate::config::ConvertConfig;
use crate::consistency::{check_entity_mentions, ConsistencyReport};
use crate::document::{place_sentences, SourceDocument};
use crate::error::ConvertResult;
use crate::graph::{AnnotatedDocument, ConversionCounts, Diagnostics, GraphAssembler};
use crate::ids::IdGenerator;
use crate::tokenizer::{Tokenizer, WordToken};

/// The graph for one document plus what was observed while building it.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: AnnotatedDocument,
    pub counts: ConversionCounts,
    /// `None` when the consistency pre-pass is disabled
    pub consistency: Option<ConsistencyReport>,
    pub diagnostics: Diagnostics,
}

/// Convert a document whose sentences were produced by an external tokenizer.
pub fn convert(
    tree: &AnnotationTree,
    source: &SourceDocument,
    sentences: &[Vec<WordToken>],
    config: &ConvertConfig,
) -> ConvertResult<Conversion> {
    if !tree.doc_id.is_empty() && tree.doc_id != source.id() {
        tracing::warn!(
            annotation = %tree.doc_id,
            document = source.id(),
            "annotation and document ids differ"
        );
    }

    let consistency = if config.check_consistency {
        Some(check_entity_mentions(tree, source.text()))
    } else {
        None
    };

    let mut ids = IdGenerator::for_document(source.id());

    tracing::info!(document = source.id(), sentences = sentences.len(), "placing sentences");
    let tokenized = place_sentences(source, sentences, &mut ids)?;

    tracing::info!(document = source.id(), "assembling annotations");
    let assembly = GraphAssembler::new(SpanAligner::new(&tokenized), config).assemble(tree, &mut ids)?;

    let text = tokenized.text().as_str().to_string();
    let id = tokenized.id().to_string();
    let document = AnnotatedDocument {
        id,
        text,
        sections: tokenized.into_sections(),
        entity_set: assembly.entity_set,
        entity_mention_set: assembly.entity_mention_set,
        situation_set: assembly.situation_set,
        situation_mention_set: assembly.situation_mention_set,
    };

    Ok(Conversion {
        document,
        counts: assembly.counts,
        consistency,
        diagnostics: assembly.diagnostics,
    })
}

/// Tokenize `source` with `tokenizer`, then [`convert`].
pub fn convert_with_tokenizer(
    tree: &AnnotationTree,
    source: &SourceDocument,
    tokenizer: &dyn Tokenizer,
    config: &ConvertConfig,
) -> ConvertResult<Conversion> {
    tracing::info!(document = source.id(), "tokenizing and sentence splitting");
    let sentences = tokenizer.tokenize(source);
    convert(tree, source, &sentences, config)
}
