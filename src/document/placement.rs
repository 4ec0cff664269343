//! Sentence placement: assign each externally produced sentence to the
//! first section whose span contains it.

use super::{Section, Sentence, SourceDocument, Token, Tokenization, TokenizedDocument};
use crate::ids::IdGenerator;
use crate::span::CharSpan;
use crate::tokenizer::WordToken;
use thiserror::Error;

/// Sentence placement failures.
///
/// An unplaced sentence means the tokenizer and the section boundaries
/// disagree, which invalidates every alignment made afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("sentences not contained in any section: {indices:?}")]
    Unplaced { indices: Vec<usize> },
}

/// Extent of a sentence: first token's start to last token's end.
fn sentence_extent(sentence: &[WordToken]) -> Option<CharSpan> {
    let first = sentence.first()?;
    let last = sentence.last()?;
    Some(CharSpan::new(first.start, last.end))
}

fn build_sentence(words: &[WordToken], extent: CharSpan, ids: &mut IdGenerator) -> Sentence {
    let id = ids.next_id();
    let tokenization_id = ids.next_tokenization_id();
    let tokens = words
        .iter()
        .enumerate()
        .map(|(index, word)| Token {
            index,
            text: word.word.clone(),
            span: word.span(),
        })
        .collect();

    Sentence {
        id,
        span: extent,
        tokenization: Tokenization {
            id: tokenization_id,
            tokens,
        },
    }
}

/// Place every sentence into exactly one section.
///
/// Sections are scanned in document order and each claims, in input order,
/// the not-yet-placed sentences it contains. Empty sentences have no extent
/// and are reported as unplaced.
pub fn place_sentences(
    document: &SourceDocument,
    sentences: &[Vec<WordToken>],
    ids: &mut IdGenerator,
) -> Result<TokenizedDocument, PlacementError> {
    let extents: Vec<Option<CharSpan>> = sentences.iter().map(|s| sentence_extent(s)).collect();
    let mut placed = vec![false; sentences.len()];
    let mut sections = Vec::with_capacity(document.sections().len());

    for (section_idx, spec) in document.sections().iter().enumerate() {
        let mut section = Section {
            id: ids.next_id(),
            kind: spec.kind.clone(),
            span: spec.span,
            sentences: Vec::new(),
        };

        for (sentence_idx, words) in sentences.iter().enumerate() {
            if placed[sentence_idx] {
                continue;
            }
            let Some(extent) = extents[sentence_idx] else {
                continue;
            };
            if !spec.span.contains(&extent) {
                continue;
            }

            tracing::trace!(section = section_idx, sentence = sentence_idx, "section taking sentence");
            placed[sentence_idx] = true;
            section.sentences.push(build_sentence(words, extent, ids));
        }

        sections.push(section);
    }

    let unplaced: Vec<usize> = placed
        .iter()
        .enumerate()
        .filter(|(_, taken)| !**taken)
        .map(|(idx, _)| idx)
        .collect();
    if !unplaced.is_empty() {
        return Err(PlacementError::Unplaced { indices: unplaced });
    }

    Ok(TokenizedDocument::from_parts(
        document.id().to_string(),
        document.text().clone(),
        sections,
    ))
}
