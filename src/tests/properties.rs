//! Property tests over generated sentences.

use crate::aligner::{AlignError, SpanAligner};
use crate::document::{place_sentences, SectionSpec, SourceDocument, TokenizedDocument};
use crate::ids::IdGenerator;
use crate::span::AnnotationSpan;
use crate::tokenizer::WordToken;
use proptest::prelude::*;

/// Lay sentences out one per line, each line its own section.
fn layout(sentences: &[Vec<String>]) -> (SourceDocument, Vec<Vec<WordToken>>) {
    let mut text = String::new();
    let mut sections = Vec::new();
    let mut stream = Vec::new();

    for (i, words) in sentences.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let section_start = text.len();
        let mut tokens = Vec::new();
        for (j, word) in words.iter().enumerate() {
            if j > 0 {
                text.push(' ');
            }
            let start = text.len();
            text.push_str(word);
            tokens.push(WordToken::new(word.clone(), start, text.len()));
        }
        sections.push(SectionSpec::new(section_start, text.len()));
        stream.push(tokens);
    }

    (SourceDocument::new("generated", text, sections), stream)
}

fn place(source: &SourceDocument, stream: &[Vec<WordToken>]) -> TokenizedDocument {
    let mut ids = IdGenerator::for_document(source.id());
    place_sentences(source, stream, &mut ids).unwrap()
}

fn sentence_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}", 1..8)
}

proptest! {
    #[test]
    fn every_sentence_is_placed(sentences in prop::collection::vec(sentence_strategy(), 1..5)) {
        let (source, stream) = layout(&sentences);
        let doc = place(&source, &stream);
        prop_assert_eq!(doc.sentence_count(), sentences.len());
        for (sentence, words) in doc.sentences().zip(&sentences) {
            prop_assert_eq!(sentence.tokenization.len(), words.len());
        }
    }

    #[test]
    fn word_spans_align_to_their_tokens(
        words in sentence_strategy(),
        picks in (0usize..8, 0usize..8),
    ) {
        let (source, stream) = layout(&[words.clone()]);
        let doc = place(&source, &stream);
        let aligner = SpanAligner::new(&doc);

        let first = picks.0 % words.len();
        let last = first + picks.1 % (words.len() - first);
        let start = stream[0][first].start;
        let end = stream[0][last].end - 1;
        let text = &source.text().as_str()[start..=end];

        let span = AnnotationSpan::new(start, end, text);
        let aligned = aligner.align(&span).unwrap();
        prop_assert_eq!(aligned.tokens.clone(), first..last + 1);
        prop_assert!(aligner.check_text(&span, &aligned, None).is_none());
    }

    #[test]
    fn spans_inside_tokens_align_to_the_covering_tokens(
        words in sentence_strategy(),
        picks in (0usize..8, 0usize..8),
        offsets in (0usize..6, 0usize..6),
    ) {
        let (source, stream) = layout(&[words.clone()]);
        let doc = place(&source, &stream);
        let tokens = &stream[0];

        let first = picks.0 % words.len();
        let last = first + picks.1 % (words.len() - first);
        let mut start = tokens[first].start + offsets.0 % (tokens[first].end - tokens[first].start);
        let mut end = tokens[last].start + offsets.1 % (tokens[last].end - tokens[last].start);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        let text = &source.text().as_str()[start..=end];

        let aligned = SpanAligner::new(&doc)
            .align(&AnnotationSpan::new(start, end, text))
            .unwrap();
        let (s, e) = (aligned.tokens.start, aligned.tokens.end);
        prop_assert!(s < e);
        prop_assert!(tokens[s].start <= start);
        prop_assert!(tokens[e - 1].end > end);
        prop_assert_eq!(aligned.tokens.clone(), first..last + 1);
    }

    #[test]
    fn spans_across_sentences_are_rejected(
        left in sentence_strategy(),
        right in sentence_strategy(),
        offsets in (0usize..6, 0usize..6),
    ) {
        let (source, stream) = layout(&[left, right]);
        let doc = place(&source, &stream);

        let last = stream[0].last().unwrap();
        let first = &stream[1][0];
        let start = last.start + offsets.0 % (last.end - last.start);
        let end = first.start + offsets.1 % (first.end - first.start);
        let text = &source.text().as_str()[start..=end];

        let err = SpanAligner::new(&doc)
            .align(&AnnotationSpan::new(start, end, text))
            .unwrap_err();
        let crossed = matches!(err, AlignError::CrossesSentences { .. });
        prop_assert!(crossed, "{:?}", err);
    }
}
