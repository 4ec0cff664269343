use super::{john_met_mary, span, tokenized, two_sections};
use crate::aligner::{render_in_context, AlignError, Boundary, SpanAligner};
use crate::span::CharSpan;

// ============ Successful alignment ============

#[test]
fn aligns_single_token_spans() {
    let doc = tokenized(&john_met_mary());
    let aligner = SpanAligner::new(&doc);

    let john = aligner.align(&span(0, 3, "John")).unwrap();
    assert_eq!(john.tokens, 0..1);
    assert_eq!(john.char_span, CharSpan::new(0, 4));

    let mary = aligner.align(&span(9, 12, "Mary")).unwrap();
    assert_eq!(mary.tokens, 2..3);
    assert_eq!(mary.tokenization_id, john.tokenization_id);
}

#[test]
fn aligns_multi_token_span() {
    let doc = tokenized(&john_met_mary());
    let aligned = SpanAligner::new(&doc)
        .align(&span(0, 13, "John met Mary."))
        .unwrap();
    assert_eq!(aligned.tokens, 0..4);
    assert_eq!(aligned.token_indices(), vec![0, 1, 2, 3]);
    assert_eq!(aligned.last_token_index(), 3);
}

#[test]
fn partial_token_coverage_expands_to_whole_tokens() {
    let doc = tokenized(&john_met_mary());
    let aligned = SpanAligner::new(&doc).align(&span(1, 6, "ohn me")).unwrap();
    assert_eq!(aligned.tokens, 0..2);
    assert_eq!(aligned.char_span, CharSpan::new(0, 8));
}

#[test]
fn single_character_span() {
    let doc = tokenized(&john_met_mary());
    let aligned = SpanAligner::new(&doc).align(&span(13, 13, ".")).unwrap();
    assert_eq!(aligned.tokens, 3..4);
}

#[test]
fn aligns_in_second_section() {
    let doc = tokenized(&two_sections());
    let aligner = SpanAligner::new(&doc);
    let she = aligner.align(&span(15, 17, "She")).unwrap();
    let john = aligner.align(&span(0, 3, "John")).unwrap();
    assert_eq!(she.tokens, 0..1);
    assert_ne!(she.tokenization_id, john.tokenization_id);
}

// ============ Failures ============

#[test]
fn crossing_sentence_boundary_is_rejected() {
    let doc = tokenized(&two_sections());
    let err = SpanAligner::new(&doc)
        .align(&span(13, 17, ".\nShe"))
        .unwrap_err();
    assert!(matches!(err, AlignError::CrossesSentences { .. }), "{err:?}");
    assert_eq!(err.span().start, 13);
}

#[test]
fn start_in_whitespace_finds_end_first() {
    let doc = tokenized(&john_met_mary());
    let err = SpanAligner::new(&doc).align(&span(4, 7, " met")).unwrap_err();
    assert!(matches!(err, AlignError::EndBeforeStart { end_token: 2, .. }), "{err:?}");
}

#[test]
fn end_in_whitespace_is_unmatched() {
    let doc = tokenized(&john_met_mary());
    let err = SpanAligner::new(&doc).align(&span(0, 4, "John ")).unwrap_err();
    assert!(matches!(
        err,
        AlignError::Unmatched {
            boundary: Boundary::End,
            ..
        }
    ));
}

#[test]
fn span_outside_text_is_unmatched() {
    let doc = tokenized(&john_met_mary());
    let err = SpanAligner::new(&doc).align(&span(100, 104, "gone")).unwrap_err();
    assert!(matches!(
        err,
        AlignError::Unmatched {
            boundary: Boundary::Start,
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "span unmatched (start not inside any token): [100,104] \"gone\""
    );
}

// ============ Diagnostics ============

#[test]
fn text_check_compares_token_extent() {
    let doc = tokenized(&john_met_mary());
    let aligner = SpanAligner::new(&doc);

    let exact = span(0, 3, "John");
    let aligned = aligner.align(&exact).unwrap();
    assert!(aligner.check_text(&exact, &aligned, Some("m1")).is_none());

    let partial = span(1, 3, "ohn");
    let aligned = aligner.align(&partial).unwrap();
    let mismatch = aligner.check_text(&partial, &aligned, Some("m2")).unwrap();
    assert_eq!(mismatch.document_text.as_deref(), Some("John"));
    assert_eq!(mismatch.mention_id.as_deref(), Some("m2"));
    assert_eq!(mismatch.describe(), "ohn\tJohn");
}

#[test]
fn renders_extent_in_context() {
    let doc = tokenized(&john_met_mary());
    let aligner = SpanAligner::new(&doc);
    let aligned = aligner.align(&span(5, 12, "met Mary")).unwrap();
    let tokenization = doc.tokenization(aligned.tokenization_id).unwrap();

    insta::assert_snapshot!(render_in_context(tokenization, &aligned.tokens), @"John [met Mary] .");
}
