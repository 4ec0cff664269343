use super::{entity, event, event_mention, john_met_mary, mention, span, tokenized, two_sections};
use crate::aligner::{AlignError, SpanAligner};
use crate::annotation::{AnnotationTree, MentionId};
use crate::config::ConvertConfig;
use crate::graph::{AssembleError, GraphAssembler, MentionField};
use crate::ids::IdGenerator;
use crate::document::SourceDocument;

fn people_tree() -> AnnotationTree {
    let mut tree = AnnotationTree::new("john-met-mary");
    tree.push_entity(entity(
        "E1",
        "PER",
        "Individual",
        vec![mention("E1-1", span(0, 3, "John"), span(0, 3, "John"))],
    ));
    tree.push_entity(entity(
        "E2",
        "PER",
        "Individual",
        vec![mention("E2-1", span(9, 12, "Mary"), span(9, 12, "Mary"))],
    ));
    tree.push_event(event(
        "EV1",
        "Contact",
        "Meet",
        vec![event_mention(
            "EV1-1",
            span(0, 12, "John met Mary"),
            span(5, 7, "met"),
            &[("Entity", "E1-1"), ("Entity", "E2-1")],
        )],
    ));
    tree
}

// ============ Entities ============

#[test]
fn entity_mentions_align_and_flatten_types() {
    let doc = tokenized(&john_met_mary());
    let mut ids = IdGenerator::for_document("john-met-mary");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&people_tree(), &mut ids)
        .unwrap();

    let mentions = &assembly.entity_mention_set.mentions;
    assert_eq!(mentions.len(), 2);
    assert_eq!(mentions[0].tokens.token_indices, vec![0]);
    assert_eq!(mentions[1].tokens.token_indices, vec![2]);
    assert_eq!(mentions[1].entity_type, "PER:Individual");
    assert_eq!(mentions[1].phrase_type, "NAM");
    assert_eq!(mentions[1].annotation_id, "E2-1");

    let entities = &assembly.entity_set.entities;
    assert_eq!(entities.len(), 2);
    assert_eq!(entities[1].mention_ids, vec![mentions[1].id]);
    assert_eq!(assembly.entity_set.metadata.tool, "apf-align");
}

#[test]
fn anchor_is_last_token_of_head() {
    let source = SourceDocument::single_section("d", "The tall man left.");
    let doc = tokenized(&source);
    let mut tree = AnnotationTree::new("d");
    tree.push_entity(entity(
        "E1",
        "PER",
        "Individual",
        vec![mention("E1-1", span(0, 11, "The tall man"), span(9, 11, "man"))],
    ));

    let mut ids = IdGenerator::for_document("d");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap();

    let tokens = &assembly.entity_mention_set.mentions[0].tokens;
    assert_eq!(tokens.token_indices, vec![0, 1, 2]);
    assert_eq!(tokens.anchor_token_index, Some(2));
}

#[test]
fn multi_token_head_anchors_on_its_last_token() {
    let source = SourceDocument::single_section("d", "President Barack Obama spoke.");
    let doc = tokenized(&source);
    let mut tree = AnnotationTree::new("d");
    tree.push_entity(entity(
        "E1",
        "PER",
        "Individual",
        vec![mention(
            "E1-1",
            span(0, 21, "President Barack Obama"),
            span(10, 21, "Barack Obama"),
        )],
    ));

    let mut ids = IdGenerator::for_document("d");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap();
    assert_eq!(
        assembly.entity_mention_set.mentions[0].tokens.anchor_token_index,
        Some(2)
    );
}

#[test]
fn entity_mention_crossing_sentences_is_fatal() {
    let doc = tokenized(&two_sections());
    let mut tree = AnnotationTree::new("two-sections");
    tree.push_entity(entity(
        "E1",
        "PER",
        "Individual",
        vec![mention("E1-1", span(13, 17, ".\nShe"), span(15, 17, "She"))],
    ));

    let mut ids = IdGenerator::for_document("two-sections");
    let err = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap_err();

    match err {
        AssembleError::EntityMention {
            mention,
            field,
            source,
        } => {
            assert_eq!(mention, MentionId::new("E1-1"));
            assert_eq!(field, MentionField::Extent);
            assert!(matches!(source, AlignError::CrossesSentences { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unaligned_head_is_fatal() {
    let doc = tokenized(&john_met_mary());
    let mut tree = AnnotationTree::new("john-met-mary");
    tree.push_entity(entity(
        "E1",
        "PER",
        "Individual",
        vec![mention("E1-1", span(0, 3, "John"), span(40, 43, "Nope"))],
    ));

    let mut ids = IdGenerator::for_document("john-met-mary");
    let err = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap_err();
    assert!(matches!(
        err,
        AssembleError::EntityMention {
            field: MentionField::Head,
            ..
        }
    ));
}

#[test]
fn alignment_mismatches_are_collected_not_raised() {
    let doc = tokenized(&john_met_mary());
    let mut tree = AnnotationTree::new("john-met-mary");
    tree.push_entity(entity(
        "E1",
        "PER",
        "Individual",
        vec![mention("E1-1", span(1, 3, "ohn"), span(1, 3, "ohn"))],
    ));

    let mut ids = IdGenerator::for_document("john-met-mary");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap();
    // extent and head both mismatch
    assert_eq!(assembly.diagnostics.alignment_mismatches.len(), 2);

    let quiet = ConvertConfig {
        log_alignment_mismatches: false,
        ..ConvertConfig::default()
    };
    let mut ids = IdGenerator::for_document("john-met-mary");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &quiet)
        .assemble(&tree, &mut ids)
        .unwrap();
    assert!(assembly.diagnostics.alignment_mismatches.is_empty());
}

// ============ Events ============

#[test]
fn event_arguments_resolve_to_entity_mentions() {
    let doc = tokenized(&john_met_mary());
    let mut ids = IdGenerator::for_document("john-met-mary");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&people_tree(), &mut ids)
        .unwrap();

    let mary = &assembly.entity_mention_set.mentions[1];
    let situation_mention = &assembly.situation_mention_set.mentions[0];
    assert_eq!(situation_mention.situation_type, "EVENT");
    assert_eq!(situation_mention.situation_kind, "Contact:Meet");
    assert_eq!(situation_mention.arguments.len(), 2);
    assert_eq!(situation_mention.arguments[1].role, "Entity");
    assert_eq!(situation_mention.arguments[1].entity_mention_id, mary.id);
    assert_eq!(
        situation_mention.tokens.as_ref().unwrap().token_indices,
        vec![0, 1, 2]
    );
    assert_eq!(situation_mention.tokens.as_ref().unwrap().anchor_token_index, None);

    let situation = &assembly.situation_set.situations[0];
    assert_eq!(situation.mention_ids, vec![situation_mention.id]);
}

#[test]
fn crossing_event_extent_only_drops_tokens() {
    let doc = tokenized(&two_sections());
    let mut tree = AnnotationTree::new("two-sections");
    tree.push_entity(entity(
        "E1",
        "PER",
        "Individual",
        vec![mention("E1-1", span(15, 17, "She"), span(15, 17, "She"))],
    ));
    tree.push_event(event(
        "EV1",
        "Life",
        "Be-Born",
        vec![event_mention(
            "EV1-1",
            span(9, 24, "Mary.\nShe smiled"),
            span(19, 24, "smiled"),
            &[("Person", "E1-1")],
        )],
    ));

    let mut ids = IdGenerator::for_document("two-sections");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap();

    let situation_mention = &assembly.situation_mention_set.mentions[0];
    assert!(situation_mention.tokens.is_none());
    assert_eq!(situation_mention.arguments.len(), 1);
    assert_eq!(assembly.counts.skipped_event_extents, 1);
    assert_eq!(assembly.diagnostics.skipped_event_extents[0].event_mention, "EV1-1");
    assert_eq!(assembly.counts.event_mention_roles, 1);
}

#[test]
fn unresolved_argument_is_fatal() {
    let doc = tokenized(&john_met_mary());
    let mut tree = people_tree();
    tree.push_event(event(
        "EV2",
        "Movement",
        "Transport",
        vec![event_mention(
            "EV2-1",
            span(0, 12, "John met Mary"),
            span(5, 7, "met"),
            &[("Artifact", "E9-1")],
        )],
    ));

    let mut ids = IdGenerator::for_document("john-met-mary");
    let err = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap_err();
    assert_eq!(
        err,
        AssembleError::UnresolvedArgument {
            event_mention: "EV2-1".into(),
            role: "Artifact".into(),
            target: MentionId::new("E9-1"),
        }
    );
}

#[test]
fn duplicate_entity_mention_id_is_fatal() {
    let doc = tokenized(&john_met_mary());
    let mut tree = people_tree();
    tree.push_entity(entity(
        "E3",
        "PER",
        "Individual",
        vec![mention("E1-1", span(9, 12, "Mary"), span(9, 12, "Mary"))],
    ));

    let mut ids = IdGenerator::for_document("john-met-mary");
    let err = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap_err();
    assert_eq!(
        err,
        AssembleError::DuplicateMention {
            mention: MentionId::new("E1-1"),
        }
    );
}

#[test]
fn events_are_emitted_once_in_first_seen_order() {
    let doc = tokenized(&john_met_mary());
    let mut tree = people_tree();
    tree.push_event(event(
        "EV2",
        "Contact",
        "Phone-Write",
        vec![
            event_mention("EV2-1", span(0, 3, "John"), span(0, 3, "John"), &[]),
            event_mention("EV2-2", span(9, 12, "Mary"), span(9, 12, "Mary"), &[]),
        ],
    ));
    // EV2's second mention registered first
    tree.event_mention_order.rotate_left(2);

    let mut ids = IdGenerator::for_document("john-met-mary");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&tree, &mut ids)
        .unwrap();

    let kinds: Vec<&str> = assembly
        .situation_set
        .situations
        .iter()
        .map(|s| s.situation_kind.as_str())
        .collect();
    assert_eq!(kinds, vec!["Contact:Phone-Write", "Contact:Meet"]);
    assert_eq!(assembly.situation_set.situations[0].mention_ids.len(), 2);
    assert_eq!(assembly.counts.events, 2);
    assert_eq!(assembly.counts.event_mentions, 3);
}

#[test]
fn counts_render_like_a_report() {
    let doc = tokenized(&john_met_mary());
    let mut ids = IdGenerator::for_document("john-met-mary");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&people_tree(), &mut ids)
        .unwrap();

    insta::assert_snapshot!(
        assembly.counts.to_string(),
        @"#entities=2 #e-mentions=2 #events=1 #eve-mentions=1 #eve-mention-roles=2"
    );
}

#[test]
fn empty_tree_produces_empty_sets() {
    let doc = tokenized(&john_met_mary());
    let mut ids = IdGenerator::for_document("john-met-mary");
    let assembly = GraphAssembler::new(SpanAligner::new(&doc), &ConvertConfig::default())
        .assemble(&AnnotationTree::new("john-met-mary"), &mut ids)
        .unwrap();
    assert!(assembly.entity_set.entities.is_empty());
    assert!(assembly.situation_mention_set.mentions.is_empty());
    assert_eq!(assembly.counts, Default::default());
}
