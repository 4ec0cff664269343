//! Cross-module tests: alignment, assembly and whole-document conversion.

mod aligner;
mod assembler;
mod properties;

use crate::annotation::{Argument, Entity, EntityMention, Event, EventId, EventMention, MentionId};
use crate::document::{place_sentences, SectionSpec, SourceDocument, TokenizedDocument};
use crate::ids::IdGenerator;
use crate::span::AnnotationSpan;
use crate::tokenizer::{SimpleTokenizer, Tokenizer};

/// "John met Mary." in a single section.
pub(crate) fn john_met_mary() -> SourceDocument {
    SourceDocument::single_section("john-met-mary", "John met Mary.")
}

/// Two sections, one sentence each: "John met Mary." / "She smiled."
pub(crate) fn two_sections() -> SourceDocument {
    SourceDocument::new(
        "two-sections",
        "John met Mary.\nShe smiled.",
        vec![SectionSpec::new(0, 14), SectionSpec::new(15, 26)],
    )
}

pub(crate) fn tokenized(source: &SourceDocument) -> TokenizedDocument {
    let sentences = SimpleTokenizer::default().tokenize(source);
    let mut ids = IdGenerator::for_document(source.id());
    place_sentences(source, &sentences, &mut ids).unwrap()
}

pub(crate) fn span(start: usize, end: usize, text: &str) -> AnnotationSpan {
    AnnotationSpan::new(start, end, text)
}

pub(crate) fn mention(id: &str, extent: AnnotationSpan, head: AnnotationSpan) -> EntityMention {
    EntityMention {
        id: MentionId::new(id),
        mention_type: "NAM".into(),
        ldc_type: None,
        extent,
        head,
    }
}

pub(crate) fn entity(id: &str, entity_type: &str, subtype: &str, mentions: Vec<EntityMention>) -> Entity {
    Entity {
        id: id.into(),
        entity_type: entity_type.into(),
        subtype: subtype.into(),
        class: Some("SPC".into()),
        mentions,
    }
}

pub(crate) fn event(id: &str, event_type: &str, subtype: &str, mentions: Vec<EventMention>) -> Event {
    Event {
        id: EventId(id.into()),
        event_type: event_type.into(),
        subtype: subtype.into(),
        modality: Some("Asserted".into()),
        polarity: Some("Positive".into()),
        genericity: Some("Specific".into()),
        tense: Some("Past".into()),
        mentions,
    }
}

pub(crate) fn event_mention(
    id: &str,
    extent: AnnotationSpan,
    anchor: AnnotationSpan,
    arguments: &[(&str, &str)],
) -> EventMention {
    EventMention {
        id: id.into(),
        extent,
        anchor,
        arguments: arguments
            .iter()
            .map(|(role, target)| Argument::new(*role, *target))
            .collect(),
    }
}
