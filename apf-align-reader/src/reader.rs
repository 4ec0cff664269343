//! Normalizes APF records into an [`AnnotationTree`].
//!
//! Besides ordinary entities, the tree receives:
//!
//! - timex2 records as `TIM` entities,
//! - value records as entities with abbreviated types,
//! - every event mention anchor as a `TRIGGER` entity, referenced from the
//!   event mention as its first argument.
//!
//! Event arguments naming anything other than an entity mention are dropped.

use crate::errors::{ReaderError, ReaderResult};
use crate::records::{ApfDocument, CharSeq, EventMentionRecord, ValueRecord};
use apf_align::{
    AnnotationTree, Argument, Entity, EntityMention, Event, EventId, EventMention, MentionId,
    ReaderConfig,
};
use std::collections::HashSet;

pub const TIMEX_TYPE: &str = "TIM";
pub const TIMEX_SUBTYPE: &str = "time";
pub const TRIGGER_TYPE: &str = "TRIGGER";
pub const TRIGGER_ROLE: &str = "TRIGGER";

/// Short type names used for value entities.
pub fn abbreviate_value_type(value_type: &str) -> &str {
    match value_type {
        "Numeric" => "NUM",
        "Contact-Info" => "CTI",
        "Crime" => "CRM",
        "Job-Title" => "JOB",
        "Sentence" => "SEN",
        other => other,
    }
}

pub fn trigger_entity_id(event_mention_id: &str) -> String {
    format!("{}-TRIGGER", event_mention_id)
}

pub fn trigger_mention_id(event_mention_id: &str) -> MentionId {
    MentionId::new(format!("{}-TRIGGER-0", event_mention_id))
}

struct MentionRegistry<'a> {
    doc_id: &'a str,
    seen: HashSet<String>,
}

impl<'a> MentionRegistry<'a> {
    fn register(&mut self, id: &MentionId) -> ReaderResult<()> {
        if !self.seen.insert(id.as_str().to_string()) {
            return Err(ReaderError::DuplicateMention {
                doc_id: self.doc_id.to_string(),
                mention: id.to_string(),
            });
        }
        Ok(())
    }

    fn push_entity(&mut self, tree: &mut AnnotationTree, entity: Entity) -> ReaderResult<()> {
        for mention in &entity.mentions {
            self.register(&mention.id)?;
        }
        tree.push_entity(entity);
        Ok(())
    }

    fn contains(&self, id: &str) -> bool {
        self.seen.contains(id)
    }
}

/// A mention whose head is its extent.
fn extent_mention(id: MentionId, mention_type: &str, extent: &CharSeq) -> EntityMention {
    let span = extent.to_span();
    EntityMention {
        id,
        mention_type: mention_type.to_string(),
        ldc_type: Some(mention_type.to_string()),
        extent: span.clone(),
        head: span,
    }
}

fn value_entity(record: &ValueRecord) -> Entity {
    let value_type = abbreviate_value_type(&record.value_type);
    let subtype = match value_type {
        "NUM" | "CTI" => record
            .subtype
            .clone()
            .unwrap_or_else(|| value_type.to_string()),
        _ => value_type.to_string(),
    };

    Entity {
        id: record.id.clone(),
        entity_type: value_type.to_string(),
        subtype,
        class: Some(value_type.to_string()),
        mentions: record
            .mentions
            .iter()
            .map(|m| extent_mention(MentionId::new(m.id.clone()), value_type, &m.extent))
            .collect(),
    }
}

fn trigger_entity(mention: &EventMentionRecord) -> Entity {
    Entity {
        id: trigger_entity_id(&mention.id),
        entity_type: TRIGGER_TYPE.to_string(),
        subtype: TRIGGER_TYPE.to_string(),
        class: Some(TRIGGER_TYPE.to_string()),
        mentions: vec![extent_mention(
            trigger_mention_id(&mention.id),
            TRIGGER_TYPE,
            &mention.anchor,
        )],
    }
}

/// Build the annotation tree for one document.
pub fn build_tree(document: &ApfDocument, config: &ReaderConfig) -> ReaderResult<AnnotationTree> {
    let mut tree = AnnotationTree::new(document.doc_id.clone());
    let mut registry = MentionRegistry {
        doc_id: &document.doc_id,
        seen: HashSet::new(),
    };

    for record in &document.entities {
        let entity = Entity {
            id: record.id.clone(),
            entity_type: record.entity_type.clone(),
            subtype: record.subtype.clone(),
            class: record.class.clone(),
            mentions: record
                .mentions
                .iter()
                .map(|m| EntityMention {
                    id: MentionId::new(m.id.clone()),
                    mention_type: m.mention_type.clone(),
                    ldc_type: m.ldc_type.clone(),
                    extent: m.extent.to_span(),
                    head: m.head.to_span(),
                })
                .collect(),
        };
        registry.push_entity(&mut tree, entity)?;
    }

    if config.include_timex {
        for record in &document.timex2 {
            let entity = Entity {
                id: record.id.clone(),
                entity_type: TIMEX_TYPE.to_string(),
                subtype: TIMEX_SUBTYPE.to_string(),
                class: Some(TIMEX_TYPE.to_string()),
                mentions: record
                    .mentions
                    .iter()
                    .map(|m| extent_mention(MentionId::new(m.id.clone()), TIMEX_TYPE, &m.extent))
                    .collect(),
            };
            registry.push_entity(&mut tree, entity)?;
        }
    }

    if config.include_values {
        for record in &document.values {
            registry.push_entity(&mut tree, value_entity(record))?;
        }
    }

    if config.include_triggers {
        for mention in document.events.iter().flat_map(|e| &e.mentions) {
            registry.push_entity(&mut tree, trigger_entity(mention))?;
        }
    }

    for record in &document.events {
        let mentions = record
            .mentions
            .iter()
            .map(|mention| event_mention(mention, config, &registry))
            .collect();
        tree.push_event(Event {
            id: EventId(record.id.clone()),
            event_type: record.event_type.clone(),
            subtype: record.subtype.clone(),
            modality: record.modality.clone(),
            polarity: record.polarity.clone(),
            genericity: record.genericity.clone(),
            tense: record.tense.clone(),
            mentions,
        });
    }

    tracing::debug!(
        document = %document.doc_id,
        entities = tree.entities.len(),
        events = tree.events.len(),
        "annotation tree built"
    );
    Ok(tree)
}

fn event_mention(
    record: &EventMentionRecord,
    config: &ReaderConfig,
    registry: &MentionRegistry<'_>,
) -> EventMention {
    let mut arguments = Vec::with_capacity(record.arguments.len() + 1);
    if config.include_triggers {
        arguments.push(Argument {
            role: TRIGGER_ROLE.to_string(),
            target: trigger_mention_id(&record.id),
        });
    }

    for argument in &record.arguments {
        if registry.contains(&argument.refid) {
            arguments.push(Argument::new(argument.role.clone(), argument.refid.clone()));
        } else {
            tracing::debug!(
                event_mention = %record.id,
                role = %argument.role,
                refid = %argument.refid,
                "argument does not reference an entity mention, dropped"
            );
        }
    }

    EventMention {
        id: record.id.clone(),
        extent: record.ldc_scope.to_span(),
        anchor: record.anchor.to_span(),
        arguments,
    }
}
