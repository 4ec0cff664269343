//! The parsed annotation tree: entities, events and their mentions.
//!
//! The tree is produced once by an annotation reader and never mutated
//! afterwards. Mentions are referenced by their annotation identifiers.

use crate::span::AnnotationSpan;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Annotation identifier of an entity mention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MentionId(pub String);

impl MentionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MentionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Annotation identifier of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub entity_type: String,
    pub subtype: String,
    #[serde(default)]
    pub class: Option<String>,
    pub mentions: Vec<EntityMention>,
}

impl Entity {
    /// `TYPE:SUBTYPE`, the only place the subtype survives in the output.
    pub fn type_subtype(&self) -> String {
        format!("{}:{}", self.entity_type, self.subtype)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    pub id: MentionId,
    /// Phrase type (NAM, NOM, PRO, ...)
    pub mention_type: String,
    #[serde(default)]
    pub ldc_type: Option<String>,
    pub extent: AnnotationSpan,
    pub head: AnnotationSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub event_type: String,
    pub subtype: String,
    #[serde(default)]
    pub modality: Option<String>,
    #[serde(default)]
    pub polarity: Option<String>,
    #[serde(default)]
    pub genericity: Option<String>,
    #[serde(default)]
    pub tense: Option<String>,
    pub mentions: Vec<EventMention>,
}

impl Event {
    pub fn type_subtype(&self) -> String {
        format!("{}:{}", self.event_type, self.subtype)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMention {
    pub id: String,
    pub extent: AnnotationSpan,
    pub anchor: AnnotationSpan,
    pub arguments: Vec<Argument>,
}

/// A role filled by an entity mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub role: String,
    pub target: MentionId,
}

impl Argument {
    pub fn new(role: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            target: MentionId::new(target),
        }
    }
}

/// Position of an event mention inside the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMentionRef {
    pub event: usize,
    pub mention: usize,
}

/// The whole annotation tree for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationTree {
    pub doc_id: String,
    pub entities: Vec<Entity>,
    pub events: Vec<Event>,
    /// Event mentions in the order the reader registered them
    #[serde(default)]
    pub event_mention_order: Vec<EventMentionRef>,
}

impl AnnotationTree {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            ..Self::default()
        }
    }

    pub fn push_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Add an event and register its mentions in reading order.
    pub fn push_event(&mut self, event: Event) {
        let event_idx = self.events.len();
        self.event_mention_order
            .extend((0..event.mentions.len()).map(|mention| EventMentionRef {
                event: event_idx,
                mention,
            }));
        self.events.push(event);
    }

    /// All entity mentions with their owning entity, in tree order.
    pub fn entity_mentions(&self) -> impl Iterator<Item = (&Entity, &EntityMention)> {
        self.entities
            .iter()
            .flat_map(|entity| entity.mentions.iter().map(move |mention| (entity, mention)))
    }

    pub fn entity_mention(&self, id: &MentionId) -> Option<&EntityMention> {
        self.entity_mentions()
            .map(|(_, mention)| mention)
            .find(|mention| &mention.id == id)
    }

    /// Events reachable from registered event mentions, each once, in the
    /// order their first mention was registered.
    ///
    /// Events without any mention are not reachable and are not returned.
    pub fn referenced_events(&self) -> Vec<&Event> {
        let order: Vec<EventMentionRef> = if self.event_mention_order.is_empty() {
            self.events
                .iter()
                .enumerate()
                .flat_map(|(event, e)| {
                    (0..e.mentions.len()).map(move |mention| EventMentionRef { event, mention })
                })
                .collect()
        } else {
            self.event_mention_order.clone()
        };

        let mut seen = HashSet::new();
        let mut events = Vec::new();
        for mention_ref in order {
            let Some(event) = self.events.get(mention_ref.event) else {
                continue;
            };
            if seen.insert(&event.id) {
                events.push(event);
            }
        }
        events
    }

    pub fn entity_mention_count(&self) -> usize {
        self.entities.iter().map(|e| e.mentions.len()).sum()
    }
}
