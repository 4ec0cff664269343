//! Builds the annotation graph from an annotation tree in two stages.
//!
//! Stage 1 aligns every entity mention and freezes a [`MentionIndex`] from
//! annotation mention ids to graph mention ids. Stage 2 builds situations and
//! resolves event arguments against that index without modifying it.
//!
//! Failure policy differs per stage: an entity mention that cannot be aligned
//! aborts the document, an event mention extent that cannot be aligned only
//! loses its token range.

use super::{
    Entity, EntityMention, EntityMentionSet, EntitySet, MentionArgument, Metadata, Situation,
    SituationMention, SituationMentionSet, SituationSet, TokenRefSequence, EVENT_SITUATION_TYPE,
};
use crate::aligner::{AlignError, AlignedSpan, SpanAligner};
use crate::annotation::{AnnotationTree, EventMention, MentionId};
use crate::config::ConvertConfig;
use crate::consistency::TextMismatch;
use crate::ids::IdGenerator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Which span of an entity mention failed to align.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionField {
    Extent,
    Head,
}

impl fmt::Display for MentionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MentionField::Extent => f.write_str("extent"),
            MentionField::Head => f.write_str("head"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("entity mention {mention} {field} did not align: {source}")]
    EntityMention {
        mention: MentionId,
        field: MentionField,
        #[source]
        source: AlignError,
    },

    /// An event argument names a mention that stage 1 never produced.
    #[error("event mention {event_mention} argument {role} references unknown entity mention {target}")]
    UnresolvedArgument {
        event_mention: String,
        role: String,
        target: MentionId,
    },

    #[error("entity mention id {mention} is used more than once")]
    DuplicateMention { mention: MentionId },
}

/// Running totals for reporting. They never influence control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionCounts {
    pub entities: usize,
    pub entity_mentions: usize,
    pub events: usize,
    pub event_mentions: usize,
    pub event_mention_roles: usize,
    /// Event mentions emitted without a token range
    pub skipped_event_extents: usize,
}

impl ConversionCounts {
    pub fn add(&mut self, other: &ConversionCounts) {
        self.entities += other.entities;
        self.entity_mentions += other.entity_mentions;
        self.events += other.events;
        self.event_mentions += other.event_mentions;
        self.event_mention_roles += other.event_mention_roles;
        self.skipped_event_extents += other.skipped_event_extents;
    }
}

impl fmt::Display for ConversionCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#entities={} #e-mentions={} #events={} #eve-mentions={} #eve-mention-roles={}",
            self.entities,
            self.entity_mentions,
            self.events,
            self.event_mentions,
            self.event_mention_roles
        )
    }
}

/// An event mention whose extent was left without tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedExtent {
    pub event_mention: String,
    pub reason: String,
}

/// Advisory findings collected while assembling one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub alignment_mismatches: Vec<TextMismatch>,
    pub skipped_event_extents: Vec<SkippedExtent>,
}

/// Annotation mention id to graph mention id, frozen after stage 1.
#[derive(Debug, Clone, Default)]
pub struct MentionIndex {
    by_annotation_id: HashMap<MentionId, Uuid>,
}

impl MentionIndex {
    pub fn get(&self, id: &MentionId) -> Option<Uuid> {
        self.by_annotation_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_annotation_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_annotation_id.is_empty()
    }
}

/// Everything the assembler produces for one document.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub entity_set: EntitySet,
    pub entity_mention_set: EntityMentionSet,
    pub situation_set: SituationSet,
    pub situation_mention_set: SituationMentionSet,
    pub counts: ConversionCounts,
    pub diagnostics: Diagnostics,
}

struct EntityStage {
    entity_set: EntitySet,
    entity_mention_set: EntityMentionSet,
    index: MentionIndex,
}

struct EventStage {
    situation_set: SituationSet,
    situation_mention_set: SituationMentionSet,
}

fn token_refs(aligned: &AlignedSpan, anchor: Option<usize>) -> TokenRefSequence {
    TokenRefSequence {
        tokenization_id: aligned.tokenization_id,
        token_indices: aligned.token_indices(),
        anchor_token_index: anchor,
    }
}

pub struct GraphAssembler<'d> {
    aligner: SpanAligner<'d>,
    metadata: Metadata,
    check_text: bool,
}

impl<'d> GraphAssembler<'d> {
    pub fn new(aligner: SpanAligner<'d>, config: &ConvertConfig) -> Self {
        Self {
            aligner,
            metadata: Metadata {
                tool: config.tool_name.clone(),
            },
            check_text: config.log_alignment_mismatches,
        }
    }

    /// Assemble the full graph for one annotation tree.
    pub fn assemble(
        &self,
        tree: &AnnotationTree,
        ids: &mut IdGenerator,
    ) -> Result<Assembly, AssembleError> {
        let mut counts = ConversionCounts::default();
        let mut diagnostics = Diagnostics::default();

        let entities = self.assemble_entities(tree, ids, &mut counts, &mut diagnostics)?;
        let events = self.assemble_events(
            tree,
            &entities.index,
            ids,
            &mut counts,
            &mut diagnostics,
        )?;

        Ok(Assembly {
            entity_set: entities.entity_set,
            entity_mention_set: entities.entity_mention_set,
            situation_set: events.situation_set,
            situation_mention_set: events.situation_mention_set,
            counts,
            diagnostics,
        })
    }

    fn align_mention_span(
        &self,
        mention: &MentionId,
        field: MentionField,
        span: &crate::span::AnnotationSpan,
        diagnostics: &mut Diagnostics,
    ) -> Result<AlignedSpan, AssembleError> {
        let aligned = self
            .aligner
            .align(span)
            .map_err(|source| AssembleError::EntityMention {
                mention: mention.clone(),
                field,
                source,
            })?;
        if self.check_text {
            if let Some(mismatch) = self.aligner.check_text(span, &aligned, Some(mention.as_str())) {
                diagnostics.alignment_mismatches.push(mismatch);
            }
        }
        Ok(aligned)
    }

    fn assemble_entities(
        &self,
        tree: &AnnotationTree,
        ids: &mut IdGenerator,
        counts: &mut ConversionCounts,
        diagnostics: &mut Diagnostics,
    ) -> Result<EntityStage, AssembleError> {
        let mut entity_set = EntitySet {
            id: ids.next_id(),
            metadata: self.metadata.clone(),
            entities: Vec::with_capacity(tree.entities.len()),
        };
        let mut entity_mention_set = EntityMentionSet {
            id: ids.next_id(),
            metadata: self.metadata.clone(),
            mentions: Vec::with_capacity(tree.entity_mention_count()),
        };
        let mut by_annotation_id = HashMap::new();

        for a_entity in &tree.entities {
            let entity_type = a_entity.type_subtype();
            let mut entity = Entity {
                id: ids.next_id(),
                entity_type: entity_type.clone(),
                mention_ids: Vec::with_capacity(a_entity.mentions.len()),
            };

            for a_mention in &a_entity.mentions {
                let extent = self.align_mention_span(
                    &a_mention.id,
                    MentionField::Extent,
                    &a_mention.extent,
                    diagnostics,
                )?;
                let head = self.align_mention_span(
                    &a_mention.id,
                    MentionField::Head,
                    &a_mention.head,
                    diagnostics,
                )?;
                if head.tokenization_id != extent.tokenization_id {
                    tracing::warn!(
                        mention = %a_mention.id,
                        "head aligned to a different sentence than the extent"
                    );
                }

                let mention = EntityMention {
                    id: ids.next_id(),
                    annotation_id: a_mention.id.to_string(),
                    phrase_type: a_mention.mention_type.clone(),
                    entity_type: entity_type.clone(),
                    tokens: token_refs(&extent, Some(head.last_token_index())),
                };

                if by_annotation_id.insert(a_mention.id.clone(), mention.id).is_some() {
                    return Err(AssembleError::DuplicateMention {
                        mention: a_mention.id.clone(),
                    });
                }
                entity.mention_ids.push(mention.id);
                entity_mention_set.mentions.push(mention);
                counts.entity_mentions += 1;
            }

            entity_set.entities.push(entity);
            counts.entities += 1;
        }

        Ok(EntityStage {
            entity_set,
            entity_mention_set,
            index: MentionIndex { by_annotation_id },
        })
    }

    fn assemble_events(
        &self,
        tree: &AnnotationTree,
        index: &MentionIndex,
        ids: &mut IdGenerator,
        counts: &mut ConversionCounts,
        diagnostics: &mut Diagnostics,
    ) -> Result<EventStage, AssembleError> {
        let mut situation_set = SituationSet {
            id: ids.next_id(),
            metadata: self.metadata.clone(),
            situations: Vec::new(),
        };
        let mut situation_mention_set = SituationMentionSet {
            id: ids.next_id(),
            metadata: self.metadata.clone(),
            mentions: Vec::new(),
        };

        for a_event in tree.referenced_events() {
            let kind = a_event.type_subtype();
            let mut situation = Situation {
                id: ids.next_id(),
                situation_type: EVENT_SITUATION_TYPE.to_string(),
                situation_kind: kind.clone(),
                mention_ids: Vec::with_capacity(a_event.mentions.len()),
            };

            for a_mention in &a_event.mentions {
                let mention =
                    self.build_situation_mention(a_mention, &kind, index, ids, counts, diagnostics)?;
                situation.mention_ids.push(mention.id);
                situation_mention_set.mentions.push(mention);
                counts.event_mentions += 1;
            }

            situation_set.situations.push(situation);
            counts.events += 1;
        }

        Ok(EventStage {
            situation_set,
            situation_mention_set,
        })
    }

    fn build_situation_mention(
        &self,
        a_mention: &EventMention,
        kind: &str,
        index: &MentionIndex,
        ids: &mut IdGenerator,
        counts: &mut ConversionCounts,
        diagnostics: &mut Diagnostics,
    ) -> Result<SituationMention, AssembleError> {
        let id = ids.next_id();

        // Some extents straddle sentences because of annotation noise; those
        // mentions keep their arguments but lose the token range.
        let tokens = match self.aligner.align(&a_mention.extent) {
            Ok(aligned) => Some(token_refs(&aligned, None)),
            Err(err) => {
                tracing::warn!("Skipping event mention token span: {}", err);
                diagnostics.skipped_event_extents.push(SkippedExtent {
                    event_mention: a_mention.id.clone(),
                    reason: err.to_string(),
                });
                counts.skipped_event_extents += 1;
                None
            }
        };

        let mut arguments = Vec::with_capacity(a_mention.arguments.len());
        for argument in &a_mention.arguments {
            let entity_mention_id =
                index
                    .get(&argument.target)
                    .ok_or_else(|| AssembleError::UnresolvedArgument {
                        event_mention: a_mention.id.clone(),
                        role: argument.role.clone(),
                        target: argument.target.clone(),
                    })?;
            arguments.push(MentionArgument {
                role: argument.role.clone(),
                entity_mention_id,
            });
            counts.event_mention_roles += 1;
        }

        Ok(SituationMention {
            id,
            annotation_id: a_mention.id.clone(),
            situation_type: EVENT_SITUATION_TYPE.to_string(),
            situation_kind: kind.to_string(),
            tokens,
            arguments,
        })
    }
}
