//! The assembled annotation graph.
//!
//! Entities point at their mentions by identifier, mentions point at token
//! ranges inside a tokenization, and situation (event) mentions point at the
//! entity mentions filling their argument roles.

mod assembler;

pub use assembler::{
    AssembleError, Assembly, ConversionCounts, Diagnostics, GraphAssembler, MentionField,
    MentionIndex, SkippedExtent,
};

use crate::display::{DisplayArrow, SentenceDisplay};
use crate::document::{Section, Tokenization};
use crate::ids::TokenizationId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Situation type given to every converted event.
pub const EVENT_SITUATION_TYPE: &str = "EVENT";

/// Which tool produced an annotation set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub tool: String,
}

/// Token indices inside one tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRefSequence {
    pub tokenization_id: TokenizationId,
    pub token_indices: Vec<usize>,
    /// Token most representative of the mention (last token of its head)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_token_index: Option<usize>,
}

impl TokenRefSequence {
    /// The contiguous range covered, if any.
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        let first = *self.token_indices.first()?;
        let last = *self.token_indices.last()?;
        Some(first..last + 1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: Uuid,
    /// `TYPE:SUBTYPE`
    pub entity_type: String,
    pub mention_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMention {
    pub id: Uuid,
    /// Identifier of the mention in the annotation file
    pub annotation_id: String,
    pub phrase_type: String,
    /// `TYPE:SUBTYPE` of the owning entity
    pub entity_type: String,
    pub tokens: TokenRefSequence,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub id: Uuid,
    pub metadata: Metadata,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMentionSet {
    pub id: Uuid,
    pub metadata: Metadata,
    pub mentions: Vec<EntityMention>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionArgument {
    pub role: String,
    pub entity_mention_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Situation {
    pub id: Uuid,
    pub situation_type: String,
    /// `TYPE:SUBTYPE` of the event
    pub situation_kind: String,
    pub mention_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationMention {
    pub id: Uuid,
    /// Identifier of the event mention in the annotation file
    pub annotation_id: String,
    pub situation_type: String,
    pub situation_kind: String,
    /// Absent when the extent could not be aligned to a single sentence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenRefSequence>,
    pub arguments: Vec<MentionArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationSet {
    pub id: Uuid,
    pub metadata: Metadata,
    pub situations: Vec<Situation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SituationMentionSet {
    pub id: Uuid,
    pub metadata: Metadata,
    pub mentions: Vec<SituationMention>,
}

/// A tokenized document with its entity and situation annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    pub id: String,
    pub text: String,
    pub sections: Vec<Section>,
    pub entity_set: EntitySet,
    pub entity_mention_set: EntityMentionSet,
    pub situation_set: SituationSet,
    pub situation_mention_set: SituationMentionSet,
}

impl AnnotatedDocument {
    pub fn entity_mention(&self, id: Uuid) -> Option<&EntityMention> {
        self.entity_mention_set.mentions.iter().find(|m| m.id == id)
    }

    pub fn situation_mention(&self, id: Uuid) -> Option<&SituationMention> {
        self.situation_mention_set.mentions.iter().find(|m| m.id == id)
    }

    pub fn tokenizations(&self) -> impl Iterator<Item = &Tokenization> {
        self.sections
            .iter()
            .flat_map(|section| section.sentences.iter())
            .map(|sentence| &sentence.tokenization)
    }

    pub fn tokenization(&self, id: TokenizationId) -> Option<&Tokenization> {
        self.tokenizations().find(|t| t.id == id)
    }

    /// Render one sentence with every entity and situation mention inside it.
    pub fn sentence_display(&self, tokenization_id: TokenizationId) -> Option<SentenceDisplay<'_>> {
        let tokenization = self.tokenization(tokenization_id)?;
        let mut display = SentenceDisplay::new(tokenization);

        for mention in &self.entity_mention_set.mentions {
            if mention.tokens.tokenization_id != tokenization_id {
                continue;
            }
            if let Some(range) = mention.tokens.range() {
                display.include(range, format!("{} {}", mention.entity_type, mention.phrase_type));
            }
        }

        for mention in &self.situation_mention_set.mentions {
            let Some(tokens) = &mention.tokens else {
                continue;
            };
            if tokens.tokenization_id != tokenization_id {
                continue;
            }
            let Some(range) = tokens.range() else {
                continue;
            };
            let arrows = mention
                .arguments
                .iter()
                .map(|argument| DisplayArrow {
                    role: argument.role.clone(),
                    target: self
                        .entity_mention(argument.entity_mention_id)
                        .filter(|target| target.tokens.tokenization_id == tokenization_id)
                        .and_then(|target| target.tokens.range()),
                })
                .collect();
            display.include_with_arrows(range, mention.situation_kind.clone(), arrows);
        }

        Some(display)
    }
}
