//! Already-parsed APF records, as stored in `*.apf.json` files.
//!
//! Field names follow the APF element and attribute names, lower-cased.

use apf_align::AnnotationSpan;
use serde::{Deserialize, Serialize};

/// A `charseq`: inclusive character offsets plus the annotated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharSeq {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl CharSeq {
    pub fn to_span(&self) -> AnnotationSpan {
        AnnotationSpan::new(self.start, self.end, self.text.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApfDocument {
    #[serde(alias = "docid")]
    pub doc_id: String,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    #[serde(default)]
    pub timex2: Vec<Timex2Record>,
    #[serde(default)]
    pub values: Vec<ValueRecord>,
    #[serde(default)]
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub subtype: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub mentions: Vec<EntityMentionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMentionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub mention_type: String,
    #[serde(default, alias = "ldctype")]
    pub ldc_type: Option<String>,
    pub extent: CharSeq,
    pub head: CharSeq,
}

/// Mention of a timex2 or value: only an extent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtentMentionRecord {
    pub id: String,
    pub extent: CharSeq,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timex2Record {
    pub id: String,
    #[serde(default)]
    pub mentions: Vec<ExtentMentionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub mentions: Vec<ExtentMentionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    #[serde(rename = "type")]
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
    #[serde(default)]
    pub mentions: Vec<EventMentionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMentionRecord {
    pub id: String,
    /// Used as the mention extent; the narrower `extent` element is ignored.
    pub ldc_scope: CharSeq,
    pub anchor: CharSeq,
    #[serde(default)]
    pub arguments: Vec<ArgumentRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentRecord {
    pub role: String,
    pub refid: String,
}
