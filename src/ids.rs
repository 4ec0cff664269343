//! Deterministic identifiers for the output graph.
//!
//! Identifiers are UUIDv5 values derived from a per-document namespace and a
//! running counter, so converting the same inputs twice yields the same graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of one sentence's tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenizationId(pub Uuid);

impl fmt::Display for TokenizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Hands out identifiers for one document.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    namespace: Uuid,
    counter: u64,
}

impl IdGenerator {
    /// Create a generator whose identifiers are scoped to `document_id`.
    pub fn for_document(document_id: &str) -> Self {
        Self {
            namespace: Uuid::new_v5(&Uuid::NAMESPACE_OID, document_id.as_bytes()),
            counter: 0,
        }
    }

    pub fn next_id(&mut self) -> Uuid {
        let id = Uuid::new_v5(&self.namespace, &self.counter.to_be_bytes());
        self.counter += 1;
        id
    }

    pub fn next_tokenization_id(&mut self) -> TokenizationId {
        TokenizationId(self.next_id())
    }

    /// Number of identifiers handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }
}
