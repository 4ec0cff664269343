//! Error types for reading annotation and companion files.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReaderError {
    /// The file could not be read.
    #[error("failed to load {path}: {message}")]
    Load { path: String, message: String },

    /// The file was read but is not a valid record.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("no companion document for {annotation} (expected {companion})")]
    MissingCompanion {
        annotation: String,
        companion: String,
    },

    /// Two mentions share an identifier, so arguments could not be resolved unambiguously.
    #[error("duplicate entity mention id {mention} in document {doc_id}")]
    DuplicateMention { doc_id: String, mention: String },
}

pub type ReaderResult<T> = Result<T, ReaderError>;
