//! Errors that abort the conversion of a document.

use crate::document::PlacementError;
use crate::graph::AssembleError;
use thiserror::Error;

/// A structural failure; the document produces no graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("sentence placement failed: {0}")]
    Placement(#[from] PlacementError),

    #[error("annotation assembly failed: {0}")]
    Assemble(#[from] AssembleError),
}

/// Result type for conversions.
pub type ConvertResult<T> = Result<T, ConvertError>;
