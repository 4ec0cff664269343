//! Reads annotation and companion files for `apf-align`.
//!
//! Annotation files hold APF records that were already parsed out of their
//! markup (`*.apf.json`). Companion files hold the document text, its section
//! boundaries and optionally an external tokenization (`*.tok.json`).
//!
//! ## Modules
//!
//! - [`records`] - serde records mirroring the APF elements
//! - [`reader`] - normalization of records into an annotation tree
//! - [`companion`] - companion documents
//! - [`loader`] - file loading and annotation/companion pair discovery
//! - [`errors`] - error types

pub mod companion;
pub mod errors;
pub mod loader;
pub mod reader;
pub mod records;

pub use companion::{Companion, SectionRecord};
pub use errors::{ReaderError, ReaderResult};
pub use loader::{
    discover_pairs, load_annotation, load_companion, load_pair, DocumentPair, LoadedDocument,
};
pub use reader::{abbreviate_value_type, build_tree};
pub use records::{ApfDocument, CharSeq};
