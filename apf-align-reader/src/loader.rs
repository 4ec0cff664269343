//! Annotation and companion file loading.

use crate::companion::Companion;
use crate::errors::{ReaderError, ReaderResult};
use crate::reader::build_tree;
use crate::records::ApfDocument;
use apf_align::{AnnotationTree, ReaderConfig, SourceDocument, Suffixes, TokenStream};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

fn load_json<T: DeserializeOwned>(path: &Path) -> ReaderResult<T> {
    let content = fs::read_to_string(path).map_err(|e| ReaderError::Load {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| ReaderError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load parsed APF records from a `*.apf.json` file.
pub fn load_annotation(path: &Path) -> ReaderResult<ApfDocument> {
    load_json(path)
}

/// Load a tokenized companion document.
pub fn load_companion(path: &Path) -> ReaderResult<Companion> {
    load_json(path)
}

/// Everything needed to convert one document.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub tree: AnnotationTree,
    pub source: SourceDocument,
    /// `None` when the companion carries no sentences
    pub sentences: Option<TokenStream>,
}

/// An annotation file and the companion it should be converted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPair {
    /// File name with the annotation suffix removed
    pub name: String,
    pub annotation: PathBuf,
    pub companion: PathBuf,
}

impl DocumentPair {
    pub fn output_path(&self, output_dir: &Path, suffixes: &Suffixes) -> PathBuf {
        output_dir.join(format!("{}{}", self.name, suffixes.output))
    }

    pub fn load(&self, config: &ReaderConfig) -> ReaderResult<LoadedDocument> {
        load_pair(&self.annotation, &self.companion, config)
    }
}

/// Load an annotation file and its companion and build the annotation tree.
pub fn load_pair(
    annotation: &Path,
    companion: &Path,
    config: &ReaderConfig,
) -> ReaderResult<LoadedDocument> {
    if !companion.is_file() {
        return Err(ReaderError::MissingCompanion {
            annotation: annotation.display().to_string(),
            companion: companion.display().to_string(),
        });
    }

    let records = load_annotation(annotation)?;
    let tree = build_tree(&records, config)?;
    let (source, sentences) = load_companion(companion)?.into_source(&records.doc_id);

    Ok(LoadedDocument {
        tree,
        source,
        sentences,
    })
}

/// List every annotation file in `dir` (not recursive), sorted by name, with
/// the companion path it maps to.
///
/// Companions are not checked here; a missing one fails when the pair is loaded.
pub fn discover_pairs(dir: &Path, suffixes: &Suffixes) -> ReaderResult<Vec<DocumentPair>> {
    let to_load_error = |e: std::io::Error| ReaderError::Load {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    let mut pairs = Vec::new();
    for entry in fs::read_dir(dir).map_err(to_load_error)? {
        let path = entry.map_err(to_load_error)?.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(name) = file_name.strip_suffix(suffixes.annotation.as_str()) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        pairs.push(DocumentPair {
            name: name.to_string(),
            companion: dir.join(format!("{}{}", name, suffixes.companion)),
            annotation: path.clone(),
        });
    }

    pairs.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(dir = %dir.display(), pairs = pairs.len(), "discovered annotation files");
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn fixtures() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    #[test]
    fn test_load_fixture_pair() {
        let pairs = discover_pairs(&fixtures(), &Suffixes::default()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].name, "meeting");

        let loaded = pairs[0].load(&ReaderConfig::default()).unwrap();
        assert_eq!(loaded.tree.doc_id, "meeting");
        assert_eq!(loaded.source.id(), "meeting");
        assert_eq!(loaded.source.sections().len(), 2);
        assert!(loaded.sentences.is_none());
    }

    #[test]
    fn test_discover_pairs_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.apf.json", "a.apf.json", "a.tok.json", "notes.txt", ".apf.json"] {
            File::create(dir.path().join(name)).unwrap();
        }

        let pairs = discover_pairs(dir.path(), &Suffixes::default()).unwrap();
        let names: Vec<&str> = pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(pairs[0].companion, dir.path().join("a.tok.json"));
        assert_eq!(
            pairs[1].output_path(Path::new("out"), &Suffixes::default()),
            Path::new("out").join("b.graph.json")
        );
    }

    #[test]
    fn test_missing_companion() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("lonely.apf.json"), r#"{"doc_id": "lonely"}"#).unwrap();

        let pairs = discover_pairs(dir.path(), &Suffixes::default()).unwrap();
        let err = pairs[0].load(&ReaderConfig::default()).unwrap_err();
        assert!(matches!(err, ReaderError::MissingCompanion { .. }), "{err:?}");
    }

    #[test]
    fn test_parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.apf.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_annotation(&path).unwrap_err();
        match err {
            ReaderError::Parse { path: reported, .. } => {
                assert_eq!(reported, path.display().to_string())
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_directory() {
        let err = discover_pairs(Path::new("/nonexistent/apf-align"), &Suffixes::default()).unwrap_err();
        assert!(matches!(err, ReaderError::Load { .. }));
    }
}
