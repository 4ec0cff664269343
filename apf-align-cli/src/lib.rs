//! Batch driver behind the `apf-align` binary.
//!
//! Usage:
//!   apf-align <annotation> <companion> <output>
//!   apf-align <input-dir> <output-dir>
//!
//! In directory mode every `*.apf.json` file in `<input-dir>` is converted
//! with its `*.tok.json` companion into `<output-dir>/*.graph.json`. A failing
//! document is reported and skipped; the run still fails at the end.

use anyhow::{bail, Context, Result};
use apf_align::{
    convert, convert_with_tokenizer, AnnotatedDocument, Conversion, ConversionCounts,
    ConvertConfig, SimpleTokenizer,
};
use apf_align_reader::{discover_pairs, load_pair, LoadedDocument};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

/// Align APF annotations with a tokenization and write annotation graphs
#[derive(Parser, Debug)]
#[command(name = "apf-align")]
#[command(about = "Align APF annotations with a tokenization and write annotation graphs")]
pub struct Args {
    /// `<annotation> <companion> <output>` or `<input-dir> <output-dir>`
    #[arg(required = true, num_args = 2..=3)]
    pub paths: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Print every sentence with its aligned annotations
    #[arg(long)]
    pub render: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Single {
        annotation: PathBuf,
        companion: PathBuf,
        output: PathBuf,
    },
    Batch {
        input_dir: PathBuf,
        output_dir: PathBuf,
    },
}

impl Args {
    pub fn mode(&self) -> Result<Mode> {
        match self.paths.as_slice() {
            [annotation, companion, output] => Ok(Mode::Single {
                annotation: annotation.clone(),
                companion: companion.clone(),
                output: output.clone(),
            }),
            [input_dir, output_dir] => {
                if !input_dir.is_dir() {
                    bail!("{} is not a directory", input_dir.display());
                }
                Ok(Mode::Batch {
                    input_dir: input_dir.clone(),
                    output_dir: output_dir.clone(),
                })
            }
            _ => bail!("expected <annotation> <companion> <output> or <input-dir> <output-dir>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub name: String,
    pub error: String,
}

/// Outcome of a run across all documents.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub converted: usize,
    pub counts: ConversionCounts,
    pub failures: Vec<DocumentFailure>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn run(args: &Args) -> Result<RunSummary> {
    let config = match &args.config {
        Some(path) => {
            if !path.exists() {
                tracing::warn!(path = %path.display(), "config file not found, using defaults");
            }
            ConvertConfig::load(path)?
        }
        None => ConvertConfig::default(),
    };

    match args.mode()? {
        Mode::Single {
            annotation,
            companion,
            output,
        } => {
            let loaded = load_pair(&annotation, &companion, &config.reader)
                .with_context(|| format!("Failed to read {}", annotation.display()))?;
            let conversion = convert_loaded(&loaded, &config)?;
            finish_document(&conversion, &output, args.render)?;
            Ok(RunSummary {
                converted: 1,
                counts: conversion.counts,
                failures: Vec::new(),
            })
        }
        Mode::Batch {
            input_dir,
            output_dir,
        } => run_batch(&input_dir, &output_dir, &config, args.render),
    }
}

fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: &ConvertConfig,
    render: bool,
) -> Result<RunSummary> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    let pairs = discover_pairs(input_dir, &config.suffixes)?;
    tracing::info!(documents = pairs.len(), "converting directory");

    let mut summary = RunSummary::default();
    for pair in pairs {
        let output = pair.output_path(output_dir, &config.suffixes);
        let result = pair
            .load(&config.reader)
            .map_err(anyhow::Error::from)
            .and_then(|loaded| convert_loaded(&loaded, config))
            .and_then(|conversion| {
                finish_document(&conversion, &output, render)?;
                Ok(conversion.counts)
            });

        match result {
            Ok(counts) => {
                summary.counts.add(&counts);
                summary.converted += 1;
            }
            Err(err) => {
                tracing::error!(document = %pair.name, "conversion failed: {:#}", err);
                summary.failures.push(DocumentFailure {
                    name: pair.name.clone(),
                    error: format!("{:#}", err),
                });
            }
        }
    }
    Ok(summary)
}

/// Convert with the companion's sentences, or the built-in tokenizer if it has none.
pub fn convert_loaded(loaded: &LoadedDocument, config: &ConvertConfig) -> Result<Conversion> {
    let conversion = match &loaded.sentences {
        Some(sentences) => convert(&loaded.tree, &loaded.source, sentences, config),
        None => convert_with_tokenizer(
            &loaded.tree,
            &loaded.source,
            &SimpleTokenizer::default(),
            config,
        ),
    }
    .with_context(|| format!("Failed to convert {}", loaded.source.id()))?;

    tracing::info!(document = loaded.source.id(), "{}", conversion.counts);
    Ok(conversion)
}

fn finish_document(conversion: &Conversion, output: &Path, render: bool) -> Result<()> {
    write_graph(&conversion.document, output)?;
    if render {
        print_sentences(&conversion.document);
    }
    Ok(())
}

pub fn write_graph(document: &AnnotatedDocument, output: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(document)?;
    fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::debug!(output = %output.display(), "graph written");
    Ok(())
}

fn print_sentences(document: &AnnotatedDocument) {
    println!("# {}", document.id);
    for tokenization in document.tokenizations() {
        if let Some(display) = document.sentence_display(tokenization.id) {
            println!("{}\n", display);
        }
    }
}
