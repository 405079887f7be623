//! `build`: index every file of a directory

use crate::config::{Config, IndexFormat, DEFAULT_INDEX_STEM};
use anyhow::{Context, Result};
use clap::Args;
use okapi_engine::{encode_index, tokenize_corpus, Bm25Engine};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Create an index file from a directory of documents
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Directory with the files to index, one document per file
    #[arg(value_name = "TARGET_DIR")]
    pub target_dir: PathBuf,

    /// Where to write the index (default: `index.<ext>` next to TARGET_DIR)
    #[arg(short = 'I', long = "index", value_name = "INDEX")]
    pub index: Option<PathBuf>,

    /// Persisted format (overrides the config file)
    #[arg(short, long, value_enum)]
    pub format: Option<IndexFormat>,
}

/// What a successful build produced
#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// Path of the written index file
    pub index_path: PathBuf,
    /// Documents indexed
    pub num_docs: usize,
    /// Distinct terms
    pub vocab_size: usize,
}

/// A directory read as a corpus: names and contents, aligned.
#[derive(Debug, Default)]
pub struct Corpus {
    /// File names, in sorted order
    pub names: Vec<String>,
    /// File contents aligned with `names`
    pub documents: Vec<String>,
}

/// Read every regular file of `dir` in file-name order.
///
/// Files that cannot be read as UTF-8 text are logged and skipped.
pub fn read_corpus(dir: &Path) -> Result<Corpus> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing directory {}", dir.display()))?;
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut corpus = Corpus::default();
    for path in paths {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        match fs::read_to_string(&path) {
            Ok(text) => {
                corpus.names.push(name);
                corpus.documents.push(text);
            }
            Err(e) => {
                warn!(
                    target: "okapi::cli",
                    path = %path.display(),
                    error = %e,
                    "skipping unreadable file"
                );
            }
        }
    }
    Ok(corpus)
}

/// Default index location: `index.<ext>` in the parent of `target_dir`.
fn default_index_path(target_dir: &Path, format: IndexFormat) -> PathBuf {
    let file_name = format!("{}.{}", DEFAULT_INDEX_STEM, format.extension());
    match target_dir.parent() {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Run `build`. Returns `None` when the directory holds no readable file.
pub fn run(
    args: &BuildArgs,
    config: &Config,
    out: &mut impl Write,
) -> Result<Option<BuildOutcome>> {
    writeln!(out, "Building index...")?;

    let corpus = read_corpus(&args.target_dir)?;
    if corpus.documents.is_empty() {
        writeln!(
            out,
            "You have provided an empty folder : {}",
            args.target_dir.display()
        )?;
        return Ok(None);
    }

    let mut engine = Bm25Engine::with_params(config.params()?);
    engine.build_index(&tokenize_corpus(&corpus.documents), corpus.names)?;
    let Some(index) = engine.into_index() else {
        anyhow::bail!("index build produced no index");
    };

    let format = args.format.unwrap_or(config.format);
    let index_path = args
        .index
        .clone()
        .unwrap_or_else(|| default_index_path(&args.target_dir, format));

    let encoded = encode_index(&index, format.into())?;
    fs::write(&index_path, encoded)
        .with_context(|| format!("writing index file {}", index_path.display()))?;

    info!(
        target: "okapi::cli",
        path = %index_path.display(),
        num_docs = index.num_docs(),
        vocab_size = index.vocab_size(),
        "index written"
    );
    writeln!(
        out,
        "Indexed {} documents ({} terms) into {}",
        index.num_docs(),
        index.vocab_size(),
        index_path.display()
    )?;

    Ok(Some(BuildOutcome {
        index_path,
        num_docs: index.num_docs(),
        vocab_size: index.vocab_size(),
    }))
}
