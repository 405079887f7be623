//! `search`: rank the documents of a persisted index against a query

use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use okapi_engine::{decode_index, Bm25Engine, Index, PersistFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Rank the documents of an index against a query
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Index file to work with
    #[arg(value_name = "INDEX")]
    pub index: PathBuf,

    /// The query; multiple words are joined with spaces
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Number of results to print (overrides the config file)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Read and decode an index file, text or JSON.
pub fn load_index(path: &Path) -> Result<Index> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading index file {}", path.display()))?;
    let format = PersistFormat::detect(&raw);
    debug!(target: "okapi::cli", path = %path.display(), ?format, "decoding index");
    decode_index(&raw, format).with_context(|| format!("loading index file {}", path.display()))
}

/// Run `search`, printing one line per ranked document.
///
/// Returns the `(document name, score)` pairs in rank order.
pub fn run(args: &SearchArgs, config: &Config, out: &mut impl Write) -> Result<Vec<(String, f64)>> {
    let query = args.query.join(" ");
    let top_k = args.top_k.unwrap_or(config.top_k);

    let engine = Bm25Engine::from_index(load_index(&args.index)?);
    let hits = engine.search(&query, top_k)?;

    writeln!(out, "Query : \"{}\"", query)?;
    writeln!(out)?;

    let index = engine
        .index()
        .context("search engine lost its index")?;
    let mut ranked = Vec::with_capacity(hits.len());
    for hit in hits {
        let name = index.document_name(hit.doc_index)?;
        writeln!(out, "file : {} => score = {}", name, hit.score)?;
        ranked.push((name.to_string(), hit.score));
    }
    Ok(ranked)
}
