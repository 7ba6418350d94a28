use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use strata_core::persist::{save_index, IndexPaths, MetaFile, FORMAT_VERSION};
use strata_core::{extract_observations, parse_collection, AnalysisOptions, Analyzer, Index};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "strata-indexer")]
#[command(about = "Build a tiered TF-IDF index from a tagged collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a collection file or a directory of them
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
        /// Stem terms with the Porter stemmer
        #[arg(long)]
        stem: bool,
        /// Drop stopwords before indexing
        #[arg(long)]
        remove_stopwords: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            stem,
            remove_stopwords,
        } => {
            let options = AnalysisOptions {
                apply_stemming: stem,
                remove_stopwords,
            };
            build_index(&input, &output, options)
        }
    }
}

fn build_index(input: &str, output: &str, options: AnalysisOptions) -> Result<()> {
    let started = Instant::now();
    let files = collect_input_files(Path::new(input));
    anyhow::ensure!(!files.is_empty(), "no input files under {input}");

    let mut documents = Vec::new();
    for file in &files {
        let text = fs::read_to_string(file)
            .with_context(|| format!("reading collection file {}", file.display()))?;
        let docs = parse_collection(&text)
            .with_context(|| format!("parsing collection file {}", file.display()))?;
        documents.extend(docs);
    }
    tracing::info!(
        num_files = files.len(),
        num_docs = documents.len(),
        "ingested documents"
    );

    let analyzer = Analyzer::new(options);
    let observations = extract_observations(&documents, &analyzer);
    let mut index = Index::build(observations).context("building index")?;
    for doc in &documents {
        index.set_doc_meta(doc.doc_id, doc.meta());
    }

    let paths = IndexPaths::new(output);
    let meta = MetaFile {
        num_docs: index.num_docs() as u32,
        num_terms: index.num_terms() as u32,
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        version: FORMAT_VERSION,
        analysis: options,
    };
    save_index(&paths, &index, &meta)
        .with_context(|| format!("writing index to {output}"))?;

    tracing::info!(
        output,
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "index build complete"
    );
    Ok(())
}

/// Every regular file under the input, in sorted path order so repeated
/// builds see documents in the same order.
fn collect_input_files(input: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.path().is_file() {
                files.push(entry.path().to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}
