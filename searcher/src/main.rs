use anyhow::{Context, Result};
use clap::Parser;
use strata_core::persist::{load_index, IndexPaths};
use strata_core::{execute, Analyzer};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "strata-searcher")]
#[command(about = "Query a built index", long_about = None)]
struct Args {
    /// Index directory path
    #[arg(long, default_value = "./index")]
    index: String,
    /// Query text, analyzed the same way the index was built
    #[arg(long)]
    query: String,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let paths = IndexPaths::new(&args.index);
    let (index, meta) = load_index(&paths)
        .with_context(|| format!("loading index from {}", args.index))?;
    tracing::info!(
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        "index loaded"
    );

    let analyzer = Analyzer::new(meta.analysis);
    let terms = analyzer.query_terms(&args.query);
    let outcome = execute(&index, &terms);

    for term in &outcome.missing {
        tracing::warn!(term = %term, "query term not in dictionary");
    }

    if outcome.ranked.is_empty() {
        println!("no matching documents");
        return Ok(());
    }

    for (ordinal, entry) in outcome.ranked.iter().enumerate() {
        let mut line = format!("{:2}. [{:>5}] {:.2}", ordinal + 1, entry.doc_id, entry.score);
        if let Some(doc) = index.doc_meta(entry.doc_id) {
            line.push_str(&format!("  {}", doc.title));
            if !doc.authors.is_empty() {
                line.push_str(&format!("  ({})", doc.authors.join(", ")));
            }
        }
        println!("{line}");
    }
    Ok(())
}
