//! Indexing and ranked retrieval over a tagged document collection.
//!
//! The pipeline is: parse a collection file into documents, analyze their
//! text into positional term observations, build an immutable inverted
//! index, persist it, and answer queries with tiered TF-IDF cosine
//! ranking. Binaries for the two ends of the pipeline live in the
//! `indexer` and `searcher` crates.

pub mod collection;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod stem;
pub mod tokenizer;

pub use collection::{extract_observations, parse_collection, RawDocument};
pub use error::{Error, Result};
pub use index::{DocId, DocMeta, Index, Observation, Posting, TermEntry};
pub use query::{execute, QueryOutcome, RankEntry, RANK_LIMIT};
pub use tokenizer::{AnalysisOptions, Analyzer};
