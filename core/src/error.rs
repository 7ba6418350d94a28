use thiserror::Error;

/// Hard failures surfaced by the library. Normal "no results" conditions
/// (unknown query terms, empty queries, zero-score documents) are not errors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed observation for document {doc_id}: {reason}")]
    MalformedObservation { doc_id: u32, reason: &'static str },

    #[error("bad collection input at line {line}: {reason}")]
    CollectionFormat { line: usize, reason: String },

    #[error("index format version {found} unsupported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("binary index record: {0}")]
    Codec(#[from] bincode::Error),

    #[error("index meta file: {0}")]
    Meta(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
