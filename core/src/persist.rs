//! On-disk layout of a built index.
//!
//! An index directory holds three bincode files and one human-readable
//! manifest: `dictionary.bin` (term entries in term order), `postings.bin`
//! (the posting arena, parallel to the dictionary), `docs.bin` (document
//! metadata) and `meta.json` (counts, creation time, format version and
//! the analysis options the collection was indexed with).

use crate::error::{Error, Result};
use crate::index::{DocId, DocMeta, Index, Posting, TermEntry};
use crate::tokenizer::AnalysisOptions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Bumped whenever the bincode structures change shape.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub num_terms: u32,
    pub created_at: String,
    pub version: u32,
    /// Queries must re-run the analysis the index was built with.
    pub analysis: AnalysisOptions,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn dictionary(&self) -> PathBuf { self.root.join("dictionary.bin") }
    fn postings(&self) -> PathBuf { self.root.join("postings.bin") }
    fn docs(&self) -> PathBuf { self.root.join("docs.bin") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn save_dictionary(paths: &IndexPaths, entries: &[TermEntry]) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.dictionary())?;
    let bytes = bincode::serialize(entries)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_dictionary(paths: &IndexPaths) -> Result<Vec<TermEntry>> {
    let mut f = File::open(paths.dictionary())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let entries = bincode::deserialize(&buf)?;
    Ok(entries)
}

pub fn save_postings(paths: &IndexPaths, arena: &[Vec<Posting>]) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.postings())?;
    let bytes = bincode::serialize(arena)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_postings(paths: &IndexPaths) -> Result<Vec<Vec<Posting>>> {
    let mut f = File::open(paths.postings())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let arena = bincode::deserialize(&buf)?;
    Ok(arena)
}

pub fn save_docs(paths: &IndexPaths, docs: &BTreeMap<DocId, DocMeta>) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.docs())?;
    let bytes = bincode::serialize(docs)?;
    f.write_all(&bytes)?;
    Ok(())
}

pub fn load_docs(paths: &IndexPaths) -> Result<BTreeMap<DocId, DocMeta>> {
    let mut f = File::open(paths.docs())?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf)?;
    let docs = bincode::deserialize(&buf)?;
    Ok(docs)
}

pub fn save_meta(paths: &IndexPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Result<MetaFile> {
    let mut f = File::open(paths.meta())?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let meta: MetaFile = serde_json::from_str(&buf)?;
    Ok(meta)
}

/// Writes every structure of a built index plus its manifest.
pub fn save_index(paths: &IndexPaths, index: &Index, meta: &MetaFile) -> Result<()> {
    save_dictionary(paths, index.terms())?;
    save_postings(paths, index.arena())?;
    save_docs(paths, index.docs())?;
    save_meta(paths, meta)?;
    Ok(())
}

/// Reads an index directory back, refusing manifests written by another
/// format version.
pub fn load_index(paths: &IndexPaths) -> Result<(Index, MetaFile)> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        return Err(Error::VersionMismatch {
            found: meta.version,
            expected: FORMAT_VERSION,
        });
    }
    let entries = load_dictionary(paths)?;
    let arena = load_postings(paths)?;
    let docs = load_docs(paths)?;
    Ok((Index::from_parts(entries, arena, docs), meta))
}
