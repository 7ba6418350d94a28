use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type DocId = u32;

/// Presentation metadata kept alongside the index; scoring never reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMeta {
    pub title: String,
    pub authors: Vec<String>,
}

/// One observed term occurrence, as emitted by the term extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub term: String,
    pub doc_id: DocId,
    pub position: u32,
}

/// Per-document record in a term's posting list. Positions are strictly
/// increasing and `term_frequency` always equals `positions.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
    pub positions: Vec<u32>,
}

/// Dictionary record for one term. `postings` indexes the postings arena;
/// `document_frequency` always equals the referenced list's length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermEntry {
    pub term: String,
    pub document_frequency: u32,
    pub postings: usize,
}

/// The inverted index: dictionary entries sorted by term, a postings arena
/// addressed through each entry's `postings` index, and presentation
/// metadata per document. Built once per indexing run, then read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    entries: Vec<TermEntry>,
    postings: Vec<Vec<Posting>>,
    docs: BTreeMap<DocId, DocMeta>,
}

impl Index {
    /// Builds the dictionary and postings from one collection pass.
    ///
    /// Observations may arrive in any order and may repeat (term, doc_id)
    /// pairs; the output is the same for any permutation of the input:
    /// terms sorted lexicographically, postings by doc_id, positions
    /// ascending. Runs in O(M log M) for M observations.
    pub fn build(mut observations: Vec<Observation>) -> Result<Self> {
        for obs in &observations {
            if obs.term.is_empty() {
                return Err(Error::MalformedObservation {
                    doc_id: obs.doc_id,
                    reason: "empty term",
                });
            }
            if obs.position == 0 {
                return Err(Error::MalformedObservation {
                    doc_id: obs.doc_id,
                    reason: "position must start at 1",
                });
            }
        }

        observations.sort_unstable_by(|a, b| {
            a.term
                .cmp(&b.term)
                .then_with(|| a.doc_id.cmp(&b.doc_id))
                .then_with(|| a.position.cmp(&b.position))
        });
        observations.dedup();

        let mut entries: Vec<TermEntry> = Vec::new();
        let mut arena: Vec<Vec<Posting>> = Vec::new();
        let mut i = 0;
        while i < observations.len() {
            let term = observations[i].term.clone();
            let mut list: Vec<Posting> = Vec::new();
            while i < observations.len() && observations[i].term == term {
                let doc_id = observations[i].doc_id;
                let mut positions = Vec::new();
                while i < observations.len()
                    && observations[i].term == term
                    && observations[i].doc_id == doc_id
                {
                    positions.push(observations[i].position);
                    i += 1;
                }
                list.push(Posting {
                    doc_id,
                    term_frequency: positions.len() as u32,
                    positions,
                });
            }
            entries.push(TermEntry {
                term,
                document_frequency: list.len() as u32,
                postings: arena.len(),
            });
            arena.push(list);
        }

        tracing::info!(
            num_terms = entries.len(),
            num_observations = observations.len(),
            "dictionary built"
        );

        Ok(Self {
            entries,
            postings: arena,
            docs: BTreeMap::new(),
        })
    }

    pub(crate) fn from_parts(
        entries: Vec<TermEntry>,
        postings: Vec<Vec<Posting>>,
        docs: BTreeMap<DocId, DocMeta>,
    ) -> Self {
        Self {
            entries,
            postings,
            docs,
        }
    }

    /// Dictionary entries in term order; an entry's slice position is its
    /// coordinate in the vector term space.
    pub fn terms(&self) -> &[TermEntry] {
        &self.entries
    }

    /// Number of distinct terms. This is the N in idf.
    pub fn num_terms(&self) -> usize {
        self.entries.len()
    }

    /// Number of documents with registered metadata.
    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    /// Exact-match lookup, returning the term's coordinate and entry.
    pub fn lookup(&self, term: &str) -> Option<(usize, &TermEntry)> {
        self.entries
            .binary_search_by(|e| e.term.as_str().cmp(term))
            .ok()
            .map(|i| (i, &self.entries[i]))
    }

    /// The posting list for a dictionary entry, sorted by doc_id.
    pub fn postings(&self, entry: &TermEntry) -> &[Posting] {
        &self.postings[entry.postings]
    }

    pub fn set_doc_meta(&mut self, doc_id: DocId, meta: DocMeta) {
        self.docs.insert(doc_id, meta);
    }

    pub fn doc_meta(&self, doc_id: DocId) -> Option<&DocMeta> {
        self.docs.get(&doc_id)
    }

    pub(crate) fn arena(&self) -> &[Vec<Posting>] {
        &self.postings
    }

    pub(crate) fn docs(&self) -> &BTreeMap<DocId, DocMeta> {
        &self.docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(term: &str, doc_id: DocId, position: u32) -> Observation {
        Observation {
            term: term.to_string(),
            doc_id,
            position,
        }
    }

    #[test]
    fn groups_terms_and_documents() {
        let index = Index::build(vec![
            obs("b", 2, 4),
            obs("a", 1, 1),
            obs("b", 1, 2),
            obs("a", 1, 3),
            obs("b", 2, 1),
        ])
        .unwrap();

        assert_eq!(index.num_terms(), 2);
        let (_, a) = index.lookup("a").unwrap();
        assert_eq!(a.document_frequency, 1);
        assert_eq!(
            index.postings(a),
            [Posting {
                doc_id: 1,
                term_frequency: 2,
                positions: vec![1, 3]
            }]
        );

        let (_, b) = index.lookup("b").unwrap();
        assert_eq!(b.document_frequency, 2);
        let lists = index.postings(b);
        assert_eq!(lists[0].doc_id, 1);
        assert_eq!(lists[1].doc_id, 2);
        assert_eq!(lists[1].positions, [1, 4]);
    }

    #[test]
    fn frequency_invariants_hold() {
        let index = Index::build(vec![
            obs("x", 1, 1),
            obs("x", 1, 2),
            obs("x", 2, 5),
            obs("y", 2, 6),
        ])
        .unwrap();

        for entry in index.terms() {
            let postings = index.postings(entry);
            assert_eq!(entry.document_frequency as usize, postings.len());
            for p in postings {
                assert_eq!(p.term_frequency as usize, p.positions.len());
                assert!(p.positions.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn build_is_input_order_independent() {
        let forward = vec![
            obs("gamma", 3, 2),
            obs("alpha", 1, 1),
            obs("beta", 2, 1),
            obs("alpha", 2, 2),
            obs("alpha", 1, 4),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(
            Index::build(forward).unwrap(),
            Index::build(backward).unwrap()
        );
    }

    #[test]
    fn exact_duplicate_observations_collapse() {
        let index = Index::build(vec![obs("a", 1, 2), obs("a", 1, 2), obs("a", 1, 5)]).unwrap();
        let (_, entry) = index.lookup("a").unwrap();
        assert_eq!(index.postings(entry)[0].term_frequency, 2);
        assert_eq!(index.postings(entry)[0].positions, [2, 5]);
    }

    #[test]
    fn rejects_empty_terms_and_zero_positions() {
        assert!(matches!(
            Index::build(vec![obs("", 1, 1)]),
            Err(Error::MalformedObservation { doc_id: 1, .. })
        ));
        assert!(matches!(
            Index::build(vec![obs("a", 9, 0)]),
            Err(Error::MalformedObservation { doc_id: 9, .. })
        ));
    }

    #[test]
    fn unknown_terms_do_not_resolve() {
        let index = Index::build(vec![obs("alpha", 1, 1)]).unwrap();
        assert!(index.lookup("alphabet").is_none());
        assert!(index.lookup("alph").is_none());
    }

    #[test]
    fn empty_input_builds_an_empty_index() {
        let index = Index::build(Vec::new()).unwrap();
        assert_eq!(index.num_terms(), 0);
        assert!(index.terms().is_empty());
    }
}
