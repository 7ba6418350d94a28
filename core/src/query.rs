//! Tiered retrieval and vector-space scoring over the inverted index.
//!
//! A query walks only the posting lists of its own terms to partition
//! candidate documents into three frequency tiers, then scores tiers in
//! order until ten documents are ranked. Scores are cosine similarities
//! between TF-IDF vectors spanning the full dictionary term space, with
//! every intermediate quantity rounded to two decimals; the rounding is
//! part of the scoring contract, not a display choice.

use crate::index::{DocId, Index};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Maximum number of ranked results per query.
pub const RANK_LIMIT: usize = 10;

/// Term frequency at or above this puts a document in the first tier.
const TIER1_MIN_TF: u32 = 20;
/// First-tier cutoff down to this is the second tier; below is the third.
const TIER2_MIN_TF: u32 = 10;
/// Per query term, how many third-tier candidates survive reduction.
const TIER3_KEEP_PER_TERM: usize = 10;

/// One ranked result.
#[derive(Debug, Clone, PartialEq)]
pub struct RankEntry {
    pub doc_id: DocId,
    pub score: f64,
}

/// Outcome of one query execution.
#[derive(Debug, Default)]
pub struct QueryOutcome {
    /// Top documents, score descending, at most [`RANK_LIMIT`] entries.
    pub ranked: Vec<RankEntry>,
    /// Query terms absent from the dictionary, in query order.
    pub missing: Vec<String>,
}

/// Runs a query against the index. Terms must already be normalized the
/// same way the indexed text was. Never fails: unknown terms are reported
/// in the outcome and an unanswerable query ranks nothing.
pub fn execute(index: &Index, query_terms: &[String]) -> QueryOutcome {
    let mut outcome = QueryOutcome::default();
    if query_terms.is_empty() {
        return outcome;
    }

    let tiers = partition_tiers(index, query_terms, &mut outcome.missing);
    tracing::debug!(
        tier1 = tiers.tier1.docs.len(),
        tier2 = tiers.tier2.docs.len(),
        tier3 = tiers.tier3.docs.len(),
        "tier partition complete"
    );

    let query_vector = build_query_vector(index, query_terms);

    let mut ranked_ids: HashSet<DocId> = HashSet::new();
    for tier in [&tiers.tier1, &tiers.tier2, &tiers.tier3] {
        if outcome.ranked.len() >= RANK_LIMIT {
            break;
        }
        fill_rank(
            index,
            &query_vector,
            &tier.docs,
            &mut outcome.ranked,
            &mut ranked_ids,
        );
    }

    // Tiers were filled independently, so a later tier may hold a higher
    // score than an earlier one; the final order is by score alone.
    outcome
        .ranked
        .sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    outcome
}

/// Insertion-ordered set: tier contents keep first-encounter order, which
/// downstream tie-breaking depends on.
#[derive(Debug, Default)]
struct TierSet {
    docs: Vec<DocId>,
    seen: HashSet<DocId>,
}

impl TierSet {
    fn insert(&mut self, doc_id: DocId) {
        if self.seen.insert(doc_id) {
            self.docs.push(doc_id);
        }
    }

    fn contains(&self, doc_id: DocId) -> bool {
        self.seen.contains(&doc_id)
    }
}

#[derive(Debug, Default)]
struct Tiers {
    tier1: TierSet,
    tier2: TierSet,
    tier3: TierSet,
}

/// Classifies candidate documents per (term, doc) pair by raw term
/// frequency. Third-tier candidates are reduced per term to the ten best
/// by a TF-IDF weight restricted to that single term before merging; a
/// document merged by an earlier query term is not a candidate again, so
/// it never occupies one of a later term's ten slots.
fn partition_tiers(index: &Index, query_terms: &[String], missing: &mut Vec<String>) -> Tiers {
    let num_terms = index.num_terms();
    let mut tiers = Tiers::default();

    for term in query_terms {
        let Some((_, entry)) = index.lookup(term) else {
            tracing::debug!(term = %term, "query term not in dictionary");
            missing.push(term.clone());
            continue;
        };
        tracing::debug!(
            term = %term,
            document_frequency = entry.document_frequency,
            "query term resolved"
        );

        let term_idf = idf(num_terms, entry.document_frequency);
        let mut third: Vec<(DocId, f64)> = Vec::new();
        for posting in index.postings(entry) {
            if posting.term_frequency >= TIER1_MIN_TF {
                tiers.tier1.insert(posting.doc_id);
            } else if posting.term_frequency >= TIER2_MIN_TF {
                tiers.tier2.insert(posting.doc_id);
            } else if !tiers.tier3.contains(posting.doc_id) {
                let weight = round2(doc_tf_weight(posting.term_frequency) * term_idf);
                third.push((posting.doc_id, weight));
            }
        }

        // Stable partial selection: equal weights keep posting order.
        third.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        third.truncate(TIER3_KEEP_PER_TERM);
        for (doc_id, _) in third {
            tiers.tier3.insert(doc_id);
        }
    }

    tiers
}

/// Query weights in dictionary coordinates, components sorted by
/// coordinate. Terms absent from the dictionary contribute nothing.
#[derive(Debug)]
struct QueryVector {
    components: Vec<(usize, f64)>,
    norm: f64,
}

fn build_query_vector(index: &Index, query_terms: &[String]) -> QueryVector {
    let num_terms = index.num_terms();
    let mut counts: BTreeMap<usize, (u32, u32)> = BTreeMap::new();
    for term in query_terms {
        if let Some((coord, entry)) = index.lookup(term) {
            counts
                .entry(coord)
                .and_modify(|c| c.0 += 1)
                .or_insert((1, entry.document_frequency));
        }
    }

    let mut components = Vec::with_capacity(counts.len());
    let mut norm_squared = 0.0;
    for (coord, (count, document_frequency)) in counts {
        let weight = round2(query_tf_weight(count) * idf(num_terms, document_frequency));
        norm_squared += weight * weight;
        components.push((coord, weight));
    }

    QueryVector {
        components,
        norm: round2(norm_squared.sqrt()),
    }
}

/// Cosine scores for a batch of candidates, in candidate order.
///
/// One pass over the dictionary accumulates, per candidate, the dot
/// product against the query components and the document norm over every
/// term the document contains, including terms outside the query.
fn score_candidates(index: &Index, query_vector: &QueryVector, candidates: &[DocId]) -> Vec<f64> {
    let num_terms = index.num_terms();
    let slot: HashMap<DocId, usize> = candidates
        .iter()
        .enumerate()
        .map(|(i, &doc_id)| (doc_id, i))
        .collect();
    let mut dot = vec![0.0f64; candidates.len()];
    let mut norm_squared = vec![0.0f64; candidates.len()];

    let mut qi = 0;
    for (coord, entry) in index.terms().iter().enumerate() {
        let query_weight = match query_vector.components.get(qi) {
            Some(&(qcoord, weight)) if qcoord == coord => {
                qi += 1;
                weight
            }
            _ => 0.0,
        };

        let term_idf = idf(num_terms, entry.document_frequency);
        if term_idf == 0.0 {
            // Every component of this coordinate rounds to zero.
            continue;
        }
        for posting in index.postings(entry) {
            if let Some(&s) = slot.get(&posting.doc_id) {
                let weight = round2(doc_tf_weight(posting.term_frequency) * term_idf);
                norm_squared[s] += weight * weight;
                if query_weight != 0.0 {
                    dot[s] += query_weight * weight;
                }
            }
        }
    }

    (0..candidates.len())
        .map(|s| {
            let doc_norm = round2(norm_squared[s].sqrt());
            let denominator = doc_norm * query_vector.norm;
            if denominator == 0.0 {
                // Degenerate vector: defined as zero, not a fault.
                0.0
            } else {
                round2(dot[s] / denominator)
            }
        })
        .collect()
}

/// Scores one tier and moves its best documents into the rank, highest
/// score first, first-encountered winning ties, skipping documents ranked
/// by an earlier tier. Only positive scores rank.
fn fill_rank(
    index: &Index,
    query_vector: &QueryVector,
    tier: &[DocId],
    rank: &mut Vec<RankEntry>,
    ranked_ids: &mut HashSet<DocId>,
) {
    let candidates: Vec<DocId> = tier
        .iter()
        .copied()
        .filter(|doc_id| !ranked_ids.contains(doc_id))
        .collect();
    if candidates.is_empty() {
        return;
    }

    let scores = score_candidates(index, query_vector, &candidates);
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    for i in order {
        if rank.len() >= RANK_LIMIT || scores[i] <= 0.0 {
            break;
        }
        if ranked_ids.insert(candidates[i]) {
            rank.push(RankEntry {
                doc_id: candidates[i],
                score: scores[i],
            });
        }
    }
}

fn idf(num_terms: usize, document_frequency: u32) -> f64 {
    round2((num_terms as f64 / document_frequency as f64).log10())
}

/// Document-side frequency weight: log is rounded, then shifted.
fn doc_tf_weight(term_frequency: u32) -> f64 {
    round2((term_frequency as f64).log10()) + 1.0
}

/// Query-side frequency weight: shifted, then rounded.
fn query_tf_weight(count: u32) -> f64 {
    round2((count as f64).log10() + 1.0)
}

/// Round half away from zero at two decimals.
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
