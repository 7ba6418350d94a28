use strata_core::persist::{self, FORMAT_VERSION, IndexPaths, MetaFile};
use strata_core::{execute, extract_observations, parse_collection};
use strata_core::{AnalysisOptions, Analyzer, Error, Index};

const COLLECTION: &str = "\
.I 1
.T
information retrieval system
.A
Salton, G.
.I 2
.W
retrieval retrieval retrieval system
.I 3
.B
CACM June 1970
.W
database theory papers
";

fn build_index(options: AnalysisOptions) -> Index {
    let docs = parse_collection(COLLECTION).unwrap();
    let analyzer = Analyzer::new(options);
    let observations = extract_observations(&docs, &analyzer);
    let mut index = Index::build(observations).unwrap();
    for doc in &docs {
        index.set_doc_meta(doc.doc_id, doc.meta());
    }
    index
}

fn plain_options() -> AnalysisOptions {
    AnalysisOptions {
        apply_stemming: false,
        remove_stopwords: false,
    }
}

#[test]
fn ranked_retrieval_end_to_end() {
    let index = build_index(plain_options());
    assert_eq!(index.num_docs(), 3);
    assert_eq!(index.num_terms(), 6);

    let outcome = execute(&index, &["retrieval".to_string()]);

    // Repetition beats a single mention; the unrelated document is absent.
    let ids: Vec<u32> = outcome.ranked.iter().map(|r| r.doc_id).collect();
    assert_eq!(ids, [2, 1]);
    assert_eq!(outcome.ranked[0].score, 0.83);
    assert_eq!(outcome.ranked[1].score, 0.47);
    assert!(outcome.missing.is_empty());

    let meta = index.doc_meta(1).unwrap();
    assert_eq!(meta.title, "information retrieval system");
    assert_eq!(meta.authors, ["Salton, G."]);
}

#[test]
fn analysis_options_replay_at_query_time() {
    let options = AnalysisOptions {
        apply_stemming: true,
        remove_stopwords: true,
    };
    let index = build_index(options);
    let analyzer = Analyzer::new(options);

    // "the" drops out, "retrieval" stems to the indexed form.
    let terms = analyzer.query_terms("the retrieval");
    assert_eq!(terms, ["retriev"]);

    let outcome = execute(&index, &terms);
    let ids: Vec<u32> = outcome.ranked.iter().map(|r| r.doc_id).collect();
    assert_eq!(ids, [2, 1]);
    assert_eq!(outcome.ranked[0].score, 0.83);
    assert_eq!(outcome.ranked[1].score, 0.47);
}

#[test]
fn index_round_trips_through_disk() {
    let options = AnalysisOptions {
        apply_stemming: true,
        remove_stopwords: true,
    };
    let index = build_index(options);
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("idx"));
    let meta = MetaFile {
        num_docs: index.num_docs() as u32,
        num_terms: index.num_terms() as u32,
        created_at: "2026-08-22T00:00:00Z".to_string(),
        version: FORMAT_VERSION,
        analysis: options,
    };

    persist::save_index(&paths, &index, &meta).unwrap();
    let (loaded, loaded_meta) = persist::load_index(&paths).unwrap();

    assert_eq!(loaded, index);
    assert_eq!(loaded_meta.num_docs, 3);
    assert_eq!(loaded_meta.num_terms, index.num_terms() as u32);
    assert_eq!(loaded_meta.analysis, options);

    // The reloaded index answers queries identically.
    let outcome = execute(&loaded, &["retriev".to_string()]);
    assert_eq!(outcome.ranked[0].doc_id, 2);
}

#[test]
fn format_version_is_enforced() {
    let index = build_index(plain_options());
    let dir = tempfile::tempdir().unwrap();
    let paths = IndexPaths::new(dir.path().join("idx"));
    let meta = MetaFile {
        num_docs: index.num_docs() as u32,
        num_terms: index.num_terms() as u32,
        created_at: "2026-08-22T00:00:00Z".to_string(),
        version: FORMAT_VERSION,
        analysis: plain_options(),
    };
    persist::save_index(&paths, &index, &meta).unwrap();

    let stale = MetaFile { version: 99, ..meta };
    persist::save_meta(&paths, &stale).unwrap();

    let err = persist::load_index(&paths).unwrap_err();
    assert!(matches!(
        err,
        Error::VersionMismatch {
            found: 99,
            expected: FORMAT_VERSION
        }
    ));
}
