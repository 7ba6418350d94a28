use crate::error::{Error, Result};
use crate::index::{DocId, DocMeta, Observation};
use crate::tokenizer::Analyzer;

/// One document parsed from a tagged collection file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    pub doc_id: DocId,
    pub title: String,
    pub authors: Vec<String>,
    pub body: String,
}

impl RawDocument {
    /// The text the index sees: title then body, in reading order.
    pub fn indexed_text(&self) -> String {
        match (self.title.is_empty(), self.body.is_empty()) {
            (false, false) => format!("{} {}", self.title, self.body),
            (false, true) => self.title.clone(),
            _ => self.body.clone(),
        }
    }

    pub fn meta(&self) -> DocMeta {
        DocMeta {
            title: self.title.clone(),
            authors: self.authors.clone(),
        }
    }
}

#[derive(Clone, Copy)]
enum Section {
    Title,
    Authors,
    Body,
    Skip,
}

/// Parses a tagged collection: documents begin at `.I <id>` lines, `.T`
/// titles and `.W` abstracts are indexed, `.A` author lines are kept for
/// presentation, and `.B`/`.N`/`.X`/`.K`/`.C` sections are skipped.
/// Documents come back in file order.
pub fn parse_collection(text: &str) -> Result<Vec<RawDocument>> {
    let mut docs: Vec<RawDocument> = Vec::new();
    let mut section = Section::Skip;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }

        if let Some((marker, rest)) = field_marker(line) {
            match marker {
                Marker::Id => {
                    let id: DocId = rest.trim().parse().map_err(|_| Error::CollectionFormat {
                        line: line_no,
                        reason: format!("document id {:?} is not a number", rest.trim()),
                    })?;
                    docs.push(RawDocument {
                        doc_id: id,
                        ..RawDocument::default()
                    });
                    section = Section::Skip;
                    continue;
                }
                Marker::Field(next) => {
                    if docs.is_empty() {
                        return Err(Error::CollectionFormat {
                            line: line_no,
                            reason: format!("field marker {:?} before the first .I", line),
                        });
                    }
                    section = next;
                    // A marker may carry content on the same line.
                    if let (Some(doc), false) = (docs.last_mut(), rest.trim().is_empty()) {
                        append_content(doc, section, rest.trim());
                    }
                    continue;
                }
            }
        }

        match docs.last_mut() {
            Some(doc) => append_content(doc, section, line.trim()),
            None => {
                return Err(Error::CollectionFormat {
                    line: line_no,
                    reason: "content before the first .I".to_string(),
                })
            }
        }
    }

    Ok(docs)
}

enum Marker {
    Id,
    Field(Section),
}

fn field_marker(line: &str) -> Option<(Marker, &str)> {
    let rest = line.strip_prefix('.')?;
    let mut chars = rest.chars();
    let tag = chars.next()?;
    let remainder = chars.as_str();
    // Markers are two characters; anything longer after the tag letter
    // (other than the id payload) is ordinary content.
    let is_bare = remainder.is_empty() || remainder.starts_with(' ');
    match tag {
        'I' if is_bare => Some((Marker::Id, remainder)),
        'T' if is_bare => Some((Marker::Field(Section::Title), remainder)),
        'A' if is_bare => Some((Marker::Field(Section::Authors), remainder)),
        'W' if is_bare => Some((Marker::Field(Section::Body), remainder)),
        'B' | 'N' | 'X' | 'K' | 'C' if is_bare => Some((Marker::Field(Section::Skip), remainder)),
        _ => None,
    }
}

fn append_content(doc: &mut RawDocument, section: Section, line: &str) {
    match section {
        Section::Title => append_joined(&mut doc.title, line),
        Section::Body => append_joined(&mut doc.body, line),
        Section::Authors => doc.authors.push(line.to_string()),
        Section::Skip => {}
    }
}

fn append_joined(field: &mut String, line: &str) {
    if !field.is_empty() {
        field.push(' ');
    }
    field.push_str(line);
}

/// Observations for every document: positions are 1-based per document and
/// run across title then body in reading order.
pub fn extract_observations(docs: &[RawDocument], analyzer: &Analyzer) -> Vec<Observation> {
    let mut observations = Vec::new();
    for doc in docs {
        for (term, position) in analyzer.analyze(&doc.indexed_text()) {
            observations.push(Observation {
                term,
                doc_id: doc.doc_id,
                position,
            });
        }
    }
    observations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::AnalysisOptions;

    const SAMPLE: &str = "\
.I 1
.T
Preliminary Report on a
Differential Equation Solver
.B
CACM December, 1958
.A
Perlis, A. J.
Smith, J. W.
.W
A solver for ordinary
differential equations.
.N
CA581203 JB
.X
1 5 1
.I 2
.T
Glossary of Computer Engineering
.W
Terms collected for engineering usage.
";

    #[test]
    fn parses_documents_in_file_order() {
        let docs = parse_collection(SAMPLE).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].doc_id, 1);
        assert_eq!(docs[1].doc_id, 2);
    }

    #[test]
    fn joins_field_lines_with_spaces() {
        let docs = parse_collection(SAMPLE).unwrap();
        assert_eq!(
            docs[0].title,
            "Preliminary Report on a Differential Equation Solver"
        );
        assert_eq!(
            docs[0].body,
            "A solver for ordinary differential equations."
        );
    }

    #[test]
    fn keeps_authors_and_skips_ignored_fields() {
        let docs = parse_collection(SAMPLE).unwrap();
        assert_eq!(docs[0].authors, ["Perlis, A. J.", "Smith, J. W."]);
        // .B, .N and .X content never reaches indexed text.
        assert!(!docs[0].indexed_text().contains("CACM"));
        assert!(!docs[0].indexed_text().contains("CA581203"));
    }

    #[test]
    fn missing_fields_are_fine() {
        let docs = parse_collection(SAMPLE).unwrap();
        assert!(docs[1].authors.is_empty());
        assert_eq!(docs[1].title, "Glossary of Computer Engineering");
    }

    #[test]
    fn rejects_bad_document_id() {
        let err = parse_collection(".I one\n.T\nTitle\n").unwrap_err();
        assert!(matches!(err, Error::CollectionFormat { line: 1, .. }));
    }

    #[test]
    fn rejects_content_before_first_document() {
        let err = parse_collection("stray text\n.I 1\n").unwrap_err();
        assert!(matches!(err, Error::CollectionFormat { line: 1, .. }));
    }

    #[test]
    fn positions_run_across_title_then_body() {
        let docs = parse_collection(".I 7\n.T\nalpha beta\n.W\ngamma delta\n").unwrap();
        let analyzer = Analyzer::new(AnalysisOptions::default());
        let obs = extract_observations(&docs, &analyzer);
        let got: Vec<(&str, u32)> = obs.iter().map(|o| (o.term.as_str(), o.position)).collect();
        assert_eq!(
            got,
            [("alpha", 1), ("beta", 2), ("gamma", 3), ("delta", 4)]
        );
        assert!(obs.iter().all(|o| o.doc_id == 7));
    }
}
