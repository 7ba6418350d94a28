use crate::stem::stem;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"(?u)[\p{L}\p{N}]+").expect("valid regex");
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Analysis switches fixed once at build time, persisted in the index meta
/// file, and replayed verbatim on query text so both sides normalize alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub apply_stemming: bool,
    pub remove_stopwords: bool,
}

/// Split text into lowercase tokens with 1-based positions, after NFKC
/// normalization. Tokens are maximal alphanumeric runs; every token advances
/// the position counter, so downstream filtering leaves gaps.
pub fn tokenize(text: &str) -> Vec<(String, u32)> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    TOKEN_RE
        .find_iter(&normalized)
        .enumerate()
        .map(|(i, m)| (m.as_str().to_string(), (i + 1) as u32))
        .collect()
}

/// Applies the configured normalization on top of [`tokenize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    /// Normalized terms with their token positions. Stopwords are tested on
    /// the raw lowercase token before stemming; only all-letter tokens are
    /// stemmed, so mixed tokens like "x86" index as written.
    pub fn analyze(&self, text: &str) -> Vec<(String, u32)> {
        let mut terms = Vec::new();
        for (token, position) in tokenize(text) {
            if self.options.remove_stopwords && is_stopword(&token) {
                continue;
            }
            let term = if self.options.apply_stemming && token.bytes().all(|b| b.is_ascii_alphabetic())
            {
                stem(&token)
            } else {
                token
            };
            terms.push((term, position));
        }
        terms
    }

    /// Query-side analysis: same pipeline, positions discarded.
    pub fn query_terms(&self, text: &str) -> Vec<String> {
        self.analyze(text).into_iter().map(|(term, _)| term).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_lowercase_alphanumeric_runs() {
        let toks = tokenize("Fast I/O for B-trees, 1970s style.");
        let words: Vec<&str> = toks.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, ["fast", "i", "o", "for", "b", "trees", "1970s", "style"]);
    }

    #[test]
    fn positions_start_at_one_and_count_every_token() {
        let toks = tokenize("one two three");
        assert_eq!(toks[0].1, 1);
        assert_eq!(toks[2].1, 3);
    }

    #[test]
    fn nfkc_folds_compatibility_forms() {
        // Fullwidth letters and the fi ligature normalize to plain ASCII.
        let toks = tokenize("ﬁle ｓｙｓｔｅｍ");
        let words: Vec<&str> = toks.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, ["file", "system"]);
    }

    #[test]
    fn stopword_removal_keeps_position_gaps() {
        let analyzer = Analyzer::new(AnalysisOptions {
            apply_stemming: false,
            remove_stopwords: true,
        });
        let terms = analyzer.analyze("the quick brown fox and the lazy dog");
        let words: Vec<&str> = terms.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, ["quick", "brown", "fox", "lazy", "dog"]);
        let positions: Vec<u32> = terms.iter().map(|(_, p)| *p).collect();
        assert_eq!(positions, [2, 3, 4, 7, 8]);
    }

    #[test]
    fn stemming_applies_to_letter_tokens_only() {
        let analyzer = Analyzer::new(AnalysisOptions {
            apply_stemming: true,
            remove_stopwords: false,
        });
        let terms = analyzer.analyze("running meetings on x86");
        let words: Vec<&str> = terms.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, ["run", "meet", "on", "x86"]);
    }

    #[test]
    fn options_off_is_a_passthrough() {
        let analyzer = Analyzer::new(AnalysisOptions::default());
        let terms = analyzer.analyze("The Running Dogs");
        let words: Vec<&str> = terms.iter().map(|(w, _)| w.as_str()).collect();
        assert_eq!(words, ["the", "running", "dogs"]);
    }
}
