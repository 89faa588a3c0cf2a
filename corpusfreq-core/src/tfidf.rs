//! TF-IDF term scoring over a corpus
//!
//! `tf = 1 + log10(count)`, `idf = log10(N / df)`. Scores are collected into
//! a single term map where a later document's score replaces an earlier
//! one; per-document scores are kept alongside.

use std::fmt;

use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use crate::corpus::Corpus;

/// A term and its score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermScore {
    pub term: String,
    pub score: f64,
}

impl fmt::Display for TermScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.4}", self.term, self.score)
    }
}

/// Log-weighted term frequencies of one document, in first-occurrence order
pub fn term_frequencies<S: AsRef<str>>(document: &[S]) -> Vec<(String, f64)> {
    let mut counts: Vec<(String, u32)> = Vec::new();
    let mut index: AHashMap<&str, usize> = AHashMap::new();
    for token in document {
        let token = token.as_ref();
        match index.get(token) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                index.insert(token, counts.len());
                counts.push((token.to_string(), 1));
            }
        }
    }

    counts
        .into_iter()
        .map(|(term, count)| (term, 1.0 + f64::from(count).log10()))
        .collect()
}

/// Inverse document frequency of every term in the corpus
pub fn inverse_document_frequencies(corpus: &Corpus) -> AHashMap<String, f64> {
    let mut doc_counts: AHashMap<&str, u32> = AHashMap::new();
    for document in corpus.documents() {
        let unique: AHashSet<&str> = document.iter().map(String::as_str).collect();
        for term in unique {
            *doc_counts.entry(term).or_insert(0) += 1;
        }
    }

    let n = corpus.num_documents() as f64;
    doc_counts
        .into_iter()
        .map(|(term, df)| (term.to_string(), (n / f64::from(df)).log10()))
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfScorer;

impl TfIdfScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, corpus: &Corpus) -> TfIdfScores {
        let idf = inverse_document_frequencies(corpus);
        let mut scores = TfIdfScores::default();

        for document in corpus.documents() {
            let doc_scores: Vec<TermScore> = term_frequencies(document)
                .into_iter()
                .map(|(term, tf)| {
                    let score = tf * idf.get(&term).copied().unwrap_or(0.0);
                    TermScore { term, score }
                })
                .collect();
            for entry in &doc_scores {
                scores.set(&entry.term, entry.score);
            }
            scores.per_document.push(doc_scores);
        }

        scores
    }

    /// Score the corpus and return its `top_n` terms
    pub fn rank(&self, corpus: &Corpus, top_n: usize) -> Vec<TermScore> {
        self.score(corpus).ranked(top_n)
    }
}

/// Scores of one corpus
#[derive(Debug, Clone, Default)]
pub struct TfIdfScores {
    /// Term scores in first-insertion order; a later document overwrites
    merged: Vec<TermScore>,
    index: AHashMap<String, usize>,
    per_document: Vec<Vec<TermScore>>,
}

impl TfIdfScores {
    fn set(&mut self, term: &str, score: f64) {
        match self.index.get(term) {
            Some(&idx) => self.merged[idx].score = score,
            None => {
                self.index.insert(term.to_string(), self.merged.len());
                self.merged.push(TermScore {
                    term: term.to_string(),
                    score,
                });
            }
        }
    }

    /// Score of `term` from the last document containing it
    pub fn get(&self, term: &str) -> Option<f64> {
        self.index.get(term).map(|&idx| self.merged[idx].score)
    }

    pub fn len(&self) -> usize {
        self.merged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    /// Scores of the terms of document `doc`, in first-occurrence order
    pub fn document_scores(&self, doc: usize) -> Option<&[TermScore]> {
        self.per_document.get(doc).map(Vec::as_slice)
    }

    /// Highest `top_n` scores; ties keep first-insertion order
    pub fn ranked(&self, top_n: usize) -> Vec<TermScore> {
        let mut ranked = self.merged.clone();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(top_n);
        ranked
    }
}

/// One `"{rank}) {term}: {score}"` line per term, 1-indexed
pub fn format_ranking(ranking: &[TermScore]) -> String {
    ranking
        .iter()
        .enumerate()
        .map(|(idx, entry)| format!("{}) {}\n", idx + 1, entry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn corpus(docs: &[&[&str]]) -> Corpus {
        docs.iter().map(|doc| doc.to_vec()).collect()
    }

    #[test]
    fn test_term_frequencies() {
        let tf = term_frequencies(&["cat", "cat", "dog"]);
        assert_eq!(tf[0].0, "cat");
        assert!((tf[0].1 - (1.0 + 2f64.log10())).abs() < EPS);
        assert_eq!(tf[1], ("dog".to_string(), 1.0));
    }

    #[test]
    fn test_idf() {
        let corpus = corpus(&[&["cat", "cat", "dog"], &["dog", "dog"]]);
        let idf = inverse_document_frequencies(&corpus);
        assert_eq!(idf["dog"], 0.0);
        assert!((idf["cat"] - 2f64.log10()).abs() < EPS);
    }

    #[test]
    fn test_two_document_scores() {
        let corpus = corpus(&[&["cat", "cat", "dog"], &["dog", "dog"]]);
        let scores = TfIdfScorer::new().score(&corpus);

        let cat = scores.get("cat").unwrap();
        assert!((cat - 2f64.log10() * (1.0 + 2f64.log10())).abs() < EPS);
        assert!((cat - 0.392).abs() < 1e-3);
        assert_eq!(scores.get("dog"), Some(0.0));

        for doc in 0..2 {
            let dog = scores
                .document_scores(doc)
                .unwrap()
                .iter()
                .find(|s| s.term == "dog")
                .unwrap();
            assert_eq!(dog.score, 0.0);
        }
    }

    #[test]
    fn test_term_in_every_document_scores_zero() {
        let corpus = corpus(&[&["the", "a"], &["the", "b"], &["the", "the", "c"]]);
        let scores = TfIdfScorer::new().score(&corpus);
        assert_eq!(scores.get("the"), Some(0.0));
    }

    #[test]
    fn test_later_document_overwrites() {
        // "x" appears once in doc 0 and three times in doc 2
        let corpus = corpus(&[&["x", "y"], &["z"], &["x", "x", "x"]]);
        let scores = TfIdfScorer::new().score(&corpus);
        let idf = (3f64 / 2.0).log10();
        let expected = (1.0 + 3f64.log10()) * idf;
        assert!((scores.get("x").unwrap() - expected).abs() < EPS);

        let first = &scores.document_scores(0).unwrap()[0];
        assert_eq!(first.term, "x");
        assert!((first.score - idf).abs() < EPS);
    }

    #[test]
    fn test_single_document_is_all_zero() {
        let corpus = corpus(&[&["alpha", "beta", "alpha"]]);
        let ranked = TfIdfScorer::new().rank(&corpus, 10);
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|s| s.score == 0.0));
        // ties keep first-insertion order
        assert_eq!(ranked[0].term, "alpha");
    }

    #[test]
    fn test_ranking_order_and_limit() {
        let corpus = corpus(&[&["a", "a", "a", "b", "shared"], &["c", "shared"]]);
        let ranked = TfIdfScorer::new().rank(&corpus, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].term, "a");
        assert!(ranked[0].score >= ranked[1].score);
    }

    #[test]
    fn test_empty_corpus() {
        let ranked = TfIdfScorer::new().rank(&Corpus::default(), 100);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_format_ranking() {
        let ranking = vec![
            TermScore {
                term: "cat".into(),
                score: 0.39171,
            },
            TermScore {
                term: "dog".into(),
                score: 0.0,
            },
        ];
        assert_eq!(format_ranking(&ranking), "1) cat: 0.3917\n2) dog: 0.0000\n");
    }
}
