//! Python bindings for CorpusFreq Rust components

use std::collections::HashMap;
use std::path::PathBuf;

use corpusfreq_core::morphology::Chained;
use corpusfreq_core::{
    Accumulator, Corpus, CorpusLimits, Error, FrequencyPipeline, IdentityMorphology,
    LexiconMorphology, SamplingParams, TermScore as CoreTermScore, TfIdfScorer, Tokenizer,
};
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;

fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::Io { .. } | Error::Decode { .. } => PyIOError::new_err(err.to_string()),
        other => PyValueError::new_err(other.to_string()),
    }
}

/// Python-exposed ranked term
#[pyclass]
#[derive(Clone)]
pub struct TermScore {
    #[pyo3(get)]
    pub term: String,
    #[pyo3(get)]
    pub score: f64,
    #[pyo3(get)]
    pub rank: usize,
}

impl TermScore {
    fn ranked(scores: Vec<CoreTermScore>) -> Vec<Self> {
        scores
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| Self {
                term: entry.term,
                score: entry.score,
                rank: idx + 1,
            })
            .collect()
    }
}

#[pymethods]
impl TermScore {
    fn __repr__(&self) -> String {
        format!(
            "TermScore(term='{}', score={:.4}, rank={})",
            self.term, self.score, self.rank
        )
    }

    fn to_dict(&self) -> HashMap<String, PyObject> {
        Python::with_gil(|py| {
            let mut map = HashMap::new();
            map.insert("term".to_string(), self.term.to_object(py));
            map.insert("score".to_string(), self.score.to_object(py));
            map.insert("rank".to_string(), self.rank.to_object(py));
            map
        })
    }
}

/// Python-exposed sample-bucketed frequency analyzer
#[pyclass]
pub struct FrequencyAnalyzer {
    pipeline: FrequencyPipeline<Chained<LexiconMorphology, IdentityMorphology>>,
    params: SamplingParams,
}

#[pymethods]
impl FrequencyAnalyzer {
    /// Create an analyzer
    ///
    /// Args:
    ///     sample_width: Tokens per sample (default: 1000)
    ///     sample_count: Number of samples (default: 20)
    ///     lexicon: Optional path to a `word_form<TAB>lemma<TAB>pos` file
    #[new]
    #[pyo3(signature = (sample_width=1000, sample_count=20, lexicon=None))]
    fn new(sample_width: usize, sample_count: usize, lexicon: Option<PathBuf>) -> PyResult<Self> {
        let params = SamplingParams::new(sample_width, sample_count).map_err(to_py_err)?;
        let lexicon = match lexicon {
            Some(path) => LexiconMorphology::from_file(path).map_err(|e| to_py_err(e.into()))?,
            None => LexiconMorphology::new(),
        };
        let pipeline = FrequencyPipeline::new(params, lexicon.with_fallback(IdentityMorphology))
            .map_err(to_py_err)?;
        Ok(Self { pipeline, params })
    }

    /// Count a text and return its word-form records as JSON
    fn analyze(&self, text: &str) -> PyResult<String> {
        let tokens = Tokenizer::new().tokenize(text);
        let table = Accumulator::new(self.params).accumulate(&tokens, self.pipeline.morphology());
        serde_json::to_string(table.records()).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Process a text file into the storage unit next to it
    ///
    /// Returns:
    ///     Dictionary with storage, total_tokens, sampled_tokens,
    ///     word_forms, lemmas, parts_of_speech
    fn run_document(&self, path: PathBuf) -> PyResult<HashMap<String, PyObject>> {
        let report = self.pipeline.run_document(&path).map_err(to_py_err)?;
        Python::with_gil(|py| {
            let mut map = HashMap::new();
            map.insert("storage".to_string(), report.storage.to_object(py));
            map.insert("total_tokens".to_string(), report.total_tokens.to_object(py));
            map.insert("sampled_tokens".to_string(), report.sampled_tokens.to_object(py));
            map.insert("word_forms".to_string(), report.distinct_word_forms.to_object(py));
            map.insert("lemmas".to_string(), report.distinct_lemmas.to_object(py));
            map.insert("parts_of_speech".to_string(), report.distinct_pos.to_object(py));
            Ok(map)
        })
    }

    fn __repr__(&self) -> String {
        format!(
            "FrequencyAnalyzer(sample_width={}, sample_count={})",
            self.params.sample_width, self.params.sample_count
        )
    }
}

/// Tokenize text into lowercased word forms
#[pyfunction]
fn tokenize(text: &str) -> Vec<String> {
    Tokenizer::new().tokenize(text)
}

/// Rank the terms of several texts by TF-IDF
///
/// Args:
///     texts: Document texts, in corpus order
///     top_n: Number of terms to return (default: 100)
///     char_limit: Leading characters read from each text (default: 30000)
///     token_limit: Leading tokens kept from each text (default: 20000)
///
/// Returns:
///     List of TermScore objects, best first
#[pyfunction]
#[pyo3(signature = (texts, top_n=100, char_limit=30000, token_limit=20000))]
fn rank_terms(
    texts: Vec<String>,
    top_n: usize,
    char_limit: usize,
    token_limit: usize,
) -> Vec<TermScore> {
    let limits = CorpusLimits {
        char_limit,
        token_limit,
    };
    let tokenizer = Tokenizer::new();
    let corpus: Corpus = texts
        .iter()
        .map(|text| tokenizer.tokenize_prefix(text, limits.char_limit, limits.token_limit))
        .collect();
    TermScore::ranked(TfIdfScorer::new().rank(&corpus, top_n))
}

/// Python module
#[pymodule]
fn corpusfreq_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<FrequencyAnalyzer>()?;
    m.add_class::<TermScore>()?;
    m.add_function(wrap_pyfunction!(tokenize, m)?)?;
    m.add_function(wrap_pyfunction!(rank_terms, m)?)?;
    Ok(())
}
