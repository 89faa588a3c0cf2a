//! Per-document frequency pipeline: read, tokenize, accumulate, aggregate,
//! persist.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::accumulator::Accumulator;
use crate::aggregate::AggregateTables;
use crate::config::SamplingParams;
use crate::corpus::read_text;
use crate::error::Result;
use crate::morphology::Morphology;
use crate::persist::{persist, storage_path_for};
use crate::store::Store;
use crate::tokenizer::Tokenizer;

/// Summary of one processed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub document: String,
    pub storage: PathBuf,
    pub total_tokens: usize,
    pub sampled_tokens: usize,
    pub distinct_word_forms: usize,
    pub distinct_lemmas: usize,
    pub distinct_pos: usize,
}

pub struct FrequencyPipeline<M> {
    tokenizer: Tokenizer,
    accumulator: Accumulator,
    morphology: M,
}

impl<M: Morphology> FrequencyPipeline<M> {
    pub fn new(params: SamplingParams, morphology: M) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            tokenizer: Tokenizer::new(),
            accumulator: Accumulator::new(params),
            morphology,
        })
    }

    pub fn morphology(&self) -> &M {
        &self.morphology
    }

    /// Process a text file into the storage unit next to it
    pub fn run_document(&self, path: impl AsRef<Path>) -> Result<DocumentReport> {
        let path = path.as_ref();
        let text = read_text(path)?;
        self.run_text(&path.display().to_string(), &text, &storage_path_for(path))
    }

    /// Process `text` into the storage unit at `store_path`
    pub fn run_text(&self, name: &str, text: &str, store_path: &Path) -> Result<DocumentReport> {
        info!(document = name, "processing document");

        let tokens = self.tokenizer.tokenize(text);
        let table = self.accumulator.accumulate(&tokens, &self.morphology);
        debug!(
            document = name,
            analyzer = self.morphology.name(),
            fallbacks = table.fallback_count(),
            "morphology pass finished"
        );

        let aggregates = AggregateTables::build(&table);
        let mut store = Store::open(store_path)?;
        persist(&mut store, &table, &aggregates)?;

        let report = DocumentReport {
            document: name.to_string(),
            storage: store_path.to_path_buf(),
            total_tokens: tokens.len(),
            sampled_tokens: table.sampled_tokens(),
            distinct_word_forms: aggregates.word_forms.len(),
            distinct_lemmas: aggregates.lemmas.len(),
            distinct_pos: aggregates.parts_of_speech.len(),
        };
        info!(
            document = name,
            tokens = report.total_tokens,
            sampled = report.sampled_tokens,
            word_forms = report.distinct_word_forms,
            lemmas = report.distinct_lemmas,
            "document persisted"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::morphology::IdentityMorphology;

    #[test]
    fn test_report_counts() {
        let dir = tempfile::tempdir().unwrap();
        let params = SamplingParams::new(2, 2).unwrap();
        let pipeline = FrequencyPipeline::new(params, IdentityMorphology).unwrap();

        let report = pipeline
            .run_text("doc", "A b, a! C d e.", &dir.path().join("doc.db"))
            .unwrap();
        assert_eq!(report.total_tokens, 6);
        assert_eq!(report.sampled_tokens, 4);
        assert_eq!(report.distinct_word_forms, 3);
        assert_eq!(report.distinct_pos, 1);
    }

    #[test]
    fn test_missing_document_leaves_no_unit() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline =
            FrequencyPipeline::new(SamplingParams::default(), IdentityMorphology).unwrap();
        let path = dir.path().join("absent.txt");
        let err = pipeline.run_document(&path).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!dir.path().join("absent.db").exists());
    }

    #[test]
    fn test_rejects_invalid_params() {
        let params = SamplingParams {
            sample_width: 0,
            sample_count: 1,
        };
        assert!(FrequencyPipeline::new(params, IdentityMorphology).is_err());
    }
}
