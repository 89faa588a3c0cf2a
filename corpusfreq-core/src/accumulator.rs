//! Sample-bucketed frequency accumulator
//!
//! The leading `W*K` tokens of a document are cut into `K` windows of `W`
//! tokens. Each distinct word form gets a length-`K` vector of per-window
//! counts, allocated up front so samples where the word is absent are zero.

use ahash::AHashMap;
use serde::Serialize;

use crate::config::SamplingParams;
use crate::morphology::{Analysis, Morphology};

/// Per-word-form counts across samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRecord {
    pub word_form: String,
    pub lemma: String,
    pub part_of_speech: String,
    pub frequencies: Vec<u32>,
}

impl FrequencyRecord {
    fn new(word_form: String, analysis: Analysis, sample_count: usize) -> Self {
        Self {
            word_form,
            lemma: analysis.lemma,
            part_of_speech: analysis.pos,
            frequencies: vec![0; sample_count],
        }
    }

    pub fn absolute_frequency(&self) -> u32 {
        self.frequencies.iter().sum()
    }
}

/// Result of one accumulator pass, records in first-sighting order
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    records: Vec<FrequencyRecord>,
    index: AHashMap<String, usize>,
    sample_count: usize,
    sampled_tokens: usize,
    fallbacks: usize,
}

impl FrequencyTable {
    pub fn get(&self, word_form: &str) -> Option<&FrequencyRecord> {
        self.index.get(word_form).map(|&idx| &self.records[idx])
    }

    pub fn records(&self) -> &[FrequencyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Length of every record's frequency vector
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Tokens that fell inside some sample
    pub fn sampled_tokens(&self) -> usize {
        self.sampled_tokens
    }

    /// Word forms the analyzer did not recognize
    pub fn fallback_count(&self) -> usize {
        self.fallbacks
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Accumulator {
    params: SamplingParams,
}

impl Accumulator {
    pub fn new(params: SamplingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> SamplingParams {
        self.params
    }

    /// Count every token of the sampled prefix. Tokens past `W*K` are ignored.
    pub fn accumulate<S, M>(&self, tokens: &[S], morphology: &M) -> FrequencyTable
    where
        S: AsRef<str>,
        M: Morphology + ?Sized,
    {
        let width = self.params.sample_width.max(1);
        let sample_count = self.params.sample_count;
        let sampled = &tokens[..tokens.len().min(self.params.sampled_len())];

        let mut table = FrequencyTable {
            sample_count,
            sampled_tokens: sampled.len(),
            ..FrequencyTable::default()
        };

        for (sample, window) in sampled.chunks(width).enumerate() {
            for token in window {
                let token = token.as_ref();
                let idx = match table.index.get(token) {
                    Some(&idx) => idx,
                    None => {
                        // Analyzed once per distinct word form
                        let analysis = morphology.analyze(token).unwrap_or_else(|_| {
                            table.fallbacks += 1;
                            Analysis::fallback(token)
                        });
                        let idx = table.records.len();
                        table.records.push(FrequencyRecord::new(
                            token.to_string(),
                            analysis,
                            sample_count,
                        ));
                        table.index.insert(token.to_string(), idx);
                        idx
                    }
                };
                table.records[idx].frequencies[sample] += 1;
            }
        }

        table
    }
}
