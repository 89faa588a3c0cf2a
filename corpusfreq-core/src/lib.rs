//! CorpusFreq Core - sample-bucketed word frequencies and TF-IDF term ranking
//!
//! Documents are tokenized, annotated with lemma and part of speech, and
//! counted over fixed-size samples; the counts are grouped by word form, lemma
//! and part of speech and stored in one storage unit per document. A separate
//! scorer ranks terms of a multi-document corpus by TF-IDF.

pub mod accumulator;
pub mod aggregate;
pub mod config;
pub mod corpus;
pub mod error;
pub mod morphology;
pub mod persist;
pub mod pipeline;
pub mod store;
pub mod tfidf;
pub mod tokenizer;

pub use accumulator::{Accumulator, FrequencyRecord, FrequencyTable};
pub use aggregate::{aggregate, AggregateRecord, AggregateTables, GroupKey};
pub use config::{Config, CorpusLimits, SamplingParams};
pub use corpus::Corpus;
pub use error::{Error, Result};
pub use morphology::{
    Analysis, Chained, IdentityMorphology, LexiconMorphology, Morphology, MorphologyError,
    StemmerMorphology, UNKNOWN_POS,
};
pub use pipeline::{DocumentReport, FrequencyPipeline};
pub use store::{Store, Table, TableSchema, Value};
pub use tfidf::{format_ranking, TermScore, TfIdfScorer, TfIdfScores};
pub use tokenizer::Tokenizer;

pub use rust_stemmers::Algorithm;
