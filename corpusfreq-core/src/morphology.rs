//! Morphological analysis adapters
//!
//! An analyzer maps a word form to its lemma and part-of-speech tag. Words an
//! analyzer cannot handle come back as [`MorphologyError::Unrecognized`]; the
//! accumulator turns those into [`Analysis::fallback`].

use std::cell::RefCell;
use std::path::Path;

use ahash::AHashMap;
use rust_stemmers::{Algorithm, Stemmer};
use thiserror::Error;

/// Part-of-speech tag for words without an analysis
pub const UNKNOWN_POS: &str = "UNKN";

#[derive(Debug, Error)]
pub enum MorphologyError {
    #[error("unrecognized word form `{0}`")]
    Unrecognized(String),

    #[error("malformed lexicon line {line}: {reason}")]
    Lexicon { line: usize, reason: String },

    #[error("failed to read lexicon: {0}")]
    Io(#[from] std::io::Error),
}

/// Lemma and part of speech of one word form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub lemma: String,
    pub pos: String,
}

impl Analysis {
    pub fn new(lemma: impl Into<String>, pos: impl Into<String>) -> Self {
        Self {
            lemma: lemma.into(),
            pos: pos.into(),
        }
    }

    /// The word as its own lemma, with an unknown tag
    pub fn fallback(word: &str) -> Self {
        Self::new(word, UNKNOWN_POS)
    }
}

pub trait Morphology {
    fn analyze(&self, word: &str) -> Result<Analysis, MorphologyError>;

    fn name(&self) -> &str;
}

impl<M: Morphology + ?Sized> Morphology for Box<M> {
    fn analyze(&self, word: &str) -> Result<Analysis, MorphologyError> {
        (**self).analyze(word)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Every word is its own lemma
#[derive(Debug, Clone, Default)]
pub struct IdentityMorphology;

impl Morphology for IdentityMorphology {
    fn analyze(&self, word: &str) -> Result<Analysis, MorphologyError> {
        Ok(Analysis::fallback(word))
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Dictionary lookup over a `word_form \t lemma \t pos` lexicon
#[derive(Debug, Clone, Default)]
pub struct LexiconMorphology {
    entries: AHashMap<String, Analysis>,
}

impl LexiconMorphology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, word_form: &str, lemma: &str, pos: &str) {
        self.entries
            .insert(word_form.to_lowercase(), Analysis::new(lemma, pos));
    }

    /// Parse a lexicon; blank lines and `#` comments are skipped
    pub fn parse(source: &str) -> Result<Self, MorphologyError> {
        let mut lexicon = Self::new();
        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
            match fields.as_slice() {
                [word, lemma, pos] if !word.is_empty() && !lemma.is_empty() => {
                    let pos = if pos.is_empty() { UNKNOWN_POS } else { pos };
                    lexicon.insert(word, lemma, pos);
                }
                _ => {
                    return Err(MorphologyError::Lexicon {
                        line: idx + 1,
                        reason: format!("expected 3 tab-separated fields, got {}", fields.len()),
                    })
                }
            }
        }
        Ok(lexicon)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MorphologyError> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consult `fallback` for words missing from the lexicon
    pub fn with_fallback<B: Morphology>(self, fallback: B) -> Chained<Self, B> {
        Chained {
            primary: self,
            fallback,
        }
    }
}

impl Morphology for LexiconMorphology {
    fn analyze(&self, word: &str) -> Result<Analysis, MorphologyError> {
        self.entries
            .get(word)
            .cloned()
            .ok_or_else(|| MorphologyError::Unrecognized(word.to_string()))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

/// Stem-based lemmatizer. Results are memoized for the analyzer's lifetime,
/// so the cache carries over between documents.
pub struct StemmerMorphology {
    algorithm: Algorithm,
    stemmer: Stemmer,
    cache: RefCell<AHashMap<String, Analysis>>,
}

impl StemmerMorphology {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            stemmer: Stemmer::create(algorithm),
            cache: RefCell::new(AHashMap::new()),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl Morphology for StemmerMorphology {
    fn analyze(&self, word: &str) -> Result<Analysis, MorphologyError> {
        if let Some(hit) = self.cache.borrow().get(word) {
            return Ok(hit.clone());
        }
        let stem = self.stemmer.stem(word);
        if stem.is_empty() {
            return Err(MorphologyError::Unrecognized(word.to_string()));
        }
        let analysis = Analysis::new(stem.into_owned(), UNKNOWN_POS);
        self.cache
            .borrow_mut()
            .insert(word.to_string(), analysis.clone());
        Ok(analysis)
    }

    fn name(&self) -> &str {
        "stemmer"
    }
}

/// Try `primary`, then `fallback` when `primary` does not recognize the word
pub struct Chained<A, B> {
    primary: A,
    fallback: B,
}

impl<A: Morphology, B: Morphology> Chained<A, B> {
    pub fn new(primary: A, fallback: B) -> Self {
        Self { primary, fallback }
    }
}

impl<A: Morphology, B: Morphology> Morphology for Chained<A, B> {
    fn analyze(&self, word: &str) -> Result<Analysis, MorphologyError> {
        match self.primary.analyze(word) {
            Err(MorphologyError::Unrecognized(_)) => self.fallback.analyze(word),
            other => other,
        }
    }

    fn name(&self) -> &str {
        "chained"
    }
}
