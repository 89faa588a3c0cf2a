//! Token sequences of several documents, read for TF-IDF scoring

use std::path::Path;

use tracing::info;

use crate::config::CorpusLimits;
use crate::error::{Error, Result};
use crate::tokenizer::Tokenizer;

/// Ordered collection of per-document token sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Vec<String>>,
}

impl Corpus {
    pub fn new(documents: Vec<Vec<String>>) -> Self {
        Self { documents }
    }

    /// Read each file's leading characters and keep its leading tokens
    pub fn from_files<P: AsRef<Path>>(
        paths: &[P],
        limits: CorpusLimits,
        tokenizer: &Tokenizer,
    ) -> Result<Self> {
        let mut corpus = Self::default();
        for path in paths {
            let path = path.as_ref();
            let text = read_text(path)?;
            let tokens = tokenizer.tokenize_prefix(&text, limits.char_limit, limits.token_limit);
            info!(document = %path.display(), tokens = tokens.len(), "corpus document loaded");
            corpus.push(tokens);
        }
        Ok(corpus)
    }

    pub fn push(&mut self, tokens: Vec<String>) {
        self.documents.push(tokens);
    }

    pub fn documents(&self) -> &[Vec<String>] {
        &self.documents
    }

    pub fn num_documents(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl<S: Into<String>> FromIterator<Vec<S>> for Corpus {
    fn from_iter<I: IntoIterator<Item = Vec<S>>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|doc| doc.into_iter().map(Into::into).collect())
                .collect(),
        )
    }
}

/// Read a whole UTF-8 file; missing files and bad encodings are errors
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| Error::Decode {
        path: path.to_path_buf(),
    })
}
