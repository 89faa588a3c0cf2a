//! Pipeline configuration
//!
//! Every field has a default, so a JSON config only needs the keys it
//! overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sample windowing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// Tokens per sample (W)
    pub sample_width: usize,
    /// Number of samples (K)
    pub sample_count: usize,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            sample_width: 1000,
            sample_count: 20,
        }
    }
}

impl SamplingParams {
    pub fn new(sample_width: usize, sample_count: usize) -> Result<Self> {
        let params = Self {
            sample_width,
            sample_count,
        };
        params.validate()?;
        Ok(params)
    }

    /// Number of leading tokens that fall into some sample
    pub fn sampled_len(&self) -> usize {
        self.sample_width.saturating_mul(self.sample_count)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_width == 0 {
            return Err(Error::InvalidConfig("sample_width must be at least 1".into()));
        }
        if self.sample_count == 0 {
            return Err(Error::InvalidConfig("sample_count must be at least 1".into()));
        }
        Ok(())
    }
}

/// Prefix limits for the TF-IDF corpus reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusLimits {
    /// Characters read from the start of each file
    pub char_limit: usize,
    /// Tokens kept from those characters
    pub token_limit: usize,
}

impl Default for CorpusLimits {
    fn default() -> Self {
        Self {
            char_limit: 30_000,
            token_limit: 20_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sampling: SamplingParams,
    pub corpus: CorpusLimits,
    /// Terms printed by the scorer
    pub top_n: usize,
    pub documents: Vec<PathBuf>,
    /// Tab-separated `word_form lemma pos` lexicon
    pub lexicon: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sampling: SamplingParams::default(),
            corpus: CorpusLimits::default(),
            top_n: 100,
            documents: vec![
                PathBuf::from("Istoria_zaporizkykh_kozakiv_Tom1.txt"),
                PathBuf::from("Biblia_Staryi_zapovit.txt"),
            ],
            lexicon: None,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.sampling.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json_str(&json)
    }
}
