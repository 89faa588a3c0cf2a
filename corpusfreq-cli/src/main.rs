//! Runs both pipelines over the configured documents.
//!
//! Reads `corpusfreq.json` from the working directory when present; otherwise
//! the built-in document list is used. Set `RUST_LOG` to change verbosity.
//!
//! Words are analyzed with the configured `lexicon` file, falling back to the
//! surface form. Without a lexicon every word is its own lemma with the
//! unknown part-of-speech tag.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use corpusfreq_core::{
    format_ranking, Config, Corpus, FrequencyPipeline, IdentityMorphology, LexiconMorphology,
    Morphology, TfIdfScorer, Tokenizer,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const CONFIG_FILE: &str = "corpusfreq.json";

fn load_config() -> Result<Config> {
    let path = Path::new(CONFIG_FILE);
    if path.exists() {
        info!(path = CONFIG_FILE, "loading configuration");
        Config::from_json_file(path).with_context(|| format!("reading {CONFIG_FILE}"))
    } else {
        Ok(Config::default())
    }
}

fn build_morphology(config: &Config) -> Result<Box<dyn Morphology>> {
    let morphology: Box<dyn Morphology> = match &config.lexicon {
        Some(path) => {
            let lexicon = LexiconMorphology::from_file(path)
                .with_context(|| format!("loading lexicon {}", path.display()))?;
            info!(entries = lexicon.len(), "lexicon loaded");
            Box::new(lexicon.with_fallback(IdentityMorphology))
        }
        None => Box::new(IdentityMorphology),
    };
    Ok(morphology)
}

/// Frequency tables for every document; returns how many failed
fn run_frequencies(config: &Config) -> Result<usize> {
    let pipeline = FrequencyPipeline::new(config.sampling, build_morphology(config)?)?;
    let mut failures = 0;
    for document in &config.documents {
        match pipeline.run_document(document) {
            Ok(report) => info!(storage = %report.storage.display(), "frequency tables written"),
            Err(err) => {
                error!(document = %document.display(), error = %err, "document failed");
                failures += 1;
            }
        }
    }
    Ok(failures)
}

fn run_tfidf(config: &Config) -> Result<()> {
    let corpus = Corpus::from_files(&config.documents, config.corpus, &Tokenizer::new())
        .context("reading corpus")?;
    let ranking = TfIdfScorer::new().rank(&corpus, config.top_n);
    print!("{}", format_ranking(&ranking));
    Ok(())
}

fn run() -> Result<bool> {
    let config = load_config()?;
    let failures = run_frequencies(&config)?;
    run_tfidf(&config)?;
    Ok(failures == 0)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
