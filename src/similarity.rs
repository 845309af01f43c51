use core::fmt;
use std::collections::HashSet;

mod ngram;
mod normalize;

pub use normalize::normalize;

use crate::{
    config::{AlignConfig, ConfigError, Granularity, NormalizeOptions},
    tokenizer::Tokenizer,
};
use ngram::{char_ngrams, word_ngrams};

/// Jaccard similarity of two sentences under the given configuration.
///
/// Convenience wrapper around [`Scorer`] for one-off comparisons; build a
/// `Scorer` when comparing many sentence pairs.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the configuration is invalid, including
/// word granularity without a tokenizer.
pub fn similarity(a: &str, b: &str, config: &AlignConfig) -> Result<f64, ConfigError> {
    Ok(Scorer::new(config)?.score(a, b))
}

/// A configured similarity scorer: normalizes both sentences, builds their
/// n-gram sets, and returns the Jaccard ratio `|A∩B| / |A∪B|` in `[0, 1]`.
///
/// Two sentences that normalize to the same string score `1.0`; a sentence
/// that normalizes to nothing scores `0.0` against everything else.
pub struct Scorer<'a> {
    ngram_size: usize,
    granularity: Granularity,
    normalize: NormalizeOptions,
    tokenizer: Option<&'a Tokenizer>,
}

impl<'a> Scorer<'a> {
    /// A character-granularity scorer.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration is invalid. Word
    /// granularity is a configuration fault here; use
    /// [`Scorer::with_tokenizer`] for it.
    pub fn new(config: &AlignConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.granularity == Granularity::Word {
            return Err(ConfigError::MissingTokenizer);
        }

        Ok(Self {
            ngram_size: config.ngram_size,
            granularity: Granularity::Char,
            normalize: config.normalize,
            tokenizer: None,
        })
    }

    /// A scorer with an injected tokenizer, enabling word granularity.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration is invalid.
    pub fn with_tokenizer(
        config: &AlignConfig,
        tokenizer: &'a Tokenizer,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            ngram_size: config.ngram_size,
            granularity: config.granularity,
            normalize: config.normalize,
            tokenizer: Some(tokenizer),
        })
    }

    /// Scorer for the alignment pipeline: the configuration has already been
    /// validated, and word granularity without a tokenizer silently degrades
    /// to character granularity.
    pub(crate) fn for_alignment(config: &AlignConfig, tokenizer: Option<&'a Tokenizer>) -> Self {
        let granularity = if tokenizer.is_some() {
            config.granularity
        } else {
            Granularity::Char
        };

        Self {
            ngram_size: config.ngram_size,
            granularity,
            normalize: config.normalize,
            tokenizer,
        }
    }

    #[must_use]
    pub fn score(&self, a: &str, b: &str) -> f64 {
        score_prepared(&self.prepare(a), &self.prepare(b))
    }

    /// The comparison form of `text` under this scorer's normalization.
    pub(crate) fn normalized(&self, text: &str) -> String { normalize(text, &self.normalize) }

    /// Normalizes `text` and builds its n-gram set once, for reuse across
    /// many comparisons.
    pub(crate) fn prepare(&self, text: &str) -> Prepared {
        let normalized = self.normalized(text);
        let grams = match (self.granularity, self.tokenizer) {
            (Granularity::Word, Some(tokenizer)) => {
                word_ngrams(&tokenizer(&normalized), self.ngram_size)
            }
            _ => char_ngrams(&normalized, self.ngram_size),
        };

        Prepared { normalized, grams }
    }
}

/// Jaccard ratio over two prepared sentences. Normalized equality
/// short-circuits to `1.0` before the emptiness check, so two sentences that
/// both normalize to nothing count as equal.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn score_prepared(a: &Prepared, b: &Prepared) -> f64 {
    if a.normalized == b.normalized {
        return 1.0;
    }
    if a.normalized.is_empty() || b.normalized.is_empty() {
        return 0.0;
    }

    let shared = a.grams.intersection(&b.grams).count();
    let union = a.grams.len() + b.grams.len() - shared;
    if union == 0 {
        return 0.0;
    }

    shared as f64 / union as f64
}

impl fmt::Debug for Scorer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scorer")
            .field("ngram_size", &self.ngram_size)
            .field("granularity", &self.granularity)
            .field("normalize", &self.normalize)
            .field("tokenizer", &self.tokenizer.map(|_| "..."))
            .finish()
    }
}

/// A sentence readied for comparison: its normalized text plus its n-gram
/// set under a particular [`Scorer`].
#[derive(Debug, Clone)]
pub(crate) struct Prepared {
    normalized: String,
    grams: HashSet<String>,
}
