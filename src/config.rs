#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The atomic unit n-grams are built from when scoring similarity.
///
/// `Word` granularity needs a tokenizer capability; entry points that were
/// not handed one stay at `Char` granularity.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Char,
    Word,
}

/// Which transforms [`normalize`](crate::normalize) applies when producing
/// the comparison form of a sentence. Trimming is unconditional; every other
/// transform has its own switch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Strip inline footnote references, bracketed (`[3]`, `〔3〕`) or
    /// caret-delimited (`^3`, `^[3]`).
    pub strip_footnote_markers: bool,
    /// Strip all internal whitespace.
    pub strip_inner_whitespace: bool,
    /// Strip ASCII and CJK punctuation.
    pub strip_punctuation: bool,
    /// Strip digits, including circled and parenthesized numerals.
    pub strip_digits: bool,
    /// Strip Latin letters, including their full-width forms.
    pub strip_latin: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_footnote_markers: false,
            strip_inner_whitespace: true,
            strip_punctuation: false,
            strip_digits: false,
            strip_latin: false,
        }
    }
}

/// Tuning knobs of the alignment pipeline. The defaults are the values the
/// engine was calibrated with; entry points validate the whole struct before
/// doing any matching work.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignConfig {
    /// Half-width of the target-side search window around the anchor.
    pub window_size: usize,
    /// Minimum similarity for two sentences to count as a match.
    pub similarity_threshold: f64,
    /// Length of the n-grams the similarity score is computed over.
    pub ngram_size: usize,
    /// Whether n-grams are built from characters or from tokenized words.
    pub granularity: Granularity,
    /// How far past a matched target sentence the anchor advances.
    pub anchor_offset: usize,
    /// Upper bound on the window growth factor after repeated failures.
    pub max_window_expansion: usize,
    /// Consecutive failed sentences before the window starts expanding.
    pub consecutive_fail_threshold: usize,
    /// Text normalization applied before every comparison.
    pub normalize: NormalizeOptions,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            similarity_threshold: 0.6,
            ngram_size: 1,
            granularity: Granularity::Char,
            anchor_offset: 1,
            max_window_expansion: 3,
            consecutive_fail_threshold: 3,
            normalize: NormalizeOptions::default(),
        }
    }
}

impl AlignConfig {
    /// Checks every option value, failing fast before any matching work.
    ///
    /// # Errors
    ///
    /// Returns the first offending option as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::WindowSize {
                got: self.window_size,
            });
        }
        if self.ngram_size == 0 {
            return Err(ConfigError::NgramSize {
                got: self.ngram_size,
            });
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(ConfigError::SimilarityThreshold {
                got: self.similarity_threshold,
            });
        }
        if self.max_window_expansion == 0 {
            return Err(ConfigError::WindowExpansion {
                got: self.max_window_expansion,
            });
        }

        Ok(())
    }
}

/// Error type for invalid alignment options.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The search window must cover at least one target sentence.
    #[error("window size must be at least 1, got {got}")]
    WindowSize { got: usize },

    /// N-grams of length 0 carry no information.
    #[error("n-gram size must be at least 1, got {got}")]
    NgramSize { got: usize },

    /// The similarity threshold must be a usable cut-off.
    #[error("similarity threshold must be within (0, 1], got {got}")]
    SimilarityThreshold { got: f64 },

    /// The window expansion factor is a multiplier and must be at least 1.
    #[error("window expansion limit must be at least 1, got {got}")]
    WindowExpansion { got: usize },

    /// Word granularity was requested without injecting a tokenizer.
    #[error("word granularity requires a tokenizer")]
    MissingTokenizer,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test]
    fn test_default_values() {
        let config = AlignConfig::default();

        assert_eq!(config.window_size, 10);
        assert_eq!(config.similarity_threshold, 0.6);
        assert_eq!(config.ngram_size, 1);
        assert_eq!(config.granularity, Granularity::Char);
        assert_eq!(config.anchor_offset, 1);
        assert_eq!(config.max_window_expansion, 3);
        assert_eq!(config.consecutive_fail_threshold, 3);
        assert!(config.normalize.strip_inner_whitespace);
        assert!(!config.normalize.strip_punctuation);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let config = AlignConfig {
            window_size: 0,
            ..AlignConfig::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::WindowSize { got: 0 }));
    }

    #[test]
    fn test_zero_ngram_is_rejected() {
        let config = AlignConfig {
            ngram_size: 0,
            ..AlignConfig::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::NgramSize { got: 0 }));
    }

    #[test]
    fn test_zero_expansion_is_rejected() {
        let config = AlignConfig {
            max_window_expansion: 0,
            ..AlignConfig::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::WindowExpansion { got: 0 })
        );
    }

    #[test_case(0.0; "zero")]
    #[test_case(-0.2; "negative")]
    #[test_case(1.5; "above one")]
    #[test_case(f64::NAN; "not a number")]
    fn test_bad_threshold_is_rejected(threshold: f64) {
        let config = AlignConfig {
            similarity_threshold: threshold,
            ..AlignConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::SimilarityThreshold { .. })
        ));
    }
}
