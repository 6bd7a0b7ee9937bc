//! Prompt token counting using tiktoken

use serde::Serialize;
use std::sync::Arc;
use tiktoken_rs::CoreBPE;
use tracing::warn;

/// Characters per token for the heuristic fallback
const CHARS_PER_TOKEN: usize = 4;

/// How a [`TextTokenCount`] was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountMethod {
    Tokenizer,
    CharacterHeuristic,
}

/// A text token count. Counting always produces one of these; when no
/// tokenizer is available the count comes from the character heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextTokenCount {
    pub tokens: u64,
    pub method: CountMethod,
}

/// Model-aware prompt token estimator
#[derive(Clone)]
pub struct TokenEstimator {
    bpe: Option<Arc<CoreBPE>>,
}

impl TokenEstimator {
    /// Create an estimator for `model`. Unrecognised model names use the
    /// o200k_base encoding; if no encoding can be loaded the estimator
    /// counts characters instead.
    pub fn for_model(model: &str) -> Self {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .or_else(|_| tiktoken_rs::o200k_base());

        match bpe {
            Ok(bpe) => Self {
                bpe: Some(Arc::new(bpe)),
            },
            Err(e) => {
                warn!("Tokenizer unavailable for {}: {}", model, e);
                Self::heuristic()
            }
        }
    }

    /// Estimator that never loads a tokenizer
    pub fn heuristic() -> Self {
        Self { bpe: None }
    }

    pub fn has_tokenizer(&self) -> bool {
        self.bpe.is_some()
    }

    /// Count tokens in `text`
    pub fn count(&self, text: &str) -> TextTokenCount {
        if let Some(bpe) = &self.bpe {
            return TextTokenCount {
                tokens: bpe.encode_ordinary(text).len() as u64,
                method: CountMethod::Tokenizer,
            };
        }

        TextTokenCount {
            tokens: heuristic_count(text),
            method: CountMethod::CharacterHeuristic,
        }
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::for_model(crate::DEFAULT_MODEL)
    }
}

/// One token per four characters, rounded up
pub fn heuristic_count(text: &str) -> u64 {
    text.chars().count().div_ceil(CHARS_PER_TOKEN) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_estimation() {
        let estimator = TokenEstimator::for_model("gpt-4o");
        assert!(estimator.has_tokenizer());

        let count = estimator.count("Hello, world!");
        assert_eq!(count.method, CountMethod::Tokenizer);
        assert!(count.tokens > 0 && count.tokens < 10);

        assert_eq!(estimator.count("").tokens, 0);
    }

    #[test]
    fn test_unknown_model_still_tokenizes() {
        let estimator = TokenEstimator::for_model("definitely-not-a-model");
        assert!(estimator.has_tokenizer());
    }

    #[test]
    fn test_heuristic_rounds_up() {
        let estimator = TokenEstimator::heuristic();
        let count = estimator.count("abcde");
        assert_eq!(count.method, CountMethod::CharacterHeuristic);
        assert_eq!(count.tokens, 2);
        assert_eq!(estimator.count("abcd").tokens, 1);
        assert_eq!(estimator.count("").tokens, 0);
    }

    #[test]
    fn test_heuristic_counts_chars_not_bytes() {
        // Four two-byte characters
        assert_eq!(heuristic_count("éééé"), 1);
    }
}
