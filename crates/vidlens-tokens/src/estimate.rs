//! Per-frame token and cost estimates

use serde::Serialize;

use crate::estimator::{CountMethod, TokenEstimator};
use crate::image::image_tokens;
use crate::pricing::{PricingTable, calculate_cost};

/// Output tokens assumed per frame when pricing an estimate; the real
/// description length is unknown until the frame is analyzed.
pub const ASSUMED_OUTPUT_TOKENS: u64 = 100;

/// Predicted usage for one request (prompt + one image)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenEstimate {
    pub text_tokens: u64,
    /// Whether `text_tokens` came from a tokenizer or the character heuristic
    pub text_method: CountMethod,
    pub image_tokens: u64,
    pub total_tokens: u64,
    pub estimated_cost: f64,
    pub model: String,
}

impl TokenEstimate {
    /// Estimate for `count` identical requests
    pub fn scaled(&self, count: u64) -> TokenEstimate {
        TokenEstimate {
            text_tokens: self.text_tokens * count,
            text_method: self.text_method,
            image_tokens: self.image_tokens * count,
            total_tokens: self.total_tokens * count,
            estimated_cost: self.estimated_cost * count as f64,
            model: self.model.clone(),
        }
    }
}

/// Builds [`TokenEstimate`]s for a fixed model and output assumption
#[derive(Clone)]
pub struct FrameEstimator {
    model: String,
    tokenizer: TokenEstimator,
    assumed_output_tokens: u64,
}

impl FrameEstimator {
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            tokenizer: TokenEstimator::for_model(&model),
            model,
            assumed_output_tokens: ASSUMED_OUTPUT_TOKENS,
        }
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenEstimator) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn with_assumed_output_tokens(mut self, tokens: u64) -> Self {
        self.assumed_output_tokens = tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn assumed_output_tokens(&self) -> u64 {
        self.assumed_output_tokens
    }

    /// Estimate one request sending `prompt` with a `width` x `height` image
    pub fn estimate(&self, prompt: &str, width: u32, height: u32) -> TokenEstimate {
        let multiplier = PricingTable::lookup(&self.model).image_token_multiplier;
        let text = self.tokenizer.count(prompt);
        let image_tokens = image_tokens(width, height, multiplier);
        let total_tokens = text.tokens + image_tokens;

        TokenEstimate {
            text_tokens: text.tokens,
            text_method: text.method,
            image_tokens,
            total_tokens,
            estimated_cost: calculate_cost(
                total_tokens,
                self.assumed_output_tokens,
                &self.model,
                false,
            ),
            model: self.model.clone(),
        }
    }
}
