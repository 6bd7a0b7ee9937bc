//! Token and cost estimation for vidlens
//!
//! This crate contains:
//! - Pricing table and cost arithmetic
//! - Prompt token counting (tiktoken, with a character heuristic fallback)
//! - The image patch token formula
//! - Per-frame estimates combining the three

pub mod estimate;
pub mod estimator;
pub mod image;
pub mod pricing;

pub use estimate::{ASSUMED_OUTPUT_TOKENS, FrameEstimator, TokenEstimate};
pub use estimator::{CountMethod, TextTokenCount, TokenEstimator};
pub use image::{image_tokens, patch_count};
pub use pricing::{DEFAULT_MODEL, PricingEntry, PricingTable, ResolvedPricing, calculate_cost};
