//! Static pricing table and cost arithmetic
//!
//! Lookups never fail: an unknown model identifier resolves to the
//! [`DEFAULT_MODEL`] entry and the resolution says so.

use serde::Serialize;
use tracing::debug;

/// Model used whenever the caller does not name one, and the pricing
/// fallback for identifiers missing from the table.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Per-model rates in USD per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricingEntry {
    pub input_cost_per_million: f64,
    pub cached_input_cost_per_million: f64,
    pub output_cost_per_million: f64,
    /// Scales the 32x32 patch count into image tokens
    pub image_token_multiplier: f64,
}

const fn entry(input: f64, cached: f64, output: f64, multiplier: f64) -> PricingEntry {
    PricingEntry {
        input_cost_per_million: input,
        cached_input_cost_per_million: cached,
        output_cost_per_million: output,
        image_token_multiplier: multiplier,
    }
}

static PRICING: &[(&str, PricingEntry)] = &[
    ("gpt-4.1", entry(2.00, 0.50, 8.00, 1.0)),
    ("gpt-4.1-mini", entry(0.40, 0.10, 1.60, 1.62)),
    ("gpt-4.1-nano", entry(0.10, 0.025, 0.40, 2.46)),
    ("gpt-4o", entry(2.50, 1.25, 10.00, 1.0)),
    ("gpt-4o-mini", entry(0.15, 0.075, 0.60, 1.62)),
    ("o4-mini", entry(1.10, 0.275, 4.40, 1.72)),
];

/// Result of a pricing lookup. `fallback` is set when `model` was not in
/// the table and the default entry was substituted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPricing {
    pub model: &'static str,
    pub entry: PricingEntry,
    pub fallback: bool,
}

pub struct PricingTable;

impl PricingTable {
    /// Resolve a model identifier. Always succeeds.
    pub fn resolve(model: &str) -> ResolvedPricing {
        if let Some((name, entry)) = PRICING.iter().find(|(name, _)| *name == model) {
            return ResolvedPricing {
                model: name,
                entry: *entry,
                fallback: false,
            };
        }

        debug!(
            "No pricing for model '{}', using {} rates",
            model, DEFAULT_MODEL
        );
        ResolvedPricing {
            model: DEFAULT_MODEL,
            entry: Self::default_entry(),
            fallback: true,
        }
    }

    pub fn lookup(model: &str) -> PricingEntry {
        Self::resolve(model).entry
    }

    pub fn default_entry() -> PricingEntry {
        PRICING
            .iter()
            .find(|(name, _)| *name == DEFAULT_MODEL)
            .map(|(_, entry)| *entry)
            .unwrap_or(entry(0.40, 0.10, 1.60, 1.62))
    }

    pub fn is_known(model: &str) -> bool {
        PRICING.iter().any(|(name, _)| *name == model)
    }

    /// Known model identifiers with their entries, in table order
    pub fn models() -> impl Iterator<Item = (&'static str, PricingEntry)> {
        PRICING.iter().map(|(name, entry)| (*name, *entry))
    }
}

/// Cost in USD for a single request's token usage.
///
/// `cost = input/1e6 * input_rate + output/1e6 * output_rate`, where the
/// input rate is the cached rate when `cached_input` is set.
pub fn calculate_cost(input_tokens: u64, output_tokens: u64, model: &str, cached_input: bool) -> f64 {
    let pricing = PricingTable::lookup(model);
    let input_rate = if cached_input {
        pricing.cached_input_cost_per_million
    } else {
        pricing.input_cost_per_million
    };

    (input_tokens as f64 / 1_000_000.0) * input_rate
        + (output_tokens as f64 / 1_000_000.0) * pricing.output_cost_per_million
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_known_model_lookup() {
        let resolved = PricingTable::resolve("gpt-4.1");
        assert!(!resolved.fallback);
        assert_eq!(resolved.model, "gpt-4.1");
        assert_eq!(resolved.entry.image_token_multiplier, 1.0);
    }

    #[test]
    fn test_unknown_model_falls_back() {
        let resolved = PricingTable::resolve("some-future-model");
        assert!(resolved.fallback);
        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert_eq!(resolved.entry, PricingTable::default_entry());
    }

    #[test]
    fn test_cost_formula() {
        // 1M input at $2, 1M output at $8
        assert!(approx(calculate_cost(1_000_000, 1_000_000, "gpt-4.1", false), 10.0));
        // Cached input at $0.50
        assert!(approx(calculate_cost(1_000_000, 0, "gpt-4.1", true), 0.5));
        assert!(approx(calculate_cost(0, 0, "gpt-4.1", false), 0.0));
    }

    #[test]
    fn test_unknown_model_cost_matches_default() {
        let unknown = calculate_cost(12_345, 678, "not-a-model", false);
        let default = calculate_cost(12_345, 678, DEFAULT_MODEL, false);
        assert!(approx(unknown, default));
    }

    #[test]
    fn test_mini_tiers_use_denser_image_multiplier() {
        for (name, entry) in PricingTable::models() {
            if name.contains("mini") || name.contains("nano") {
                assert!(entry.image_token_multiplier > 1.6, "{}", name);
            }
        }
        assert!(PricingTable::is_known(DEFAULT_MODEL));
    }
}
