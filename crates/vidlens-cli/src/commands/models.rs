use anyhow::Result;
use vidlens_config::Config;
use vidlens_tokens::{DEFAULT_MODEL, PricingTable};

pub fn handle(config: &Config) -> Result<()> {
    println!(
        "{:<16} {:>10} {:>10} {:>10} {:>8}",
        "MODEL", "INPUT", "CACHED", "OUTPUT", "IMAGE×"
    );
    for (name, entry) in PricingTable::models() {
        let marker = if name == config.model { "*" } else { " " };
        println!(
            "{}{:<15} {:>10.3} {:>10.3} {:>10.3} {:>8.2}",
            marker,
            name,
            entry.input_cost_per_million,
            entry.cached_input_cost_per_million,
            entry.output_cost_per_million,
            entry.image_token_multiplier
        );
    }

    println!();
    println!("Prices in USD per million tokens.");
    println!("Default model: {}", DEFAULT_MODEL);
    if !PricingTable::is_known(&config.model) {
        println!(
            "Configured model '{}' is not priced; estimates use {} rates.",
            config.model, DEFAULT_MODEL
        );
    }

    Ok(())
}
