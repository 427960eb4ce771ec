//! The `mathcoach init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("mathcoach.toml").exists() {
        println!("mathcoach.toml already exists, skipping.");
    } else {
        std::fs::write("mathcoach.toml", SAMPLE_CONFIG)?;
        println!("Created mathcoach.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set MATHCOACH_OPENAI_KEY (or edit mathcoach.toml)");
    println!("  2. Run: mathcoach generate --grade 5 --difficulty Medium");
    println!("  3. Run: mathcoach submit --session <id> --answer \"3/4\"");
    println!("  Offline demo: mathcoach --provider mock generate");

    Ok(())
}

// Top-level keys must come before the first table.
const SAMPLE_CONFIG: &str = r#"# mathcoach configuration

default_provider = "openai"
fast_model = "gpt-4.1-mini"
quality_model = "gpt-4o"
max_retries = 3
retry_delay_ms = 1000
data_dir = "./mathcoach-data"

[providers.openai]
type = "openai"
api_key = "${MATHCOACH_OPENAI_KEY}"

[providers.mock]
type = "mock"
default_response = '{"problem_text": "Ali has 3/4 of a pizza and eats half of it. What fraction of the pizza is left?", "final_answer": "3/8"}'

[providers.mock.responses]
"Student answer" = "Check how you split the pizza, then compare your fraction with the picture."
"gentle hint" = "- Draw the pizza and shade 3/4 of it.\n- Half of the shaded part is eaten."
"step-by-step solution" = "1. Ali starts with 3/4.\n2. He eats half: 3/4 x 1/2 = 3/8.\n3. Left: 3/4 - 3/8 = 3/8.\nFinal: 3/8"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let config: mathcoach_providers::MathcoachConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.providers.len(), 2);
    }
}
