//! The `mathcoach list-models` command.

use anyhow::Result;

use mathcoach_providers::create_provider;

use super::Context;

pub fn execute(ctx: &Context) -> Result<()> {
    let config = ctx.load_config()?;

    let mut found_any = false;

    for (name, provider_config) in &config.providers {
        if let Some(filter) = &ctx.provider {
            if name != filter {
                continue;
            }
        }

        let provider = match create_provider(provider_config) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("skipping provider '{name}': {e:#}");
                continue;
            }
        };
        let models = provider.available_models();

        if !models.is_empty() {
            found_any = true;
            let marker = if *name == config.default_provider {
                " (default)"
            } else {
                ""
            };
            println!("Provider: {name}{marker}");
            for model in &models {
                println!(
                    "  {}: {} ({}K context)",
                    model.id,
                    model.name,
                    model.max_context / 1000,
                );
            }
            println!();
        }
    }

    if !found_any {
        println!("No providers configured. Run `mathcoach init` to create a config file.");
    } else {
        println!("Fast model:    {}", config.fast_model);
        println!("Quality model: {}", config.quality_model);
    }

    Ok(())
}
