//! Models Command
//!
//! List the models the configured credential can see.

use console::style;

use crate::ai::GeminiClient;
use crate::cli::util::{CommandContext, GlobalArgs, runtime};
use crate::types::Result;

pub fn run(args: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(args)?;
    let client = GeminiClient::new(&ctx.config.llm)?;

    let models = runtime()?.block_on(client.list_models())?;

    for model in &models {
        let name = model.name.trim_start_matches("models/");
        let marker = if model.supports_generation() {
            style("✓").green()
        } else {
            style("-").dim()
        };
        match &model.display_name {
            Some(display) => println!("{} {:<32} {}", marker, name, style(display).dim()),
            None => println!("{} {}", marker, name),
        }
    }

    let usable = models.iter().filter(|m| m.supports_generation()).count();
    ctx.output.info(&format!(
        "{} model(s), {} support generateContent (configured: {})",
        models.len(),
        usable,
        ctx.config.llm.model
    ));
    Ok(())
}
