//! Ping Command
//!
//! Send a tiny prompt to the configured model and report the round trip.

use std::time::Instant;

use crate::ai::create_generator;
use crate::cli::util::{CommandContext, GlobalArgs, runtime};
use crate::types::Result;

pub fn run(args: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::load(args)?;
    let generator = create_generator(&ctx.config.llm)?;

    let started = Instant::now();
    runtime()?.block_on(generator.health_check())?;

    ctx.output.success(&format!(
        "{} model {} answered in {} ms",
        generator.name(),
        generator.model(),
        started.elapsed().as_millis()
    ));
    Ok(())
}
