//! Status command implementation

use autodep_core::RequestOptions;
use colored::Colorize;

use crate::context::Context;
use crate::error::Result;

/// Print the freshness verdict for `name` without changing anything.
pub async fn run_status(ctx: &Context, name: &str) -> Result<()> {
    let verdict = ctx.autodep.check_status(name, &RequestOptions::new()).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
        return Ok(());
    }

    let action = if verdict.should_install {
        "install".yellow()
    } else {
        "up to date".green()
    };
    println!("{}: {} ({})", verdict.name.cyan(), action, verdict.reason);
    println!("  {}", verdict.message.dimmed());
    if let Some(latest) = &verdict.latest {
        println!("  {}: {}", "Latest".dimmed(), latest);
    }
    Ok(())
}
