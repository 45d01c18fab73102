//! Acquire and expire command implementations

use colored::Colorize;
use serde_json::json;

use crate::context::{Context, request_options};
use crate::error::{CliError, Result};

/// Install `name` if needed, then load it and print where it lives.
pub async fn run_acquire(
    ctx: &Context,
    name: &str,
    ttl: Option<u64>,
    options: &[(String, String)],
) -> Result<()> {
    let artifact = ctx
        .autodep
        .acquire(name, &request_options(ttl, options))
        .await
        .ok_or_else(|| {
            CliError::user(format!("could not acquire '{name}' (run with -v for details)"))
        })?;

    if ctx.json {
        let doc = json!({
            "name": artifact.name,
            "version": artifact.version,
            "path": artifact.path.as_str(),
            "main": artifact.entry_point().map(|p| p.as_str().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("{}@{}", artifact.name.cyan(), artifact.version.green());
        println!("  {}: {}", "Path".dimmed(), artifact.path);
        if let Some(main) = artifact.entry_point() {
            println!("  {}: {}", "Main".dimmed(), main);
        }
    }
    Ok(())
}

/// Stamp a new expiry on an installed package.
pub async fn run_expire(ctx: &Context, name: &str, ttl: Option<u64>) -> Result<()> {
    if !ctx.autodep.set_expiry(name, &request_options(ttl, &[])).await {
        return Err(autodep_core::Error::ManifestUnreadable {
            name: name.to_string(),
        }
        .into());
    }

    if ctx.json {
        println!("{}", json!({ "expired": name }));
    } else {
        println!("{} {}", "Refreshed expiry for".green(), name.cyan());
    }
    Ok(())
}
