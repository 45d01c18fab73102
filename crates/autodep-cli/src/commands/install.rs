//! Install command implementation

use colored::Colorize;
use serde_json::json;

use crate::context::{Context, request_options};
use crate::error::Result;

/// Run the installer for `name`. The expiry stamp is left alone.
pub async fn run_install(ctx: &Context, name: &str, options: &[(String, String)]) -> Result<()> {
    ctx.autodep.install(name, &request_options(None, options)).await?;

    if ctx.json {
        println!("{}", json!({ "installed": name }));
    } else {
        println!("{} {}", "Installed".green().bold(), name.cyan());
    }
    Ok(())
}
