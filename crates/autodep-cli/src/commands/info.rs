//! Info command implementation

use autodep_core::RemoteInfo;
use colored::Colorize;
use serde_json::json;

use crate::context::Context;
use crate::error::Result;

/// Print the registry's latest version of `name`.
pub async fn run_info(ctx: &Context, name: &str) -> Result<()> {
    let info = ctx.autodep.get_latest_info(name, None).await;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&to_json(&info))?);
    } else if let RemoteInfo::Success { version, .. } = &info {
        println!("{} {}", name.cyan(), version.green());
    }

    info.into_version(name)?;
    Ok(())
}

fn to_json(info: &RemoteInfo) -> serde_json::Value {
    match info {
        RemoteInfo::Success { version, data } => json!({
            "success": true,
            "version": version,
            "data": data,
        }),
        RemoteInfo::Failure { code, cause } => json!({
            "success": false,
            "code": code,
            "cause": cause,
        }),
    }
}

