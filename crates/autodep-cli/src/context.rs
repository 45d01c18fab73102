//! Builds the orchestrator from global flags.

use autodep_core::installer::check_binary_on_path;
use autodep_core::{AutoDep, AutoDepConfig, RequestOptions};
use autodep_fs::NormalizedPath;

use crate::cli::Cli;
use crate::error::Result;

/// Everything a command needs to run.
pub struct Context {
    pub autodep: AutoDep,
    pub json: bool,
}

impl Context {
    /// Config file first, then `--root` / `--registry` on top.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => AutoDepConfig::load(NormalizedPath::new(path))?,
            None => AutoDepConfig::default(),
        };
        if let Some(root) = &cli.root {
            config = config.with_root(NormalizedPath::new(root));
        }
        if let Some(registry) = &cli.registry {
            config = config.with_registry(registry.clone());
        }
        if cli.json {
            // stdout carries the JSON document only
            config.installer.inherit_stdio = false;
        }
        tracing::debug!(
            root = %config.root,
            registry = %config.registry,
            "effective configuration"
        );
        match check_binary_on_path(&config.installer.program) {
            Ok(path) => tracing::debug!(path = %path.display(), "installer resolved"),
            Err(e) => tracing::debug!(error = %e, "installer not resolvable; installs will fail"),
        }

        Ok(Self {
            autodep: AutoDep::new(config)?,
            json: cli.json,
        })
    }
}

/// Per-call options from subcommand flags.
pub fn request_options(ttl: Option<u64>, options: &[(String, String)]) -> RequestOptions {
    let mut opts = RequestOptions::new();
    if let Some(ttl) = ttl {
        opts = opts.with_ttl(ttl);
    }
    for (key, value) in options {
        opts = opts.with_install_option(key.clone(), value.clone());
    }
    opts
}
