//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// autodep - Install npm dependencies on first use and keep them fresh
#[derive(Parser, Debug)]
#[command(name = "autodep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding node_modules (defaults to the current directory)
    #[arg(long, global = true, env = "AUTODEP_ROOT")]
    pub root: Option<String>,

    /// Registry base URL
    #[arg(long, global = true, env = "AUTODEP_REGISTRY")]
    pub registry: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Show the latest published version of a package
    ///
    /// Examples:
    ///   autodep info react
    ///   autodep info @types/node --json
    Info {
        /// Package name (a version pin is ignored)
        name: String,
    },

    /// Report whether a package needs (re)installing
    ///
    /// Never installs anything. The registry is only consulted when the
    /// installed copy is unpinned and its expiry has passed.
    Status {
        /// Package name, optionally pinned: name@version
        name: String,
    },

    /// Run the installer for a package
    ///
    /// Examples:
    ///   autodep install lodash
    ///   autodep install lodash@4.17.21 -o production=true
    Install {
        /// Package name, optionally pinned: name@version
        name: String,

        /// Extra installer flag, passed as --key=value
        #[arg(short = 'o', long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,
    },

    /// Mark an installed package fresh for the next TTL seconds
    Expire {
        /// Package name
        name: String,

        /// Freshness window in seconds
        #[arg(long)]
        ttl: Option<u64>,
    },

    /// Install if needed, then load the package
    Acquire {
        /// Package name, optionally pinned: name@version
        name: String,

        /// Freshness window in seconds
        #[arg(long)]
        ttl: Option<u64>,

        /// Extra installer flag, passed as --key=value
        #[arg(short = 'o', long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
