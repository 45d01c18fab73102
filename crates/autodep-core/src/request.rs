//! Parsing of dependency requests and their per-call options.

use std::collections::BTreeMap;
use std::time::Duration;

use autodep_fs::NormalizedPath;

/// Per-call overrides of the configured defaults.
///
/// Every field left as `None` falls back to [`AutoDepConfig`](crate::AutoDepConfig).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Directory whose `node_modules` holds the dependency.
    pub root: Option<NormalizedPath>,
    /// Freshness window written into the manifest after install.
    pub ttl_seconds: Option<u64>,
    /// Registry base URL.
    pub registry: Option<String>,
    /// Extra installer flags, passed as `--key=value`.
    pub install_options: BTreeMap<String, String>,
    /// Deadline for each registry fetch and installer run.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = Some(ttl_seconds);
        self
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    pub fn with_install_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.install_options.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A dependency name split into its bare name and optional version pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequest {
    pub name: String,
    pub version_pin: Option<String>,
}

impl DependencyRequest {
    /// Split `name@version` on the last `@`.
    ///
    /// An `@` at index 0 marks a scope, not a version, so `@scope/pkg`
    /// stays whole while `@scope/pkg@1.2.0` splits. An empty pin
    /// (`alpha@`) counts as no pin.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        match spec.rfind('@') {
            Some(idx) if idx > 0 => {
                let pin = &spec[idx + 1..];
                Self {
                    name: spec[..idx].to_string(),
                    version_pin: (!pin.is_empty()).then(|| pin.to_string()),
                }
            }
            _ => Self {
                name: spec.to_string(),
                version_pin: None,
            },
        }
    }

    /// The positional argument handed to the installer.
    pub fn spec(&self) -> String {
        match &self.version_pin {
            Some(pin) => format!("{}@{}", self.name, pin),
            None => self.name.clone(),
        }
    }
}

impl std::fmt::Display for DependencyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.spec())
    }
}
