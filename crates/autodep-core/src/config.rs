//! Runtime configuration.
//!
//! Built once at process start (defaults, optionally overlaid by a TOML
//! file) and handed to [`AutoDep`](crate::AutoDep). Every default the
//! orchestrator needs lives here rather than in module-level statics.
//!
//! ```toml
//! root = "/srv/app"
//! registry = "https://registry.npmjs.org"
//! ttl_seconds = 86400
//! lookup_failure = "install"
//!
//! [installer]
//! program = "npminstall"
//! args = []
//! inherit_stdio = true
//! ```

use std::time::Duration;

use autodep_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::request::RequestOptions;

pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org";
pub const DEFAULT_TTL_SECONDS: u64 = 86_400;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_INSTALL_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_INSTALLER: &str = "npminstall";

/// What `acquire` does when an expired, unpinned dependency cannot be
/// checked against the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LookupFailurePolicy {
    /// Treat freshness as unconfirmed and reinstall.
    #[default]
    Install,
    /// Keep using the installed copy.
    ServeStale,
    /// Give up and report no artifact.
    Fail,
}

/// How the external installer is launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Program to execute.
    pub program: String,
    /// Arguments placed before the dependency spec.
    pub args: Vec<String>,
    /// Stream installer output to this process's stdout/stderr.
    pub inherit_stdio: bool,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_INSTALLER.to_string(),
            args: Vec::new(),
            inherit_stdio: true,
        }
    }
}

/// Process-wide defaults for every operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoDepConfig {
    pub root: NormalizedPath,
    pub registry: String,
    pub ttl_seconds: u64,
    pub fetch_timeout_secs: u64,
    pub install_timeout_secs: u64,
    pub lookup_failure: LookupFailurePolicy,
    pub installer: InstallerConfig,
}

impl Default for AutoDepConfig {
    fn default() -> Self {
        let root = std::env::current_dir()
            .map(NormalizedPath::new)
            .unwrap_or_else(|_| NormalizedPath::new("."));
        Self {
            root,
            registry: DEFAULT_REGISTRY.to_string(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            install_timeout_secs: DEFAULT_INSTALL_TIMEOUT_SECS,
            lookup_failure: LookupFailurePolicy::default(),
            installer: InstallerConfig::default(),
        }
    }
}

impl AutoDepConfig {
    /// Load a TOML (or JSON) config file; absent keys keep their defaults.
    pub fn load(path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = path.into();
        let config: Self = ConfigStore::new().load(&path)?;
        config.validate()?;
        tracing::debug!(path = %path, "loaded configuration");
        Ok(config)
    }

    pub fn with_root(mut self, root: impl Into<NormalizedPath>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = registry.into();
        self
    }

    pub fn with_installer(mut self, installer: InstallerConfig) -> Self {
        self.installer = installer;
        self
    }

    pub fn with_lookup_failure(mut self, policy: LookupFailurePolicy) -> Self {
        self.lookup_failure = policy;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.registry.trim().is_empty() {
            return Err(Error::Config {
                message: "registry must not be empty".to_string(),
            });
        }
        if self.installer.program.trim().is_empty() {
            return Err(Error::Config {
                message: "installer.program must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn root_for(&self, opts: &RequestOptions) -> NormalizedPath {
        opts.root.clone().unwrap_or_else(|| self.root.clone())
    }

    pub fn registry_for<'a>(&'a self, opts: &'a RequestOptions) -> &'a str {
        opts.registry.as_deref().unwrap_or(&self.registry)
    }

    pub fn ttl_for(&self, opts: &RequestOptions) -> u64 {
        opts.ttl_seconds.unwrap_or(self.ttl_seconds)
    }

    pub fn fetch_timeout_for(&self, opts: &RequestOptions) -> Duration {
        opts.timeout
            .unwrap_or(Duration::from_secs(self.fetch_timeout_secs))
    }

    pub fn install_timeout_for(&self, opts: &RequestOptions) -> Duration {
        opts.timeout
            .unwrap_or(Duration::from_secs(self.install_timeout_secs))
    }
}
