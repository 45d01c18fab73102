//! Error types for autodep-core

use crate::registry::RemoteInfo;

/// Result type for autodep-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while deciding on, installing, or loading a dependency.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Filesystem layer error
    #[error(transparent)]
    Fs(#[from] autodep_fs::Error),

    /// Registry lookup did not produce a version.
    ///
    /// `code` follows the registry mapping: `404` not found, `500` transport
    /// failure, `-200` unparsable body, anything else is the HTTP status.
    #[error("registry lookup for '{name}' failed with code {code}{}", cause_suffix(.cause))]
    Registry {
        name: String,
        code: i32,
        cause: Option<String>,
    },

    /// Local manifest is missing or cannot be parsed
    #[error("manifest for '{name}' is missing or unreadable")]
    ManifestUnreadable { name: String },

    /// Installer ran but reported failure
    #[error("installing '{name}' failed{}", exit_suffix(.exit_code))]
    InstallFailed { name: String, exit_code: Option<i32> },

    /// Installer program could not be started
    #[error("installer '{program}' could not be started: {reason}")]
    InstallerNotFound { program: String, reason: String },

    /// An operation exceeded its deadline
    #[error("{operation} for '{name}' timed out after {seconds}s")]
    Timeout {
        operation: &'static str,
        name: String,
        seconds: u64,
    },

    /// Installed artifact could not be loaded
    #[error("failed to load '{name}' from {path}: {reason}")]
    LoadFailed {
        name: String,
        path: String,
        reason: String,
    },

    /// Version string is not valid semver
    #[error("invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        source: semver::Error,
    },

    /// Configuration file could not be used
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a registry error from a failed lookup.
    pub fn registry(name: impl Into<String>, info: &RemoteInfo) -> Self {
        let (code, cause) = match info {
            RemoteInfo::Failure { code, cause } => (*code, cause.clone()),
            RemoteInfo::Success { .. } => (200, None),
        };
        Self::Registry {
            name: name.into(),
            code,
            cause,
        }
    }

    /// Registry answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Registry { code: 404, .. })
    }

    /// Registry could not be reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Registry { code: 500, .. })
    }

    /// Any error originating from the registry lookup.
    pub fn is_registry(&self) -> bool {
        matches!(self, Self::Registry { .. })
    }
}

fn cause_suffix(cause: &Option<String>) -> String {
    cause.as_deref().map(|c| format!(": {c}")).unwrap_or_default()
}

fn exit_suffix(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!(" with exit code {code}"),
        None => " (terminated by signal)".to_string(),
    }
}
