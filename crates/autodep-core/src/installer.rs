//! External installer invocation.
//!
//! The installer is an out-of-process tool (by default `npminstall`) called
//! as:
//!
//! ```text
//! <program> [configured args...] <name[@pin]> --root=<dir> --registry=<url> [--key=value...]
//! ```
//!
//! It is expected to populate `<root>/node_modules/<name>` including the
//! manifest. Its exit status decides success; output is either streamed to
//! the terminal or captured and logged.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use autodep_fs::NormalizedPath;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::InstallerConfig;
use crate::error::{Error, Result};
use crate::request::DependencyRequest;

/// Everything the installer needs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSpec {
    pub request: DependencyRequest,
    pub root: NormalizedPath,
    pub registry: String,
    /// Flattened into `--key=value` flags, in key order.
    pub extra: BTreeMap<String, String>,
    pub timeout: Duration,
}

impl InstallSpec {
    /// Argument list following the configured leading arguments.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(3 + self.extra.len());
        args.push(self.request.spec());
        args.push(format!("--root={}", self.root));
        args.push(format!("--registry={}", self.registry));
        args.extend(flatten_options(&self.extra));
        args
    }
}

/// `{a: b, c: d}` -> `["--a=b", "--c=d"]`
pub fn flatten_options(options: &BTreeMap<String, String>) -> Vec<String> {
    options
        .iter()
        .map(|(key, value)| format!("--{key}={value}"))
        .collect()
}

/// Performs installs.
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, spec: &InstallSpec) -> Result<()>;
}

/// [`Installer`] that spawns a subprocess.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    config: InstallerConfig,
}

impl CommandInstaller {
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    pub fn program(&self) -> &str {
        &self.config.program
    }

    fn command(&self, spec: &InstallSpec) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.args)
            .args(spec.args())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if self.config.inherit_stdio {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        } else {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
        cmd
    }
}

#[async_trait]
impl Installer for CommandInstaller {
    async fn install(&self, spec: &InstallSpec) -> Result<()> {
        let name = spec.request.name.clone();
        let mut cmd = self.command(spec);
        info!(program = %self.config.program, args = ?spec.args(), "running installer");

        let spawn_error = |e: std::io::Error| Error::InstallerNotFound {
            program: self.config.program.clone(),
            reason: e.to_string(),
        };

        // Dropping the child future on timeout kills the process.
        let status = if self.config.inherit_stdio {
            let run = async { cmd.spawn().map_err(spawn_error)?.wait().await.map_err(Error::Io) };
            with_deadline(run, spec.timeout, &name).await?
        } else {
            let run = async { cmd.output().await.map_err(spawn_error) };
            let output = with_deadline(run, spec.timeout, &name).await?;
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                name = %name,
                stdout = %stdout.trim(),
                stderr = %stderr.trim(),
                "installer output"
            );
            output.status
        };

        if !status.success() {
            warn!(name = %name, code = ?status.code(), "installer exited unsuccessfully");
            return Err(Error::InstallFailed {
                name,
                exit_code: status.code(),
            });
        }

        Ok(())
    }
}

async fn with_deadline<T>(
    run: impl std::future::Future<Output = Result<T>>,
    timeout: Duration,
    name: &str,
) -> Result<T> {
    tokio::time::timeout(timeout, run)
        .await
        .map_err(|_| Error::Timeout {
            operation: "install",
            name: name.to_string(),
            seconds: timeout.as_secs(),
        })?
}

/// Resolve the installer program the way spawning it would.
///
/// A name with a directory part must be an existing file. A bare name is
/// searched on `PATH`; on Windows the npm `.cmd` shims and executables are
/// tried as well.
pub fn check_binary_on_path(tool: &str) -> Result<PathBuf> {
    let not_found = |reason: &str| Error::InstallerNotFound {
        program: tool.to_string(),
        reason: reason.to_string(),
    };

    if Path::new(tool).components().count() > 1 {
        let explicit = PathBuf::from(tool);
        return if explicit.is_file() {
            Ok(explicit)
        } else {
            Err(not_found("no such file"))
        };
    }

    let search = std::env::var_os("PATH").ok_or_else(|| not_found("PATH is not set"))?;
    std::env::split_paths(&search)
        .flat_map(|dir| candidate_names(tool).map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| not_found("not found on PATH"))
}

fn candidate_names(tool: &str) -> impl Iterator<Item = String> + '_ {
    const WINDOWS_SUFFIXES: [&str; 3] = [".cmd", ".exe", ".bat"];
    let suffixes: &[&str] = if cfg!(windows) { &WINDOWS_SUFFIXES } else { &[] };
    std::iter::once(tool.to_string()).chain(suffixes.iter().map(move |s| format!("{tool}{s}")))
}
