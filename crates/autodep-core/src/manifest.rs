//! Per-dependency manifest sidecar.
//!
//! The installer writes `package.json` into the dependency directory; this
//! module reads it to learn the installed version and rewrites only the
//! `__expire` field. Every other field is carried through untouched.

use autodep_fs::{DependencyLayout, NormalizedPath, io};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Field name of the expiry timestamp (epoch milliseconds).
pub const EXPIRE_FIELD: &str = "__expire";

/// The subset of the installed manifest the freshness logic reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalManifest {
    pub name: String,
    pub version: String,
    #[serde(rename = "__expire", default, skip_serializing_if = "Option::is_none")]
    pub expire: Option<i64>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl LocalManifest {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            expire: None,
            other: Map::new(),
        }
    }

    pub fn with_expire(mut self, expire: i64) -> Self {
        self.expire = Some(expire);
        self
    }

    /// Whether the recorded expiry has not yet passed at `now`.
    ///
    /// A manifest without `__expire` counts as expired.
    pub fn is_fresh_at(&self, now_millis: i64) -> bool {
        self.expire.is_some_and(|expire| now_millis <= expire)
    }
}

/// Reads and writes manifests beneath a dependency root.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestStore;

impl ManifestStore {
    pub fn new() -> Self {
        Self
    }

    /// Manifest location for `name` under `root`.
    pub fn path_for(
        &self,
        name: &str,
        root: &NormalizedPath,
    ) -> autodep_fs::Result<NormalizedPath> {
        DependencyLayout::new(root.clone()).manifest_path(name)
    }

    /// Read a manifest, treating a missing or corrupt file as absent.
    pub fn read(&self, path: &NormalizedPath) -> Option<LocalManifest> {
        match io::read_json::<LocalManifest>(path) {
            Ok(manifest) => Some(manifest),
            Err(e) if e.is_not_found() => {
                debug!(path = %path, "no manifest");
                None
            }
            Err(e) => {
                warn!(path = %path, error = %e, "ignoring unreadable manifest");
                None
            }
        }
    }

    /// Replace the manifest on disk. Returns `false` on any failure.
    pub fn write(&self, path: &NormalizedPath, manifest: &LocalManifest) -> bool {
        match io::write_json(path, manifest) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path, error = %e, "failed to write manifest");
                false
            }
        }
    }
}
