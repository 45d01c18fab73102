//! Turning an installed dependency directory into a usable handle.

use autodep_fs::{DepPath, NormalizedPath, io};

use crate::error::{Error, Result};
use crate::manifest::LocalManifest;

/// Produces a handle for an installed artifact.
///
/// Implementations decide what "loading" means for the host (reading an
/// entry point, mapping a library, registering a plugin). Errors are never
/// propagated to `acquire` callers; they become `None` and a log line.
pub trait ArtifactLoader: Send + Sync {
    type Handle: Send;

    fn load(&self, name: &str, dir: &NormalizedPath) -> Result<Self::Handle>;
}

/// Default handle: where the artifact lives and what it claims to be.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub version: String,
    pub path: NormalizedPath,
    pub manifest: LocalManifest,
}

impl Artifact {
    /// Entry point declared by the manifest's `main` field, if any.
    pub fn entry_point(&self) -> Option<NormalizedPath> {
        self.manifest
            .other
            .get("main")
            .and_then(serde_json::Value::as_str)
            .map(|main| self.path.join(main.trim_start_matches("./")))
    }
}

/// Loads an [`Artifact`] by re-reading the installed manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestLoader;

impl ArtifactLoader for ManifestLoader {
    type Handle = Artifact;

    fn load(&self, name: &str, dir: &NormalizedPath) -> Result<Artifact> {
        let fail = |reason: String| Error::LoadFailed {
            name: name.to_string(),
            path: dir.to_string(),
            reason,
        };

        if !dir.is_dir() {
            return Err(fail("directory does not exist".to_string()));
        }

        let manifest: LocalManifest = io::read_json(&dir.join(DepPath::ManifestFile.as_str()))
            .map_err(|e| fail(e.to_string()))?;

        if manifest.name != name {
            return Err(fail(format!("manifest names '{}'", manifest.name)));
        }

        Ok(Artifact {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            path: dir.clone(),
            manifest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn install_fake(temp: &TempDir, doc: serde_json::Value) -> NormalizedPath {
        let dir = NormalizedPath::new(temp.path()).join("node_modules/alpha");
        io::write_json(&dir.join("package.json"), &doc).unwrap();
        dir
    }

    #[test]
    fn test_load_installed() {
        let temp = TempDir::new().unwrap();
        let dir = install_fake(
            &temp,
            json!({"name": "alpha", "version": "1.2.0", "main": "./lib/index.js"}),
        );

        let artifact = ManifestLoader.load("alpha", &dir).unwrap();

        assert_eq!(artifact.version, "1.2.0");
        assert_eq!(artifact.path, dir);
        assert_eq!(artifact.entry_point().unwrap(), dir.join("lib/index.js"));
    }

    #[test]
    fn test_load_missing_dir_fails() {
        let temp = TempDir::new().unwrap();
        let dir = NormalizedPath::new(temp.path()).join("node_modules/ghost");

        let err = ManifestLoader.load("ghost", &dir).unwrap_err();
        assert!(matches!(err, Error::LoadFailed { .. }), "got: {err:?}");
    }

    #[test]
    fn test_load_name_mismatch_fails() {
        let temp = TempDir::new().unwrap();
        let dir = install_fake(&temp, json!({"name": "beta", "version": "1.0.0"}));

        assert!(ManifestLoader.load("alpha", &dir).is_err());
    }
}
