//! Fixed path segments of an installed dependency tree.

use std::path::Path;

/// Well-known names inside a dependency root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepPath {
    /// The container directory holding every installed dependency
    ModulesDir,
    /// The metadata sidecar written by the installer
    ManifestFile,
}

impl DepPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ModulesDir => "node_modules",
            Self::ManifestFile => "package.json",
        }
    }
}

impl AsRef<Path> for DepPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for DepPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for DepPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
