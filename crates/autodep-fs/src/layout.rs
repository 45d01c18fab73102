//! Dependency directory layout
//!
//! Every dependency installed under a root lives at
//! `<root>/node_modules/<name>/`, with its manifest sidecar at
//! `<root>/node_modules/<name>/package.json`. Scoped names
//! (`@scope/pkg`) nest one directory deeper.

use crate::{DepPath, Error, NormalizedPath, Result};

/// Resolves dependency paths under a single root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLayout {
    root: NormalizedPath,
}

impl DependencyLayout {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// `<root>/node_modules`
    pub fn modules_dir(&self) -> NormalizedPath {
        self.root.join(DepPath::ModulesDir.as_str())
    }

    /// Directory an installed dependency occupies.
    pub fn module_dir(&self, name: &str) -> Result<NormalizedPath> {
        validate_dependency_name(name)?;
        Ok(self.modules_dir().join(name))
    }

    /// Location of the dependency's manifest sidecar.
    pub fn manifest_path(&self, name: &str) -> Result<NormalizedPath> {
        Ok(self.module_dir(name)?.join(DepPath::ManifestFile.as_str()))
    }
}

/// Reject names that would resolve outside the modules directory.
///
/// Accepts `pkg` and `@scope/pkg`; rejects empty segments, `.`/`..`,
/// backslashes, and any other nesting.
pub fn validate_dependency_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| Error::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains('\\') {
        return Err(invalid("backslashes are not allowed"));
    }

    let segments: Vec<&str> = name.split('/').collect();
    match segments.as_slice() {
        [single] if !single.starts_with('@') => check_segment(single).map_err(invalid),
        [scope, pkg] if scope.starts_with('@') && scope.len() > 1 => {
            check_segment(&scope[1..]).map_err(invalid)?;
            check_segment(pkg).map_err(invalid)
        }
        [single] => Err(invalid(&format!("scope '{single}' has no package name"))),
        _ => Err(invalid("only '<name>' or '@<scope>/<name>' are allowed")),
    }
}

fn check_segment(segment: &str) -> std::result::Result<(), &'static str> {
    if segment.is_empty() {
        return Err("empty path segment");
    }
    if segment == "." || segment == ".." {
        return Err("relative path segments are not allowed");
    }
    if segment.chars().any(|c| c.is_control() || c == ':') {
        return Err("control characters and ':' are not allowed");
    }
    Ok(())
}
