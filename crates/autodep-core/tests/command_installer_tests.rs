//! Acquisition through a real subprocess installer.

#![cfg(unix)]

use autodep_core::{AutoDep, AutoDepConfig, InstallerConfig, RequestOptions};
use autodep_fs::{NormalizedPath, io};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// $1 is the dependency spec, $2 is --root=<dir>.
const FAKE_NPMINSTALL: &str = r#"
name="$1"
root="${2#--root=}"
mkdir -p "$root/node_modules/$name"
printf '{"name":"%s","version":"3.1.4","main":"lib/index.js"}' "$name" > "$root/node_modules/$name/package.json"
"#;

fn shell_installer(script: &str) -> InstallerConfig {
    InstallerConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string(), "npminstall".to_string()],
        inherit_stdio: false,
    }
}

#[tokio::test]
async fn test_acquire_with_subprocess_installer() {
    let temp = TempDir::new().unwrap();
    let root = NormalizedPath::new(temp.path());
    let config = AutoDepConfig::default()
        .with_root(root.clone())
        .with_installer(shell_installer(FAKE_NPMINSTALL));
    let autodep = AutoDep::new(config).unwrap();

    let artifact = autodep
        .acquire("alpha", &RequestOptions::new())
        .await
        .expect("installed artifact");

    assert_eq!(artifact.version, "3.1.4");
    assert_eq!(
        artifact.entry_point(),
        Some(root.join("node_modules/alpha/lib/index.js"))
    );
    let manifest: serde_json::Value =
        io::read_json(&root.join("node_modules/alpha/package.json")).unwrap();
    assert!(manifest["__expire"].as_i64().is_some());
}

#[tokio::test]
async fn test_failing_subprocess_installer_yields_none() {
    let temp = TempDir::new().unwrap();
    let config = AutoDepConfig::default()
        .with_root(NormalizedPath::new(temp.path()))
        .with_installer(shell_installer("echo boom >&2; exit 1"));
    let autodep = AutoDep::new(config).unwrap();

    assert!(autodep.acquire("alpha", &RequestOptions::new()).await.is_none());
    assert!(!temp.path().join("node_modules/alpha").exists());
}
