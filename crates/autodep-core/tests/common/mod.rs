//! Shared fakes for orchestrator tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use autodep_core::{
    AutoDep, AutoDepConfig, Error, FixedClock, InstallSpec, Installer, ManifestLoader,
    RegistryClient, RemoteInfo, Result,
};
use autodep_fs::{NormalizedPath, io};
use serde_json::json;
use tempfile::TempDir;

pub const NOW: i64 = 1_700_000_000_000;
pub const DAY_MS: i64 = 86_400_000;

/// Registry answering every lookup with one scripted response.
pub struct FakeRegistry {
    response: Mutex<RemoteInfo>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, String)>>,
}

impl FakeRegistry {
    pub fn latest(version: &str) -> Arc<Self> {
        Self::answering(RemoteInfo::Success {
            version: version.to_string(),
            data: json!({ "version": version }),
        })
    }

    pub fn answering(response: RemoteInfo) -> Arc<Self> {
        Arc::new(Self {
            response: Mutex::new(response),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    async fn fetch_latest(&self, name: &str, registry: &str) -> RemoteInfo {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((name.to_string(), registry.to_string()));
        self.response.lock().unwrap().clone()
    }
}

/// Installer that writes a manifest the way a real one would.
pub struct FakeInstaller {
    /// Version written when the spec carries no pin.
    pub default_version: String,
    pub fail_with: Option<i32>,
    pub delay: Duration,
    calls: AtomicUsize,
    specs: Mutex<Vec<InstallSpec>>,
}

impl FakeInstaller {
    pub fn writing(default_version: &str) -> Arc<Self> {
        Arc::new(Self {
            default_version: default_version.to_string(),
            fail_with: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            specs: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(exit_code: i32) -> Arc<Self> {
        Arc::new(Self {
            default_version: "0.0.0".to_string(),
            fail_with: Some(exit_code),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            specs: Mutex::new(Vec::new()),
        })
    }

    pub fn slow(default_version: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            default_version: default_version.to_string(),
            fail_with: None,
            delay,
            calls: AtomicUsize::new(0),
            specs: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn specs(&self) -> Vec<InstallSpec> {
        self.specs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Installer for FakeInstaller {
    async fn install(&self, spec: &InstallSpec) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.specs.lock().unwrap().push(spec.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(code) = self.fail_with {
            return Err(Error::InstallFailed {
                name: spec.request.name.clone(),
                exit_code: Some(code),
            });
        }
        let version = spec
            .request
            .version_pin
            .clone()
            .unwrap_or_else(|| self.default_version.clone());
        write_manifest(&spec.root, &spec.request.name, json!({ "version": version }));
        Ok(())
    }
}

/// Write `<root>/node_modules/<name>/package.json`, merging `fields` over
/// `{"name": name}`.
pub fn write_manifest(root: &NormalizedPath, name: &str, fields: serde_json::Value) {
    let mut doc = json!({ "name": name });
    if let (Some(doc), Some(fields)) = (doc.as_object_mut(), fields.as_object()) {
        for (k, v) in fields {
            doc.insert(k.clone(), v.clone());
        }
    }
    let path = root.join(&format!("node_modules/{name}/package.json"));
    io::write_json(&path, &doc).unwrap();
}

pub fn read_manifest(root: &NormalizedPath, name: &str) -> serde_json::Value {
    io::read_json(&root.join(&format!("node_modules/{name}/package.json"))).unwrap()
}

/// Everything a test needs: a temp root, the fakes, and a fixed clock.
pub struct Harness {
    pub temp: TempDir,
    pub root: NormalizedPath,
    pub registry: Arc<FakeRegistry>,
    pub installer: Arc<FakeInstaller>,
    pub clock: Arc<FixedClock>,
    pub autodep: AutoDep<ManifestLoader>,
}

impl Harness {
    pub fn new(registry: Arc<FakeRegistry>, installer: Arc<FakeInstaller>) -> Self {
        Self::with_config(registry, installer, |c| c)
    }

    pub fn with_config(
        registry: Arc<FakeRegistry>,
        installer: Arc<FakeInstaller>,
        configure: impl FnOnce(AutoDepConfig) -> AutoDepConfig,
    ) -> Self {
        let temp = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp.path());
        let clock = Arc::new(FixedClock::new(NOW));
        let config = configure(
            AutoDepConfig::default()
                .with_root(root.clone())
                .with_registry("https://registry.test"),
        );
        let autodep = AutoDep::with_parts(
            config,
            registry.clone(),
            installer.clone(),
            ManifestLoader,
        )
        .with_clock(clock.clone());

        Self {
            temp,
            root,
            registry,
            installer,
            clock,
            autodep,
        }
    }
}
