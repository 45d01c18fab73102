//! The acquisition orchestrator.
//!
//! [`AutoDep`] ties the pieces together: it asks the decision engine for a
//! verdict, runs the installer when needed, stamps the manifest's expiry,
//! and loads the artifact. Every operation that can install holds the
//! per-`(name, root)` lock for its whole duration.

use std::sync::Arc;
use std::time::Duration;

use autodep_fs::{DependencyLayout, NormalizedPath};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock, expire_at};
use crate::config::{AutoDepConfig, LookupFailurePolicy};
use crate::decision::{Verdict, decide};
use crate::error::Result;
use crate::installer::{CommandInstaller, InstallSpec, Installer};
use crate::loader::{ArtifactLoader, ManifestLoader};
use crate::lock::{KeyedLocks, LockKey};
use crate::manifest::ManifestStore;
use crate::registry::{HttpRegistryClient, RegistryClient, RemoteInfo, TRANSPORT_FAILURE};
use crate::request::{DependencyRequest, RequestOptions};

/// Lazily installs and loads dependencies.
pub struct AutoDep<L: ArtifactLoader = ManifestLoader> {
    config: AutoDepConfig,
    registry: Arc<dyn RegistryClient>,
    installer: Arc<dyn Installer>,
    loader: L,
    clock: Arc<dyn Clock>,
    manifests: ManifestStore,
    locks: KeyedLocks,
}

impl AutoDep<ManifestLoader> {
    /// Wire up the HTTP registry client, subprocess installer, and
    /// manifest-backed loader from `config`.
    pub fn new(config: AutoDepConfig) -> Result<Self> {
        let registry =
            HttpRegistryClient::with_timeout(Duration::from_secs(config.fetch_timeout_secs))?;
        let installer = CommandInstaller::new(config.installer.clone());
        Ok(Self::with_parts(
            config,
            Arc::new(registry),
            Arc::new(installer),
            ManifestLoader,
        ))
    }
}

impl<L: ArtifactLoader> AutoDep<L> {
    pub fn with_parts(
        config: AutoDepConfig,
        registry: Arc<dyn RegistryClient>,
        installer: Arc<dyn Installer>,
        loader: L,
    ) -> Self {
        Self {
            config,
            registry,
            installer,
            loader,
            clock: Arc::new(SystemClock),
            manifests: ManifestStore::new(),
            locks: KeyedLocks::new(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &AutoDepConfig {
        &self.config
    }

    /// Latest version info straight from the registry. No caching.
    ///
    /// A version pin in `name` is ignored; the lookup is always for the
    /// bare name.
    pub async fn get_latest_info(&self, name: &str, registry: Option<&str>) -> RemoteInfo {
        let request = DependencyRequest::parse(name);
        let registry = registry.unwrap_or(&self.config.registry);
        let timeout = Duration::from_secs(self.config.fetch_timeout_secs);
        self.fetch(&request.name, registry, timeout).await
    }

    /// Stamp `__expire = now + ttl` on an installed dependency.
    ///
    /// Returns `false` without writing when the manifest is missing or
    /// unreadable.
    pub async fn set_expiry(&self, name: &str, opts: &RequestOptions) -> bool {
        let request = DependencyRequest::parse(name);
        let root = self.config.root_for(opts);
        let _guard = self.locks.lock(LockKey::new(&request.name, &root)).await;
        self.write_expiry(&request.name, &root, self.config.ttl_for(opts))
    }

    /// Run the installer for `name` (`name@pin` installs that version).
    ///
    /// Leaves the manifest's expiry alone.
    pub async fn install(&self, name: &str, opts: &RequestOptions) -> Result<()> {
        let request = DependencyRequest::parse(name);
        let root = self.config.root_for(opts);
        let _guard = self.locks.lock(LockKey::new(&request.name, &root)).await;
        self.run_installer(&request, &root, opts).await
    }

    /// Install, stamp the expiry, then load. `None` if install or load fails.
    pub async fn install_and_load(&self, name: &str, opts: &RequestOptions) -> Option<L::Handle> {
        let request = DependencyRequest::parse(name);
        let root = self.config.root_for(opts);
        let _guard = self.locks.lock(LockKey::new(&request.name, &root)).await;
        self.install_then_load(&request, &root, opts).await
    }

    /// Whether `name` needs (re)installing, without changing anything.
    pub async fn check_status(&self, name: &str, opts: &RequestOptions) -> Result<Verdict> {
        let request = DependencyRequest::parse(name);
        let root = self.config.root_for(opts);
        self.status(&request, &root, opts).await
    }

    /// Make sure `name` is installed and fresh, then load it.
    ///
    /// Never fails loudly: every failure is logged and reported as `None`.
    pub async fn acquire(&self, name: &str, opts: &RequestOptions) -> Option<L::Handle> {
        let request = DependencyRequest::parse(name);
        let root = self.config.root_for(opts);
        let _guard = self.locks.lock(LockKey::new(&request.name, &root)).await;

        let should_install = match self.status(&request, &root, opts).await {
            Ok(verdict) => {
                info!(name = %request.name, reason = %verdict.reason, "{}", verdict.message);
                verdict.should_install
            }
            Err(e) if e.is_registry() => {
                let policy = self.config.lookup_failure;
                warn!(
                    name = %request.name,
                    error = %e,
                    ?policy,
                    "freshness could not be confirmed"
                );
                match policy {
                    LookupFailurePolicy::Install => true,
                    LookupFailurePolicy::ServeStale => false,
                    LookupFailurePolicy::Fail => return None,
                }
            }
            Err(e) => {
                warn!(name = %request.name, error = %e, "status check failed");
                return None;
            }
        };

        if should_install {
            self.install_then_load(&request, &root, opts).await
        } else {
            self.load(&request.name, &root)
        }
    }

    async fn status(
        &self,
        request: &DependencyRequest,
        root: &NormalizedPath,
        opts: &RequestOptions,
    ) -> Result<Verdict> {
        let path = self.manifests.path_for(&request.name, root)?;
        let manifest = self.manifests.read(&path);
        let registry = self.config.registry_for(opts);
        let timeout = self.config.fetch_timeout_for(opts);

        decide(request, manifest.as_ref(), self.clock.now_millis(), || {
            self.fetch(&request.name, registry, timeout)
        })
        .await
    }

    async fn fetch(&self, name: &str, registry: &str, timeout: Duration) -> RemoteInfo {
        match tokio::time::timeout(timeout, self.registry.fetch_latest(name, registry)).await {
            Ok(info) => info,
            Err(_) => RemoteInfo::failure(
                TRANSPORT_FAILURE,
                Some(format!("timed out after {}s", timeout.as_secs())),
            ),
        }
    }

    async fn run_installer(
        &self,
        request: &DependencyRequest,
        root: &NormalizedPath,
        opts: &RequestOptions,
    ) -> Result<()> {
        DependencyLayout::new(root.clone()).module_dir(&request.name)?;
        let spec = InstallSpec {
            request: request.clone(),
            root: root.clone(),
            registry: self.config.registry_for(opts).to_string(),
            extra: opts.install_options.clone(),
            timeout: self.config.install_timeout_for(opts),
        };
        info!(spec = %request, root = %root, "installing");
        self.installer.install(&spec).await
    }

    async fn install_then_load(
        &self,
        request: &DependencyRequest,
        root: &NormalizedPath,
        opts: &RequestOptions,
    ) -> Option<L::Handle> {
        if let Err(e) = self.run_installer(request, root, opts).await {
            warn!(spec = %request, error = %e, "install failed");
            return None;
        }
        if !self.write_expiry(&request.name, root, self.config.ttl_for(opts)) {
            warn!(name = %request.name, "installed, but expiry could not be recorded");
        }
        self.load(&request.name, root)
    }

    fn write_expiry(&self, name: &str, root: &NormalizedPath, ttl_seconds: u64) -> bool {
        let path = match self.manifests.path_for(name, root) {
            Ok(path) => path,
            Err(e) => {
                warn!(name, error = %e, "cannot set expiry");
                return false;
            }
        };
        let Some(mut manifest) = self.manifests.read(&path) else {
            debug!(name, path = %path, "no manifest to stamp");
            return false;
        };

        let expire = expire_at(self.clock.now_millis(), ttl_seconds);
        manifest.expire = Some(expire);
        let written = self.manifests.write(&path, &manifest);
        if written {
            info!(name, expire, "set expire time");
        }
        written
    }

    fn load(&self, name: &str, root: &NormalizedPath) -> Option<L::Handle> {
        let dir = match DependencyLayout::new(root.clone()).module_dir(name) {
            Ok(dir) => dir,
            Err(e) => {
                warn!(name, error = %e, "cannot load");
                return None;
            }
        };
        match self.loader.load(name, &dir) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(name, error = %e, "load failed");
                None
            }
        }
    }
}
