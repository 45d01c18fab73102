//! Lazy dependency acquisition.
//!
//! `autodep-core` decides whether a locally installed dependency is absent,
//! stale, or fresh, runs an external installer when it has to, records an
//! expiry timestamp next to the artifact, and hands back a loaded handle.
//!
//! # Architecture
//!
//! ```text
//!                 AutoDep (orchestrator)
//!                        |
//!     +---------+--------+--------+-----------+
//!     |         |        |        |           |
//! decision  registry  installer  loader   manifest ── autodep-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use autodep_core::{AutoDep, AutoDepConfig, RequestOptions};
//!
//! # async fn run() -> autodep_core::Result<()> {
//! let autodep = AutoDep::new(AutoDepConfig::default())?;
//! let opts = RequestOptions::new().with_ttl(3600);
//! if let Some(artifact) = autodep.acquire("left-pad@1.3.0", &opts).await {
//!     println!("{} {} at {}", artifact.name, artifact.version, artifact.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod autodep;
pub mod clock;
pub mod config;
pub mod decision;
pub mod error;
pub mod installer;
pub mod loader;
pub mod lock;
pub mod logging;
pub mod manifest;
pub mod registry;
pub mod request;
pub mod version;

pub use autodep::AutoDep;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AutoDepConfig, InstallerConfig, LookupFailurePolicy};
pub use decision::{Reason, Verdict};
pub use error::{Error, Result};
pub use installer::{CommandInstaller, InstallSpec, Installer};
pub use loader::{Artifact, ArtifactLoader, ManifestLoader};
pub use lock::{KeyedLocks, LockKey};
pub use manifest::{LocalManifest, ManifestStore};
pub use registry::{HttpRegistryClient, RegistryClient, RemoteInfo};
pub use request::{DependencyRequest, RequestOptions};
