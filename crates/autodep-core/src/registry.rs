//! Registry lookups of the latest published version.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::config::DEFAULT_FETCH_TIMEOUT_SECS;
use crate::error::{Error, Result};

/// Code reported when the registry could not be reached at all.
pub const TRANSPORT_FAILURE: i32 = 500;
/// Code reported when a 200 response body was not a usable version document.
pub const PARSE_FAILURE: i32 = -200;

/// Outcome of a single latest-version lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteInfo {
    Success {
        version: String,
        /// The full document the registry returned.
        data: Value,
    },
    Failure {
        /// `404`, `500` (transport), `-200` (bad body) or the HTTP status.
        code: i32,
        cause: Option<String>,
    },
}

impl RemoteInfo {
    pub fn failure(code: i32, cause: Option<String>) -> Self {
        Self::Failure { code, cause }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Status code in the registry mapping (`200` for success).
    pub fn code(&self) -> i32 {
        match self {
            Self::Success { .. } => 200,
            Self::Failure { code, .. } => *code,
        }
    }

    pub fn version(&self) -> Option<&str> {
        match self {
            Self::Success { version, .. } => Some(version),
            Self::Failure { .. } => None,
        }
    }

    /// Convert into the remote version, or a typed registry error.
    pub fn into_version(self, name: &str) -> Result<String> {
        match self {
            Self::Success { version, .. } => Ok(version),
            failure => Err(Error::registry(name, &failure)),
        }
    }

    /// Interpret a 200 response body.
    pub fn from_body(body: &str) -> Self {
        let parsed: Value = match serde_json::from_str(body) {
            Ok(value) => value,
            Err(e) => return Self::failure(PARSE_FAILURE, Some(e.to_string())),
        };
        match parsed.get("version").and_then(Value::as_str) {
            Some(version) => Self::Success {
                version: version.to_string(),
                data: parsed,
            },
            None => Self::failure(PARSE_FAILURE, Some("missing 'version' field".to_string())),
        }
    }
}

/// Source of latest-version information.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Look up the latest version of `name`. Exactly one attempt.
    async fn fetch_latest(&self, name: &str, registry: &str) -> RemoteInfo;
}

/// Build `{registry}/{name}/latest`, encoding `name` as one path segment.
pub fn registry_url_for(name: &str, registry: &str) -> std::result::Result<reqwest::Url, String> {
    let mut url = reqwest::Url::parse(registry)
        .map_err(|e| format!("invalid registry URL '{registry}': {e}"))?;
    url.path_segments_mut()
        .map_err(|_| format!("registry URL '{registry}' cannot carry a path"))?
        .pop_if_empty()
        .push(name)
        .push("latest");
    Ok(url)
}

/// [`RegistryClient`] speaking the npm registry HTTP protocol.
#[derive(Clone)]
pub struct HttpRegistryClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl std::fmt::Debug for HttpRegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistryClient")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HttpRegistryClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("autodep/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl RegistryClient for HttpRegistryClient {
    async fn fetch_latest(&self, name: &str, registry: &str) -> RemoteInfo {
        let url = match registry_url_for(name, registry) {
            Ok(url) => url,
            Err(cause) => return RemoteInfo::failure(TRANSPORT_FAILURE, Some(cause)),
        };
        debug!(%url, "fetching latest version info");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return RemoteInfo::failure(TRANSPORT_FAILURE, Some(e.to_string())),
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            debug!(%status, name, "registry returned non-200");
            return RemoteInfo::failure(i32::from(status.as_u16()), None);
        }

        match response.text().await {
            Ok(body) => RemoteInfo::from_body(&body),
            Err(e) => RemoteInfo::failure(TRANSPORT_FAILURE, Some(e.to_string())),
        }
    }
}
