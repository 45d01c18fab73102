//! Freshness decisions.
//!
//! Given what was asked for and what is on disk, decide whether the
//! installer has to run. Rules, first match wins:
//!
//! 1. no manifest: install ([`Reason::NotInstalled`]), registry untouched
//! 2. pinned: install iff installed < pin ([`Reason::PinStale`] /
//!    [`Reason::PinSatisfied`]); expiry is ignored
//! 3. unpinned and `now <= __expire`: keep ([`Reason::NotExpired`])
//! 4. unpinned and expired (or never stamped): ask the registry once;
//!    install iff installed < latest ([`Reason::ExpiredStale`] /
//!    [`Reason::ExpiredButLatest`]). A failed lookup is an error.

use std::future::Future;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::manifest::LocalManifest;
use crate::registry::RemoteInfo;
use crate::request::DependencyRequest;
use crate::version;

/// Why a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reason {
    NotInstalled,
    PinSatisfied,
    PinStale,
    NotExpired,
    ExpiredStale,
    ExpiredButLatest,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInstalled => "NOT_INSTALLED",
            Self::PinSatisfied => "PIN_SATISFIED",
            Self::PinStale => "PIN_STALE",
            Self::NotExpired => "NOT_EXPIRED",
            Self::ExpiredStale => "EXPIRED_STALE",
            Self::ExpiredButLatest => "EXPIRED_BUT_LATEST",
        }
    }

    pub fn should_install(&self) -> bool {
        matches!(self, Self::NotInstalled | Self::PinStale | Self::ExpiredStale)
    }

    fn describe(&self, spec: &str) -> String {
        match self {
            Self::NotInstalled => format!("{spec} is not installed, installing now"),
            Self::PinStale => format!("{spec} is installed at a lower version, installing now"),
            Self::PinSatisfied => {
                format!("{spec} is installed at the same or a higher version, using it")
            }
            Self::NotExpired => format!("{spec} has not expired, using the installed copy"),
            Self::ExpiredStale => {
                format!("{spec} has expired and a newer version exists, installing now")
            }
            Self::ExpiredButLatest => {
                format!("{spec} has expired but is already the latest version, using it")
            }
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a freshness check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Bare dependency name (pin stripped), for path derivation.
    pub name: String,
    pub should_install: bool,
    pub reason: Reason,
    /// Human-readable justification.
    pub message: String,
    /// Registry's latest version, when it was consulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
}

impl Verdict {
    fn new(request: &DependencyRequest, reason: Reason, latest: Option<String>) -> Self {
        Self {
            name: request.name.clone(),
            should_install: reason.should_install(),
            reason,
            message: reason.describe(&request.spec()),
            latest,
        }
    }
}

/// Decide whether `request` needs an install.
///
/// `fetch` is only polled in rule 4 and at most once.
pub async fn decide<F, Fut>(
    request: &DependencyRequest,
    manifest: Option<&LocalManifest>,
    now_millis: i64,
    fetch: F,
) -> Result<Verdict>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = RemoteInfo>,
{
    let Some(local) = manifest else {
        return Ok(Verdict::new(request, Reason::NotInstalled, None));
    };

    if let Some(pin) = &request.version_pin {
        let reason = if version::is_older(&local.version, pin)? {
            Reason::PinStale
        } else {
            Reason::PinSatisfied
        };
        debug!(
            name = %request.name,
            installed = %local.version,
            pin = %pin,
            %reason,
            "pinned check"
        );
        return Ok(Verdict::new(request, reason, None));
    }

    if local.is_fresh_at(now_millis) {
        debug!(name = %request.name, expire = ?local.expire, now = now_millis, "within ttl");
        return Ok(Verdict::new(request, Reason::NotExpired, None));
    }

    let remote = fetch().await.into_version(&request.name)?;

    let reason = if version::is_older(&local.version, &remote)? {
        Reason::ExpiredStale
    } else {
        Reason::ExpiredButLatest
    };
    debug!(
        name = %request.name,
        installed = %local.version,
        latest = %remote,
        %reason,
        "expired check"
    );
    Ok(Verdict::new(request, reason, Some(remote)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::Value;
    use std::cell::Cell;

    const NOW: i64 = 1_700_000_000_000;

    fn success(version: &str) -> RemoteInfo {
        RemoteInfo::Success {
            version: version.to_string(),
            data: Value::Null,
        }
    }

    async fn run(
        spec: &str,
        manifest: Option<LocalManifest>,
        remote: RemoteInfo,
    ) -> (Result<Verdict>, usize) {
        let calls = Cell::new(0);
        let request = DependencyRequest::parse(spec);
        let verdict = decide(&request, manifest.as_ref(), NOW, || {
            calls.set(calls.get() + 1);
            async move { remote }
        })
        .await;
        (verdict, calls.get())
    }

    #[tokio::test]
    async fn test_not_installed_skips_registry() {
        let (verdict, calls) = run("alpha", None, success("9.9.9")).await;
        let verdict = verdict.unwrap();

        assert_eq!(verdict.reason, Reason::NotInstalled);
        assert!(verdict.should_install);
        assert_eq!(verdict.name, "alpha");
        assert_eq!(calls, 0);
    }

    #[rstest]
    #[case("1.0.0", "2.0.0", Reason::PinStale)]
    #[case("2.0.0", "2.0.0", Reason::PinSatisfied)]
    #[case("3.0.0", "2.0.0", Reason::PinSatisfied)]
    #[case("2.0.0-rc.1", "2.0.0", Reason::PinStale)]
    #[tokio::test]
    async fn test_pinned(#[case] installed: &str, #[case] pin: &str, #[case] expected: Reason) {
        // Expired stamp proves the pin path ignores expiry.
        let manifest = LocalManifest::new("alpha", installed).with_expire(NOW - 1);
        let (verdict, calls) = run(&format!("alpha@{pin}"), Some(manifest), success("9.0.0")).await;
        let verdict = verdict.unwrap();

        assert_eq!(verdict.reason, expected);
        assert_eq!(verdict.should_install, expected == Reason::PinStale);
        assert_eq!(calls, 0);
    }

    #[tokio::test]
    async fn test_not_expired_skips_registry() {
        let manifest = LocalManifest::new("alpha", "1.0.0").with_expire(NOW);
        let (verdict, calls) = run("alpha", Some(manifest), success("2.0.0")).await;

        assert_eq!(verdict.unwrap().reason, Reason::NotExpired);
        assert_eq!(calls, 0);
    }

    #[rstest]
    #[case(Some(NOW - 1), "1.0.0", "1.0.0", Reason::ExpiredButLatest)]
    #[case(Some(NOW - 1), "1.0.0", "1.1.0", Reason::ExpiredStale)]
    #[case(None, "1.0.0", "1.1.0", Reason::ExpiredStale)]
    #[case(None, "2.0.0", "1.1.0", Reason::ExpiredButLatest)]
    #[tokio::test]
    async fn test_expired_consults_registry_once(
        #[case] expire: Option<i64>,
        #[case] installed: &str,
        #[case] latest: &str,
        #[case] expected: Reason,
    ) {
        let mut manifest = LocalManifest::new("alpha", installed);
        manifest.expire = expire;
        let (verdict, calls) = run("alpha", Some(manifest), success(latest)).await;
        let verdict = verdict.unwrap();

        assert_eq!(verdict.reason, expected);
        assert_eq!(verdict.latest.as_deref(), Some(latest));
        assert_eq!(verdict.should_install, expected == Reason::ExpiredStale);
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_error() {
        let manifest = LocalManifest::new("alpha", "1.0.0");
        let remote = RemoteInfo::failure(500, Some("ENOTFOUND".into()));
        let (verdict, calls) = run("alpha", Some(manifest), remote).await;

        let err = verdict.unwrap_err();
        assert!(err.is_transport(), "got: {err:?}");
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn test_malformed_installed_version_is_error() {
        let manifest = LocalManifest::new("alpha", "banana");
        let (verdict, _) = run("alpha@1.0.0", Some(manifest), success("1.0.0")).await;

        assert!(matches!(verdict, Err(Error::InvalidVersion { .. })));
    }

    #[test]
    fn test_message_names_request() {
        let request = DependencyRequest::parse("alpha@2.0.0");
        let verdict = Verdict::new(&request, Reason::PinStale, None);
        assert_eq!(verdict.message, "alpha@2.0.0 is installed at a lower version, installing now");
        assert_eq!(verdict.name, "alpha");
    }

    #[test]
    fn test_reason_serializes_upper_snake() {
        let json = serde_json::to_string(&Reason::ExpiredButLatest).unwrap();
        assert_eq!(json, "\"EXPIRED_BUT_LATEST\"");
    }
}
