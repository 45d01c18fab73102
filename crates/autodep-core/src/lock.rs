//! Per-dependency mutual exclusion.
//!
//! Two tasks acquiring the same dependency under the same root must not run
//! the installer concurrently against one target directory. Each
//! `(name, root)` pair gets its own async mutex; holders of different keys
//! never wait on each other.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use autodep_fs::NormalizedPath;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Identity of an installed dependency.
///
/// The root is stored resolved, so `/srv/app`, `/srv/app/.` and a relative
/// spelling of the same directory share one lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockKey {
    pub name: String,
    pub root: NormalizedPath,
}

impl LockKey {
    pub fn new(name: impl Into<String>, root: &NormalizedPath) -> Self {
        Self {
            name: name.into(),
            root: root.resolved(),
        }
    }
}

/// Map of lazily created per-key locks.
#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<LockKey, Arc<AsyncMutex<()>>>>,
}

/// Held for the duration of a decide-install-persist sequence.
#[derive(Debug)]
pub struct KeyGuard {
    _guard: OwnedMutexGuard<()>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`.
    pub async fn lock(&self, key: LockKey) -> KeyGuard {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Only the map holds these, so nobody is waiting on them.
            locks.retain(|k, m| k == &key || Arc::strong_count(m) > 1);
            Arc::clone(locks.entry(key).or_default())
        };
        KeyGuard {
            _guard: mutex.lock_owned().await,
        }
    }

    /// Number of keys currently tracked.
    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

}
