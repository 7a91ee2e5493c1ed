//! Registry of child processes that are still running.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::{debug, info};

/// A spawned child that has not exited yet.
#[derive(Debug, Clone)]
pub struct LiveProcess {
    pub pid: Option<u32>,
    pub command: String,
    pub dir: PathBuf,
}

struct Inner {
    entries: DashMap<u64, LiveProcess>,
    next_id: AtomicU64,
    terminate: watch::Sender<bool>,
}

/// Every child spawned during one invocation, shared by all runner clones.
///
/// Termination is requested once for the whole set: each running execution
/// watches the request and kills its own child, and no new child is spawned
/// afterwards.
#[derive(Clone)]
pub struct LiveProcesses {
    inner: Arc<Inner>,
}

impl LiveProcesses {
    pub fn new() -> Self {
        let (terminate, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                entries: DashMap::new(),
                next_id: AtomicU64::new(0),
                terminate,
            }),
        }
    }

    /// Adds a child to the set. The entry is removed when the returned guard
    /// is dropped.
    pub fn register(&self, command: &str, dir: &Path, pid: Option<u32>) -> Registration {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.entries.insert(
            id,
            LiveProcess {
                pid,
                command: command.to_string(),
                dir: dir.to_path_buf(),
            },
        );
        debug!(id, ?pid, command, "registered child process");
        Registration {
            id,
            processes: self.clone(),
        }
    }

    /// Signals every live child to terminate and refuses further spawns.
    pub fn terminate_all(&self) {
        let alive = self.inner.entries.len();
        if !self.inner.terminate.send_replace(true) {
            info!(alive, "terminating child processes");
        }
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        *self.inner.terminate.borrow()
    }

    /// Completes once termination has been requested.
    pub async fn terminated(&self) {
        let mut rx = self.inner.terminate.subscribe();
        if rx.wait_for(|requested| *requested).await.is_err() {
            std::future::pending::<()>().await;
        }
    }

    pub fn snapshot(&self) -> Vec<LiveProcess> {
        self.inner
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}

impl Default for LiveProcesses {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps a child listed in its `LiveProcesses` set while alive.
pub struct Registration {
    id: u64,
    processes: LiveProcesses,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.processes.inner.entries.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_is_removed_on_drop() {
        let live = LiveProcesses::new();
        let guard = live.register("sleep 1", Path::new("/tmp"), Some(42));
        assert_eq!(live.len(), 1);
        assert_eq!(live.snapshot()[0].pid, Some(42));
        drop(guard);
        assert!(live.is_empty());
    }

    #[tokio::test]
    async fn test_terminated_resolves_after_request() {
        let live = LiveProcesses::new();
        assert!(!live.is_terminated());
        let waiter = {
            let live = live.clone();
            tokio::spawn(async move { live.terminated().await })
        };
        live.terminate_all();
        waiter.await.unwrap();
        assert!(live.is_terminated());
    }
}
