//! Per-project mutual exclusion
//!
//! Two merges on the same working copy would race on its index and
//! branches, so each project gets its own lock. Merges for different
//! projects run concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Held for the duration of one merge; dropping it releases the project
pub type ProjectGuard = OwnedMutexGuard<()>;

/// Registry mapping project name to its lock
#[derive(Debug, Default)]
pub struct ProjectLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ProjectLocks {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&self, project: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(project.to_string()).or_default())
    }

    /// Wait for exclusive access to a project
    pub async fn acquire(&self, project: &str) -> ProjectGuard {
        self.handle(project).lock_owned().await
    }

    /// Take the project's lock if nobody holds it
    pub fn try_acquire(&self, project: &str) -> Option<ProjectGuard> {
        self.handle(project).try_lock_owned().ok()
    }

    /// Number of projects that have been locked at least once
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no project has been locked yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
