//! Per-file write exclusion
//!
//! Two layers guard the backup + rewrite span of a write:
//! - an in-process mutex per data file, kept in a `DashMap` registry that can
//!   be shared between store instances
//! - an advisory `flock` on a sidecar `<file>.lock`, so separate processes
//!   writing the same file also queue up
//!
//! The sidecar is locked instead of the data file itself because the data
//! file is replaced by rename on every write.

use crate::types::RecordError;
use dashmap::DashMap;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Registry of in-process locks, one per data file
#[derive(Debug, Default)]
pub struct FileLockRegistry {
    locks: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl FileLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mutex guarding `path`, created on first use
    pub fn lock_for(&self, path: &Path) -> Arc<Mutex<()>> {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.locks.entry(key).or_default().clone()
    }

    /// Run `f` while holding both the in-process and the cross-process lock
    ///
    /// # Errors
    ///
    /// Returns `RecordError::Io` if the sidecar lock file cannot be opened or
    /// locked; `f` is not run in that case. Errors from `f` pass through.
    pub fn with_exclusive<T, F>(&self, path: &Path, f: F) -> Result<T, RecordError>
    where
        F: FnOnce() -> Result<T, RecordError>,
    {
        let mutex = self.lock_for(path);
        // A panic in another writer leaves nothing half-done on disk, so a
        // poisoned mutex is still safe to take.
        let _guard = mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let _file_lock = SidecarLock::acquire(&lock_path(path))?;
        f()
    }
}

/// Path of the sidecar lock file for a data file
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

struct SidecarLock {
    file: File,
}

impl SidecarLock {
    fn acquire(path: &Path) -> Result<Self, RecordError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| RecordError::io(&format!("open lock file {}", path.display()), e))?;
        file.lock_exclusive()
            .map_err(|e| RecordError::io(&format!("lock {}", path.display()), e))?;
        debug!(lock = %path.display(), "write lock acquired");
        Ok(Self { file })
    }
}

impl Drop for SidecarLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
