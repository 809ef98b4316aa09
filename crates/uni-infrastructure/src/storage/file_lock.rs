//! Cross-process exclusive lock on a sibling `.lock` file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use fs2::FileExt;

/// Holds an exclusive lock until dropped.
pub(crate) struct FileLock {
    file: File,
}

impl FileLock {
    /// Blocks until the lock for `path` (`<path>.lock`) is acquired.
    pub(crate) fn acquire(path: &Path) -> io::Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // The lock file itself stays; removing it would race with waiters.
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("[FileLock] Failed to release lock: {}", e);
        }
    }
}
