//! Generation lock: at most one build in flight.
//!
//! A lock file under the state dir holds the RFC3339 acquisition time.
//! Contenders that find a fresh lock skip their build entirely (no
//! queueing). Locks older than the TTL are considered left over from a
//! crashed build and are broken.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::log;

/// Auto-expiry for a held lock.
pub const LOCK_TTL: Duration = Duration::from_secs(300);

const LOCK_FILE: &str = "generation.lock";

/// Mutual-exclusion flag for the build pipeline.
pub struct GenerationLock {
    path: PathBuf,
}

/// RAII guard; releases the lock on drop.
pub struct LockGuard<'a> {
    lock: &'a GenerationLock,
}

impl GenerationLock {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join(LOCK_FILE),
        }
    }

    /// Try to acquire the lock.
    ///
    /// Returns `Ok(None)` when another build holds a fresh lock. A stale
    /// lock (older than [`LOCK_TTL`]) is broken and re-acquired.
    pub fn try_acquire(&self, now: DateTime<Utc>) -> io::Result<Option<LockGuard<'_>>> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.is_held(now) {
            return Ok(None);
        }

        if self.path.exists() {
            log!("build"; "breaking stale generation lock");
            fs::remove_file(&self.path).ok();
        }

        // create_new loses the race to a concurrent acquirer
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => {
                use std::io::Write;
                writeln!(file, "{}", now.to_rfc3339())?;
                Ok(Some(LockGuard { lock: self }))
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Is a fresh lock currently held?
    fn is_held(&self, now: DateTime<Utc>) -> bool {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return false;
        };

        match DateTime::parse_from_rfc3339(content.trim()) {
            Ok(acquired) => {
                let age = now - acquired.with_timezone(&Utc);
                // A future-dated lock (clock skew between contenders)
                // counts as held, not stale.
                match age.to_std() {
                    Ok(age) => age < LOCK_TTL,
                    Err(_) => true,
                }
            }
            // Unparsable lock content: treat as stale
            Err(_) => false,
        }
    }

    fn release(&self) {
        fs::remove_file(&self.path).ok();
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-08-28T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_acquire_and_release() {
        let tmp = TempDir::new().unwrap();
        let lock = GenerationLock::new(tmp.path());

        let guard = lock.try_acquire(now()).unwrap();
        assert!(guard.is_some());

        drop(guard);
        assert!(lock.try_acquire(now()).unwrap().is_some());
    }

    #[test]
    fn test_second_acquire_is_refused() {
        let tmp = TempDir::new().unwrap();
        let lock = GenerationLock::new(tmp.path());
        let other = GenerationLock::new(tmp.path());

        let _guard = lock.try_acquire(now()).unwrap().unwrap();
        assert!(other.try_acquire(now()).unwrap().is_none());
    }

    #[test]
    fn test_stale_lock_is_broken() {
        let tmp = TempDir::new().unwrap();
        let lock = GenerationLock::new(tmp.path());

        let _guard = lock.try_acquire(now()).unwrap().unwrap();
        std::mem::forget(_guard); // simulate a crashed build

        // Within TTL: still held
        let later = now() + ChronoDuration::seconds(60);
        assert!(lock.try_acquire(later).unwrap().is_none());

        // Past TTL: broken and re-acquired
        let much_later = now() + ChronoDuration::seconds(301);
        assert!(lock.try_acquire(much_later).unwrap().is_some());
    }

    #[test]
    fn test_future_dated_lock_is_held() {
        // A contender with a slower clock must not break a lock whose
        // timestamp is ahead of its own notion of now.
        let tmp = TempDir::new().unwrap();
        let lock = GenerationLock::new(tmp.path());

        let ahead = now() + ChronoDuration::seconds(120);
        fs::write(tmp.path().join(LOCK_FILE), ahead.to_rfc3339()).unwrap();

        assert!(lock.try_acquire(now()).unwrap().is_none());
    }

    #[test]
    fn test_garbage_lock_content_is_stale() {
        let tmp = TempDir::new().unwrap();
        let lock = GenerationLock::new(tmp.path());
        fs::write(tmp.path().join(LOCK_FILE), "not a timestamp").unwrap();

        assert!(lock.try_acquire(now()).unwrap().is_some());
    }
}
