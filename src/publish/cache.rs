//! In-process cache of the published document.
//!
//! Single-slot cache with a short TTL: the publisher stores the freshly
//! rendered bytes after each atomic rename, the server reads cache-first
//! and repopulates from disk on miss. Readers never block on a build.

use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// How long a cached document stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

struct CachedDocument {
    bytes: Arc<Vec<u8>>,
    stored_at: Instant,
}

/// Single-slot TTL cache for the sitemap bytes.
pub struct DocumentCache {
    slot: Mutex<Option<CachedDocument>>,
    ttl: Duration,
}

/// Global cache shared by publisher and server.
pub static DOCUMENT_CACHE: LazyLock<DocumentCache> =
    LazyLock::new(|| DocumentCache::with_ttl(CACHE_TTL));

impl DocumentCache {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Store freshly published bytes.
    pub fn store(&self, bytes: Vec<u8>) {
        *self.slot.lock() = Some(CachedDocument {
            bytes: Arc::new(bytes),
            stored_at: Instant::now(),
        });
    }

    /// Get the cached document if still fresh.
    pub fn get(&self) -> Option<Arc<Vec<u8>>> {
        let slot = self.slot.lock();
        let cached = slot.as_ref()?;
        if cached.stored_at.elapsed() < self.ttl {
            Some(Arc::clone(&cached.bytes))
        } else {
            None
        }
    }

    /// Drop the cached document.
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get() {
        let cache = DocumentCache::with_ttl(Duration::from_secs(60));
        assert!(cache.get().is_none());

        cache.store(b"<urlset/>".to_vec());
        assert_eq!(cache.get().unwrap().as_slice(), b"<urlset/>");
    }

    #[test]
    fn test_expiry() {
        let cache = DocumentCache::with_ttl(Duration::ZERO);
        cache.store(b"<urlset/>".to_vec());
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_invalidate() {
        let cache = DocumentCache::with_ttl(Duration::from_secs(60));
        cache.store(b"<urlset/>".to_vec());
        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn test_store_replaces() {
        let cache = DocumentCache::with_ttl(Duration::from_secs(60));
        cache.store(b"old".to_vec());
        cache.store(b"new".to_vec());
        assert_eq!(cache.get().unwrap().as_slice(), b"new");
    }
}
