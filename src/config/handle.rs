//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads: the serve loop and the watcher
//! thread each take an immutable snapshot per operation, so a build sees
//! one consistent configuration end-to-end.

use crate::config::NewsConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
static CONFIG: LazyLock<ArcSwap<NewsConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(NewsConfig::default()));

/// Snapshot of the current configuration.
#[inline]
pub fn cfg() -> Arc<NewsConfig> {
    CONFIG.load_full()
}

/// Install the loaded configuration as the global snapshot.
#[inline]
pub fn init_config(config: NewsConfig) -> Arc<NewsConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
