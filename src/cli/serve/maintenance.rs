//! Daily maintenance for serve mode.
//!
//! Runs regardless of whether content watching is enabled: the
//! generation-log retention window must be enforced even on a server
//! that only ever serves.

use std::time::{Duration, Instant};

use super::lifecycle;
use crate::config::NewsConfig;
use crate::genlog::GenerationLog;
use crate::{debug, log};

/// How often the retention cleanup runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Shutdown poll granularity.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Run the maintenance loop until shutdown. Blocks the calling thread.
///
/// One cleanup runs at startup (a server restarted after a long gap
/// should not wait a day to enforce retention), then once per day.
pub fn run_maintenance(config: &NewsConfig) {
    cleanup_genlog(config);
    let mut last_cleanup = Instant::now();

    loop {
        std::thread::sleep(POLL_INTERVAL);
        if lifecycle::is_shutdown() {
            break;
        }
        if last_cleanup.elapsed() >= CLEANUP_INTERVAL {
            last_cleanup = Instant::now();
            cleanup_genlog(config);
        }
    }

    debug!("serve"; "maintenance stopped");
}

/// Drop generation-log entries older than the retention window and
/// persist the result. Returns the number of removed entries.
pub fn cleanup_genlog(config: &NewsConfig) -> usize {
    let mut genlog = GenerationLog::open(&config.state_dir());
    let removed = genlog.cleanup(chrono::Utc::now());
    if removed > 0 {
        if let Err(e) = genlog.save() {
            log!("serve"; "failed to save generation log: {}", e);
        } else {
            debug!("serve"; "dropped {} old log entries", removed);
        }
    }
    removed
}
