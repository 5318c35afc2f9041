//! Content watcher: rebuild the sitemap when articles change.
//!
//! Change bursts (bulk imports, editorial sweeps) are coalesced: the
//! rebuild fires once the configured debounce window has passed without
//! further events.

use std::path::Path;
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver};
use notify::{RecursiveMode, Watcher};

use super::lifecycle;
use crate::build::{BuildOutcome, run_build};
use crate::config::NewsConfig;
use crate::{debug, log};

/// Receiver poll granularity while idle.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Pure debouncer: tracks pending changes and their timing, no file
/// system or build access.
struct Debouncer {
    pending: bool,
    last_event: Option<Instant>,
    debounce: Duration,
}

impl Debouncer {
    fn new(debounce: Duration) -> Self {
        Self {
            pending: false,
            last_event: None,
            debounce,
        }
    }

    /// Record a relevant content change.
    fn mark(&mut self) {
        self.pending = true;
        self.last_event = Some(Instant::now());
    }

    /// Consume the pending flag once the debounce window has elapsed.
    fn take_if_ready(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        let ready = self
            .last_event
            .is_none_or(|t| t.elapsed() >= self.debounce);
        if ready {
            self.pending = false;
            self.last_event = None;
        }
        ready
    }
}

/// Does this notify event touch an article file?
fn is_relevant(event: &notify::Event) -> bool {
    use notify::EventKind;

    match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => {}
        EventKind::Modify(modify) => {
            // Metadata-only changes (mtime/chmod noise) cause rebuild loops
            if matches!(modify, notify::event::ModifyKind::Metadata(_)) {
                return false;
            }
        }
        _ => return false,
    }

    event.paths.iter().any(|p| is_article_file(p))
}

fn is_article_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    !name.starts_with('.') && path.extension().is_some_and(|e| e == "toml")
}

/// Run the watch loop until shutdown. Blocks the calling thread.
pub fn watch_content(config: &NewsConfig, shutdown_rx: Receiver<()>) {
    let (event_tx, event_rx) = channel::unbounded::<notify::Event>();

    let mut watcher = match notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = event_tx.send(event);
        }
    }) {
        Ok(w) => w,
        Err(e) => {
            log!("watch"; "failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config.build.content, RecursiveMode::Recursive) {
        log!("watch"; "cannot watch {}: {}", config.build.content.display(), e);
        return;
    }

    log!("watch"; "watching {}", config.build.content.display());

    let debounce = Duration::from_secs(config.serve.debounce_secs);
    let mut debouncer = Debouncer::new(debounce);

    loop {
        match event_rx.recv_timeout(POLL_INTERVAL) {
            Ok(event) => {
                if is_relevant(&event) {
                    debug!("watch"; "change: {:?} {:?}", event.kind, event.paths);
                    debouncer.mark();
                }
            }
            Err(channel::RecvTimeoutError::Timeout) => {}
            Err(channel::RecvTimeoutError::Disconnected) => break,
        }

        if lifecycle::is_shutdown() || shutdown_rx.try_recv().is_ok() {
            break;
        }

        if debouncer.take_if_ready() {
            rebuild(config);
        }
    }

    debug!("watch"; "watcher stopped");
}

fn rebuild(config: &NewsConfig) {
    match run_build(config) {
        Ok(BuildOutcome::Published { entries }) => {
            log!("watch"; "sitemap regenerated ({} entries)", entries);
        }
        Ok(BuildOutcome::Skipped) => {
            debug!("watch"; "rebuild skipped, generation in progress");
        }
        Err(e) => {
            log!("watch"; "rebuild failed: {}", e);
        }
    }
}
