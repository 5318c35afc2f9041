//! Publishing: atomic write, cache handling, downstream notifications.
//!
//! The rendered document is written next to its final path and renamed
//! into place, so readers only ever see a complete file. After the
//! rename the in-process cache is refreshed, enabled purge providers
//! and ping services are notified best-effort, and the generation log
//! records the build.

mod cache;
mod ping;
mod purge;

pub use cache::{CACHE_TTL, DOCUMENT_CACHE, DocumentCache};
pub use ping::{USER_AGENT, ping_all};
pub use purge::{CachePurger, CloudflarePurger, HttpPurger, PurgeError, enabled_purgers};

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::NewsConfig;
use crate::genlog::{GenerationLog, GenerationLogEntry, write_last_update};
use crate::log;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to write sitemap to {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Atomically publish the rendered document and notify downstreams.
pub fn publish(
    config: &NewsConfig,
    xml: String,
    entry_count: usize,
    duration: Duration,
    now: DateTime<Utc>,
) -> Result<(), PublishError> {
    let final_path = config.sitemap_path();
    write_atomic(&final_path, xml.as_bytes())?;

    DOCUMENT_CACHE.store(xml.into_bytes());

    purge_downstream(config);
    record_generation(config, entry_count, duration, now);

    log!(
        "build";
        "published {} ({} article{})",
        final_path.display(),
        entry_count,
        if entry_count == 1 { "" } else { "s" }
    );
    Ok(())
}

/// Write bytes beside the target and rename into place.
fn write_atomic(final_path: &PathBuf, bytes: &[u8]) -> Result<(), PublishError> {
    let io_err = |source| PublishError::WriteFailed {
        path: final_path.clone(),
        source,
    };

    if let Some(parent) = final_path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = final_path.with_extension("xml.tmp");
    fs::write(&tmp, bytes).map_err(io_err)?;
    fs::rename(&tmp, final_path).map_err(io_err)
}

/// Run every enabled purge provider. Failures are logged, never raised.
fn purge_downstream(config: &NewsConfig) {
    let sitemap_url = config.sitemap_url();
    for purger in enabled_purgers(config) {
        match purger.purge(&sitemap_url) {
            Ok(()) => log!("purge"; "{} cache purged", purger.name()),
            Err(e) => log!("purge"; "{} purge failed: {}", purger.name(), e),
        }
    }
}

/// Append this build to the generation log and stamp last-update.
fn record_generation(
    config: &NewsConfig,
    entry_count: usize,
    duration: Duration,
    now: DateTime<Utc>,
) {
    let state_dir = config.state_dir();
    let mut genlog = GenerationLog::open(&state_dir);
    genlog.append(GenerationLogEntry {
        timestamp: now,
        message: "sitemap generated".into(),
        article_count: entry_count,
        duration_ms: duration.as_millis() as u64,
    });
    if let Err(e) = genlog.save() {
        log!("warning"; "failed to save generation log: {}", e);
    }
    write_last_update(&state_dir, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn test_config(root: &std::path::Path) -> NewsConfig {
        let mut config = crate::config::test_parse_config(
            "[site]\nname = \"Test\"\nurl = \"https://example.com\"",
        );
        config.root = root.to_path_buf();
        config.build.output = root.join("public");
        config
    }

    const XML: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset></urlset>\n";

    #[test]
    fn test_publish_writes_final_file() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());

        publish(
            &config,
            XML.to_string(),
            2,
            Duration::from_millis(5),
            at("2026-08-28T12:00:00Z"),
        )
        .unwrap();

        let published = fs::read_to_string(config.sitemap_path()).unwrap();
        assert_eq!(published, XML);
        // No temp file left behind
        assert!(!config.sitemap_path().with_extension("xml.tmp").exists());
    }

    #[test]
    fn test_publish_records_generation() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());

        publish(
            &config,
            XML.to_string(),
            3,
            Duration::from_millis(7),
            at("2026-08-28T12:00:00Z"),
        )
        .unwrap();

        let genlog = GenerationLog::open(&config.state_dir());
        assert_eq!(genlog.len(), 1);
        let entry = genlog.entries().next().unwrap();
        assert_eq!(entry.article_count, 3);
        assert_eq!(entry.duration_ms, 7);

        assert_eq!(
            crate::genlog::read_last_update(&config.state_dir()).unwrap(),
            at("2026-08-28T12:00:00Z")
        );
    }

    #[test]
    fn test_write_failure_keeps_previous_document() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());

        publish(
            &config,
            XML.to_string(),
            1,
            Duration::ZERO,
            at("2026-08-28T12:00:00Z"),
        )
        .unwrap();

        // A directory squatting on the temp path makes the next write fail
        // before the rename can happen.
        fs::create_dir_all(config.sitemap_path().with_extension("xml.tmp")).unwrap();

        let err = publish(
            &config,
            "<?xml version=\"1.0\"?>\n<urlset><url/></urlset>\n".to_string(),
            1,
            Duration::ZERO,
            at("2026-08-28T13:00:00Z"),
        )
        .unwrap_err();

        assert!(matches!(err, PublishError::WriteFailed { .. }));
        // The previously published document stays live, byte for byte.
        assert_eq!(fs::read_to_string(config.sitemap_path()).unwrap(), XML);
    }

    #[test]
    fn test_publish_replaces_previous_document() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());

        fs::create_dir_all(&config.build.output).unwrap();
        fs::write(config.sitemap_path(), "old").unwrap();

        publish(
            &config,
            XML.to_string(),
            0,
            Duration::ZERO,
            at("2026-08-28T12:00:00Z"),
        )
        .unwrap();

        assert_eq!(fs::read_to_string(config.sitemap_path()).unwrap(), XML);
    }
}
