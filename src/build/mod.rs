//! The sitemap build pipeline.
//!
//! One build is one pass: acquire the generation lock, fetch candidates
//! from the content store, filter exclusions, score priorities, render
//! and validate the document, publish atomically. A contended lock is a
//! skip, not an error.

mod exclude;
mod lock;
mod priority;
mod sitemap;

pub use exclude::{ExcludePredicate, ExclusionFilter};
pub use lock::{GenerationLock, LOCK_TTL};
pub use priority::{format_priority, score};
pub use sitemap::{Sitemap, SitemapEntry, validate_xml};

use std::time::Instant;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::config::NewsConfig;
use crate::log;
use crate::publish::{PublishError, ping_all, publish};
use crate::source::{CandidateFilter, ContentSource, FsStore, SourceError};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("generation lock error")]
    Lock(#[source] std::io::Error),

    #[error("rendered document failed validation")]
    InvalidDocument(#[source] anyhow::Error),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// What a build pass did.
#[derive(Debug, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Document rendered and published.
    Published { entries: usize },
    /// Another build held the generation lock; nothing was done.
    Skipped,
}

/// Run one build pass against the configured content directory.
pub fn run_build(config: &NewsConfig) -> Result<BuildOutcome, BuildError> {
    let store = FsStore::new(&config.build.content);
    run_build_with(config, &store, Utc::now())
}

/// Build pass with an explicit store and clock.
pub fn run_build_with(
    config: &NewsConfig,
    store: &dyn ContentSource,
    now: DateTime<Utc>,
) -> Result<BuildOutcome, BuildError> {
    let lock = GenerationLock::new(&config.state_dir());
    let Some(_guard) = lock.try_acquire(now).map_err(BuildError::Lock)? else {
        log!("build"; "generation already in progress, skipping");
        return Ok(BuildOutcome::Skipped);
    };

    let started = Instant::now();

    let filter = CandidateFilter::from_config(config, now);
    let candidates = store.fetch_candidates(&filter)?;

    let sitemap = Sitemap::build(&candidates, &ExclusionFilter::new(), config, now);
    let entries = sitemap.entry_count();

    let xml = sitemap.into_xml();
    validate_xml(&xml).map_err(BuildError::InvalidDocument)?;

    publish(config, xml, entries, started.elapsed(), now)?;
    ping_all(config, &config.sitemap_url());

    Ok(BuildOutcome::Published { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Article;
    use std::fs;
    use tempfile::TempDir;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    const NOW: &str = "2026-08-28T12:00:00Z";

    /// Test double that deliberately ignores `max_count` so the
    /// renderer's own cap is exercised.
    struct FixedStore {
        articles: Vec<Article>,
    }

    impl ContentSource for FixedStore {
        fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Article>, SourceError> {
            Ok(self
                .articles
                .iter()
                .filter(|a| filter.matches_category(a))
                .filter(|a| filter.since.is_none_or(|s| a.modified >= s))
                .cloned()
                .collect())
        }

        fn fetch_engagement_count(&self, id: &str) -> Result<u32, SourceError> {
            self.articles
                .iter()
                .find(|a| a.id == id)
                .map(|a| a.engagement)
                .ok_or_else(|| SourceError::UnknownArticle(id.to_string()))
        }
    }

    fn article(id: &str, published: &str) -> Article {
        let t = at(published);
        Article {
            id: id.into(),
            url: format!("https://example.com/{id}"),
            title: id.into(),
            published: t,
            modified: t,
            categories: Vec::new(),
            kind: crate::source::ArticleKind::Post,
            status: crate::source::ArticleStatus::Publish,
            engagement: 0,
            exclude: false,
        }
    }

    fn test_config(root: &std::path::Path, extra: &str) -> NewsConfig {
        let toml = format!(
            "[site]\nname = \"Test News\"\nurl = \"https://example.com\"\n\
             [ping]\ngoogle = false\nbing = false\n{extra}"
        );
        let mut config = crate::config::test_parse_config(&toml);
        config.root = root.to_path_buf();
        config.build.content = root.join("content");
        config.build.output = root.join("public");
        config
    }

    #[test]
    fn test_build_publishes_and_bounds_candidates() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "[build]\nmax_articles = 2");

        let mut flagged = article("flagged", "2026-08-28T09:00:00Z");
        flagged.exclude = true;
        let store = FixedStore {
            articles: vec![
                article("alpha", "2026-08-28T10:00:00Z"),
                flagged,
                article("beta", "2026-08-28T08:00:00Z"),
            ],
        };

        let outcome = run_build_with(&config, &store, at(NOW)).unwrap();
        // The excluded article does not consume a cap slot.
        assert_eq!(outcome, BuildOutcome::Published { entries: 2 });

        let xml = fs::read_to_string(config.sitemap_path()).unwrap();
        assert!(xml.contains("alpha"));
        assert!(!xml.contains("flagged"));
        assert!(xml.contains("beta"));
        // Source order survives
        assert!(xml.find("alpha").unwrap() < xml.find("beta").unwrap());
        validate_xml(&xml).unwrap();

        // Priorities stay inside the dynamic range for a 0.7 base
        for line in xml.lines().filter(|l| l.contains("<priority>")) {
            let value: f64 = line
                .trim()
                .trim_start_matches("<priority>")
                .trim_end_matches("</priority>")
                .parse()
                .unwrap();
            assert!((0.7..=0.9).contains(&value), "priority out of range: {value}");
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "");
        let store = FixedStore {
            articles: vec![article("story", "2026-08-28T10:00:00Z")],
        };

        run_build_with(&config, &store, at(NOW)).unwrap();
        let first = fs::read(config.sitemap_path()).unwrap();

        run_build_with(&config, &store, at(NOW)).unwrap();
        let second = fs::read(config.sitemap_path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_contended_lock_skips() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "");
        let store = FixedStore { articles: vec![] };

        let lock = GenerationLock::new(&config.state_dir());
        let _guard = lock.try_acquire(at(NOW)).unwrap().unwrap();

        let outcome = run_build_with(&config, &store, at(NOW)).unwrap();
        assert_eq!(outcome, BuildOutcome::Skipped);
        assert!(!config.sitemap_path().exists());
    }

    #[test]
    fn test_lock_released_after_build() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "");
        let store = FixedStore { articles: vec![] };

        run_build_with(&config, &store, at(NOW)).unwrap();

        let lock = GenerationLock::new(&config.state_dir());
        assert!(lock.try_acquire(at(NOW)).unwrap().is_some());
    }

    #[test]
    fn test_window_filters_old_articles() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "[build]\nwindow_hours = 48");
        let store = FixedStore {
            articles: vec![
                article("fresh", "2026-08-28T10:00:00Z"),
                article("stale", "2026-08-20T10:00:00Z"),
            ],
        };

        let outcome = run_build_with(&config, &store, at(NOW)).unwrap();
        assert_eq!(outcome, BuildOutcome::Published { entries: 1 });
        assert!(!fs::read_to_string(config.sitemap_path())
            .unwrap()
            .contains("stale"));
    }

    #[test]
    fn test_empty_store_publishes_empty_document() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path(), "");
        let store = FixedStore { articles: vec![] };

        let outcome = run_build_with(&config, &store, at(NOW)).unwrap();
        assert_eq!(outcome, BuildOutcome::Published { entries: 0 });

        let xml = fs::read_to_string(config.sitemap_path()).unwrap();
        assert!(!xml.contains("<url>"));
        validate_xml(&xml).unwrap();
    }
}
