//! Content source: the read-only article projection the pipeline consumes.
//!
//! The pipeline only depends on the [`ContentSource`] trait; the shipped
//! implementation ([`FsStore`]) reads article TOML files from the content
//! directory. Selection (status, kind, category, window, ordering, bound)
//! happens here; exclusion is the filter's job and stays out of the adapter.

mod store;

pub use store::FsStore;

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use thiserror::Error;

use crate::config::NewsConfig;

// ============================================================================
// Article model
// ============================================================================

/// Content type of a store item.
///
/// Only `Post` is sitemap material; the other kinds exist so the
/// exclusion filter can re-check what the adapter should already have
/// filtered out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleKind {
    #[default]
    Post,
    Page,
    Attachment,
    Revision,
    NavMenuItem,
}

/// Publication status of a store item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    #[default]
    Publish,
    Draft,
    Pending,
    Private,
}

/// Read-only article projection produced per build and discarded after.
#[derive(Debug, Clone)]
pub struct Article {
    /// Stable identifier (file stem for the fs store).
    pub id: String,
    /// Canonical article URL.
    pub url: String,
    /// Raw title as stored; may contain HTML entities.
    pub title: String,
    /// Publication timestamp (UTC).
    pub published: DateTime<Utc>,
    /// Last modification timestamp (UTC).
    pub modified: DateTime<Utc>,
    /// Category identifiers.
    pub categories: Vec<String>,
    /// Content type.
    pub kind: ArticleKind,
    /// Publication status.
    pub status: ArticleStatus,
    /// Approved comment count (engagement signal).
    pub engagement: u32,
    /// Editor opted this article out of the sitemap.
    pub exclude: bool,
}

// ============================================================================
// Candidate selection
// ============================================================================

/// Selection parameters for one fetch, derived from config at build start.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    /// Category filter; empty = all categories.
    pub categories: Vec<String>,
    /// Bounded result count.
    pub max_count: usize,
    /// Only items modified at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

impl CandidateFilter {
    /// Build the filter from config, anchored at `now`.
    pub fn from_config(config: &NewsConfig, now: DateTime<Utc>) -> Self {
        let since = (config.build.window_hours > 0)
            .then(|| now - Duration::hours(config.build.window_hours as i64));
        Self {
            categories: config.build.categories.clone(),
            max_count: config.build.max_articles,
            since,
        }
    }

    /// Check category membership (empty filter matches everything).
    pub fn matches_category(&self, article: &Article) -> bool {
        if self.categories.is_empty() {
            return true;
        }
        let wanted: FxHashSet<&str> = self.categories.iter().map(String::as_str).collect();
        article.categories.iter().any(|c| wanted.contains(c.as_str()))
    }
}

// ============================================================================
// ContentSource trait
// ============================================================================

/// Errors from the content store.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying store cannot be queried; the build aborts.
    #[error("content store unavailable: {0}")]
    Unavailable(String),

    /// No such article (engagement lookups only).
    #[error("unknown article: {0}")]
    UnknownArticle(String),
}

/// The content store the pipeline reads from.
pub trait ContentSource {
    /// Fetch candidate articles: published posts matching the filter,
    /// modification-time descending, at most `filter.max_count` items.
    fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Article>, SourceError>;

    /// Fetch the engagement count for a single article.
    fn fetch_engagement_count(&self, id: &str) -> Result<u32, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn article(id: &str, modified: &str) -> Article {
        let t = DateTime::parse_from_rfc3339(modified)
            .unwrap()
            .with_timezone(&Utc);
        Article {
            id: id.into(),
            url: format!("https://example.com/{id}"),
            title: id.into(),
            published: t,
            modified: t,
            categories: vec!["news".into()],
            kind: ArticleKind::Post,
            status: ArticleStatus::Publish,
            engagement: 0,
            exclude: false,
        }
    }

    #[test]
    fn test_empty_category_filter_matches_all() {
        let filter = CandidateFilter {
            categories: Vec::new(),
            max_count: 10,
            since: None,
        };
        assert!(filter.matches_category(&article("a", "2026-08-28T10:00:00Z")));
    }

    #[test]
    fn test_category_filter() {
        let filter = CandidateFilter {
            categories: vec!["sports".into()],
            max_count: 10,
            since: None,
        };
        let mut a = article("a", "2026-08-28T10:00:00Z");
        assert!(!filter.matches_category(&a));

        a.categories.push("sports".into());
        assert!(filter.matches_category(&a));
    }

    #[test]
    fn test_filter_from_config_window() {
        let config = crate::config::test_parse_config("[build]\nwindow_hours = 48");
        let now = DateTime::parse_from_rfc3339("2026-08-28T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let filter = CandidateFilter::from_config(&config, now);
        assert_eq!(
            filter.since.unwrap(),
            DateTime::parse_from_rfc3339("2026-08-26T12:00:00Z").unwrap()
        );

        let config = crate::config::test_parse_config("[build]\nwindow_hours = 0");
        let filter = CandidateFilter::from_config(&config, now);
        assert!(filter.since.is_none());
    }
}
