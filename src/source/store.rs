//! Filesystem-backed content store.
//!
//! Each article is a TOML file under the content directory:
//!
//! ```toml
//! title = "Caf&eacute; &amp; Bar reopens"
//! url = "https://example.com/cafe-bar-reopens"
//! published = "2026-08-28T10:00:00Z"
//! modified = "2026-08-28T11:30:00Z"
//! categories = ["local"]
//! comments = 12
//! ```
//!
//! Optional fields: `kind` (default "post"), `status` (default "publish"),
//! `exclude` (default false). Malformed files are logged and skipped;
//! only a missing/unreadable content directory aborts the fetch.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use jwalk::WalkDir;
use serde::Deserialize;

use super::{Article, ArticleKind, ArticleStatus, CandidateFilter, ContentSource, SourceError};
use crate::debug;

/// On-disk article document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArticleDoc {
    title: String,
    url: String,
    published: String,
    modified: Option<String>,
    categories: Vec<String>,
    comments: u32,
    kind: ArticleKind,
    status: ArticleStatus,
    exclude: bool,
}

/// Content store reading article TOML files from a directory.
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Collect all article files, sorted for deterministic iteration.
    fn article_files(&self) -> Result<Vec<PathBuf>, SourceError> {
        if !self.dir.is_dir() {
            return Err(SourceError::Unavailable(format!(
                "content directory does not exist: {}",
                self.dir.display()
            )));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(&self.dir)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        files.sort();
        Ok(files)
    }

    /// Parse one article file. Returns None (with a debug log) on any
    /// per-file problem so a single bad article cannot abort the build.
    fn parse_article(path: &Path) -> Option<Article> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!("source"; "unreadable article {}: {}", path.display(), e);
                return None;
            }
        };

        let doc: ArticleDoc = match toml::from_str(&content) {
            Ok(d) => d,
            Err(e) => {
                debug!("source"; "malformed article {}: {}", path.display(), e);
                return None;
            }
        };

        if doc.title.is_empty() || doc.url.is_empty() {
            debug!("source"; "article missing title or url: {}", path.display());
            return None;
        }

        let published = parse_timestamp(&doc.published)?;
        let modified = match &doc.modified {
            Some(m) => parse_timestamp(m)?,
            None => published,
        };

        let id = path.file_stem()?.to_str()?.to_string();

        Some(Article {
            id,
            url: doc.url,
            title: doc.title,
            published,
            modified,
            categories: doc.categories,
            kind: doc.kind,
            status: doc.status,
            engagement: doc.comments,
            exclude: doc.exclude,
        })
    }

    fn find_article(&self, id: &str) -> Result<Article, SourceError> {
        self.article_files()?
            .iter()
            .filter(|p| p.file_stem().and_then(|s| s.to_str()) == Some(id))
            .find_map(|p| Self::parse_article(p))
            .ok_or_else(|| SourceError::UnknownArticle(id.to_string()))
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(s) {
        Ok(t) => Some(t.with_timezone(&Utc)),
        Err(_) => None,
    }
}

impl ContentSource for FsStore {
    fn fetch_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Article>, SourceError> {
        let mut articles: Vec<Article> = self
            .article_files()?
            .iter()
            .filter_map(|p| Self::parse_article(p))
            .filter(|a| a.status == ArticleStatus::Publish)
            .filter(|a| a.kind == ArticleKind::Post)
            .filter(|a| filter.matches_category(a))
            .filter(|a| filter.since.is_none_or(|since| a.modified >= since))
            .collect();

        // Modification-time descending, id as tie-breaker for stable output
        articles.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.id.cmp(&b.id)));
        articles.truncate(filter.max_count);

        Ok(articles)
    }

    fn fetch_engagement_count(&self, id: &str) -> Result<u32, SourceError> {
        Ok(self.find_article(id)?.engagement)
    }
}
