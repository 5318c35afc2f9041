//! `[build]` configuration: selection window and sitemap generation knobs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hard upper bound Google News accepts per sitemap file.
pub const MAX_ARTICLES_LIMIT: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding article TOML files (relative to project root).
    pub content: PathBuf,

    /// Output directory the sitemap is published into.
    pub output: PathBuf,

    /// File name of the published sitemap.
    pub sitemap_name: String,

    /// Maximum number of entries in the sitemap (1..=1000).
    pub max_articles: usize,

    /// Only articles modified within this window are candidates.
    /// 0 disables the window.
    pub window_hours: u64,

    /// Category filter; empty = all categories.
    pub categories: Vec<String>,

    /// Compute per-article priority from age and engagement.
    /// When disabled every entry gets `base_priority`.
    pub dynamic_priority: bool,

    /// Base priority value (0.1..=1.0).
    pub base_priority: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content: "content".into(),
            output: "public".into(),
            sitemap_name: "news-sitemap.xml".into(),
            max_articles: 50,
            window_hours: 48,
            categories: Vec::new(),
            dynamic_priority: true,
            base_priority: 0.7,
        }
    }
}

impl BuildConfig {
    /// Validate build configuration.
    pub fn validate(&self, diag: &mut crate::config::ConfigDiagnostics) {
        if self.max_articles == 0 || self.max_articles > MAX_ARTICLES_LIMIT {
            diag.error_with_hint(
                "build.max_articles",
                format!("{} is out of range", self.max_articles),
                format!("use a value between 1 and {}", MAX_ARTICLES_LIMIT),
            );
        }

        if !(0.1..=1.0).contains(&self.base_priority) {
            diag.error_with_hint(
                "build.base_priority",
                format!("{} is out of range", self.base_priority),
                "use a value between 0.1 and 1.0",
            );
        }

        if self.sitemap_name.is_empty() || self.sitemap_name.contains('/') {
            diag.error(
                "build.sitemap_name",
                "must be a bare file name, e.g. \"news-sitemap.xml\"",
            );
        }
    }
}
