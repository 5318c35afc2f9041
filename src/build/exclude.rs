//! Per-article exclusion decisions.
//!
//! Exclusion is monotonic: once any check says "excluded" the article
//! stays excluded; later predicates can only add exclusions, never force
//! an article back in.

use crate::source::{Article, ArticleKind};

/// An external exclusion predicate: receives the decision so far and the
/// article, returns the (possibly escalated) decision.
pub type ExcludePredicate = Box<dyn Fn(bool, &Article) -> bool + Send + Sync>;

/// Decides per-article sitemap inclusion.
#[derive(Default)]
pub struct ExclusionFilter {
    predicates: Vec<ExcludePredicate>,
}

impl ExclusionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an external predicate. Predicates run in registration
    /// order, after the built-in checks.
    pub fn add_predicate(&mut self, predicate: ExcludePredicate) {
        self.predicates.push(predicate);
    }

    /// Should this article be excluded from the sitemap?
    ///
    /// Built-in checks first: non-article kinds (re-checked defensively;
    /// the adapter should not deliver them) and the editor's explicit
    /// opt-out flag. Then the predicate chain, OR-ed monotonically.
    pub fn is_excluded(&self, article: &Article) -> bool {
        let mut excluded =
            !matches!(article.kind, ArticleKind::Post) || article.exclude;

        for predicate in &self.predicates {
            // Monotonic: a predicate returning false cannot clear an
            // earlier exclusion.
            excluded = excluded || predicate(excluded, article);
        }

        excluded
    }
}
