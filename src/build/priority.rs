//! Relevance priority scoring.
//!
//! `priority = base + 0.2·age_factor + 0.1·engagement_factor`, clamped to
//! `[0.1, 1.0]`. Age decays linearly to zero over 30 days; engagement
//! saturates at 100 comments. Pure given `(article, base, now)`.

use chrono::{DateTime, Utc};

use crate::source::Article;
use crate::utils::date::age_days;

/// Linear age decay window in days.
const DECAY_DAYS: f64 = 30.0;

/// Engagement saturation point.
const ENGAGEMENT_CAP: f64 = 100.0;

/// Compute the dynamic priority for an article.
pub fn score(article: &Article, base_priority: f64, now: DateTime<Utc>) -> f64 {
    // Future-dated posts clamp to full freshness
    let age = age_days(article.published, now).max(0.0);
    let age_factor = (1.0 - age / DECAY_DAYS).clamp(0.0, 1.0);

    let engagement_factor = (f64::from(article.engagement) / ENGAGEMENT_CAP).min(1.0);

    let priority = base_priority + 0.2 * age_factor + 0.1 * engagement_factor;
    priority.clamp(0.1, 1.0)
}

/// Render a priority with one decimal place, as the schema expects.
pub fn format_priority(priority: f64) -> String {
    format!("{:.1}", priority)
}
