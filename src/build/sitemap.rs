//! News sitemap document assembly and serialization.
//!
//! # Document Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
//!         xmlns:news="http://www.google.com/schemas/sitemap-news/0.9">
//!   <url>
//!     <loc>https://example.com/story</loc>
//!     <priority>0.9</priority>
//!     <news:news>
//!       <news:publication>
//!         <news:name>Example News</news:name>
//!         <news:language>en</news:language>
//!       </news:publication>
//!       <news:publication_date>2026-08-28T10:00:00+00:00</news:publication_date>
//!       <news:title>Café &amp; Bar reopens</news:title>
//!     </news:news>
//!   </url>
//! </urlset>
//! ```
//!
//! Serialization is byte-stable for a given input so unchanged content
//! republishes identically.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::exclude::ExclusionFilter;
use super::priority::{format_priority, score};
use crate::config::NewsConfig;
use crate::debug;
use crate::source::Article;
use crate::utils::date::iso8601;
use crate::utils::xml::{escape, unescape};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";

/// One `<url>` entry of the news sitemap.
#[derive(Debug, Clone)]
pub struct SitemapEntry {
    /// Canonical article URL.
    pub loc: String,
    /// Title with HTML entities decoded (escaped again at render time).
    pub title: String,
    /// ISO-8601 publication date.
    pub publication_date: String,
    /// Priority, already rendered with one decimal place.
    pub priority: String,
}

/// The assembled sitemap document.
pub struct Sitemap {
    publisher: String,
    language: String,
    entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// Assemble the document from candidate articles, in input order.
    ///
    /// Excluded articles are skipped; zero surviving entries is a valid
    /// (empty) document, not an error. The document never carries more
    /// than `max_articles` entries even if the source over-delivers.
    pub fn build(
        articles: &[Article],
        filter: &ExclusionFilter,
        config: &NewsConfig,
        now: DateTime<Utc>,
    ) -> Self {
        let entries = articles
            .iter()
            .filter(|article| {
                if filter.is_excluded(article) {
                    debug!("build"; "excluded: {}", article.id);
                    return false;
                }
                true
            })
            .take(config.build.max_articles)
            .map(|article| Self::make_entry(article, config, now))
            .collect();

        Self {
            publisher: config.site.name.clone(),
            language: config.site.language_code().to_string(),
            entries,
        }
    }

    fn make_entry(article: &Article, config: &NewsConfig, now: DateTime<Utc>) -> SitemapEntry {
        let priority = if config.build.dynamic_priority {
            score(article, config.build.base_priority, now)
        } else {
            config.build.base_priority
        };

        SitemapEntry {
            loc: article.url.clone(),
            // Decode first so pre-encoded titles do not double-encode
            // when escaped during render.
            title: unescape(&article.title).into_owned(),
            publication_date: iso8601(article.published),
            priority: format_priority(priority),
        }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[SitemapEntry] {
        &self.entries
    }

    /// Serialize to XML with two-space indentation.
    pub fn into_xml(self) -> String {
        let mut xml = String::with_capacity(512 + self.entries.len() * 512);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\" xmlns:news=\"");
        xml.push_str(NEWS_NS);
        xml.push_str("\">\n");

        for entry in &self.entries {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape(&entry.loc));
            xml.push_str("</loc>\n    <priority>");
            xml.push_str(&entry.priority);
            xml.push_str("</priority>\n    <news:news>\n");
            xml.push_str("      <news:publication>\n        <news:name>");
            xml.push_str(&escape(&self.publisher));
            xml.push_str("</news:name>\n        <news:language>");
            xml.push_str(&escape(&self.language));
            xml.push_str("</news:language>\n      </news:publication>\n");
            xml.push_str("      <news:publication_date>");
            xml.push_str(&entry.publication_date);
            xml.push_str("</news:publication_date>\n      <news:title>");
            xml.push_str(&escape(&entry.title));
            xml.push_str("</news:title>\n    </news:news>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Check a rendered document for XML well-formedness before publishing.
pub fn validate_xml(xml: &str) -> Result<()> {
    let mut reader = quick_xml::Reader::from_str(xml);
    loop {
        match reader.read_event().context("sitemap XML is not well-formed")? {
            quick_xml::events::Event::Eof => return Ok(()),
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ArticleKind, ArticleStatus};
    use chrono::TimeZone;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn article(id: &str, title: &str) -> Article {
        let t = Utc.with_ymd_and_hms(2026, 8, 28, 10, 0, 0).unwrap();
        Article {
            id: id.into(),
            url: format!("https://example.com/{id}"),
            title: title.into(),
            published: t,
            modified: t,
            categories: Vec::new(),
            kind: ArticleKind::Post,
            status: ArticleStatus::Publish,
            engagement: 0,
            exclude: false,
        }
    }

    fn test_config() -> NewsConfig {
        crate::config::test_parse_config(
            "[site]\nname = \"Example News\"\nurl = \"https://example.com\"\nlanguage = \"pt_BR\"\n\
             [build]\nbase_priority = 0.7",
        )
    }

    const NOW: &str = "2026-08-28T12:00:00Z";

    #[test]
    fn test_empty_document_is_valid() {
        let sitemap = Sitemap::build(&[], &ExclusionFilter::new(), &test_config(), at(NOW));
        assert_eq!(sitemap.entry_count(), 0);

        let xml = sitemap.into_xml();
        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(SITEMAP_NS));
        assert!(xml.contains(NEWS_NS));
        assert!(!xml.contains("<url>"));
        validate_xml(&xml).unwrap();
    }

    #[test]
    fn test_entry_fields() {
        let config = test_config();
        let sitemap = Sitemap::build(
            &[article("story", "Big story")],
            &ExclusionFilter::new(),
            &config,
            at(NOW),
        );
        let xml = sitemap.into_xml();

        assert!(xml.contains("<loc>https://example.com/story</loc>"));
        assert!(xml.contains("<news:name>Example News</news:name>"));
        assert!(xml.contains("<news:language>pt</news:language>"));
        assert!(xml.contains("<news:publication_date>2026-08-28T10:00:00+00:00</news:publication_date>"));
        assert!(xml.contains("<news:title>Big story</news:title>"));
        validate_xml(&xml).unwrap();
    }

    #[test]
    fn test_preserves_input_order() {
        let sitemap = Sitemap::build(
            &[article("first", "First"), article("second", "Second")],
            &ExclusionFilter::new(),
            &test_config(),
            at(NOW),
        );
        let xml = sitemap.into_xml();
        let first = xml.find("first").unwrap();
        let second = xml.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_skips_excluded() {
        let mut flagged = article("flagged", "Flagged");
        flagged.exclude = true;

        let sitemap = Sitemap::build(
            &[article("ok", "Ok"), flagged],
            &ExclusionFilter::new(),
            &test_config(),
            at(NOW),
        );
        assert_eq!(sitemap.entry_count(), 1);
        assert!(!sitemap.into_xml().contains("flagged"));
    }

    #[test]
    fn test_caps_entries_after_exclusion() {
        // An over-delivering source cannot push the document past the cap,
        // and exclusions do not waste cap slots.
        let config = crate::config::test_parse_config(
            "[site]\nname = \"N\"\nurl = \"https://example.com\"\n\
             [build]\nmax_articles = 2",
        );
        let mut flagged = article("flagged", "Flagged");
        flagged.exclude = true;

        let sitemap = Sitemap::build(
            &[article("a", "A"), flagged, article("b", "B"), article("c", "C")],
            &ExclusionFilter::new(),
            &config,
            at(NOW),
        );
        assert_eq!(sitemap.entry_count(), 2);
        let locs: Vec<&str> = sitemap.entries().iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            ["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn test_title_entity_round_trip() {
        // Pre-encoded editorial title must come out as one clean text node.
        let sitemap = Sitemap::build(
            &[article("cafe", "Caf&eacute; &amp; Bar")],
            &ExclusionFilter::new(),
            &test_config(),
            at(NOW),
        );
        let xml = sitemap.into_xml();
        assert!(xml.contains("<news:title>Café &amp; Bar</news:title>"));
        assert!(!xml.contains("&amp;amp;"));
        assert!(!xml.contains("&amp;eacute;"));
        validate_xml(&xml).unwrap();
    }

    #[test]
    fn test_loc_escapes_query_separators() {
        let mut a = article("q", "Q");
        a.url = "https://example.com/search?q=a&b=c".into();
        let sitemap = Sitemap::build(&[a], &ExclusionFilter::new(), &test_config(), at(NOW));
        let xml = sitemap.into_xml();
        assert!(xml.contains("<loc>https://example.com/search?q=a&amp;b=c</loc>"));
        validate_xml(&xml).unwrap();
    }

    #[test]
    fn test_dynamic_priority_in_range() {
        let sitemap = Sitemap::build(
            &[article("fresh", "Fresh")],
            &ExclusionFilter::new(),
            &test_config(),
            at(NOW),
        );
        // Published 2h ago with base 0.7: full age bonus
        assert_eq!(sitemap.entries()[0].priority, "0.9");
    }

    #[test]
    fn test_static_priority_uses_base() {
        let config = crate::config::test_parse_config(
            "[site]\nname = \"N\"\nurl = \"https://example.com\"\n\
             [build]\ndynamic_priority = false\nbase_priority = 0.5",
        );
        let sitemap = Sitemap::build(
            &[article("a", "A")],
            &ExclusionFilter::new(),
            &config,
            at(NOW),
        );
        assert_eq!(sitemap.entries()[0].priority, "0.5");
    }

    #[test]
    fn test_byte_stable_output() {
        let articles = [article("a", "A"), article("b", "B")];
        let render = || {
            Sitemap::build(&articles, &ExclusionFilter::new(), &test_config(), at(NOW)).into_xml()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_xml_structure() {
        let sitemap = Sitemap::build(
            &[article("a", "A")],
            &ExclusionFilter::new(),
            &test_config(),
            at(NOW),
        );
        let xml = sitemap.into_xml();
        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert!(lines[1].starts_with("<urlset"));
        assert_eq!(*lines.last().unwrap(), "</urlset>");
    }

    #[test]
    fn test_validate_rejects_truncated_document() {
        assert!(validate_xml("<urlset><url></urlset>").is_err());
    }
}
