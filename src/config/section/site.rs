//! `[site]` configuration.
//!
//! Publisher identity used for the `news:publication` block and for
//! composing the public sitemap URL.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Publication name as it should appear in `news:name`.
    pub name: String,

    /// Public site URL (e.g., "https://example.com"). Required.
    pub url: Option<String>,

    /// Locale code; the first two characters become `news:language`.
    pub language: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            url: None,
            language: "en".into(),
        }
    }
}

impl SiteConfig {
    /// Two-letter language code for the `news:language` element.
    pub fn language_code(&self) -> &str {
        let code = self.language.as_str();
        if code.len() >= 2 && code.is_char_boundary(2) {
            &code[..2]
        } else {
            code
        }
    }

    /// Validate site configuration.
    ///
    /// # Checks
    /// - `url` must be set
    /// - `url` must be a valid http/https URL with a host
    /// - `name` must not be empty
    pub fn validate(&self, diag: &mut crate::config::ConfigDiagnostics) {
        if self.name.is_empty() {
            diag.error_with_hint(
                "site.name",
                "publication name is not configured",
                "set site.name, e.g.: \"Example News\"",
            );
        }

        let Some(url_str) = &self.url else {
            diag.error_with_hint(
                "site.url",
                "site URL is not configured",
                "set site.url, e.g.: \"https://example.com\"",
            );
            return;
        };

        match url::Url::parse(url_str) {
            Ok(parsed) => {
                if !matches!(parsed.scheme(), "http" | "https") {
                    diag.error_with_hint(
                        "site.url",
                        format!(
                            "scheme '{}' not supported, must be http or https",
                            parsed.scheme()
                        ),
                        "use format like https://example.com",
                    );
                }
                if parsed.host_str().is_none() {
                    diag.error_with_hint(
                        "site.url",
                        "URL must have a valid host",
                        "use format like https://example.com",
                    );
                }
            }
            Err(e) => {
                diag.error_with_hint(
                    "site.url",
                    format!("invalid URL: {}", e),
                    "use format like https://example.com",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        let mut site = SiteConfig::default();
        assert_eq!(site.language_code(), "en");

        site.language = "pt_BR".into();
        assert_eq!(site.language_code(), "pt");

        site.language = "e".into();
        assert_eq!(site.language_code(), "e");
    }

    #[test]
    fn test_validate_missing_url() {
        let site = SiteConfig {
            name: "Test".into(),
            ..SiteConfig::default()
        };
        let mut diag = crate::config::ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_bad_scheme() {
        let site = SiteConfig {
            name: "Test".into(),
            url: Some("ftp://example.com".into()),
            ..SiteConfig::default()
        };
        let mut diag = crate::config::ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert!(diag.has_errors());
    }

    #[test]
    fn test_validate_ok() {
        let site = SiteConfig {
            name: "Test".into(),
            url: Some("https://example.com".into()),
            ..SiteConfig::default()
        };
        let mut diag = crate::config::ConfigDiagnostics::new();
        site.validate(&mut diag);
        assert!(!diag.has_errors());
    }
}
