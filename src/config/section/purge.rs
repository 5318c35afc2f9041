//! `[purge]` configuration: downstream cache invalidation providers.
//!
//! Each provider is purge-by-URL over HTTP; failures are logged by the
//! publisher, never fatal.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PurgeConfig {
    /// Cloudflare zone purge via the v4 API.
    pub cloudflare: CloudflareConfig,

    /// Generic purge-by-URL against the sitemap URL itself
    /// (reverse-proxy / host caches that accept a PURGE request).
    pub http: HttpPurgeConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudflareConfig {
    pub enable: bool,
    pub email: String,
    pub api_key: String,
    pub zone_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpPurgeConfig {
    pub enable: bool,
    /// HTTP method sent to the sitemap URL.
    pub method: String,
}

impl Default for HttpPurgeConfig {
    fn default() -> Self {
        Self {
            enable: false,
            method: "PURGE".into(),
        }
    }
}

impl PurgeConfig {
    /// Validate purge configuration.
    pub fn validate(&self, diag: &mut crate::config::ConfigDiagnostics) {
        if self.cloudflare.enable {
            if self.cloudflare.zone_id.is_empty() {
                diag.error("purge.cloudflare.zone_id", "required when cloudflare purge is enabled");
            }
            if self.cloudflare.api_key.is_empty() {
                diag.error("purge.cloudflare.api_key", "required when cloudflare purge is enabled");
            }
        }

        if self.http.enable && self.http.method.is_empty() {
            diag.error("purge.http.method", "must not be empty");
        }
    }
}
