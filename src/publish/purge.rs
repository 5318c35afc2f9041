//! Downstream CDN / edge-cache purge providers.
//!
//! Every provider is purge-by-URL over HTTP; the publisher runs each
//! enabled provider best-effort after a successful rename. Failures are
//! logged with provider and message, never raised past the publisher.

use std::time::Duration;

use thiserror::Error;

use crate::config::NewsConfig;

const PURGE_TIMEOUT: Duration = Duration::from_secs(10);

/// A purge attempt's failure, detailed enough to diagnose without retries.
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("provider answered {status}")]
    Api { status: u16 },
}

/// A downstream cache that can be purged by URL.
pub trait CachePurger: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &'static str;

    /// Purge the given URL from the provider's cache.
    fn purge(&self, sitemap_url: &str) -> Result<(), PurgeError>;
}

/// Instantiate all providers enabled in config.
pub fn enabled_purgers(config: &NewsConfig) -> Vec<Box<dyn CachePurger>> {
    let mut purgers: Vec<Box<dyn CachePurger>> = Vec::new();

    if config.purge.cloudflare.enable {
        purgers.push(Box::new(CloudflarePurger {
            email: config.purge.cloudflare.email.clone(),
            api_key: config.purge.cloudflare.api_key.clone(),
            zone_id: config.purge.cloudflare.zone_id.clone(),
        }));
    }

    if config.purge.http.enable {
        purgers.push(Box::new(HttpPurger {
            method: config.purge.http.method.clone(),
        }));
    }

    purgers
}

fn client() -> Result<reqwest::blocking::Client, PurgeError> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(PURGE_TIMEOUT)
        .user_agent(super::ping::USER_AGENT)
        .build()?)
}

// ============================================================================
// Cloudflare
// ============================================================================

/// Zone purge via the Cloudflare v4 API.
pub struct CloudflarePurger {
    email: String,
    api_key: String,
    zone_id: String,
}

impl CloudflarePurger {
    fn endpoint(&self) -> String {
        format!(
            "https://api.cloudflare.com/client/v4/zones/{}/purge_cache",
            self.zone_id
        )
    }
}

impl CachePurger for CloudflarePurger {
    fn name(&self) -> &'static str {
        "cloudflare"
    }

    fn purge(&self, sitemap_url: &str) -> Result<(), PurgeError> {
        let response = client()?
            .post(self.endpoint())
            .header("X-Auth-Email", &self.email)
            .header("X-Auth-Key", &self.api_key)
            .json(&serde_json::json!({ "files": [sitemap_url] }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PurgeError::Api {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Generic HTTP purge
// ============================================================================

/// Purge-by-URL against the sitemap URL itself, for reverse proxies and
/// host caches (SiteGround and friends) that accept a PURGE request.
pub struct HttpPurger {
    method: String,
}

impl CachePurger for HttpPurger {
    fn name(&self) -> &'static str {
        "http"
    }

    fn purge(&self, sitemap_url: &str) -> Result<(), PurgeError> {
        let method = reqwest::Method::from_bytes(self.method.as_bytes())
            .unwrap_or(reqwest::Method::from_bytes(b"PURGE").unwrap());

        let response = client()?.request(method, sitemap_url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(PurgeError::Api {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}
