//! Search-engine ping notifications.
//!
//! Each enabled service gets a GET with the URL-encoded sitemap location.
//! Pings are independent and best-effort: a failure is logged and the
//! remaining pings still run.

use std::time::Duration;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::config::NewsConfig;
use crate::log;

/// User agent sent with pings and purges.
pub const USER_AGENT: &str = concat!("newsmap/", env!("CARGO_PKG_VERSION"));

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// A search-engine ping endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingService {
    pub name: &'static str,
    endpoint: &'static str,
}

const GOOGLE: PingService = PingService {
    name: "google",
    endpoint: "https://www.google.com/ping?sitemap=",
};

const BING: PingService = PingService {
    name: "bing",
    endpoint: "https://www.bing.com/ping?sitemap=",
};

impl PingService {
    /// Full ping URL for a sitemap location.
    pub fn url_for(&self, sitemap_url: &str) -> String {
        let encoded = utf8_percent_encode(sitemap_url, NON_ALPHANUMERIC);
        format!("{}{}", self.endpoint, encoded)
    }
}

/// Services enabled in config.
pub fn enabled_services(config: &NewsConfig) -> Vec<PingService> {
    let mut services = Vec::new();
    if config.ping.google {
        services.push(GOOGLE);
    }
    if config.ping.bing {
        services.push(BING);
    }
    services
}

/// Ping every enabled service. Never fails the build.
pub fn ping_all(config: &NewsConfig, sitemap_url: &str) {
    let services = enabled_services(config);
    if services.is_empty() {
        return;
    }

    let client = match reqwest::blocking::Client::builder()
        .timeout(PING_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            log!("ping"; "http client unavailable: {}", e);
            return;
        }
    };

    for service in services {
        match client.get(service.url_for(sitemap_url)).send() {
            Ok(response) if response.status().is_success() => {
                log!("ping"; "{} notified", service.name);
            }
            Ok(response) => {
                log!("ping"; "{} answered {}", service.name, response.status());
            }
            Err(e) => {
                log!("ping"; "{} failed: {}", service.name, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ping_url_is_encoded() {
        let url = GOOGLE.url_for("https://example.com/news-sitemap.xml");
        assert_eq!(
            url,
            "https://www.google.com/ping?sitemap=https%3A%2F%2Fexample%2Ecom%2Fnews%2Dsitemap%2Exml"
        );
    }

    #[test]
    fn test_enabled_services_default() {
        let config = crate::config::test_parse_config("");
        let names: Vec<&str> = enabled_services(&config).iter().map(|s| s.name).collect();
        assert_eq!(names, ["google", "bing"]);
    }

    #[test]
    fn test_enabled_services_disabled() {
        let config = crate::config::test_parse_config("[ping]\ngoogle = false\nbing = false");
        assert!(enabled_services(&config).is_empty());
    }
}
