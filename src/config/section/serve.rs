//! `[serve]` configuration: HTTP server and content watcher.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// Port number to listen on.
    pub port: u16,

    /// Watch the content directory and rebuild on change.
    pub watch: bool,

    /// Quiet window after a content change before a rebuild fires.
    /// Coalesces edit bursts into one build.
    pub debounce_secs: u64,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5277,
            watch: true,
            debounce_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.serve.port, 5277);
        assert!(config.serve.watch);
        assert_eq!(config.serve.debounce_secs, 60);
    }

    #[test]
    fn test_custom() {
        let config = test_parse_config("[serve]\nport = 8080\nwatch = false\ndebounce_secs = 5");
        assert_eq!(config.serve.port, 8080);
        assert!(!config.serve.watch);
        assert_eq!(config.serve.debounce_secs, 5);
    }
}
