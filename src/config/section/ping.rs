//! `[ping]` configuration: search-engine notification toggles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PingConfig {
    pub google: bool,
    pub bing: bool,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            google: true,
            bing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(config.ping.google);
        assert!(config.ping.bing);
    }

    #[test]
    fn test_disable() {
        let config = test_parse_config("[ping]\ngoogle = false\nbing = false");
        assert!(!config.ping.google);
        assert!(!config.ping.bing);
    }
}
