//! Project initialization.
//!
//! Creates the content directory, a default `newsmap.toml`, and one
//! sample article so the first build produces a non-empty sitemap.

use crate::{config::NewsConfig, log};
use anyhow::{Result, bail};
use std::fs;

const CONFIG_TEMPLATE: &str = r#"[site]
name = "My News Site"
url = "https://example.com"
language = "en"

[build]
content = "content"
output = "public"
# sitemap_name = "news-sitemap.xml"
# max_articles = 50
# window_hours = 48
# categories = []
# dynamic_priority = true
# base_priority = 0.7

[ping]
google = true
bing = true

# [purge.cloudflare]
# enable = true
# email = ""
# api_key = ""
# zone_id = ""

# [purge.http]
# enable = true
# method = "PURGE"

[serve]
# interface = "127.0.0.1"
# port = 5277
# watch = true
"#;

fn sample_article(now: &str) -> String {
    format!(
        r#"title = "Hello from newsmap"
url = "https://example.com/hello-from-newsmap"
published = "{now}"
categories = ["news"]
"#
    )
}

/// Create a new project skeleton at the configured root.
pub fn new_project(config: &NewsConfig) -> Result<()> {
    let root = &config.root;

    if config.config_path.exists() {
        bail!("'{}' already exists", config.config_path.display());
    }

    fs::create_dir_all(root)?;
    fs::write(&config.config_path, CONFIG_TEMPLATE)?;

    let content_dir = root.join("content");
    fs::create_dir_all(&content_dir)?;

    let now = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    fs::write(content_dir.join("hello.toml"), sample_article(&now))?;

    log!("init"; "Project initialized at {}", root.display());
    log!("init"; "Edit newsmap.toml, then run 'newsmap build'");
    Ok(())
}
