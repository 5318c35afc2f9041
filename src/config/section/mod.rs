//! Configuration section definitions.

mod build;
mod log;
mod ping;
mod purge;
mod serve;
mod site;

pub use build::{BuildConfig, MAX_ARTICLES_LIMIT};
pub use log::LogConfig;
pub use ping::PingConfig;
pub use purge::{CloudflareConfig, HttpPurgeConfig, PurgeConfig};
pub use serve::ServeConfig;
pub use site::SiteConfig;
