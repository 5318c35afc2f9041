//! Build command entry point.

use crate::build::{BuildOutcome, run_build};
use crate::config::NewsConfig;
use crate::log;
use anyhow::Result;

/// Run one build pass and report the outcome.
pub fn build_sitemap(config: &NewsConfig) -> Result<()> {
    match run_build(config)? {
        BuildOutcome::Published { entries } => {
            log!(
                "build";
                "sitemap published with {} entr{}",
                entries,
                if entries == 1 { "y" } else { "ies" }
            );
        }
        BuildOutcome::Skipped => {
            log!("build"; "skipped: another generation is in progress");
        }
    }
    Ok(())
}
