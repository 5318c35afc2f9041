//! Log command: print recent generation records.

use crate::config::NewsConfig;
use crate::genlog::{GenerationLog, read_last_update};
use anyhow::Result;
use owo_colors::OwoColorize;

/// Print the generation log, oldest first, bounded by `limit`.
pub fn show_log(config: &NewsConfig, limit: Option<usize>) -> Result<()> {
    let genlog = GenerationLog::open(&config.state_dir());

    if genlog.is_empty() {
        println!("No generations recorded yet. Run 'newsmap build' first.");
        return Ok(());
    }

    let total = genlog.len();
    let skip = limit.map_or(0, |n| total.saturating_sub(n));

    for entry in genlog.entries().skip(skip) {
        println!(
            "{}  {}  {} article{}  {}ms",
            entry
                .timestamp
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
                .bright_yellow(),
            entry.message,
            entry.article_count,
            if entry.article_count == 1 { "" } else { "s" },
            entry.duration_ms,
        );
    }

    if let Some(last) = read_last_update(&config.state_dir()) {
        println!(
            "\nLast update: {}",
            last.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_green()
        );
    }
    Ok(())
}
