//! Newsmap - a news sitemap generator and server.

#![allow(dead_code)]

mod build;
mod cli;
mod config;
mod genlog;
mod logger;
mod publish;
mod source;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{NewsConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    cli::serve::setup_shutdown_handler()?;

    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(NewsConfig::load(cli)?);

    match &cli.command {
        Commands::Init { .. } => cli::init::new_project(&config),
        Commands::Build { .. } => cli::build::build_sitemap(&config),
        Commands::Serve { .. } => cli::serve::serve(&config),
        Commands::Log { limit } => cli::log::show_log(&config, *limit),
    }
}
