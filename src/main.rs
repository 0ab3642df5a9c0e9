//! seohead - keep a page's <head> in sync with its SEO metadata.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use seohead::cli::{self, Cli, Commands};
use seohead::config::SeoConfig;
use seohead::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SeoConfig::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Apply { args } => cli::apply::run_apply(args, config),
        Commands::List => cli::pages::list_pages(config),
        Commands::Show { id } => cli::pages::show_page(id, config),
        Commands::Validate => cli::validate::validate_pages(&config),
    }
}
