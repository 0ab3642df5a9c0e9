//! Command-line interface definitions.

use clap::{ArgGroup, ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Keep a page's <head> in sync with its SEO metadata
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: seo.toml, searched upward)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a page's metadata into an HTML document's <head>
    #[command(visible_alias = "a")]
    Apply {
        #[command(flatten)]
        args: ApplyArgs,
    },

    /// List registered page ids
    #[command(visible_alias = "l")]
    List,

    /// Print one page's metadata as JSON
    Show {
        /// Page id (e.g. `home`)
        id: String,
    },

    /// Check every registered page for missing or malformed fields
    #[command(visible_alias = "v")]
    Validate,
}

/// Apply command arguments.
#[derive(clap::Args, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["page", "meta"])))]
pub struct ApplyArgs {
    /// HTML document to update
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Page id from the registry
    #[arg(short, long)]
    pub page: Option<String>,

    /// JSON file holding the page metadata
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub meta: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath, conflicts_with = "in_place")]
    pub output: Option<PathBuf>,

    /// Overwrite FILE with the result
    #[arg(short, long)]
    pub in_place: bool,
}
