//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::service::DEFAULT_SITEMAP;

/// Sitemap server and renderer CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: sitemaps.toml)
    #[arg(short = 'C', long, global = true, default_value = "sitemaps.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

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
    /// Serve every registered sitemap over HTTP
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the XML of one sitemap to stdout
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: PageArgs,

        /// Write everything on one line
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        minify: Option<bool>,
    },

    /// Print one page of sitemap nodes as JSON
    #[command(visible_alias = "n")]
    Nodes {
        #[command(flatten)]
        args: PageArgs,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Which sitemap and which slice of it.
#[derive(clap::Args, Debug, Clone)]
pub struct PageArgs {
    /// Sitemap name
    #[arg(short, long, default_value = DEFAULT_SITEMAP)]
    pub name: String,

    /// 1-based page number
    #[arg(long)]
    pub page: Option<usize>,

    /// Entries per page (default: sitemap.page_size)
    #[arg(long)]
    pub count: Option<usize>,
}
