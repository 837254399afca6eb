//! Command-line interface module.

mod args;

pub use args::{Cli, Commands, PageArgs};

use std::io::{Write, stdout};
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use crate::config::{SiteConfig, find_config_file};
use crate::service::SitemapService;
use crate::{debug, serve};

/// Run the parsed command line.
pub fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;
    apply_command_options(&mut config, &cli.command);

    let service = SitemapService::from_config(&config)?;

    match &cli.command {
        Commands::Serve { .. } => serve::serve(Arc::new(service), &config.serve),
        Commands::Render { args, .. } => {
            let xml = service.xml(&args.name, args.page, args.count)?;
            write_stdout(xml.as_bytes())
        }
        Commands::Nodes { args, pretty } => {
            let page = service.nodes(&args.name, args.page, args.count)?;
            let mut json = if *pretty {
                serde_json::to_string_pretty(&page)?
            } else {
                serde_json::to_string(&page)?
            };
            json.push('\n');
            write_stdout(json.as_bytes())
        }
    }
}

/// Find and load the config file named by `-C`.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let Some(path) = find_config_file(&cli.config) else {
        bail!(
            "config file `{}` not found in this directory or any parent",
            cli.config.display()
        );
    };
    debug!("config"; "using {}", path.display());
    SiteConfig::load(&path).with_context(|| format!("failed to load {}", path.display()))
}

/// Command-line flags take precedence over the config file.
fn apply_command_options(config: &mut SiteConfig, command: &Commands) {
    match command {
        Commands::Serve { interface, port } => {
            if let Some(interface) = interface {
                config.serve.interface = *interface;
            }
            if let Some(port) = port {
                config.serve.port = *port;
            }
        }
        Commands::Render { minify, .. } => {
            if let Some(minify) = minify {
                config.sitemap.minify = *minify;
            }
        }
        Commands::Nodes { .. } => {}
    }
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut out = stdout().lock();
    out.write_all(bytes)?;
    out.flush()?;
    Ok(())
}
