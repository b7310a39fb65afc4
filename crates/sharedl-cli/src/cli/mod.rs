//! CLI for the sharedl share-link resolver.

mod commands;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sharedl_core::config;
use sharedl_core::http::CurlClient;
use sharedl_core::resolver::ShareLinkResolver;
use std::path::PathBuf;

use commands::{run_fetch, run_resolve, run_show, ShowOptions};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sharedl")]
#[command(about = "Resolve cloud-storage share links into direct downloads", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve a share link and print the direct download URL.
    Resolve {
        /// Share link (short link, embed link or viewer link).
        link: String,
        /// Print every attempted URL and its headers as JSON on stderr.
        #[arg(long)]
        trail: bool,
    },

    /// Download the file behind a share link.
    Fetch {
        /// Share link (short link, embed link or viewer link).
        link: String,
        /// Output file or directory (default: current directory, name from the response).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        #[arg(long)]
        trail: bool,
    },

    /// Download a shared CSV and print a table preview with a bar chart.
    Show {
        link: String,
        /// Number of rows to print.
        #[arg(long, default_value = "20", value_name = "N")]
        rows: usize,
        /// Column to chart (default: first numeric column).
        #[arg(long, value_name = "COLUMN")]
        chart: Option<String>,
        /// Column used for bar labels (default: first column).
        #[arg(long, value_name = "COLUMN")]
        label: Option<String>,
        #[arg(long)]
        trail: bool,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let resolver = ShareLinkResolver::from_config(CurlClient::new(cfg.client_options()), &cfg);

        match cli.command {
            CliCommand::Resolve { link, trail } => run_resolve(&resolver, &link, trail)?,
            CliCommand::Fetch {
                link,
                output,
                trail,
            } => {
                let output = match output {
                    Some(p) => p,
                    None => std::env::current_dir()?,
                };
                run_fetch(&resolver, &link, &output, trail)?;
            }
            CliCommand::Show {
                link,
                rows,
                chart,
                label,
                trail,
            } => {
                let opts = ShowOptions {
                    rows,
                    chart,
                    label,
                };
                run_show(&resolver, &link, &opts, trail)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
