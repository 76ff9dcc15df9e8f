//! CLI for the sgate script endpoint.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use sgate_core::config;
use std::path::PathBuf;

use commands::{run_check, run_checksum, run_serve, CheckArgs};

/// Top-level CLI for the sgate script endpoint.
#[derive(Debug, Parser)]
#[command(name = "sgate")]
#[command(about = "sgate: gated script delivery endpoint", long_about = None)]
pub struct Cli {
    /// Use this config file instead of ~/.config/sgate/config.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Serve the script endpoint over HTTP.
    Serve {
        /// Listen address (overrides `bind` in config).
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
        /// Scripts directory (overrides `scripts_dir` in config).
        #[arg(long, value_name = "DIR")]
        scripts_dir: Option<PathBuf>,
    },

    /// Evaluate the access decision for a request without starting the server.
    Check {
        /// Script name as a client would send it.
        name: String,
        /// Request raw content (`?raw=1`).
        #[arg(long)]
        raw: bool,
        /// HTTP method.
        #[arg(long, default_value = "GET")]
        method: String,
        /// Request header as "Name: value" (repeatable).
        #[arg(short = 'H', long = "header", value_name = "HEADER")]
        headers: Vec<String>,
        /// Shared key submitted in the form body.
        #[arg(long)]
        key: Option<String>,
    },

    /// Print the SHA-256 of the file a script name resolves to.
    Checksum {
        /// Script name.
        name: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Serve { bind, scripts_dir } => {
                if let Some(bind) = bind {
                    cfg.bind = bind;
                }
                if let Some(dir) = scripts_dir {
                    cfg.scripts_dir = dir;
                }
                run_serve(&cfg).await?;
            }
            CliCommand::Check {
                name,
                raw,
                method,
                headers,
                key,
            } => {
                let args = CheckArgs {
                    name,
                    raw,
                    method,
                    headers,
                    key,
                };
                run_check(&cfg, &args).await?;
            }
            CliCommand::Checksum { name } => run_checksum(&cfg, &name).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
