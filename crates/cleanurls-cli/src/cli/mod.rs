//! CLI for the clean URLs engine.

mod commands;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cleanurls_core::collision::{FsOracle, PathOracle};
use cleanurls_core::config::{self, CleanUrlsConfig};
use cleanurls_core::site::MemorySite;
use cleanurls_core::Engine;

use commands::{run_clean, run_config, run_unclean};

/// Top-level CLI for the clean URLs engine.
#[derive(Debug, Parser)]
#[command(name = "cleanurls")]
#[command(about = "Clean and unclean Moodle-style script URLs", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/cleanurls/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// TOML file describing courses, categories, users and existing paths.
    #[arg(long, global = true, value_name = "PATH")]
    pub site: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the clean form of a URL.
    Clean {
        /// Absolute URL under wwwroot, or a path relative to it.
        url: String,
    },

    /// Route a clean URL back to its script and parameters.
    Unclean {
        /// Absolute URL under wwwroot, or a path relative to it.
        url: String,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration and rewrite mode.
    Config,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = match &cli.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Clean { url } => {
                let engine = build_engine(&cfg, cli.site.as_deref())?;
                run_clean(&engine, &url)?;
            }
            CliCommand::Unclean { url, json } => {
                let engine = build_engine(&cfg, cli.site.as_deref())?;
                run_unclean(&engine, &url, json)?;
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

/// Engine over the site file (or an empty site). `dirroot`, when configured,
/// takes over collision checks from the site file's path list; without it the
/// stock core paths are added so `course/management` and friends still clash.
fn build_engine(cfg: &CleanUrlsConfig, site: Option<&std::path::Path>) -> Result<Engine> {
    let mut site = match site {
        Some(path) => MemorySite::load(path)?,
        None => MemorySite::new(),
    };
    if cfg.dirroot.is_none() {
        if !site.has_paths() {
            tracing::warn!("no dirroot or site paths configured; checking collisions against core paths only");
        }
        site.add_core_paths();
    }
    let site = Arc::new(site);
    let oracle: Arc<dyn PathOracle> = match &cfg.dirroot {
        Some(dirroot) => Arc::new(FsOracle::new(dirroot)),
        None => site.clone(),
    };
    Ok(Engine::new(cfg.site_root()?, cfg.gate_settings(), site, oracle)
        .with_reserved(cfg.collision_set()))
}

#[cfg(test)]
mod tests;
