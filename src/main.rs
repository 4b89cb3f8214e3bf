//! haiku - builds a static haiku archive from raw inbox text.

mod build;
mod cli;
mod config;
mod generator;
mod init;
mod logger;
mod pages;
mod split;
mod tagger;
mod utils;

use anyhow::{Result, bail};
use build::{BuildRequest, run_build};
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use init::new_project;
use split::{SplitOptions, split_inbox};
use std::{path::Path, process};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        log!("error"; "{:#}", err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Init => new_project(&config),
        Commands::Split {
            src,
            dst,
            startdate,
            number,
            dry_run,
            keep_source,
        } => {
            let options =
                SplitOptions::new(src, dst, startdate, *number, *dry_run, *keep_source, &config)?;
            split_inbox(&options, &config).map(|_| ())
        }
        Commands::Build {
            phase,
            mode,
            title,
            date,
            ..
        } => {
            let request = BuildRequest {
                phase: *phase,
                mode: *mode,
                title: title.clone(),
                date: date.clone(),
            };
            run_build(&config, &request).map(|_| ())
        }
        Commands::Current => generator::update_current(&config).map(|_| ()),
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    if cli.is_init() {
        if config.config_path.exists() {
            bail!("Config file already exists. Remove it manually or init in a different path.");
        }
        return Ok(config);
    }

    config.validate(cli)?;
    Ok(config)
}
