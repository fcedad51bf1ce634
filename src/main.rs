//! Bilingue - renders a bilingual blog from resolved site data.

mod build;
mod cli;
mod components;
mod config;
mod data;
mod pages;
mod serve;
mod theme;
mod utils;
mod watch;

use anyhow::{Context, Result};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands, ModeAction};
use config::SiteConfig;
use serve::serve_site;
use std::path::Path;
use theme::{DarkModeToggle, FileStore};

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Build { .. } => build_site(config).map(|_| ()),
        Commands::Serve { .. } => {
            build_site(config)?;
            serve_site(config)
        }
        Commands::Mode { action } => run_mode(config, *action),
    }
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error: every section has defaults.
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);
    config.validate()?;

    Ok(config)
}

/// Drive the dark-mode toggle against the persisted preference file.
fn run_mode(config: &SiteConfig, action: ModeAction) -> Result<()> {
    let store = FileStore::new(&config.theme.preference);
    let mut toggle = DarkModeToggle::new(store).context("Failed to read dark-mode preference")?;

    let mode = match action {
        ModeAction::Show => toggle.mode(),
        ModeAction::Enable => toggle.enable()?,
        ModeAction::Disable => toggle.disable()?,
        ModeAction::Toggle => toggle.toggle()?,
    };

    log!("mode"; "{mode} ({})", toggle.store().path().display());
    Ok(())
}
