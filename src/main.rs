// src/main.rs

mod cli;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use std::io;
use std::path::PathBuf;
use tracing::info;
use wheres_my_ship::carriers::CarrierRegistry;
use wheres_my_ship::commands;
use wheres_my_ship::config::Config;
use wheres_my_ship::repository::Repository;
use wheres_my_ship::update::Updater;

/// Resolve configuration and the store it points at
fn open_store(store: Option<PathBuf>) -> Result<(Config, Repository)> {
    let config = Config::load(store)?;
    let repo = Repository::new(&config.store_path);
    info!("Using shipment store {}", repo.path().display());
    Ok((config, repo))
}

fn main() -> Result<()> {
    // Logs go to stderr so list output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Add {
            tracking_number,
            description,
        }) => {
            let (_, repo) = open_store(cli.store)?;
            let tracking_number = tracking_number.unwrap_or_default();
            commands::add(&repo, &tracking_number, &description.join(" "))?;
            Ok(())
        }
        Some(Commands::Remove { identifier }) => {
            let (_, repo) = open_store(cli.store)?;
            if let Some(identifier) = identifier.filter(|i| !i.trim().is_empty()) {
                commands::remove(&repo, &identifier)?;
            }
            Ok(())
        }
        Some(Commands::Update) => {
            let (config, repo) = open_store(cli.store)?;
            let registry = CarrierRegistry::standard(&config.carriers)?;
            let updater = Updater::new(registry, config.threads)?;

            let report = commands::update(&repo, &updater)?;

            // Per-shipment failures are reported, not fatal
            for line in commands::format_report(&report) {
                eprintln!("{}", line);
            }
            Ok(())
        }
        Some(Commands::List { identifier }) => {
            let (_, repo) = open_store(cli.store)?;
            commands::list(&repo, identifier.as_deref(), false, &mut io::stdout().lock())?;
            Ok(())
        }
        Some(Commands::Detail { identifier }) => {
            let (_, repo) = open_store(cli.store)?;
            commands::list(&repo, identifier.as_deref(), true, &mut io::stdout().lock())?;
            Ok(())
        }
        Some(Commands::Clean) => {
            let (_, repo) = open_store(cli.store)?;
            commands::clean(&repo)?;
            Ok(())
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "wheres-my-ship", &mut io::stdout());
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Where's My Ship v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'wheres-my-ship --help' for usage information");
            Ok(())
        }
    }
}
