//! Potluck CLI
//!
//! Command-line interface for potluck - a shared multi-author checklist.

use anyhow::Result;
use clap::{Parser, Subcommand};

use potluck_core::{Config, HttpRemoteStore, SyncController};

mod commands;
mod output;
mod tui;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "potluck")]
#[command(about = "Potluck - a shared checklist anyone with a name can edit")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TUI interface
    Tui,
    /// List all items, grouped into pending and completed
    #[command(alias = "ls")]
    List,
    /// Add an item under your display name
    Add {
        /// Task text
        task: String,
    },
    /// Mark an item completed
    Done {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Mark an item pending again
    Undone {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Change an item's text
    Rename {
        /// Item ID (full UUID or prefix)
        id: String,
        /// New task text
        task: String,
    },
    /// Delete an item
    #[command(alias = "rm")]
    Delete {
        /// Item ID (full UUID or prefix)
        id: String,
    },
    /// Show or set your display name
    Name {
        #[command(subcommand)]
        command: Option<NameCommands>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum NameCommands {
    /// Show the saved display name
    Show,
    /// Set the display name
    Set {
        /// The name other visitors will see on your items
        name: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, service_url, api_key, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Commands that don't need the remote store
    match &cli.command {
        Some(Commands::Config { command }) => {
            return handle_config_command(command.clone(), &output);
        }
        Some(Commands::Name { command }) => {
            return handle_name_command(command.clone(), &output);
        }
        _ => {}
    }

    let config = Config::load()?;

    // The remote client is built once here and injected; nothing below
    // reaches for a global.
    let controller = open_controller(&config)?;

    // Handle TUI (default when no command given)
    if matches!(&cli.command, Some(Commands::Tui) | None) {
        return tui::run(config, controller).await;
    }

    match cli.command.unwrap() {
        Commands::Tui => unreachable!(),           // Handled above
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Name { .. } => unreachable!(),   // Handled above
        Commands::List => commands::item::list(&controller, &output).await,
        Commands::Add { task } => commands::item::add(&controller, &config, task, &output).await,
        Commands::Done { id } => commands::item::set_completed(&controller, id, true, &output).await,
        Commands::Undone { id } => {
            commands::item::set_completed(&controller, id, false, &output).await
        }
        Commands::Rename { id, task } => {
            commands::item::rename(&controller, id, task, &output).await
        }
        Commands::Delete { id } => commands::item::delete(&controller, id, &output).await,
    }
}

/// Build the controller around the configured remote service
fn open_controller(config: &Config) -> Result<SyncController<HttpRemoteStore>> {
    let (Some(url), Some(key)) = (config.service_url.as_deref(), config.api_key.as_deref()) else {
        anyhow::bail!(
            "Remote service not configured. Set it with:\n  \
             potluck config set service_url <url>\n  \
             potluck config set api_key <key>"
        );
    };
    Ok(SyncController::new(HttpRemoteStore::new(url, key)))
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

fn handle_name_command(command: Option<NameCommands>, output: &Output) -> Result<()> {
    match command {
        Some(NameCommands::Show) | None => commands::name::show(output),
        Some(NameCommands::Set { name }) => commands::name::set(name, output),
    }
}
