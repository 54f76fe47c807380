//! Portfolio CLI - manage the site's persisted store from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List stored contact messages
//! portfolio-cli messages list
//!
//! # Switch the site to dark mode
//! portfolio-cli theme set dark
//!
//! # Save a preference bundle
//! portfolio-cli preferences save --language en --font-size large
//!
//! # Remove every key the site owns
//! portfolio-cli storage clear
//! ```
//!
//! # Environment Variables
//!
//! - `PORTFOLIO_STORAGE_PATH` - File store location (default: data/portfolio-store.json)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use portfolio_core::{FontSize, Theme};
use portfolio_site::config::DEFAULT_STORAGE_PATH;

mod commands;

use commands::{CliError, Services};

#[derive(Parser)]
#[command(name = "portfolio-cli")]
#[command(author, version, about = "Portfolio site management tools")]
struct Cli {
    /// File store to operate on (overrides `PORTFOLIO_STORAGE_PATH`)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or clear stored contact messages
    Messages {
        #[command(subcommand)]
        action: MessagesAction,
    },
    /// Read or change the site theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Read or replace the preference bundle
    Preferences {
        #[command(subcommand)]
        action: PreferencesAction,
    },
    /// Operate on the whole namespace
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
}

#[derive(Subcommand)]
enum MessagesAction {
    /// Print every stored message as JSON
    List,
    /// Print the number of stored messages
    Count,
    /// Delete every stored message
    Clear,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the current theme
    Show,
    /// Set the theme (`light` or `dark`)
    Set { theme: Theme },
    /// Flip between light and dark
    Toggle,
}

#[derive(Subcommand)]
enum PreferencesAction {
    /// Print the preference bundle as JSON
    Show,
    /// Save the bundle; omitted fields keep their current value
    Save {
        #[arg(long)]
        theme: Option<Theme>,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        font_size: Option<FontSize>,
        #[arg(long, action = clap::ArgAction::Set)]
        notifications: Option<bool>,
    },
}

#[derive(Subcommand)]
enum StorageAction {
    /// Remove every `portfolio_` key from the store
    Clear,
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    if !output.is_empty() {
        println!("{output}");
    }
}

fn run(cli: Cli) -> Result<String, CliError> {
    let path = cli.store.unwrap_or_else(|| {
        std::env::var("PORTFOLIO_STORAGE_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH), PathBuf::from)
    });
    let services = Services::open(&path)?;

    match cli.command {
        Commands::Messages { action } => match action {
            MessagesAction::List => commands::messages::list(&services),
            MessagesAction::Count => Ok(commands::messages::count(&services)),
            MessagesAction::Clear => Ok(commands::messages::clear(&services)),
        },
        Commands::Theme { action } => Ok(match action {
            ThemeAction::Show => commands::theme::show(&services),
            ThemeAction::Set { theme } => commands::theme::set(&services, theme),
            ThemeAction::Toggle => commands::theme::toggle(&services),
        }),
        Commands::Preferences { action } => match action {
            PreferencesAction::Show => commands::preferences::show(&services),
            PreferencesAction::Save {
                theme,
                language,
                font_size,
                notifications,
            } => commands::preferences::save(
                &services,
                commands::preferences::PreferenceChanges {
                    theme,
                    language,
                    font_size,
                    notifications,
                },
            ),
        },
        Commands::Storage { action } => match action {
            StorageAction::Clear => Ok(commands::storage::clear(&services)),
        },
    }
}
