//! adopr binary entry point

mod cli;

use crate::cli::style::Stylize;
use adopr::config::{self, ConfigKey};
use adopr::error::Error;
use anstream::eprintln;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adopr", version, about = "AI-assisted pull request creation for Azure DevOps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get or set persisted settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate, review, and submit a pull request
    Run {
        /// Target branch (overrides the configured default)
        #[arg(short, long)]
        target: Option<String>,
        /// Instruction passed to the draft generator
        #[arg(short, long)]
        prompt: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a setting
    Get {
        /// Setting to print
        key: ConfigKey,
    },
    /// Store a setting
    Set {
        /// Setting to store
        key: ConfigKey,
        /// New value
        value: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { action } => run_config(action),
        Commands::Run { target, prompt } => {
            match config::load_config() {
                Ok(config) => {
                    cli::run::run(&config, cli::run::RunOptions { target, prompt }).await
                }
                Err(e) => Err(e),
            }
        }
    };

    if let Err(error) = result {
        eprintln!("{} {error}", "✗".warn());
        if matches!(error, Error::MissingConfig(_)) {
            eprintln!(
                "{}",
                "  Settings can be stored with `adopr config set <key> <value>`.".muted()
            );
        }
        std::process::exit(1);
    }
}

fn run_config(action: ConfigAction) -> adopr::error::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = config::load_config()?;
            match config.get(key) {
                Some(value) => println!("{key} = {value}"),
                None => println!("{key} is not set."),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = config::load_config()?;
            config.set(key, value);
            config::save_config(&config)?;
            println!("{key} saved.");
        }
    }
    Ok(())
}
