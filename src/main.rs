use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use farmstead::config::Config;

mod cli;

#[derive(Parser)]
#[command(name = "farmstead")]
#[command(about = "Farmstead - a small farming-game server")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.farmstead/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the game API server
    Serve,

    /// Initialize a default config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show a player's progression
    Status {
        /// Player (user) id
        #[arg(long)]
        player: i64,
    },

    /// Grant experience to a player
    Grant {
        /// Player (user) id
        #[arg(long)]
        player: i64,

        /// Experience points to add
        #[arg(long)]
        amount: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve) | None => {
            cli::serve::serve_command(&config)?;
        }
        Some(Commands::Init { force }) => {
            let path = cli.config.unwrap_or_else(Config::default_path);
            cli::init::init_command(&path, force)?;
        }
        Some(Commands::Status { player }) => {
            cli::status::status_command(&config, player)?;
        }
        Some(Commands::Grant { player, amount }) => {
            cli::grant::grant_command(&config, player, amount)?;
        }
    }

    Ok(())
}
