use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod repl;

#[derive(Parser)]
#[command(name = "passport")]
#[command(about = "Soul Passport - guarded tarot readings", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/soul-passport/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve `/api/chat` backed by Gemini
    Serve {
        /// Address to bind, overriding `[server].bind`
        #[arg(long)]
        bind: Option<String>,
    },
    /// Interactive reading session
    Ask {
        /// Run the reading pipeline in-process instead of calling a server
        #[arg(long)]
        local: bool,
        /// Chat endpoint, overriding `[client].endpoint`
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Query a running server's health endpoint
    Health {
        #[arg(long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The REPL shares the terminal with logs, so keep it quiet by default.
    let default_level = match cli.command {
        Commands::Ask { .. } => "warn",
        _ => "info",
    };
    init_logging(default_level);

    let config_path = cli.config.as_deref();
    let config = commands::load_config(config_path)?;

    match cli.command {
        Commands::Serve { bind } => commands::serve::run(config, config_path, bind).await?,
        Commands::Ask { local, endpoint } => {
            commands::ask::run(config, config_path, local, endpoint).await?
        }
        Commands::Health { endpoint } => commands::health::run(config, endpoint).await?,
    }

    Ok(())
}

fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
