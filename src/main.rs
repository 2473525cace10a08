use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;

#[derive(Parser)]
#[command(name = "gitwh")]
#[command(version, about = "Pull configured working copies on every git push")]
pub struct Cli {
    /// Configuration file (.json, .conf, .yaml, .yml or .toml)
    #[arg(short, long, global = true, default_value = "/etc/gitwh.yaml")]
    pub config: PathBuf,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Listen address, overriding the configuration file (e.g. ":9000")
    #[arg(long, global = true)]
    pub listen: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server (default)
    Serve,
    /// Load and validate the configuration, then exit
    Check,
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "gitwh=debug,tower_http=debug"
    } else {
        "gitwh=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Commands::Serve) {
        Commands::Serve => {
            init_tracing(cli.verbose);
            cmd::cmd_serve(&cli.config, cli.listen.as_deref()).await?;
        }
        Commands::Check => cmd::cmd_check(&cli.config, cli.listen.as_deref())?,
    }

    Ok(())
}
