//! media-deployer
//!
//! Uploads the media contract, instantiates it, and exercises it.
//!
//! # Sequence
//!
//! ```text
//!   config (TOML, optional) ──┐
//!   env (secret phrases) ─────┤
//!                             ▼
//!   ┌──────────┐   ┌──────────────┐   ┌──────────────┐   ┌───────────────┐
//!   │  store   │──▶│ instantiate  │──▶│ mint / query │──▶│ bid / query   │
//!   │  code_id │   │  address     │   │  owner, ask  │   │  owner again  │
//!   └──────────┘   └──────────────┘   └──────────────┘   └───────────────┘
//! ```
//!
//! The report of a full run is printed to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use media_deployer::blockchain::{Fee, Identities, LcdClient};
use media_deployer::config::load_or_default;
use media_deployer::deploy::workflow;
use media_deployer::observability::logging::init_logging;
use media_deployer::Deployer;

#[derive(Parser)]
#[command(name = "media-deployer")]
#[command(about = "Deploy and exercise the media contract on a CosmWasm chain", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store, instantiate, mint and bid (default)
    Run,
    /// Only upload the artifact and print its code id
    Store,
    /// Print both identities' balances
    Balance,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    init_logging(&config.observability);
    tracing::info!(
        lcd_url = %config.network.lcd_url,
        chain_id = %config.network.chain_id,
        artifact = %config.artifact.name,
        "media-deployer v0.1.0 starting"
    );

    let identities = Identities::from_env(&config.wallets, &config.network)?;
    let client = LcdClient::connect(config.network.clone()).await?;
    let fee = Fee::from(&config.fee);
    let mut deployer = Deployer::new(client, fee, config.artifact.label.clone());

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let report =
                workflow::run(&mut deployer, &identities, &config.artifact, &config.demo).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Store => {
            let dir = Path::new(&config.artifact.dir);
            let code_id = deployer
                .store_artifact(&identities.deployer, dir, &config.artifact.name)
                .await?;
            println!("code id: {}", code_id);
        }
        Commands::Balance => {
            let balances = workflow::snapshot_balances(&deployer, &identities).await?;
            println!("{}", serde_json::to_string_pretty(&balances)?);
        }
    }

    Ok(())
}
