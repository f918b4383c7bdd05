use std::net::Ipv4Addr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use wiz_bridge::config::{LogLevel, Overrides};
use wiz_bridge::{Bridge, BulbScanner, Config, RemoteClient};

#[derive(Parser)]
#[command(name = "wiz-bridge")]
#[command(about = "Keep a Wiz light in sync with the mood server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bridge until interrupted
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the mood server API
    #[arg(long)]
    base_url: Option<String>,

    /// API key sent in the x-api-key header
    #[arg(long, env = "WIZ_BRIDGE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Broadcast address used to discover bulbs
    #[arg(long)]
    broadcast_address: Option<Ipv4Addr>,

    /// Delay between polls in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

impl RunArgs {
    fn load(self) -> Result<Config, wiz_bridge::Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        config.apply_overrides(Overrides {
            base_url: self.base_url,
            api_key: self.api_key,
            broadcast_address: self.broadcast_address,
            poll_interval_ms: self.poll_interval_ms,
            log_level: self.log_level,
        });
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Commands::Run(args) = Cli::parse().command;
    let config = args.load()?;

    tracing_subscriber::fmt()
        .with_max_level(config.logging.level)
        .init();

    let remote = RemoteClient::new(
        &config.remote.base_url,
        config.api_key()?,
        config.remote.timeout(),
    )?;
    let scanner = BulbScanner::new(config.device.broadcast_address)
        .with_window(config.device.discovery_window())
        .with_command_timeout(config.device.command_timeout());

    info!("wiz-bridge starting");
    info!(
        "polling {} every {:?}, discovering on {}",
        remote.base_url(),
        config.poll.interval(),
        config.device.broadcast_address
    );

    let mut bridge = Bridge::new(remote, scanner)
        .with_poll_interval(config.poll.interval())
        .with_error_backoff(config.poll.error_backoff());

    tokio::select! {
        _ = bridge.run() => {}
        _ = shutdown_signal() => info!("Received shutdown signal"),
    }

    info!("wiz-bridge shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    res = tokio::signal::ctrl_c() => {
                        if let Err(e) = res {
                            error!("Failed to listen for shutdown signal: {}", e);
                        }
                    }
                    _ = term.recv() => {}
                }
                return;
            }
            Err(e) => error!("Failed to listen for SIGTERM: {}", e),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
