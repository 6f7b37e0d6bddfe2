use clap::Parser;
use dns_bridge_domain::CliOverrides;
use dns_bridge_infrastructure::grpc::BridgeServer;
use tracing::{error, info};

mod bootstrap;
mod engine;

#[derive(Parser)]
#[command(name = "dns-bridge")]
#[command(version)]
#[command(about = "gRPC front end for a DNS engine (coredns.dns.DnsService)")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Listen address, e.g. 127.0.0.1:8053 or :8053
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen_address: cli.listen.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting dns-bridge v{}", env!("CARGO_PKG_VERSION"));

    let engine = engine::build_engine(&config)?;
    let mut server = BridgeServer::new(config.server.clone(), engine);

    server.startup().await?;

    wait_for_signal().await;
    info!("Shutdown signal received");

    if let Err(e) = server.shutdown().await {
        error!(error = %e, "Error while stopping gRPC DNS bridge");
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn wait_for_signal() {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!(error = %e, "Failed to listen for Ctrl+C");
            }
        }
        _ = wait_for_sigterm() => {}
    }
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            error!(error = %e, "Failed to register SIGTERM handler");
            std::future::pending::<()>().await
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
