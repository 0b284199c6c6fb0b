//! lacpd daemon entry point.
//!
//! Loads the port configuration, spawns one receive-machine actor per
//! port plus the transmit-machine stub, and runs until interrupted.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lacpd::{DaemonConfig, PortActor, TxHandle};

/// Link aggregation control daemon
#[derive(Parser, Debug)]
#[command(name = "lacpd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON port configuration
    #[arg(short = 'c', long, default_value = "/etc/lacpd.json")]
    config: String,

    /// Log filter (e.g. "info", "lacp_sm=debug")
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Initializes tracing/logging.
fn init_logging(filter: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

async fn run(args: &Args) -> anyhow::Result<()> {
    let config = DaemonConfig::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config))?;

    let (tx, tx_rx) = TxHandle::channel();
    let transmit_task = tokio::spawn(lacpd::transmit::run_stub(tx_rx));

    let mut handles = Vec::with_capacity(config.ports.len());
    for port in &config.ports {
        let (handle, join) = PortActor::spawn(port, tx.clone());
        info!(port = %handle.name(), "receive machine running");
        handles.push((handle, join));
    }

    // The frame-reception path (out of scope here) delivers LACPDU bodies
    // through the PortHandles; until one is wired in, the actors sit
    // DEFAULTED and react only to delivered events.
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    info!("shutdown signal received");

    for (handle, join) in handles {
        handle.shutdown().await;
        let _ = join.await;
    }
    drop(tx);
    let _ = transmit_task.await;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("--- Starting lacpd ---");

    match run(&args).await {
        Ok(()) => {
            info!("lacpd exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("lacpd error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
