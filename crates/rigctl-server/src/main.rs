//! rigctl Responder
//!
//! Answers hamlib rigctl clients (fldigi, WSJT-X, grig, ...) from a
//! simulated radio.
//!
//! Usage: `rigctl-responder [config.json]`

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use rigctl_server::{RigctlServer, ServerCommand, ServerConfig, CONFIG_ENV, PORT_ENV};
use rigctl_sim::VirtualRadio;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Include all our crates in the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rigctl_responder=info,rigctl_protocol=info,rigctl_sim=info,rigctl_server=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let explicit = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from);
    let port_override = std::env::var(PORT_ENV).ok();

    let config = match ServerConfig::resolve(explicit)
        .and_then(|config| config.with_port_override(port_override.as_deref()))
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let radio = Arc::new(VirtualRadio::from_config(config.radio.clone()));
    tracing::info!("Starting rigctl responder: {}", radio.state_summary());

    let server = match RigctlServer::from_config(&config, radio).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let (cmd_tx, cmd_rx) = mpsc::channel(4);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = cmd_tx.send(ServerCommand::Shutdown).await;
            }
            Err(e) => {
                tracing::warn!("Cannot listen for Ctrl-C: {}", e);
                // Keep the sender alive so the server keeps running
                std::future::pending::<()>().await;
            }
        }
    });

    match server.run(cmd_rx).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
