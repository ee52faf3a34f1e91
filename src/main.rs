//! Booking API gateway for the limousine site.
//!
//! # Architecture Overview
//!
//! ```text
//!                       ┌──────────────────────────────────────────────────────┐
//!                       │                     GATEWAY                          │
//!                       │                                                      │
//!   Browser             │  ┌─────────┐    ┌──────────┐    ┌────────────────┐   │
//!   ?path=/v1/...  ─────┼─▶│  http   │───▶│ gateway  │───▶│   routing      │   │
//!                       │  │ server  │    │ validate │    │   allowlist    │   │
//!                       │  └─────────┘    └────┬─────┘    └────────────────┘   │
//!                       │                      │                               │
//!                       │                      ▼                               │
//!                       │               ┌──────────────┐   ┌──────────────┐    │
//!                       │               │  credential  │──▶│   upstream   │────┼──▶ Booking API
//!                       │               │   provider   │   │    client    │◀───┼─── (HTTPS)
//!                       │               └──────────────┘   └──────┬───────┘    │
//!   Browser             │  ┌─────────┐                            │            │
//!   ◀───────────────────┼──│response │◀───────────────────────────┘            │
//!                       │  │ mirror  │   + security headers on every response  │
//!                       │  └─────────┘                                         │
//!                       │                                                      │
//!                       │  config · observability · lifecycle · net (TLS)      │
//!                       └──────────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use limo_gateway::config::{load_config, GatewayConfig};
use limo_gateway::lifecycle::{build_gateway, signals};
use limo_gateway::net::tls::load_tls_config;
use limo_gateway::observability::{logging, metrics};
use limo_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "limo-gateway")]
#[command(about = "Booking API gateway that keeps the upstream API key server-side", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    if args.check {
        println!("Configuration OK");
        return Ok(());
    }

    logging::init(&config.observability)?;

    tracing::info!("limo-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_path = %config.gateway.mount_path,
        request_timeout_secs = config.timeouts.request_secs,
        tls = config.listener.tls.is_some(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let gateway = build_gateway(&config)?;
    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, gateway);

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        signals::forward_signals(&shutdown).await;
    });

    match tls {
        Some(tls) => {
            let addr: SocketAddr = bind_address.parse()?;
            let rustls = load_tls_config(&tls).await?;
            server.run_tls(addr, rustls, shutdown_rx).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            tracing::info!(address = %listener.local_addr()?, "Listening for connections");
            server.run(listener, shutdown_rx).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
