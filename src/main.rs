//! DAV blob store server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use dav_blobstore::config::{load_config, BlobstoreConfig};
use dav_blobstore::http::server::bind;
use dav_blobstore::lifecycle::signals::spawn_signal_listener;
use dav_blobstore::net::tls::load_tls_config;
use dav_blobstore::observability::{logging, metrics};
use dav_blobstore::{BlobServer, Shutdown};

#[derive(Parser)]
#[command(name = "dav-blobstore")]
#[command(about = "Serve a directory as an HTTP blob store", long_about = None)]
struct Cli {
    /// The path to the configuration file (.toml or .json)
    #[arg(long, alias = "configFile", default_value = "config.toml")]
    config_file: PathBuf,

    /// The host:port address to bind to (overrides listener.bind_address)
    #[arg(long, alias = "listenAddress")]
    listen_address: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = load_config(&cli.config_file, |config| {
        if let Some(address) = cli.listen_address {
            config.listener.bind_address = address;
        }
    });

    let level = config
        .as_ref()
        .map(|c| c.observability.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    logging::init_logging(&level);

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(
                config_file = %cli.config_file.display(),
                error = %err,
                "Failed to load config data"
            );
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("dav-blobstore v{} starting", env!("CARGO_PKG_VERSION"));

    match run(config).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Listen and serve failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: BlobstoreConfig) -> Result<(), Box<dyn std::error::Error>> {
    if !config.blobs_path.is_dir() {
        tracing::warn!(
            blobs_path = %config.blobs_path.display(),
            "Blobs path is not an existing directory"
        );
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_listener(shutdown.clone());

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = BlobServer::new(config);

    match tls {
        Some(tls) => {
            let rustls = load_tls_config(&tls).await?;
            let addr: SocketAddr = bind_address.parse()?;
            server.run_tls(addr, rustls, shutdown.token()).await?;
        }
        None => {
            let listener = bind(&bind_address).await?;
            server.run(listener, shutdown.token()).await?;
        }
    }

    Ok(())
}
