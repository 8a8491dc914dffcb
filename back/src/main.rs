use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use clap::Parser;
use todos_back::{app, AppState, DEFAULT_DATA_FILE, DEFAULT_PORT};
use tokio::time;

const STORE_INTERVAL: time::Duration = time::Duration::from_secs(300);
const SHUTDOWN_GRACE: time::Duration = time::Duration::from_secs(10);

/// Reference backend for the todo list.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, env = "TODOS_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// RON file the todos are persisted to.
    #[arg(long, env = "TODOS_DATA", default_value = DEFAULT_DATA_FILE)]
    data: PathBuf,

    /// PEM certificate, serves HTTPS when given together with `--key`.
    #[arg(long, env = "SSL_CERT", requires = "key")]
    cert: Option<PathBuf>,

    /// PEM private key.
    #[arg(long, env = "SSL_KEY", requires = "cert")]
    key: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let state = Arc::new(AppState::load(&args.data)?);

    tokio::spawn({
        let state = state.clone();
        async move {
            loop {
                time::sleep(STORE_INTERVAL).await;
                if let Err(err) = state.store().await {
                    tracing::error!("Failed to store data: {:?}", err);
                }
            }
        }
    });

    let handle = Handle::new();

    tokio::spawn({
        let state = state.clone();
        let handle = handle.clone();
        async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for ctrl-c: {:?}", err);
                return;
            }

            tracing::info!("shutting down");
            if let Err(err) = state.store().await {
                tracing::error!("Failed to store data: {:?}", err);
            }
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    let addr = SocketAddr::from(([0; 4], args.port));
    let service = app(state.clone()).into_make_service();

    match (args.cert, args.key) {
        (Some(cert), Some(key)) => {
            let config = RustlsConfig::from_pem_file(cert, key).await?;
            tracing::info!(%addr, "listening with tls");
            axum_server::bind_rustls(addr, config)
                .handle(handle)
                .serve(service)
                .await?;
        }
        _ => {
            tracing::info!(%addr, "listening");
            axum_server::bind(addr).handle(handle).serve(service).await?;
        }
    }

    Ok(())
}
