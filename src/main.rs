use std::path::PathBuf;

use clap::Parser;
use shelf::books::BookService;
use shelf::config::{Cli, Config, default_config_dir, default_config_path};
use shelf::handler::AppState;
use shelf::store;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // With --config the data (database file) lives next to the config file,
    // otherwise both live under ~/.shelf/
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            (Some(path), dir)
        }
        None => {
            let path = default_config_path();
            (path.exists().then_some(path), default_config_dir())
        }
    };

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {:?}: {}", data_dir, e);
        std::process::exit(1);
    }

    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("shelf.svc starting");

    let cfg = match &config_path {
        Some(path) => Config::new(&path.to_string_lossy()).unwrap_or_else(|e| {
            tracing::error!(error = %e, path = ?path, "failed to load config file");
            std::process::exit(1);
        }),
        None => {
            tracing::info!("no config file found, using defaults");
            Config::default()
        }
    };

    let book_store = store::open(&cfg.store, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup book store");
        std::process::exit(1);
    });

    let app = shelf::app(AppState::new(BookService::new(book_store)));

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    let cancellation_token = CancellationToken::new();
    let signal_token = cancellation_token.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            return;
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
        signal_token.cancel();
    });

    tracing::info!("shelf.svc running on {}", &address);
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(cancellation_token.cancelled_owned())
        .await
    {
        tracing::error!(error = %err, "server exited with error");
        std::process::exit(1);
    }

    tracing::info!("shelf.svc going off, graceful shutdown complete");
}
