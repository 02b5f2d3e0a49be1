use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tradehook::config::AppConfig;
use tradehook::error::{Result, TradehookError};
use tradehook::notify::Notifier;
use tradehook::server::{create_router, AppState};
use tradehook::{Credentials, KucoinClient, RequestSigner, SignalHandler, TelegramNotifier};

#[derive(Parser)]
#[command(name = "tradehook")]
#[command(version = "0.1.0")]
#[command(about = "Webhook-to-KuCoin order execution bridge", long_about = None)]
struct Cli {
    /// Config directory (reads default.toml plus TRADEHOOK_ENV overrides)
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Override the listen port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    info!("Starting tradehook webhook bridge");

    let config = match AppConfig::load_from(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(TradehookError::Config(e));
        }
    };

    if let Err(problems) = config.validate() {
        for p in &problems {
            error!("Configuration error: {}", p);
        }
        return Err(TradehookError::Config(config::ConfigError::Message(
            format!("{} configuration error(s)", problems.len()),
        )));
    }

    // Report every missing secret in one pass instead of failing on the first.
    let credentials = Credentials::from_env();
    let telegram = TelegramNotifier::from_env();
    let (credentials, telegram) = match (credentials, telegram) {
        (Ok(c), Ok(t)) => (c, t),
        (credentials, telegram) => {
            if let Err(e) = &credentials {
                error!("KuCoin credentials: {}", e);
            }
            if let Err(e) = &telegram {
                error!("Telegram settings: {}", e);
            }
            return Err(TradehookError::Config(config::ConfigError::Message(
                "missing required environment variables".into(),
            )));
        }
    };

    let (base_asset, quote_asset) = config
        .exchange
        .symbol_assets()
        .map(|(b, q)| (b.to_string(), q.to_string()))
        .ok_or_else(|| {
            TradehookError::Config(config::ConfigError::Message(format!(
                "symbol '{}' is not in BASE-QUOTE form",
                config.exchange.symbol
            )))
        })?;

    info!(
        "Trading {} ({}/{}) via {}",
        config.exchange.symbol, base_asset, quote_asset, config.exchange.rest_url
    );

    let signer = RequestSigner::new(credentials);
    let exchange = Arc::new(KucoinClient::new(&config.exchange, signer)?);
    let handler = Arc::new(SignalHandler::new(exchange, base_asset, quote_asset));
    let notifier: Arc<dyn Notifier> = Arc::new(telegram);

    notifier
        .notify("🤖 KuCoin trading bot active and waiting for signals.")
        .await;

    let state = AppState::new(handler, notifier);
    let app = create_router(state);

    let port = cli.port.unwrap_or(config.server.port);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Webhook server listening on http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| TradehookError::Internal(format!("Server error: {}", e)))?;

    info!("Shutdown complete");
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tradehook=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
