use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the webhook bridge
#[derive(Error, Debug)]
pub enum TradehookError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Signal errors
    #[error("Invalid signal: {0}")]
    InvalidSignal(String),

    // Balance and sizing errors
    #[error("Balance unavailable: {0}")]
    BalanceUnavailable(String),

    #[error("Insufficient balance: {0} available")]
    InsufficientBalance(Decimal),

    // Order submission errors
    #[error("Order rejected by exchange: {0}")]
    ExchangeRejected(String),

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    // Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    // Network errors
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for TradehookError
pub type Result<T> = std::result::Result<T, TradehookError>;
