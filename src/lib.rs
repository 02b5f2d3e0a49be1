pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
pub mod handler;
pub mod notify;
pub mod server;
pub mod signing;
pub mod sizing;

// Re-export commonly used types
pub use config::AppConfig;
pub use domain::{MarketOrder, OrderAck, OrderOutcome, OrderSide, OutcomeStatus, TradeAction};
pub use error::{Result, TradehookError};
pub use exchange::{ExchangeApi, KucoinClient};
pub use handler::SignalHandler;
pub use notify::{Notifier, TelegramNotifier};
pub use signing::{Credentials, RequestSigner};
