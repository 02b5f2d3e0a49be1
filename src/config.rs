use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub exchange: ExchangeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Webhook listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// REST API endpoint for balance and order calls
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    /// Trading pair as BASE-QUOTE (e.g., "ETH-USDT")
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_rest_url() -> String {
    "https://api.kucoin.com".to_string()
}

fn default_symbol() -> String {
    "ETH-USDT".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            symbol: default_symbol(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ExchangeConfig {
    /// Split the configured symbol into (base, quote) assets.
    /// Returns None when the symbol is not of the BASE-QUOTE form.
    pub fn symbol_assets(&self) -> Option<(&str, &str)> {
        let (base, quote) = self.symbol.split_once('-')?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some((base, quote))
    }
}

impl AppConfig {
    /// Load configuration from a directory of TOML files plus the environment
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("TRADEHOOK_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (TRADEHOOK_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("TRADEHOOK")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.exchange.rest_url.trim().is_empty() {
            errors.push("exchange.rest_url must not be empty".to_string());
        }

        if self.exchange.symbol_assets().is_none() {
            errors.push(format!(
                "exchange.symbol must be of the BASE-QUOTE form, got '{}'",
                self.exchange.symbol
            ));
        }

        if self.exchange.request_timeout_secs == 0 {
            errors.push("exchange.request_timeout_secs must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
