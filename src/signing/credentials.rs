use std::fmt;

use crate::error::{Result, TradehookError};

/// API credentials for signed exchange requests.
///
/// The secret and passphrase never appear in logs; the Debug impl redacts
/// them.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub api_passphrase: String,
}

impl Credentials {
    pub fn new(api_key: String, api_secret: String, api_passphrase: String) -> Self {
        Self {
            api_key,
            api_secret,
            api_passphrase,
        }
    }

    /// Load from environment variables, reporting every missing variable at
    /// once so a misconfigured deployment fails with the full list.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let api_key = require_env("KUCOIN_API_KEY", &mut missing);
        let api_secret = require_env("KUCOIN_API_SECRET", &mut missing);
        let api_passphrase = require_env("KUCOIN_API_PASSPHRASE", &mut missing);

        if !missing.is_empty() {
            return Err(TradehookError::Config(config::ConfigError::Message(
                format!("missing environment variables: {}", missing.join(", ")),
            )));
        }

        Ok(Self::new(api_key, api_secret, api_passphrase))
    }
}

pub(crate) fn require_env(name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            missing.push(name);
            String::new()
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_passphrase", &"<redacted>")
            .finish()
    }
}
