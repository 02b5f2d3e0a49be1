use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use sha2::Sha256;

use crate::error::{Result, TradehookError};
use crate::signing::Credentials;

type HmacSha256 = Hmac<Sha256>;

/// API key version implemented by this signer. Version 2 keys require the
/// passphrase header to carry the signed passphrase, not the plaintext.
const API_KEY_VERSION: &str = "2";

/// Request signer for the exchange's HMAC authentication scheme.
///
/// Each request gets a fresh timestamp and a signature over
/// `timestamp + METHOD + path + body`, where `path` includes the query
/// string and `body` is the exact byte sequence that goes on the wire.
#[derive(Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Create HMAC-SHA256 signature over `message`, base64-encoded
    fn sign(&self, message: &str) -> Result<String> {
        let mut mac = HmacSha256::new_from_slice(self.credentials.api_secret.as_bytes())
            .map_err(|e| TradehookError::Auth(format!("HMAC init failed: {e}")))?;

        mac.update(message.as_bytes());
        let result = mac.finalize();

        Ok(BASE64.encode(result.into_bytes()))
    }

    /// Build the message to sign for a request
    fn canonical_message(timestamp: &str, method: &Method, path: &str, body: &str) -> String {
        format!("{timestamp}{}{path}{body}", method.as_str().to_uppercase())
    }

    /// Build authentication headers for a request. The timestamp is taken at
    /// call time, so headers must be built immediately before sending.
    pub fn auth_headers(&self, method: &Method, path: &str, body: &str) -> Result<HeaderMap> {
        let timestamp = Utc::now().timestamp_millis().to_string();
        let message = Self::canonical_message(&timestamp, method, path, body);
        let signature = self.sign(&message)?;
        let passphrase = self.sign(&self.credentials.api_passphrase)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("kc-api-key"),
            header_value(&self.credentials.api_key, "API key")?,
        );
        headers.insert(
            HeaderName::from_static("kc-api-sign"),
            header_value(&signature, "signature")?,
        );
        headers.insert(
            HeaderName::from_static("kc-api-timestamp"),
            header_value(&timestamp, "timestamp")?,
        );
        headers.insert(
            HeaderName::from_static("kc-api-passphrase"),
            header_value(&passphrase, "passphrase")?,
        );
        headers.insert(
            HeaderName::from_static("kc-api-key-version"),
            HeaderValue::from_static(API_KEY_VERSION),
        );

        Ok(headers)
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| TradehookError::Auth(format!("Invalid {what} header: {e}")))
}
