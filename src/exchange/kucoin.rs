//! KuCoin REST adapter (native Rust, no external SDK dependency).

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ExchangeConfig;
use crate::domain::{MarketOrder, OrderAck, OrderSide};
use crate::error::{Result, TradehookError};
use crate::exchange::ExchangeApi;
use crate::signing::RequestSigner;

const ACCOUNTS_PATH: &str = "/api/v1/accounts";
const ORDERS_PATH: &str = "/api/v1/orders";

/// Business-level success code carried in the response envelope
const SUCCESS_CODE: &str = "200000";

/// Envelope wrapping every KuCoin REST payload
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    code: String,
    msg: Option<String>,
    data: Option<T>,
}

/// One account row from the accounts listing
#[derive(Debug, Clone, Deserialize)]
struct AccountEntry {
    currency: String,
    #[serde(rename = "type")]
    account_type: String,
    available: Decimal,
}

#[derive(Clone)]
pub struct KucoinClient {
    http: Client,
    base_url: String,
    symbol: String,
    signer: RequestSigner,
}

impl KucoinClient {
    pub fn new(config: &ExchangeConfig, signer: RequestSigner) -> Result<Self> {
        let http = Client::builder()
            .user_agent("tradehook/0.1")
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| {
                TradehookError::Internal(format!("failed to build KuCoin HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: config.rest_url.trim_end_matches('/').to_string(),
            symbol: config.symbol.clone(),
            signer,
        })
    }

    fn find_available(entries: &[AccountEntry], asset: &str, account_type: &str) -> Option<Decimal> {
        entries
            .iter()
            .find(|entry| entry.currency == asset && entry.account_type == account_type)
            .map(|entry| entry.available)
    }

    fn parse_order_ack(text: &str) -> Result<OrderAck> {
        let envelope: ApiEnvelope<Value> = serde_json::from_str(text).map_err(|_| {
            TradehookError::ExchangeRejected(format!("unparseable order response: {text}"))
        })?;

        if envelope.code != SUCCESS_CODE {
            return Err(TradehookError::ExchangeRejected(format!(
                "code {}: {}",
                envelope.code,
                envelope.msg.unwrap_or_default()
            )));
        }

        let data = envelope.data.unwrap_or(Value::Null);
        let order_id = data
            .get("orderId")
            .and_then(Value::as_str)
            .map(str::to_owned);

        match order_id {
            Some(order_id) => Ok(OrderAck {
                order_id,
                raw: data,
            }),
            None => Err(TradehookError::ExchangeRejected(format!(
                "order response missing orderId: {text}"
            ))),
        }
    }
}

#[async_trait]
impl ExchangeApi for KucoinClient {
    async fn available_balance(&self, asset: &str, account_type: &str) -> Result<Decimal> {
        // The query string is part of the signed path.
        let path = format!("{ACCOUNTS_PATH}?currency={asset}&type={account_type}");
        let url = format!("{}{}", self.base_url, path);
        let headers = self.signer.auth_headers(&Method::GET, &path, "")?;

        let resp = self
            .http
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| {
                TradehookError::BalanceUnavailable(format!("accounts request failed: {e}"))
            })?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            TradehookError::BalanceUnavailable(format!("accounts response read failed: {e}"))
        })?;

        if !status.is_success() {
            return Err(TradehookError::BalanceUnavailable(format!(
                "accounts API failed: status={status} body={text}"
            )));
        }

        let envelope: ApiEnvelope<Vec<AccountEntry>> = serde_json::from_str(&text).map_err(|e| {
            TradehookError::BalanceUnavailable(format!("invalid accounts response: {e}"))
        })?;

        if envelope.code != SUCCESS_CODE {
            return Err(TradehookError::BalanceUnavailable(format!(
                "accounts API error code {}: {}",
                envelope.code,
                envelope.msg.unwrap_or_default()
            )));
        }

        let entries = envelope.data.unwrap_or_default();
        let available = Self::find_available(&entries, asset, account_type).ok_or_else(|| {
            TradehookError::BalanceUnavailable(format!("no {account_type} account holds {asset}"))
        })?;

        debug!("Available {asset} in {account_type} account: {available}");
        Ok(available)
    }

    async fn place_market_order(&self, side: OrderSide, quantity: Decimal) -> Result<OrderAck> {
        let order = MarketOrder::new(side, &self.symbol, quantity);
        // Sign the exact body string that goes on the wire.
        let body = serde_json::to_string(&order)?;
        let headers = self.signer.auth_headers(&Method::POST, ORDERS_PATH, &body)?;

        info!(
            "Submitting {} market {side} order: clientOid={} {}",
            self.symbol,
            order.client_oid,
            order.sizing_field()
        );

        let resp = self
            .http
            .post(format!("{}{ORDERS_PATH}", self.base_url))
            .headers(headers)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| TradehookError::TransportFailure(format!("order request failed: {e}")))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            TradehookError::TransportFailure(format!("order response read failed: {e}"))
        })?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TradehookError::Auth(format!(
                "order authentication rejected: status={status} body={text}"
            )));
        }

        if !status.is_success() {
            return Err(TradehookError::ExchangeRejected(format!(
                "status={status} body={text}"
            )));
        }

        Self::parse_order_ack(&text)
    }
}
