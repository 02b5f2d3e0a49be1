use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TradeAction;

/// Order side (buy or sell) in the exchange's wire form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

impl From<TradeAction> for OrderSide {
    fn from(action: TradeAction) -> Self {
        match action {
            TradeAction::Buy => OrderSide::Buy,
            TradeAction::Sell => OrderSide::Sell,
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Market,
}

/// Market order request in the exchange's wire form.
///
/// Buys are sized in quote currency via `funds`; sells in base currency via
/// `size`. Exactly one of the two is ever populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOrder {
    pub client_oid: String,
    pub side: OrderSide,
    pub symbol: String,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl MarketOrder {
    /// Build a market order for `quantity`, placed in the sizing field that
    /// matches `side`. The client order id is the submission timestamp in
    /// milliseconds, so ids increase monotonically across submissions.
    pub fn new(side: OrderSide, symbol: &str, quantity: Decimal) -> Self {
        let quantity = quantity.to_string();
        let (funds, size) = match side {
            OrderSide::Buy => (Some(quantity), None),
            OrderSide::Sell => (None, Some(quantity)),
        };

        Self {
            client_oid: Utc::now().timestamp_millis().to_string(),
            side,
            symbol: symbol.to_string(),
            order_type: OrderType::Market,
            funds,
            size,
        }
    }

    /// The populated sizing field as `name=value`, for log lines.
    pub fn sizing_field(&self) -> String {
        match (&self.funds, &self.size) {
            (Some(funds), _) => format!("funds={funds}"),
            (_, Some(size)) => format!("size={size}"),
            _ => "unsized".to_string(),
        }
    }
}

/// Successful order acknowledgment from the exchange
#[derive(Debug, Clone, Serialize)]
pub struct OrderAck {
    /// Exchange-assigned order id
    pub order_id: String,
    /// Success payload as returned by the exchange
    pub raw: Value,
}

/// Terminal state of one processed signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeStatus {
    /// Order submitted and acknowledged by the exchange
    Succeeded,
    /// Order submitted but refused, or never reached the exchange
    Rejected,
    /// Balance was readable but cannot fund an order
    Insufficient,
    /// Balance could not be read at all
    BalanceUnavailable,
}

/// What happened to one webhook signal, end to end.
///
/// Every signal that enters order processing produces exactly one of these,
/// whichever path it takes.
#[derive(Debug, Clone, Serialize)]
pub struct OrderOutcome {
    pub action: TradeAction,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<OrderAck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OrderOutcome {
    pub fn success(action: TradeAction, quantity: Decimal, order: OrderAck) -> Self {
        Self {
            action,
            status: OutcomeStatus::Succeeded,
            quantity: Some(quantity),
            order: Some(order),
            error: None,
        }
    }

    pub fn rejected(action: TradeAction, quantity: Decimal, detail: String) -> Self {
        Self {
            action,
            status: OutcomeStatus::Rejected,
            quantity: Some(quantity),
            order: None,
            error: Some(detail),
        }
    }

    pub fn insufficient(action: TradeAction, detail: String) -> Self {
        Self {
            action,
            status: OutcomeStatus::Insufficient,
            quantity: None,
            order: None,
            error: Some(detail),
        }
    }

    pub fn balance_unavailable(action: TradeAction, detail: String) -> Self {
        Self {
            action,
            status: OutcomeStatus::BalanceUnavailable,
            quantity: None,
            order: None,
            error: Some(detail),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }

    /// One-line human-readable result, shared by the HTTP response and the
    /// operator notification.
    pub fn summary(&self) -> String {
        match self.status {
            OutcomeStatus::Succeeded => {
                let response = self
                    .order
                    .as_ref()
                    .map(|ack| ack.raw.to_string())
                    .unwrap_or_default();
                format!("✅ {} executed successfully. Response: {response}", self.action)
            }
            OutcomeStatus::Rejected => format!(
                "❌ {} failed: {}",
                self.action,
                self.error.as_deref().unwrap_or("unknown error")
            ),
            OutcomeStatus::Insufficient | OutcomeStatus::BalanceUnavailable => format!(
                "❌ Could not complete {}: {}",
                self.action,
                self.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}
