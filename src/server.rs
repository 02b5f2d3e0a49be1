use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::domain::{OrderOutcome, TradeAction};
use crate::handler::SignalHandler;
use crate::notify::Notifier;

/// Webhook route the signal source posts to
pub const WEBHOOK_PATH: &str = "/webhook-eth";

/// Candidate action fields, tried in order
const ACTION_FIELDS: [&str; 3] = ["action", "signal", "type"];

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<SignalHandler>,
    pub notifier: Arc<dyn Notifier>,
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(handler: Arc<SignalHandler>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            handler,
            notifier,
            start_time: Utc::now(),
        }
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.start_time).num_seconds()
    }
}

/// Acknowledgment returned for every signal that enters order processing
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub signal: TradeAction,
    pub result: String,
    pub outcome: OrderOutcome,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: i64,
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(WEBHOOK_PATH, post(receive_webhook))
        .route("/health", get(get_health))
        .with_state(state)
        .layer(cors)
}

/// First non-empty string among the accepted action fields
fn extract_action(payload: &Value) -> Option<&str> {
    ACTION_FIELDS
        .iter()
        .filter_map(|field| payload.get(*field))
        .filter_map(Value::as_str)
        .find(|raw| !raw.is_empty())
}

fn empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn bad_request(message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// POST /webhook-eth: receive one trading signal.
///
/// Malformed payloads are rejected with 400 before order processing starts.
/// A signal that enters processing always answers 200; the outcome rides in
/// the body, whatever happened at the exchange.
async fn receive_webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<WebhookAck>, (StatusCode, Json<ErrorBody>)> {
    // Signal sources do not reliably set Content-Type, parse the raw body.
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(_) => return Err(bad_request("invalid JSON payload")),
    };

    if empty_payload(&payload) {
        return Err(bad_request("empty request body"));
    }

    let Some(raw_action) = extract_action(&payload) else {
        return Err(bad_request("no action specified"));
    };

    let action: TradeAction = match raw_action.parse() {
        Ok(action) => action,
        Err(e) => return Err(bad_request(e.to_string())),
    };

    info!("Webhook signal received: {action}");
    let outcome = state.handler.handle(action).await;

    let result = outcome.summary();
    state.notifier.notify(&result).await;

    Ok(Json(WebhookAck {
        signal: action,
        result,
        outcome,
    }))
}

/// GET /health: liveness probe
async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_seconds(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderAck;
    use crate::exchange::MockExchangeApi;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, text: &str) {
            self.messages.lock().unwrap().push(text.to_string());
        }
    }

    fn test_state(mock: MockExchangeApi) -> (AppState, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let handler = Arc::new(SignalHandler::new(
            Arc::new(mock),
            "ETH".to_string(),
            "USDT".to_string(),
        ));
        (AppState::new(handler, notifier.clone()), notifier)
    }

    fn idle_mock() -> MockExchangeApi {
        let mut mock = MockExchangeApi::new();
        mock.expect_available_balance().times(0);
        mock.expect_place_market_order().times(0);
        mock
    }

    async fn post_webhook(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(WEBHOOK_PATH)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    #[test]
    fn test_extract_action_field_fallback() {
        assert_eq!(extract_action(&json!({"action": "buy"})), Some("buy"));
        assert_eq!(extract_action(&json!({"signal": "sell"})), Some("sell"));
        assert_eq!(extract_action(&json!({"type": "BUY"})), Some("BUY"));

        // Earlier fields win
        assert_eq!(
            extract_action(&json!({"action": "buy", "signal": "sell"})),
            Some("buy")
        );
        // Empty strings and non-strings fall through to the next field
        assert_eq!(
            extract_action(&json!({"action": "", "signal": "sell"})),
            Some("sell")
        );
        assert_eq!(
            extract_action(&json!({"action": 5, "type": "sell"})),
            Some("sell")
        );

        assert_eq!(extract_action(&json!({"foo": "bar"})), None);
        assert_eq!(extract_action(&json!({"action": ""})), None);
    }

    #[test]
    fn test_empty_payload_shapes() {
        assert!(empty_payload(&Value::Null));
        assert!(empty_payload(&json!({})));
        assert!(empty_payload(&json!([])));
        assert!(!empty_payload(&json!({"action": "buy"})));
    }

    #[tokio::test]
    async fn test_malformed_json_rejected_before_processing() {
        let (state, notifier) = test_state(idle_mock());
        let (status, body) = post_webhook(create_router(state), "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid JSON payload");
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_body_rejected() {
        let (state, _) = test_state(idle_mock());
        let (status, body) = post_webhook(create_router(state), "{}").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "empty request body");
    }

    #[tokio::test]
    async fn test_missing_action_rejected() {
        let (state, _) = test_state(idle_mock());
        let (status, body) = post_webhook(create_router(state), r#"{"foo": "bar"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "no action specified");
    }

    #[tokio::test]
    async fn test_unsupported_action_rejected() {
        let (state, notifier) = test_state(idle_mock());
        let (status, body) = post_webhook(create_router(state), r#"{"action": "hold"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid signal: expected BUY or SELL, got 'hold'");
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_accepted_signal_flows_to_ack_and_notification() {
        let mut mock = MockExchangeApi::new();
        mock.expect_available_balance()
            .times(1)
            .returning(|_, _| Ok(dec!(500.999)));
        mock.expect_place_market_order()
            .times(1)
            .returning(|_, _| {
                Ok(OrderAck {
                    order_id: "oid-9".to_string(),
                    raw: json!({"orderId": "oid-9"}),
                })
            });

        let (state, notifier) = test_state(mock);
        let (status, body) = post_webhook(create_router(state), r#"{"action": "buy"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["signal"], "BUY");
        assert_eq!(body["outcome"]["status"], "SUCCEEDED");
        assert_eq!(body["outcome"]["quantity"], "500.99");

        let messages = notifier.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("✅ BUY"));
        assert_eq!(body["result"], messages[0]);
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (state, _) = test_state(idle_mock());
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }
}
