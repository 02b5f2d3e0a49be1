use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::{OrderOutcome, OrderSide, TradeAction};
use crate::exchange::ExchangeApi;
use crate::sizing;

/// Account type that holds tradable funds
const TRADE_ACCOUNT: &str = "trade";

/// Drives one validated signal through balance check, sizing and submission.
///
/// Every invocation terminates in exactly one `OrderOutcome`; failures along
/// the way select the outcome instead of propagating.
pub struct SignalHandler {
    exchange: Arc<dyn ExchangeApi>,
    base_asset: String,
    quote_asset: String,
}

impl SignalHandler {
    pub fn new(exchange: Arc<dyn ExchangeApi>, base_asset: String, quote_asset: String) -> Self {
        Self {
            exchange,
            base_asset,
            quote_asset,
        }
    }

    /// The asset a given side spends: buys spend quote, sells spend base.
    fn funding_asset(&self, side: OrderSide) -> &str {
        match side {
            OrderSide::Buy => &self.quote_asset,
            OrderSide::Sell => &self.base_asset,
        }
    }

    pub async fn handle(&self, action: TradeAction) -> OrderOutcome {
        let side = OrderSide::from(action);
        let asset = self.funding_asset(side);

        // Fresh read per signal; balances are never cached.
        let available = match self.exchange.available_balance(asset, TRADE_ACCOUNT).await {
            Ok(available) => available,
            Err(e) => {
                error!("Balance lookup for {asset} failed: {e}");
                return OrderOutcome::balance_unavailable(action, e.to_string());
            }
        };
        info!("{asset} available for {action}: {available}");

        let quantity = match sizing::order_quantity(side, available) {
            Ok(quantity) => quantity,
            Err(e) => {
                warn!("{action} skipped, {asset} cannot fund it: {e}");
                return OrderOutcome::insufficient(action, e.to_string());
            }
        };

        match self.exchange.place_market_order(side, quantity).await {
            Ok(ack) => {
                info!("{action} order acknowledged: orderId={}", ack.order_id);
                OrderOutcome::success(action, quantity, ack)
            }
            Err(e) => {
                error!("{action} order failed: {e}");
                OrderOutcome::rejected(action, quantity, e.to_string())
            }
        }
    }
}
