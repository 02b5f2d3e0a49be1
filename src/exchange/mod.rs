use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{OrderAck, OrderSide};
use crate::error::Result;

pub mod kucoin;

pub use kucoin::KucoinClient;

/// Exchange operations the signal pipeline depends on.
///
/// `available_balance` always reflects the live account; implementations
/// must not cache balances between calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Available (non-held) balance for `asset` in the account of the given
    /// type. Fails with `BalanceUnavailable` when the account cannot be read
    /// or no matching account exists.
    async fn available_balance(&self, asset: &str, account_type: &str) -> Result<Decimal>;

    /// Submit a market order for the client's configured trading pair, sized
    /// by `quantity` in the field matching `side`. Fails with `Auth`,
    /// `ExchangeRejected` or `TransportFailure`.
    async fn place_market_order(&self, side: OrderSide, quantity: Decimal) -> Result<OrderAck>;
}
