use rust_decimal::Decimal;

use crate::domain::OrderSide;
use crate::error::{Result, TradehookError};

/// Decimal places accepted for quote-currency `funds` on market buys
const FUNDS_SCALE: u32 = 2;
/// Decimal places accepted for base-currency `size` on market sells
const SIZE_SCALE: u32 = 4;

/// Convert an available balance into an order quantity the exchange accepts.
///
/// Buys spend the quote currency (`funds`, 2 decimal places); sells dispose
/// of the base currency (`size`, 4 decimal places). Excess digits are
/// dropped, never rounded up, so the quantity can never exceed the balance.
///
/// Fails with `InsufficientBalance` when the balance is not positive, or
/// when it is positive dust that truncates to zero.
pub fn order_quantity(side: OrderSide, available: Decimal) -> Result<Decimal> {
    if available <= Decimal::ZERO {
        return Err(TradehookError::InsufficientBalance(available));
    }

    let scale = match side {
        OrderSide::Buy => FUNDS_SCALE,
        OrderSide::Sell => SIZE_SCALE,
    };

    let quantity = available.trunc_with_scale(scale);
    if quantity <= Decimal::ZERO {
        return Err(TradehookError::InsufficientBalance(available));
    }

    Ok(quantity)
}
