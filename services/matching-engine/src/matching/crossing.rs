//! Crossing detection logic
//!
//! Determines when a taker price reaches or passes an opposite-side
//! resting price, permitting a trade.

use types::numeric::Price;
use types::order::Side;

/// Check if a buying taker crosses a resting ask
///
/// A buy crosses every ask priced at or below its limit.
pub fn buy_crosses(taker_price: Price, ask_price: Price) -> bool {
    ask_price <= taker_price
}

/// Check if a selling taker crosses a resting bid
///
/// A sell crosses every bid priced at or above its limit.
pub fn sell_crosses(taker_price: Price, bid_price: Price) -> bool {
    bid_price >= taker_price
}

/// Check if a taker crosses a resting price on the opposite side
pub fn taker_crosses(taker_side: Side, taker_price: Price, resting_price: Price) -> bool {
    match taker_side {
        Side::BUY => buy_crosses(taker_price, resting_price),
        Side::SELL => sell_crosses(taker_price, resting_price),
    }
}
