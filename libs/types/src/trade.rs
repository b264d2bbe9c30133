//! Trade execution types

use crate::ids::{OrderId, Symbol};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An executed trade between a taker and a maker order
///
/// Immutable once appended to the trade log. The execution price is
/// always the resting (maker) order's price; `sequence` is the trade's
/// position in the append-only log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Monotonic log position
    pub sequence: u64,
    pub symbol: Symbol,
    /// Execution price (the maker's price)
    pub price: Price,
    /// Executed quantity
    pub quantity: Quantity,
    /// The order that initiated matching
    pub taker_order_id: OrderId,
    /// The resting order matched against
    pub maker_order_id: OrderId,
}

impl Trade {
    /// Create a new trade at the given log position
    pub fn new(
        sequence: u64,
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
        taker_order_id: OrderId,
        maker_order_id: OrderId,
    ) -> Self {
        Self {
            sequence,
            symbol,
            price,
            quantity,
            taker_order_id,
            maker_order_id,
        }
    }
}

impl fmt::Display for Trade {
    /// Render the wire line: `symbol,price,quantity,taker_id,maker_id`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.symbol, self.price, self.quantity, self.taker_order_id, self.maker_order_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_wire_line() {
        let trade = Trade::new(
            1,
            Symbol::new("AAPL"),
            "9.00".parse().unwrap(),
            Quantity::new(40),
            OrderId::new(2),
            OrderId::new(1),
        );

        // Price text is canonical: trailing zeros stripped
        assert_eq!(trade.to_string(), "AAPL,9,40,2,1");
    }

    #[test]
    fn test_trade_wire_line_fractional_price() {
        let trade = Trade::new(
            7,
            Symbol::new("TSLA"),
            "510.7".parse().unwrap(),
            Quantity::new(27),
            OrderId::new(30),
            OrderId::new(20),
        );

        assert_eq!(trade.to_string(), "TSLA,510.7,27,30,20");
    }

    #[test]
    fn test_trade_serialization() {
        let trade = Trade::new(
            3,
            Symbol::new("TSLA"),
            "412".parse().unwrap(),
            Quantity::new(5),
            OrderId::new(9),
            OrderId::new(4),
        );

        let json = serde_json::to_string(&trade).unwrap();
        let deserialized: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deserialized);
    }
}
