//! Append-only trade log
//!
//! Trades are appended in the exact order the sweep generates them and
//! carry a monotonic sequence number marking their log position.

use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::trade::Trade;

/// The engine's append-only trade log
#[derive(Debug, Clone, Default)]
pub struct TradeLog {
    trades: Vec<Trade>,
    next_sequence: u64,
}

impl TradeLog {
    /// Create an empty trade log starting at sequence 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a trade at the maker's price
    ///
    /// Returns a copy of the recorded trade.
    pub fn record(
        &mut self,
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
        taker_order_id: OrderId,
        maker_order_id: OrderId,
    ) -> Trade {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let trade = Trade::new(
            sequence,
            symbol,
            price,
            quantity,
            taker_order_id,
            maker_order_id,
        );
        self.trades.push(trade.clone());
        trade
    }

    /// All trades since engine start, in generation order
    pub fn all(&self) -> &[Trade] {
        &self.trades
    }

    /// Number of trades recorded
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    /// Check if no trades have been recorded
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_order() {
        let mut log = TradeLog::new();

        log.record(
            Symbol::new("AAPL"),
            "9".parse().unwrap(),
            Quantity::new(40),
            OrderId::new(2),
            OrderId::new(1),
        );
        log.record(
            Symbol::new("AAPL"),
            "9.5".parse().unwrap(),
            Quantity::new(10),
            OrderId::new(3),
            OrderId::new(1),
        );

        assert_eq!(log.len(), 2);
        assert_eq!(log.all()[0].quantity, Quantity::new(40));
        assert_eq!(log.all()[1].quantity, Quantity::new(10));
    }

    #[test]
    fn test_sequence_is_monotonic() {
        let mut log = TradeLog::new();

        let first = log.record(
            Symbol::new("X"),
            "1".parse().unwrap(),
            Quantity::new(1),
            OrderId::new(2),
            OrderId::new(1),
        );
        let second = log.record(
            Symbol::new("X"),
            "1".parse().unwrap(),
            Quantity::new(1),
            OrderId::new(3),
            OrderId::new(1),
        );

        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
    }
}
