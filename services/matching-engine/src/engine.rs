//! Matching engine core
//!
//! Owns every per-instrument book, the order registry, and the trade
//! log. Lifecycle operations mutate the books through the registry's
//! location keys; matching runs only as a side effect of the order that
//! is itself inserted or amended, sweeping the opposite ladder under
//! strict price-then-time priority. Trade prices are always the resting
//! (maker) order's price.

use std::collections::HashMap;

use tracing::debug;
use types::errors::{EngineError, OrderError};
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::Side;
use types::trade::Trade;

use crate::book::{AskBook, BidBook};
use crate::command::Command;
use crate::matching::{crossing, TradeLog};
use crate::registry::{OrderLocation, OrderRegistry};
use crate::report::LevelSummary;

/// Order book for a single instrument
#[derive(Debug, Clone, Default)]
struct OrderBook {
    bids: BidBook,
    asks: AskBook,
}

/// Main matching engine
///
/// One instance owns all mutable state; commands are applied one at a
/// time in input order, so replaying an identical command sequence
/// reproduces identical trades and outstanding state.
#[derive(Debug, Default)]
pub struct MatchingEngine {
    /// Order books per instrument
    books: HashMap<Symbol, OrderBook>,
    /// Instruments in order of first appearance
    symbol_order: Vec<Symbol>,
    /// Live-order locations and the filled set
    registry: OrderRegistry,
    /// Append-only trade log
    trade_log: TradeLog,
}

impl MatchingEngine {
    /// Create a new empty matching engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a parsed command, returning the trades it generated
    pub fn apply(&mut self, command: &Command) -> Result<Vec<Trade>, EngineError> {
        match command {
            Command::Insert {
                order_id,
                symbol,
                side,
                price,
                quantity,
            } => {
                debug!(order_id = %order_id, symbol = %symbol, "insert");
                self.create_order(*order_id, symbol.clone(), *side, *price, *quantity)?;
                Ok(self.process_trade(*order_id))
            }
            Command::Amend {
                order_id,
                price,
                quantity,
            } => {
                debug!(order_id = %order_id, "amend");
                self.update_order(*order_id, *price, *quantity)?;
                Ok(self.process_trade(*order_id))
            }
            Command::Pull { order_id } => {
                debug!(order_id = %order_id, "pull");
                self.delete_order(*order_id)?;
                Ok(Vec::new())
            }
        }
    }

    /// Parse and apply one command line
    pub fn apply_text(&mut self, line: &str) -> Result<Vec<Trade>, EngineError> {
        let command: Command = line.parse().map_err(EngineError::Command)?;
        self.apply(&command)
    }

    /// Insert a new order at the tail of its price level
    ///
    /// Fails with `Duplicate` if the identifier already denotes a live
    /// order on the same instrument. The instrument is registered before
    /// the duplicate check, matching the engine's reporting behavior.
    pub fn create_order(
        &mut self,
        order_id: OrderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), OrderError> {
        if !self.books.contains_key(&symbol) {
            self.books.insert(symbol.clone(), OrderBook::default());
            self.symbol_order.push(symbol.clone());
        }

        if let Some(existing) = self.registry.location(order_id) {
            if existing.symbol == symbol {
                return Err(OrderError::Duplicate { order_id, symbol });
            }
        }

        let book = self.books.entry(symbol.clone()).or_default();
        let slot = match side {
            Side::BUY => book.bids.insert(price, order_id, quantity),
            Side::SELL => book.asks.insert(price, order_id, quantity),
        };
        self.registry.insert(
            order_id,
            OrderLocation {
                symbol,
                side,
                price,
                slot,
            },
        );
        Ok(())
    }

    /// Amend a live order
    ///
    /// An unchanged price with a strictly smaller quantity shrinks the
    /// order in place and keeps its time priority. Any other case is a
    /// pull of the old order followed by a fresh insert at the tail of
    /// the (possibly new) price level, losing time priority.
    pub fn update_order(
        &mut self,
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), OrderError> {
        let location = self.registry.amendable_location(order_id)?.clone();
        let Some(book) = self.books.get_mut(&location.symbol) else {
            return Err(OrderError::Unknown { order_id });
        };

        let level = match location.side {
            Side::BUY => book.bids.level_mut(location.price),
            Side::SELL => book.asks.level_mut(location.price),
        };
        let Some(current) = level
            .as_ref()
            .and_then(|level| level.get(location.slot))
            .map(|order| order.quantity)
        else {
            return Err(OrderError::Unknown { order_id });
        };

        if location.price == price && quantity < current {
            // In-place shrink: queue position unchanged
            if let Some(level) = level {
                level.set_quantity(location.slot, quantity);
            }
            Ok(())
        } else {
            self.delete_order(order_id)?;
            self.create_order(order_id, location.symbol, location.side, price, quantity)
        }
    }

    /// Pull a live order from its ladder and the registry
    pub fn delete_order(&mut self, order_id: OrderId) -> Result<(), OrderError> {
        self.registry.amendable_location(order_id)?;
        let Some(location) = self.registry.remove(order_id) else {
            return Err(OrderError::Unknown { order_id });
        };

        if let Some(book) = self.books.get_mut(&location.symbol) {
            match location.side {
                Side::BUY => book.bids.remove(location.price, location.slot),
                Side::SELL => book.asks.remove(location.price, location.slot),
            };
        }
        Ok(())
    }

    /// Sweep the opposite ladder with `order_id` as the taker
    ///
    /// Assumes the taker is currently resting in its ladder, which holds
    /// immediately after `create_order` or `update_order`. Returns the
    /// trades generated by this sweep, in generation order; they are
    /// also appended to the trade log.
    pub fn process_trade(&mut self, order_id: OrderId) -> Vec<Trade> {
        let Self {
            books,
            registry,
            trade_log,
            ..
        } = self;

        let Some(location) = registry.location(order_id).cloned() else {
            return Vec::new();
        };
        let Some(book) = books.get_mut(&location.symbol) else {
            return Vec::new();
        };

        let taker_quantity = match location.side {
            Side::BUY => book.bids.level(location.price),
            Side::SELL => book.asks.level(location.price),
        }
        .and_then(|level| level.get(location.slot))
        .map(|order| order.quantity);
        let Some(taker_quantity) = taker_quantity else {
            return Vec::new();
        };

        let (trades, remaining) = match location.side {
            Side::BUY => Self::sweep_asks(
                &mut book.asks,
                registry,
                trade_log,
                &location.symbol,
                order_id,
                location.price,
                taker_quantity,
            ),
            Side::SELL => Self::sweep_bids(
                &mut book.bids,
                registry,
                trade_log,
                &location.symbol,
                order_id,
                location.price,
                taker_quantity,
            ),
        };

        // The taker is touched only if matching actually reduced it
        if remaining < taker_quantity {
            if remaining.is_zero() {
                match location.side {
                    Side::BUY => book.bids.remove(location.price, location.slot),
                    Side::SELL => book.asks.remove(location.price, location.slot),
                };
                registry.mark_filled(order_id);
            } else {
                let level = match location.side {
                    Side::BUY => book.bids.level_mut(location.price),
                    Side::SELL => book.asks.level_mut(location.price),
                };
                if let Some(level) = level {
                    level.set_quantity(location.slot, remaining);
                }
            }
        }

        if !trades.is_empty() {
            debug!(order_id = %order_id, trades = trades.len(), "sweep complete");
        }
        trades
    }

    /// Match a buying taker against the ask ladder, best price first
    #[allow(clippy::too_many_arguments)]
    fn sweep_asks(
        asks: &mut AskBook,
        registry: &mut OrderRegistry,
        trade_log: &mut TradeLog,
        symbol: &Symbol,
        taker_id: OrderId,
        taker_price: Price,
        mut remaining: Quantity,
    ) -> (Vec<Trade>, Quantity) {
        let mut trades = Vec::new();

        while !remaining.is_zero() {
            let Some(best_price) = asks.best_price() else {
                break;
            };
            if !crossing::buy_crosses(taker_price, best_price) {
                break;
            }
            let Some(level) = asks.level_mut(best_price) else {
                break;
            };

            while let Some((slot, maker)) = level.front() {
                let maker_id = maker.order_id;
                let maker_quantity = maker.quantity;

                if remaining > maker_quantity {
                    // Full fill of the maker; the sweep continues
                    trades.push(trade_log.record(
                        symbol.clone(),
                        best_price,
                        maker_quantity,
                        taker_id,
                        maker_id,
                    ));
                    remaining = remaining.saturating_sub(maker_quantity);
                    level.remove(slot);
                    registry.mark_filled(maker_id);
                } else {
                    // Taker consumed; the maker survives with its
                    // remainder, even when that remainder is zero
                    trades.push(trade_log.record(
                        symbol.clone(),
                        best_price,
                        remaining,
                        taker_id,
                        maker_id,
                    ));
                    level.set_quantity(slot, maker_quantity.saturating_sub(remaining));
                    remaining = Quantity::zero();
                    break;
                }
            }

            asks.remove_empty_level(best_price);
        }

        (trades, remaining)
    }

    /// Match a selling taker against the bid ladder, best price first
    #[allow(clippy::too_many_arguments)]
    fn sweep_bids(
        bids: &mut BidBook,
        registry: &mut OrderRegistry,
        trade_log: &mut TradeLog,
        symbol: &Symbol,
        taker_id: OrderId,
        taker_price: Price,
        mut remaining: Quantity,
    ) -> (Vec<Trade>, Quantity) {
        let mut trades = Vec::new();

        while !remaining.is_zero() {
            let Some(best_price) = bids.best_price() else {
                break;
            };
            if !crossing::sell_crosses(taker_price, best_price) {
                break;
            }
            let Some(level) = bids.level_mut(best_price) else {
                break;
            };

            while let Some((slot, maker)) = level.front() {
                let maker_id = maker.order_id;
                let maker_quantity = maker.quantity;

                if remaining > maker_quantity {
                    trades.push(trade_log.record(
                        symbol.clone(),
                        best_price,
                        maker_quantity,
                        taker_id,
                        maker_id,
                    ));
                    remaining = remaining.saturating_sub(maker_quantity);
                    level.remove(slot);
                    registry.mark_filled(maker_id);
                } else {
                    trades.push(trade_log.record(
                        symbol.clone(),
                        best_price,
                        remaining,
                        taker_id,
                        maker_id,
                    ));
                    level.set_quantity(slot, maker_quantity.saturating_sub(remaining));
                    remaining = Quantity::zero();
                    break;
                }
            }

            bids.remove_empty_level(best_price);
        }

        (trades, remaining)
    }

    /// All trades since engine start, in generation order
    pub fn trades(&self) -> &[Trade] {
        self.trade_log.all()
    }

    /// Instruments that have ever had an order, in order of first
    /// appearance
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbol_order
    }

    /// Outstanding (price, quantity) levels for one side of an
    /// instrument, in the side's priority order
    ///
    /// Levels whose aggregate quantity is zero are omitted.
    pub fn levels(&self, symbol: &Symbol, side: Side) -> Vec<LevelSummary> {
        let Some(book) = self.books.get(symbol) else {
            return Vec::new();
        };
        let summaries = match side {
            Side::BUY => book.bids.summaries(),
            Side::SELL => book.asks.summaries(),
        };
        summaries
            .into_iter()
            .map(|(price, quantity)| LevelSummary { price, quantity })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(text: &str) -> Price {
        text.parse().unwrap()
    }

    fn insert(
        engine: &mut MatchingEngine,
        id: u64,
        symbol: &str,
        side: Side,
        px: &str,
        qty: u64,
    ) -> Vec<Trade> {
        engine
            .create_order(
                OrderId::new(id),
                Symbol::new(symbol),
                side,
                price(px),
                Quantity::new(qty),
            )
            .unwrap();
        engine.process_trade(OrderId::new(id))
    }

    fn level_pairs(engine: &MatchingEngine, symbol: &str, side: Side) -> Vec<(String, u64)> {
        engine
            .levels(&Symbol::new(symbol), side)
            .into_iter()
            .map(|summary| (summary.price.to_string(), summary.quantity.value()))
            .collect()
    }

    #[test]
    fn test_resting_order_no_cross() {
        let mut engine = MatchingEngine::new();
        let trades = insert(&mut engine, 20, "TSLA", Side::BUY, "412", 31);
        assert!(trades.is_empty());

        let trades = insert(&mut engine, 30, "TSLA", Side::SELL, "510.7", 27);
        assert!(trades.is_empty());

        assert_eq!(
            level_pairs(&engine, "TSLA", Side::BUY),
            vec![("412".to_string(), 31)]
        );
        assert_eq!(
            level_pairs(&engine, "TSLA", Side::SELL),
            vec![("510.7".to_string(), 27)]
        );
    }

    #[test]
    fn test_partial_cross_leaves_maker_remainder() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "AAPL", Side::BUY, "10.00", 100);
        let trades = insert(&mut engine, 2, "AAPL", Side::SELL, "9.00", 40);

        assert_eq!(trades.len(), 1);
        // Execution at the maker's price
        assert_eq!(trades[0].to_string(), "AAPL,10,40,2,1");

        // Maker keeps its remainder; taker is gone
        assert_eq!(
            level_pairs(&engine, "AAPL", Side::BUY),
            vec![("10".to_string(), 60)]
        );
        assert!(level_pairs(&engine, "AAPL", Side::SELL).is_empty());
        assert!(engine.registry.is_filled(OrderId::new(2)));
    }

    #[test]
    fn test_duplicate_rejected_on_same_instrument() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 5, "X", Side::BUY, "1", 1);

        let err = engine
            .create_order(
                OrderId::new(5),
                Symbol::new("X"),
                Side::BUY,
                price("2"),
                Quantity::new(1),
            )
            .unwrap_err();
        assert_eq!(
            err,
            OrderError::Duplicate {
                order_id: OrderId::new(5),
                symbol: Symbol::new("X"),
            }
        );
    }

    #[test]
    fn test_duplicate_scope_is_per_instrument() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 5, "X", Side::BUY, "1", 1);

        // Same identifier on another instrument is accepted; the
        // registry entry now points at the newer order while the first
        // keeps resting in its ladder
        insert(&mut engine, 5, "Y", Side::BUY, "2", 2);
        assert_eq!(
            level_pairs(&engine, "X", Side::BUY),
            vec![("1".to_string(), 1)]
        );
        assert_eq!(
            level_pairs(&engine, "Y", Side::BUY),
            vec![("2".to_string(), 2)]
        );
        assert_eq!(
            engine.registry.location(OrderId::new(5)).unwrap().symbol,
            Symbol::new("Y")
        );
    }

    #[test]
    fn test_amend_and_pull_unknown_order() {
        let mut engine = MatchingEngine::new();
        assert_eq!(
            engine.update_order(OrderId::new(7), price("1"), Quantity::new(1)),
            Err(OrderError::Unknown {
                order_id: OrderId::new(7)
            })
        );
        assert_eq!(
            engine.delete_order(OrderId::new(7)),
            Err(OrderError::Unknown {
                order_id: OrderId::new(7)
            })
        );
    }

    #[test]
    fn test_amend_and_pull_filled_order() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::BUY, "10", 5);
        insert(&mut engine, 2, "X", Side::SELL, "10", 9);

        // Order 1 was fully consumed as maker
        assert_eq!(
            engine.update_order(OrderId::new(1), price("10"), Quantity::new(1)),
            Err(OrderError::AlreadyFilled {
                order_id: OrderId::new(1)
            })
        );
        assert_eq!(
            engine.delete_order(OrderId::new(1)),
            Err(OrderError::AlreadyFilled {
                order_id: OrderId::new(1)
            })
        );
    }

    #[test]
    fn test_time_priority_within_level() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::SELL, "10", 30);
        insert(&mut engine, 2, "X", Side::SELL, "10", 30);

        let trades = insert(&mut engine, 3, "X", Side::BUY, "10", 40);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].maker_order_id, OrderId::new(1));
        assert_eq!(trades[0].quantity, Quantity::new(30));
        assert_eq!(trades[1].maker_order_id, OrderId::new(2));
        assert_eq!(trades[1].quantity, Quantity::new(10));
    }

    #[test]
    fn test_price_priority_across_levels() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::SELL, "11", 10);
        insert(&mut engine, 2, "X", Side::SELL, "10", 10);

        let trades = insert(&mut engine, 3, "X", Side::BUY, "11", 20);
        assert_eq!(trades.len(), 2);
        // Lowest ask first, each at the maker's price
        assert_eq!(trades[0].maker_order_id, OrderId::new(2));
        assert_eq!(trades[0].price, price("10"));
        assert_eq!(trades[1].maker_order_id, OrderId::new(1));
        assert_eq!(trades[1].price, price("11"));
    }

    #[test]
    fn test_amend_shrink_keeps_priority() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::SELL, "10", 30);
        insert(&mut engine, 2, "X", Side::SELL, "10", 30);

        engine
            .update_order(OrderId::new(1), price("10"), Quantity::new(5))
            .unwrap();
        engine.process_trade(OrderId::new(1));

        let trades = insert(&mut engine, 3, "X", Side::BUY, "10", 5);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].maker_order_id, OrderId::new(1));
    }

    #[test]
    fn test_amend_reprice_loses_priority() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::SELL, "10", 30);
        insert(&mut engine, 2, "X", Side::SELL, "10.5", 30);

        // Repricing order 1 onto order 2's level puts it behind order 2
        engine
            .update_order(OrderId::new(1), price("10.5"), Quantity::new(30))
            .unwrap();
        engine.process_trade(OrderId::new(1));

        let trades = insert(&mut engine, 3, "X", Side::BUY, "10.5", 30);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].maker_order_id, OrderId::new(2));
    }

    #[test]
    fn test_amend_increase_loses_priority() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::SELL, "10", 30);
        insert(&mut engine, 2, "X", Side::SELL, "10", 30);

        // Same price but larger quantity re-queues order 1 at the tail
        engine
            .update_order(OrderId::new(1), price("10"), Quantity::new(40))
            .unwrap();
        engine.process_trade(OrderId::new(1));

        let trades = insert(&mut engine, 3, "X", Side::BUY, "10", 30);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].maker_order_id, OrderId::new(2));
    }

    #[test]
    fn test_amend_can_newly_cross() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::SELL, "11", 10);
        insert(&mut engine, 2, "X", Side::BUY, "10", 10);

        engine
            .update_order(OrderId::new(2), price("11"), Quantity::new(10))
            .unwrap();
        let trades = engine.process_trade(OrderId::new(2));

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, price("11"));
        assert_eq!(trades[0].taker_order_id, OrderId::new(2));
    }

    #[test]
    fn test_exact_fill_maker_survives_with_zero_remainder() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::SELL, "10", 25);
        let trades = insert(&mut engine, 2, "X", Side::BUY, "10", 25);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, Quantity::new(25));

        // The taker is filled; the maker survives with remainder zero
        // and only drops out of the level report
        assert!(engine.registry.is_filled(OrderId::new(2)));
        assert!(!engine.registry.is_filled(OrderId::new(1)));
        assert!(level_pairs(&engine, "X", Side::SELL).is_empty());

        // A later sweep consumes the zero-remainder survivor with a
        // zero-quantity trade
        let trades = insert(&mut engine, 3, "X", Side::BUY, "10", 5);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, Quantity::zero());
        assert_eq!(trades[0].maker_order_id, OrderId::new(1));
        assert!(engine.registry.is_filled(OrderId::new(1)));
    }

    #[test]
    fn test_pull_removes_from_levels() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "X", Side::BUY, "10", 5);
        insert(&mut engine, 2, "X", Side::BUY, "10", 7);

        engine.delete_order(OrderId::new(1)).unwrap();
        assert_eq!(
            level_pairs(&engine, "X", Side::BUY),
            vec![("10".to_string(), 7)]
        );
    }

    #[test]
    fn test_symbols_in_first_appearance_order() {
        let mut engine = MatchingEngine::new();
        insert(&mut engine, 1, "TSLA", Side::BUY, "1", 1);
        insert(&mut engine, 2, "AAPL", Side::BUY, "1", 1);
        insert(&mut engine, 3, "TSLA", Side::SELL, "9", 1);

        let symbols: Vec<&str> = engine.symbols().iter().map(Symbol::as_str).collect();
        assert_eq!(symbols, vec!["TSLA", "AAPL"]);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut engine = MatchingEngine::new();
        engine.apply_text("INSERT,1,AAPL,BUY,10.00,100").unwrap();
        let trades = engine.apply_text("INSERT,2,AAPL,SELL,9.00,40").unwrap();

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].to_string(), "AAPL,10,40,2,1");

        engine.apply_text("AMEND,1,10.00,50").unwrap();
        engine.apply_text("PULL,1").unwrap();
        assert!(level_pairs(&engine, "AAPL", Side::BUY).is_empty());
    }

    #[test]
    fn test_apply_propagates_errors() {
        let mut engine = MatchingEngine::new();
        let err = engine.apply_text("PULL,9").unwrap_err();
        assert!(matches!(err, EngineError::Order(OrderError::Unknown { .. })));

        let err = engine.apply_text("NOPE,9").unwrap_err();
        assert!(matches!(err, EngineError::Command(_)));
    }
}
