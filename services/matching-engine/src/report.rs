//! Read-only reporting projections
//!
//! Renders the trade log and the outstanding-liquidity report. The
//! outstanding report pairs bid and ask levels by list index, not by
//! price: a row's bid and ask need not be economically related, and a
//! side with fewer levels renders empty fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use types::numeric::{Price, Quantity};
use types::order::Side;

use crate::engine::MatchingEngine;

/// Aggregate outstanding liquidity at one price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    pub price: Price,
    pub quantity: Quantity,
}

impl fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.price, self.quantity)
    }
}

/// Render all trade lines in log order
pub fn trade_lines(engine: &MatchingEngine) -> Vec<String> {
    engine.trades().iter().map(ToString::to_string).collect()
}

/// Pair bid and ask levels by list index into report rows
///
/// Each row is `bid_price,bid_quantity,ask_price,ask_quantity`; a
/// missing side renders as two empty fields.
pub fn outstanding_rows(bids: &[LevelSummary], asks: &[LevelSummary]) -> Vec<String> {
    let rows = bids.len().max(asks.len());
    (0..rows)
        .map(|index| {
            let bid = bids
                .get(index)
                .map_or_else(|| ",".to_string(), ToString::to_string);
            let ask = asks
                .get(index)
                .map_or_else(|| ",".to_string(), ToString::to_string);
            format!("{bid},{ask}")
        })
        .collect()
}

/// Render the full outstanding report
///
/// Instruments appear in order of first appearance, each preceded by a
/// `===SYMBOL===` header line.
pub fn render_outstanding(engine: &MatchingEngine) -> Vec<String> {
    let mut lines = Vec::new();
    for symbol in engine.symbols() {
        lines.push(format!("==={symbol}==="));
        let bids = engine.levels(symbol, Side::BUY);
        let asks = engine.levels(symbol, Side::SELL);
        lines.extend(outstanding_rows(&bids, &asks));
    }
    lines
}
