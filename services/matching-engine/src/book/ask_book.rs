//! Ask (sell-side) ladder
//!
//! Maintains sell orders sorted by price ascending (best ask first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;

use types::ids::OrderId;
use types::numeric::{Price, Quantity};

use super::price_level::{PriceLevel, RestingOrder, Slot};

/// Ask (sell) side of one instrument's book
///
/// Levels are visited lowest price first. At each price level, orders
/// are maintained in arrival order.
#[derive(Debug, Clone, Default)]
pub struct AskBook {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskBook {
    /// Create a new empty ask book
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the tail of its price level, creating the
    /// level if absent; returns the order's slot within the level
    pub fn insert(&mut self, price: Price, order_id: OrderId, quantity: Quantity) -> Slot {
        self.levels.entry(price).or_default().push_back(order_id, quantity)
    }

    /// Remove the order at (price, slot); drops the level once no
    /// orders remain in it
    pub fn remove(&mut self, price: Price, slot: Slot) -> Option<RestingOrder> {
        let level = self.levels.get_mut(&price)?;
        let removed = level.remove(slot);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    /// Get the level at an exact price
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Get mutable access to the level at an exact price
    pub fn level_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Get the best (lowest) ask price
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Drop the level at `price` if it no longer holds any orders
    pub fn remove_empty_level(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    /// Aggregate (price, quantity) per level in priority order
    ///
    /// Levels whose aggregate quantity is zero are omitted.
    pub fn summaries(&self) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .filter(|(_, level)| !level.total_quantity().is_zero())
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Check if the ask book has no levels
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
