//! Price level with a slot-keyed FIFO queue
//!
//! A price level contains all resting orders at one price on one side.
//! Each order is keyed by an arrival slot that is handed out
//! monotonically and never reused while the level lives, so iteration
//! in key order is time priority and removal by slot leaves every other
//! order's slot valid.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use types::ids::OrderId;
use types::numeric::Quantity;

/// Arrival key of an order within one price level
pub type Slot = u64;

/// A resting order at a price level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
    pub order_id: OrderId,
    /// Remaining quantity; may reach zero through the final subtraction
    /// of a sweep without the order leaving the level
    pub quantity: Quantity,
}

/// A price level containing orders at a specific price
///
/// Maintains strict FIFO ordering for time-priority matching along with
/// the aggregate remaining quantity at this price.
#[derive(Debug, Clone, Default)]
pub struct PriceLevel {
    /// Resting orders keyed by arrival slot (ascending = time order)
    orders: BTreeMap<Slot, RestingOrder>,
    /// Next slot to hand out
    next_slot: Slot,
    /// Aggregate remaining quantity at this level
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the tail of the queue (lowest time priority)
    ///
    /// Returns the order's slot, stable until the order is removed.
    pub fn push_back(&mut self, order_id: OrderId, quantity: Quantity) -> Slot {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.orders.insert(slot, RestingOrder { order_id, quantity });
        self.total_quantity += quantity;
        slot
    }

    /// Remove the order at `slot`
    ///
    /// Other orders keep their slots and relative order.
    pub fn remove(&mut self, slot: Slot) -> Option<RestingOrder> {
        let removed = self.orders.remove(&slot)?;
        self.total_quantity = self.total_quantity.saturating_sub(removed.quantity);
        Some(removed)
    }

    /// Get the order at `slot`
    pub fn get(&self, slot: Slot) -> Option<&RestingOrder> {
        self.orders.get(&slot)
    }

    /// Peek at the order with the highest time priority
    pub fn front(&self) -> Option<(Slot, &RestingOrder)> {
        self.orders.iter().next().map(|(slot, order)| (*slot, order))
    }

    /// Set a new remaining quantity for the order at `slot`, in place
    ///
    /// The order keeps its slot, and with it its time priority. The
    /// order stays in the level even if the new quantity is zero.
    pub fn set_quantity(&mut self, slot: Slot, new_quantity: Quantity) -> bool {
        if let Some(order) = self.orders.get_mut(&slot) {
            self.total_quantity = self
                .total_quantity
                .saturating_sub(order.quantity)
                + new_quantity;
            order.quantity = new_quantity;
            true
        } else {
            false
        }
    }

    /// Iterate orders in time order
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &RestingOrder)> {
        self.orders.iter().map(|(slot, order)| (*slot, order))
    }

    /// Check if the price level holds no orders at all
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Get the aggregate remaining quantity at this level
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Get the number of orders at this level
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}
