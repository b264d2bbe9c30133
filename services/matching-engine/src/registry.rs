//! Order registry and filled-order tracking
//!
//! Maps every live order identifier to its location in the ladders so
//! amend and pull can reach an order without scanning price levels. The
//! filled set records identifiers fully consumed by matching; membership
//! is permanent and turns later amend/pull attempts into AlreadyFilled.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use types::errors::OrderError;
use types::ids::{OrderId, Symbol};
use types::numeric::Price;
use types::order::Side;

use crate::book::Slot;

/// Location of a live order: enough to find and remove it from its
/// level without invalidating other orders' locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLocation {
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub slot: Slot,
}

/// Registry of live and filled orders
#[derive(Debug, Clone, Default)]
pub struct OrderRegistry {
    live: HashMap<OrderId, OrderLocation>,
    filled: HashSet<OrderId>,
}

impl OrderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the location of a live order
    ///
    /// An existing entry for the same identifier is overwritten; the
    /// caller enforces the per-instrument duplicate rule before this.
    pub fn insert(&mut self, order_id: OrderId, location: OrderLocation) {
        self.live.insert(order_id, location);
    }

    /// Look up a live order's location
    pub fn location(&self, order_id: OrderId) -> Option<&OrderLocation> {
        self.live.get(&order_id)
    }

    /// Remove a live order, returning its last location
    pub fn remove(&mut self, order_id: OrderId) -> Option<OrderLocation> {
        self.live.remove(&order_id)
    }

    /// Retire an order that matching fully consumed
    ///
    /// The identifier leaves the live map and permanently joins the
    /// filled set.
    pub fn mark_filled(&mut self, order_id: OrderId) {
        self.live.remove(&order_id);
        self.filled.insert(order_id);
    }

    /// Check whether an identifier was fully consumed by matching
    pub fn is_filled(&self, order_id: OrderId) -> bool {
        self.filled.contains(&order_id)
    }

    /// Gate shared by amend and pull: AlreadyFilled wins over Unknown
    pub fn amendable_location(&self, order_id: OrderId) -> Result<&OrderLocation, OrderError> {
        if self.filled.contains(&order_id) {
            return Err(OrderError::AlreadyFilled { order_id });
        }
        self.live
            .get(&order_id)
            .ok_or(OrderError::Unknown { order_id })
    }

    /// Number of live orders
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}
