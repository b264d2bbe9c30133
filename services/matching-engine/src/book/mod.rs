//! Order book infrastructure module
//!
//! Contains price levels and the bid/ask ladders.

pub mod ask_book;
pub mod bid_book;
pub mod price_level;

pub use ask_book::AskBook;
pub use bid_book::BidBook;
pub use price_level::{PriceLevel, RestingOrder, Slot};
