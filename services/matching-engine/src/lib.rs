//! Matching engine service
//!
//! Single-instance, single-threaded order matching engine implementing
//! price-time priority over per-instrument limit order books.
//!
//! **Key invariants:**
//! - Price-time priority strictly enforced
//! - Deterministic matching (same inputs, same outputs)
//! - Conservation of quantity
//! - Trade price is always the resting (maker) order's price

pub mod book;
pub mod command;
pub mod engine;
pub mod matching;
pub mod registry;
pub mod report;

pub use command::Command;
pub use engine::MatchingEngine;
