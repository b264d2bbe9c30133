//! Matching core module
//!
//! Contains crossing detection and the append-only trade log.

pub mod crossing;
pub mod executor;

pub use executor::TradeLog;
