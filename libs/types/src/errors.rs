//! Error taxonomy for the matching engine
//!
//! Every lifecycle operation and command parse reports one of these kinds
//! as an explicit result value; nothing is retried internally. A batch
//! driver that wants partial-batch resilience catches at the per-command
//! boundary.

use crate::ids::{OrderId, Symbol};
use thiserror::Error;

/// Order lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Insert reused an identifier still live on the same instrument
    #[error("order id {order_id} already exists for symbol {symbol}")]
    Duplicate { order_id: OrderId, symbol: Symbol },

    /// Amend/pull referenced an identifier that is not registered
    #[error("unknown order id: {order_id}")]
    Unknown { order_id: OrderId },

    /// Amend/pull referenced an identifier already fully matched
    #[error("order {order_id} is already filled")]
    AlreadyFilled { order_id: OrderId },
}

/// Command text parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unrecognized command type: {0}")]
    UnrecognizedCommandType(String),

    #[error("unrecognized order side: {0}")]
    UnrecognizedSide(String),

    #[error("malformed price text: {0}")]
    MalformedPrice(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("invalid integer in field `{field}`: {value}")]
    InvalidInteger { field: &'static str, value: String },
}

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    #[error("command error: {0}")]
    Command(#[from] CommandError),
}
