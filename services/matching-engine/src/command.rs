//! Command text protocol
//!
//! Comma-separated order-lifecycle commands:
//!
//! - `INSERT,<order_id>,<symbol>,<BUY|SELL>,<price>,<quantity>`
//! - `AMEND,<order_id>,<price>,<quantity>`
//! - `PULL,<order_id>`

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use types::errors::CommandError;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::Side;

/// A parsed order-lifecycle command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Insert a new order; it will attempt to cross immediately
    Insert {
        order_id: OrderId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
    },
    /// Amend an existing order's price and/or quantity
    Amend {
        order_id: OrderId,
        price: Price,
        quantity: Quantity,
    },
    /// Pull (cancel) an existing order
    Pull { order_id: OrderId },
}

fn field<'a>(
    parts: &'a [&str],
    index: usize,
    name: &'static str,
) -> Result<&'a str, CommandError> {
    parts
        .get(index)
        .copied()
        .ok_or(CommandError::MissingField(name))
}

fn integer(parts: &[&str], index: usize, name: &'static str) -> Result<u64, CommandError> {
    let text = field(parts, index, name)?;
    text.parse::<u64>().map_err(|_| CommandError::InvalidInteger {
        field: name,
        value: text.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split(',').collect();
        let command_type = field(&parts, 0, "command_type")?;

        match command_type {
            "INSERT" => Ok(Command::Insert {
                order_id: OrderId::new(integer(&parts, 1, "order_id")?),
                symbol: Symbol::new(field(&parts, 2, "symbol")?),
                side: field(&parts, 3, "side")?.parse()?,
                price: field(&parts, 4, "price")?.parse()?,
                quantity: Quantity::new(integer(&parts, 5, "quantity")?),
            }),
            "AMEND" => Ok(Command::Amend {
                order_id: OrderId::new(integer(&parts, 1, "order_id")?),
                price: field(&parts, 2, "price")?.parse()?,
                quantity: Quantity::new(integer(&parts, 3, "quantity")?),
            }),
            "PULL" => Ok(Command::Pull {
                order_id: OrderId::new(integer(&parts, 1, "order_id")?),
            }),
            other => Err(CommandError::UnrecognizedCommandType(other.to_string())),
        }
    }
}
