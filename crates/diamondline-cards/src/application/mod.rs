//! Application layer for the card context.

pub mod command_handlers;
pub mod dispatch;
pub mod ports;
pub mod query_handlers;
