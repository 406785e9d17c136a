//! Diamondline player card bounded context.
//!
//! Responsible for the player card aggregate, its rating history, the roster
//! change records published by the external feed, and the ports through
//! which the reconciliation engine reaches the card catalog and the feed.

pub mod application;
pub mod domain;
