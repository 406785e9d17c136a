//! Diamondline Core: shared abstractions.
//!
//! This crate defines the error, time, command and cancellation types that
//! every other crate depends on. It contains no domain or infrastructure code.

pub mod cancel;
pub mod clock;
pub mod command;
pub mod error;
