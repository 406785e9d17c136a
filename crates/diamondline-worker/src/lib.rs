//! Diamondline worker: HTTP shell around the reconciliation engine.

pub mod adapters;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
