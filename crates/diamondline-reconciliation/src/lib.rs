//! Diamondline roster reconciliation engine.
//!
//! Applies pending roster update batches to tracked player cards and
//! rebuilds each card's rating history from the current catalog snapshot
//! and the log of attribute deltas.
//!
//! Two paths share the same collaborators but differ in failure policy:
//!
//! - [`coordinator::RosterBatchCoordinator`] applies a batch as a unit. Any
//!   failed work item aborts the batch, which stays unacknowledged and is
//!   retried on the next cycle.
//! - [`history_sync::HistorySyncDriver`] backfills history card by card. A
//!   card that cannot be processed is logged and skipped.

pub mod applier;
pub mod classifier;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod history;
pub mod history_sync;
pub mod service;
pub mod tracker;
