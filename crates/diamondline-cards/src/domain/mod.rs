//! Domain layer for the card context.

pub mod aggregates;
pub mod attributes;
pub mod commands;
pub mod periods;
pub mod repository;
pub mod roster;
pub mod snapshot;
pub mod values;
