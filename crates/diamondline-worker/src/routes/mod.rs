//! Route modules.

use axum::Router;

use crate::state::AppState;

pub mod cards;
pub mod health;
pub mod reconciliation;

/// Returns every route of the worker.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(cards::router())
        .merge(reconciliation::router())
}
