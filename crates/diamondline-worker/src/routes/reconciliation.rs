//! Routes that run reconciliation jobs.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::post};
use diamondline_cards::domain::values::SeasonYear;
use diamondline_reconciliation::coordinator::BatchResult;
use diamondline_reconciliation::history_sync::HistorySyncResult;
use tracing::{info, instrument};

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/v1/seasons/{season}/roster-updates/sync
#[instrument(skip(state))]
async fn sync_roster_updates(
    State(state): State<AppState>,
    Path(season): Path<u16>,
) -> Result<Json<Vec<BatchResult>>, ApiError> {
    info!("handling sync_roster_updates job");

    let results = state
        .service
        .sync_roster_updates(SeasonYear::new(season), &state.cancel)
        .await?;

    Ok(Json(results))
}

/// POST /api/v1/seasons/{season}/history/sync
#[instrument(skip(state))]
async fn sync_history(
    State(state): State<AppState>,
    Path(season): Path<u16>,
) -> Result<Json<HistorySyncResult>, ApiError> {
    info!("handling sync_history job");

    let result = state
        .service
        .sync_history(SeasonYear::new(season), &state.cancel)
        .await?;

    Ok(Json(result))
}

/// Returns the router for reconciliation jobs.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/seasons/{season}/roster-updates/sync",
            post(sync_roster_updates),
        )
        .route("/api/v1/seasons/{season}/history/sync", post(sync_history))
}
