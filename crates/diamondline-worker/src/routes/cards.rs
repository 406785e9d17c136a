//! Routes for tracked cards.

use axum::extract::{Path, State};
use axum::{
    Json, Router,
    routing::{get, post},
};
use diamondline_cards::application::query_handlers::{GetCardByExternalId, PlayerCardView};
use diamondline_cards::domain::values::{CardExternalId, SeasonYear};
use diamondline_core::error::DomainError;
use diamondline_reconciliation::tracker::TrackResult;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/v1/seasons/{season}/cards/track
#[instrument(skip(state))]
async fn track_cards(
    State(state): State<AppState>,
    Path(season): Path<u16>,
) -> Result<Json<TrackResult>, ApiError> {
    info!("handling track_cards job");

    let result = state
        .service
        .track_cards(SeasonYear::new(season), &state.cancel)
        .await?;

    Ok(Json(result))
}

/// GET /api/v1/seasons/{season}/cards/{card_external_id}
#[instrument(skip(state))]
async fn get_card(
    State(state): State<AppState>,
    Path((season, card_external_id)): Path<(u16, Uuid)>,
) -> Result<Json<PlayerCardView>, ApiError> {
    let query = GetCardByExternalId {
        season: SeasonYear::new(season),
        card_external_id: CardExternalId::new(card_external_id),
    };

    let card = state
        .dispatcher
        .query(query)
        .await?
        .ok_or(DomainError::AggregateNotFound(card_external_id))?;

    Ok(Json(PlayerCardView::from(&card)))
}

/// Returns the router for tracked cards.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/seasons/{season}/cards/track", post(track_cards))
        .route(
            "/api/v1/seasons/{season}/cards/{card_external_id}",
            get(get_card),
        )
}
