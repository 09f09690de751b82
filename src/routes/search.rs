//! Handler for marketplace search.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use tracing::instrument;

use crate::error::AppError;
use crate::etsy::{Listing, SearchQuery};
use crate::state::AppState;

/// Searches active Etsy listings and returns them in app format.
///
/// Query parameters: `q` (required), `loc` (accepted, unused), `limit`
/// (default 24, clamped to 1..=48).
#[instrument(name = "routes::search", skip(state, params))]
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Listing>>, AppError> {
    let Query(query) = params.map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))?;

    let listings = state.search.search(&query).await?;
    Ok(Json(listings))
}
