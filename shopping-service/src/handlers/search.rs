use anyhow::anyhow;
use axum::{
    extract::{Query, State},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{SearchOnlineParams, SearchOnlineResponse},
    startup::AppState,
};

/// Proxy a query to the product search provider.
///
/// Provider failures keep their status code; see
/// [`crate::services::ProductSearchClient::search`].
pub async fn search_online(
    State(state): State<AppState>,
    Query(params): Query<SearchOnlineParams>,
) -> Result<Json<SearchOnlineResponse>, AppError> {
    let query = params
        .query
        .filter(|query| !query.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow!("Query parameter is required")))?;

    let results = state
        .product_search
        .search(&query)
        .await
        .map_err(|e| e.context("An error occurred"))?;

    Ok(Json(SearchOnlineResponse { results }))
}
