//! Shopping-list item handlers.
//!
//! Each handler performs exactly one store call.

use anyhow::anyhow;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

use crate::{
    dtos::{
        AddItemRequest, AddItemResponse, ClearListResponse, CountResponse, DeleteItemParams,
        GenerateIdResponse, ItemListResponse, MessageResponse, SearchItemParams,
        SearchItemResponse,
    },
    startup::AppState,
};

pub async fn add_item(
    State(state): State<AppState>,
    payload: Result<Json<AddItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddItemResponse>), AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection, "Rejected add-item body");
        AppError::BadRequest(anyhow!("Invalid input data"))
    })?;
    let item = payload.into_new_item()?;

    tracing::info!(
        item_id = %item.id(),
        name = %item.name(),
        quantity = item.quantity(),
        "Adding item"
    );

    let item_id = state
        .store
        .create(item)
        .await
        .map_err(|e| e.context("Failed to add item"))?;

    Ok((
        StatusCode::CREATED,
        Json(AddItemResponse {
            message: "Item added successfully".to_string(),
            item_id,
        }),
    ))
}

pub async fn view_list(State(state): State<AppState>) -> Result<Json<ItemListResponse>, AppError> {
    let items = state
        .store
        .list_all()
        .await
        .map_err(|e| e.context("Error fetching items"))?;

    Ok(Json(ItemListResponse { items }))
}

pub async fn count_items(State(state): State<AppState>) -> Result<Json<CountResponse>, AppError> {
    let count = state
        .store
        .count()
        .await
        .map_err(|e| e.context("Error counting items"))?;

    Ok(Json(CountResponse { count }))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Query(params): Query<DeleteItemParams>,
) -> Result<Json<MessageResponse>, AppError> {
    let item_id = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow!("Item ID is required")))?;

    let deleted = state
        .store
        .delete(&item_id)
        .await
        .map_err(|e| e.context("Failed to delete item"))?;

    if deleted == 0 {
        return Err(AppError::NotFound(anyhow!("Item not found")));
    }

    tracing::info!(item_id = %item_id, "Item deleted");

    Ok(Json(MessageResponse {
        message: format!("Item with ID {} deleted successfully", item_id),
    }))
}

pub async fn clear_list(
    State(state): State<AppState>,
) -> Result<Json<ClearListResponse>, AppError> {
    let deleted_count = state
        .store
        .clear_all()
        .await
        .map_err(|e| e.context("Error clearing the list"))?;

    tracing::info!(deleted_count, "Shopping list cleared");

    Ok(Json(ClearListResponse {
        message: format!("{} items cleared from the list.", deleted_count),
        deleted_count,
    }))
}

pub async fn generate_id() -> Json<GenerateIdResponse> {
    Json(GenerateIdResponse {
        unique_id: Uuid::new_v4().to_string(),
    })
}

pub async fn search_item(
    State(state): State<AppState>,
    Query(params): Query<SearchItemParams>,
) -> Result<Json<SearchItemResponse>, AppError> {
    let keyword = params
        .keyword
        .filter(|keyword| !keyword.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow!("Keyword is required")))?;

    let results = state
        .store
        .search(&keyword)
        .await
        .map_err(|e| e.context("An error occurred"))?;

    Ok(Json(SearchItemResponse { results }))
}
