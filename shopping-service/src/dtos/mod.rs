use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::Validate;

use crate::models::{Item, NewItem, SearchResult};

#[derive(Debug, Deserialize, Validate)]
pub struct AddItemRequest {
    #[serde(rename = "_id")]
    #[validate(required, length(min = 1))]
    pub id: Option<String>,
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    #[validate(required, range(min = 1))]
    pub quantity: Option<i64>,
}

impl AddItemRequest {
    pub fn into_new_item(self) -> Result<NewItem, AppError> {
        self.validate()?;

        match (self.id, self.name, self.quantity) {
            (Some(id), Some(name), Some(quantity)) => NewItem::new(id, name, quantity),
            _ => Err(AppError::BadRequest(anyhow::anyhow!("Invalid input data"))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddItemResponse {
    pub message: String,
    pub item_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemListResponse {
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteItemParams {
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClearListResponse {
    pub message: String,
    pub deleted_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateIdResponse {
    pub unique_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchItemParams {
    pub keyword: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchItemResponse {
    pub results: Vec<Item>,
}

#[derive(Debug, Deserialize)]
pub struct SearchOnlineParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchOnlineResponse {
    pub results: Vec<SearchResult>,
}
