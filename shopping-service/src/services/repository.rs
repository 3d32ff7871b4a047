//! Item store gateway.
//!
//! `ItemStore` is the seam between the HTTP handlers and the document
//! collection. `MongoItemStore` is the production implementation; the
//! in-memory one lives in [`super::memory`].

use crate::models::{Item, NewItem};
use anyhow::anyhow;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, IndexModel,
};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert a new item and return its id.
    async fn create(&self, item: NewItem) -> Result<String, AppError>;

    /// Every item, in store-native order.
    async fn list_all(&self) -> Result<Vec<Item>, AppError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Item>, AppError>;

    /// Case-insensitive substring match on `name`.
    async fn search(&self, keyword: &str) -> Result<Vec<Item>, AppError>;

    /// Returns the number of removed items, 0 or 1.
    async fn delete(&self, id: &str) -> Result<u64, AppError>;

    async fn clear_all(&self) -> Result<u64, AppError>;

    async fn count(&self) -> Result<u64, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;

    async fn close(&self) {}
}

/// Reject blank ids before they reach the store.
pub fn check_id(id: &str) -> Result<(), AppError> {
    if id.trim().is_empty() {
        return Err(AppError::InvalidId(id.to_string()));
    }
    Ok(())
}

/// Reject blank search keywords.
pub fn check_keyword(keyword: &str) -> Result<(), AppError> {
    if keyword.trim().is_empty() {
        return Err(AppError::BadRequest(anyhow!("Keyword is required")));
    }
    Ok(())
}

/// Matches the id as stored by clients (a string) and, when it parses as one,
/// as a store-generated ObjectId.
fn id_filter(id: &str) -> Result<Document, AppError> {
    check_id(id)?;

    Ok(match ObjectId::parse_str(id) {
        Ok(oid) => doc! { "_id": { "$in": [id, oid] } },
        Err(_) => doc! { "_id": id },
    })
}

/// Item as stored in MongoDB. `_id` is kept as raw BSON because documents
/// created by the store carry an ObjectId while client-created ones carry a
/// string.
#[derive(Debug, Serialize, Deserialize)]
struct ItemDocument {
    #[serde(rename = "_id")]
    id: Bson,
    name: String,
    quantity: i64,
}

impl From<ItemDocument> for Item {
    fn from(document: ItemDocument) -> Self {
        let id = match document.id {
            Bson::String(id) => id,
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };

        Item {
            id,
            name: document.name,
            quantity: document.quantity,
        }
    }
}

impl From<NewItem> for ItemDocument {
    fn from(item: NewItem) -> Self {
        ItemDocument {
            id: Bson::String(item.id().to_string()),
            name: item.name().to_string(),
            quantity: item.quantity(),
        }
    }
}

#[derive(Clone)]
pub struct MongoItemStore {
    client: MongoClient,
    items: Collection<ItemDocument>,
}

impl MongoItemStore {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, collection = %collection, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::DatabaseError(anyhow!(e.to_string()))
        })?;
        let items = client.database(database).collection(collection);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");

        Ok(Self { client, items })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().name("name_idx".to_string()).build())
            .build();

        self.items
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create name index: {}", e);
                AppError::DatabaseError(anyhow!(e.to_string()))
            })?;

        tracing::info!("Item indexes initialized");
        Ok(())
    }

    fn projection() -> FindOptions {
        FindOptions::builder()
            .projection(doc! { "_id": 1, "name": 1, "quantity": 1 })
            .build()
    }

    async fn find(&self, filter: Document) -> Result<Vec<Item>, AppError> {
        let cursor = self
            .items
            .find(filter, Some(Self::projection()))
            .await
            .map_err(|e| {
                tracing::error!("Failed to query items: {}", e);
                AppError::DatabaseError(anyhow!(e.to_string()))
            })?;

        let documents: Vec<ItemDocument> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to collect items: {}", e);
            AppError::DatabaseError(anyhow!(e.to_string()))
        })?;

        Ok(documents.into_iter().map(Item::from).collect())
    }
}

#[async_trait]
impl ItemStore for MongoItemStore {
    async fn create(&self, item: NewItem) -> Result<String, AppError> {
        let id = item.id().to_string();
        let document = ItemDocument::from(item);

        self.items.insert_one(&document, None).await.map_err(|e| {
            tracing::error!(item_id = %id, "Failed to insert item: {}", e);
            AppError::DatabaseError(anyhow!(e.to_string()))
        })?;

        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Item>, AppError> {
        self.find(doc! {}).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Item>, AppError> {
        let filter = id_filter(id)?;
        let options = mongodb::options::FindOneOptions::builder()
            .projection(doc! { "_id": 1, "name": 1, "quantity": 1 })
            .build();

        let document = self
            .items
            .find_one(filter, Some(options))
            .await
            .map_err(|e| {
                tracing::error!(item_id = %id, "Failed to find item: {}", e);
                AppError::DatabaseError(anyhow!(e.to_string()))
            })?;

        Ok(document.map(Item::from))
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Item>, AppError> {
        check_keyword(keyword)?;
        let filter = doc! {
            "name": { "$regex": regex::escape(keyword), "$options": "i" }
        };
        self.find(filter).await
    }

    async fn delete(&self, id: &str) -> Result<u64, AppError> {
        let filter = id_filter(id)?;
        let result = self.items.delete_one(filter, None).await.map_err(|e| {
            tracing::error!(item_id = %id, "Failed to delete item: {}", e);
            AppError::DatabaseError(anyhow!(e.to_string()))
        })?;

        Ok(result.deleted_count)
    }

    async fn clear_all(&self) -> Result<u64, AppError> {
        let result = self.items.delete_many(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to clear items: {}", e);
            AppError::DatabaseError(anyhow!(e.to_string()))
        })?;

        Ok(result.deleted_count)
    }

    async fn count(&self) -> Result<u64, AppError> {
        self.items.count_documents(doc! {}, None).await.map_err(|e| {
            tracing::error!("Failed to count items: {}", e);
            AppError::DatabaseError(anyhow!(e.to_string()))
        })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    async fn close(&self) {
        tracing::info!("Closing MongoDB client");
        self.client.clone().shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_ids_match_as_strings() {
        let filter = id_filter("123").expect("valid id");
        assert_eq!(filter, doc! { "_id": "123" });
    }

    #[test]
    fn object_id_shaped_ids_match_both_forms() {
        let hex = "65a1f0c2b3d4e5f601234567";
        let filter = id_filter(hex).expect("valid id");
        let oid = ObjectId::parse_str(hex).expect("valid object id");
        assert_eq!(filter, doc! { "_id": { "$in": [hex, oid] } });
    }

    #[test]
    fn blank_ids_are_malformed() {
        assert!(matches!(id_filter("  "), Err(AppError::InvalidId(_))));
    }

    #[test]
    fn store_generated_ids_are_rendered_as_hex() {
        let oid = ObjectId::new();
        let item = Item::from(ItemDocument {
            id: Bson::ObjectId(oid),
            name: "Bread".to_string(),
            quantity: 1,
        });
        assert_eq!(item.id, oid.to_hex());
    }
}
