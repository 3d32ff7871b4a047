//! In-process item store for tests and database-less local runs.

use super::repository::{check_id, check_keyword, ItemStore};
use crate::models::{Item, NewItem};
use async_trait::async_trait;
use service_core::error::AppError;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryItemStore {
    items: RwLock<Vec<Item>>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn create(&self, item: NewItem) -> Result<String, AppError> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id == item.id()) {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "duplicate key: item {} already exists",
                item.id()
            )));
        }

        let item = Item::from(item);
        let id = item.id.clone();
        items.push(item);
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Item>, AppError> {
        Ok(self.items.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Item>, AppError> {
        check_id(id)?;
        Ok(self
            .items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned())
    }

    async fn search(&self, keyword: &str) -> Result<Vec<Item>, AppError> {
        check_keyword(keyword)?;
        let needle = keyword.to_lowercase();
        Ok(self
            .items
            .read()
            .await
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<u64, AppError> {
        check_id(id)?;
        let mut items = self.items.write().await;
        match items.iter().position(|item| item.id == id) {
            Some(index) => {
                items.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn clear_all(&self) -> Result<u64, AppError> {
        let mut items = self.items.write().await;
        let deleted = items.len() as u64;
        items.clear();
        Ok(deleted)
    }

    async fn count(&self) -> Result<u64, AppError> {
        Ok(self.items.read().await.len() as u64)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, quantity: i64) -> NewItem {
        NewItem::new(id, name, quantity).expect("valid item")
    }

    #[tokio::test]
    async fn create_then_get_returns_same_fields() {
        let store = InMemoryItemStore::new();
        let id = store.create(item("123", "Test Item", 5)).await.unwrap();

        let fetched = store.get_by_id(&id).await.unwrap().expect("item exists");
        assert_eq!(fetched.name, "Test Item");
        assert_eq!(fetched.quantity, 5);
    }

    #[tokio::test]
    async fn second_delete_reports_zero() {
        let store = InMemoryItemStore::new();
        store.create(item("123", "Test Item", 5)).await.unwrap();

        assert_eq!(store.delete("123").await.unwrap(), 1);
        assert_eq!(store.delete("123").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn clear_all_empties_the_list() {
        let store = InMemoryItemStore::new();
        store.create(item("1", "Milk", 1)).await.unwrap();
        store.create(item("2", "Bread", 2)).await.unwrap();

        assert_eq!(store.clear_all().await.unwrap(), 2);
        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(store.clear_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn search_ignores_case() {
        let store = InMemoryItemStore::new();
        store.create(item("1", "Test Item", 5)).await.unwrap();
        store.create(item("2", "Bananas", 6)).await.unwrap();

        let results = store.search("test").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Test Item");
    }

    #[tokio::test]
    async fn search_rejects_empty_keyword() {
        let store = InMemoryItemStore::new();
        assert!(matches!(
            store.search("").await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_ids_are_store_errors() {
        let store = InMemoryItemStore::new();
        store.create(item("1", "Milk", 1)).await.unwrap();

        assert!(matches!(
            store.create(item("1", "Milk", 1)).await,
            Err(AppError::DatabaseError(_))
        ));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_id_is_malformed() {
        let store = InMemoryItemStore::new();
        assert!(matches!(
            store.get_by_id(" ").await,
            Err(AppError::InvalidId(_))
        ));
    }
}
