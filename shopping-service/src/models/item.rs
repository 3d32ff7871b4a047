//! Shopping-list item model.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// One shopping-list entry as exposed over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub quantity: i64,
}

/// Creation input that has passed validation.
///
/// Every field is present, `id` and `name` are non-blank and `quantity` is
/// positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    id: String,
    name: String,
    quantity: i64,
}

impl NewItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
    ) -> Result<Self, AppError> {
        let id = id.into();
        let name = name.into();

        if id.trim().is_empty() || name.trim().is_empty() || quantity < 1 {
            return Err(AppError::BadRequest(anyhow!("Invalid input data")));
        }

        Ok(Self { id, name, quantity })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

impl From<NewItem> for Item {
    fn from(item: NewItem) -> Self {
        Item {
            id: item.id,
            name: item.name,
            quantity: item.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_accepts_complete_input() {
        let item = NewItem::new("123", "Test Item", 5).expect("valid item");
        assert_eq!(item.id(), "123");
        assert_eq!(item.name(), "Test Item");
        assert_eq!(item.quantity(), 5);
    }

    #[test]
    fn new_item_rejects_blank_fields_and_non_positive_quantity() {
        assert!(NewItem::new("", "Milk", 1).is_err());
        assert!(NewItem::new("1", "   ", 1).is_err());
        assert!(NewItem::new("1", "Milk", 0).is_err());
        assert!(NewItem::new("1", "Milk", -3).is_err());
    }

    #[test]
    fn item_serializes_id_as_underscore_id() {
        let item = Item {
            id: "abc".to_string(),
            name: "Eggs".to_string(),
            quantity: 12,
        };
        let json = serde_json::to_value(&item).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({ "_id": "abc", "name": "Eggs", "quantity": 12 })
        );
    }
}
