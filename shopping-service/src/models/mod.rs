//! Domain models for the shopping service.

pub mod item;
pub mod search_result;

pub use item::{Item, NewItem};
pub use search_result::SearchResult;
