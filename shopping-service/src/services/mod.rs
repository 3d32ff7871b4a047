pub mod memory;
pub mod metrics;
pub mod product_search;
pub mod repository;

pub use memory::InMemoryItemStore;
pub use metrics::{get_metrics, init_metrics};
pub use product_search::ProductSearchClient;
pub use repository::{ItemStore, MongoItemStore};
