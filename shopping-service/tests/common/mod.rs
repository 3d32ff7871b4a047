use secrecy::Secret;
use service_core::config as core_config;
use shopping_service::config::{MongoConfig, ProductSearchConfig, ShoppingConfig};
use shopping_service::services::{InMemoryItemStore, ItemStore};
use shopping_service::Application;
use std::sync::Arc;

/// Nothing listens on the discard port, so provider calls fail fast.
const UNREACHABLE_PROVIDER: &str = "http://127.0.0.1:9";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn ItemStore>,
    pub client: reqwest::Client,
}

pub fn test_config(provider_url: &str) -> ShoppingConfig {
    ShoppingConfig {
        common: core_config::Config {
            port: 0, // Random port
            log_level: "debug".to_string(),
        },
        mongodb: MongoConfig {
            uri: Secret::new("mongodb://localhost:27017".to_string()),
            database: "services_test".to_string(),
            collection: "items".to_string(),
        },
        product_search: ProductSearchConfig {
            api_key: Secret::new("test-api-key".to_string()),
            api_host: "product-search.test".to_string(),
            base_url: provider_url.to_string(),
            timeout_secs: 5,
        },
        otlp_endpoint: None,
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_provider(UNREACHABLE_PROVIDER).await
    }

    pub async fn spawn_with_provider(provider_url: &str) -> Self {
        let store: Arc<dyn ItemStore> = Arc::new(InMemoryItemStore::new());

        let app = Application::build_with_store(test_config(provider_url), store.clone())
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn add_item(&self, id: &str, name: &str, quantity: i64) -> reqwest::Response {
        self.client
            .post(self.url("/add-item"))
            .json(&serde_json::json!({ "_id": id, "name": name, "quantity": quantity }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
