use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ShoppingConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub product_search: ProductSearchConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: Secret<String>,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Clone)]
pub struct ProductSearchConfig {
    pub api_key: Secret<String>,
    pub api_host: String,
    /// Scheme and host the `/search` path is appended to.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ProductSearchConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_host.is_empty() && !self.api_key.expose_secret().is_empty()
    }
}

impl ShoppingConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_host = get_env("RAPIDAPI_HOST", Some(""), is_prod)?;
        let base_url = match env::var("RAPIDAPI_BASE_URL") {
            Ok(url) => url,
            Err(_) => format!("https://{}", api_host),
        };

        Ok(ShoppingConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: Secret::new(get_env(
                    "MONGO_URI",
                    Some("mongodb://localhost:27017"),
                    is_prod,
                )?),
                database: get_env("MONGO_DATABASE", Some("services"), is_prod)?,
                collection: get_env("MONGO_COLLECTION", Some("items"), is_prod)?,
            },
            product_search: ProductSearchConfig {
                api_key: Secret::new(get_env("RAPIDAPI_KEY", Some(""), is_prod)?),
                api_host,
                base_url,
                timeout_secs: get_env(
                    "RAPIDAPI_TIMEOUT_SECS",
                    Some(&DEFAULT_PROVIDER_TIMEOUT_SECS.to_string()),
                    is_prod,
                )?
                .parse()
                .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS),
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok(),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
