use service_core::observability::init_tracing;
use shopping_service::{config::ShoppingConfig, services::init_metrics, Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ShoppingConfig::load()?;

    init_tracing(
        "shopping-service",
        &config.common.log_level,
        config.otlp_endpoint.as_deref(),
    );
    init_metrics()?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        e
    })?;
    application.run_until_stopped().await?;

    Ok(())
}
