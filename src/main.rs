use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::ExposeSecret;
use tracing::info;

use users_api::api::{RouterConfig, create_router_with_config};
use users_api::app::AppState;
use users_api::config::AppConfig;
use users_api::domain::DatabaseClient;
use users_api::infra::{PostgresClient, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format).context("failed to install tracing subscriber")?;

    let db = PostgresClient::new(
        config.database_url.expose_secret(),
        config.database.clone(),
    )
    .await
    .context("failed to connect to PostgreSQL")?;
    db.health_check()
        .await
        .context("database health check failed")?;

    let app_state = Arc::new(AppState::new(Arc::new(db), config.api_key.clone()));

    let router = create_router_with_config(
        app_state,
        RouterConfig {
            request_timeout: config.request_timeout,
        },
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    info!(addr = %config.listen_addr, "Server starting");

    axum::serve(listener, router).await?;

    Ok(())
}
