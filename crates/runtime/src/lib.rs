use std::sync::Arc;

use anyhow::{Context, Result};
use roster_config::AppConfig;
use roster_database::initialize_database;
use roster_identity::{HttpIdentityProvider, IdentityProvider};
use roster_teams::RevalidationHandle;
use sqlx::SqlitePool;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Everything the server binary needs wired up once at startup.
#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub revalidation: RevalidationHandle,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database).await?;

        let identity_provider = HttpIdentityProvider::new(&config.identity)
            .map_err(|e| anyhow::anyhow!("failed to build identity client: {e}"))?;

        info!(
            identity = %config.identity.base_url,
            "backend services ready"
        );

        Ok(Self {
            db_pool,
            identity_provider: Arc::new(identity_provider),
            revalidation: RevalidationHandle::default(),
        })
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
