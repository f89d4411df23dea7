use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use common::database::{self, DatabaseConfig};
use outfits::{AppState, catalog::Catalog, config::ServerConfig, create_router};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting outfit builder");

    let config = ServerConfig::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;
    database::run_migrations(&pool).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let catalog = Catalog::load(&config.catalog_path)?;
    if catalog.is_empty() {
        warn!("Catalog {} has no items", config.catalog_path.display());
    }

    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState::new(pool, catalog, config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Outfit builder listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
