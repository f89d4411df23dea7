//! Application state shared across handlers

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::{
    catalog::Catalog,
    config::ServerConfig,
    rate_limiter::{RateLimiter, RateLimiterConfig},
    repositories::{LikeRepository, OutfitRepository, SessionRepository, UserRepository},
    session::SessionTokens,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub catalog: Arc<Catalog>,
    pub config: ServerConfig,
    pub user_repository: UserRepository,
    pub outfit_repository: OutfitRepository,
    pub like_repository: LikeRepository,
    pub session_repository: SessionRepository,
    pub session_tokens: SessionTokens,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Wire repositories and services around a migrated pool
    pub fn new(pool: SqlitePool, catalog: Catalog, config: ServerConfig) -> Self {
        let session_tokens = SessionTokens::new(&config.secret_key, config.session_expiry);

        Self {
            user_repository: UserRepository::new(pool.clone()),
            outfit_repository: OutfitRepository::new(pool.clone()),
            like_repository: LikeRepository::new(pool.clone()),
            session_repository: SessionRepository::new(pool.clone()),
            rate_limiter: RateLimiter::new(RateLimiterConfig::default()),
            db_pool: pool,
            catalog: Arc::new(catalog),
            config,
            session_tokens,
        }
    }
}
