//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_core::services::{
    CatalogService, CommentService, PostService, ProfileService, Repositories,
};
use blogicum_infra::{Argon2PasswordService, DatabaseConfig, InMemoryStore, JwtTokenService};

#[cfg(feature = "rate-limit")]
use blogicum_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use blogicum_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub profiles: ProfileService,
    pub catalog: CatalogService,
    pub tokens: Arc<dyn TokenService>,
    #[cfg(feature = "rate-limit")]
    pub rate_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build the application state, connecting to PostgreSQL when configured.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = repositories(config.database.as_ref()).await;
        let state = Self::with_repositories(repos, Arc::new(Argon2PasswordService::new()), config);

        tracing::info!("Application state initialized");
        state
    }

    pub fn with_repositories(
        repos: Repositories,
        passwords: Arc<dyn PasswordService>,
        config: &AppConfig,
    ) -> Self {
        Self {
            posts: PostService::new(repos.clone()),
            comments: CommentService::new(repos.clone()),
            profiles: ProfileService::new(repos.clone(), passwords),
            catalog: CatalogService::new(repos),
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            #[cfg(feature = "rate-limit")]
            rate_limiter: Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())),
        }
    }
}

fn in_memory() -> Repositories {
    Arc::new(InMemoryStore::new()).repositories()
}

#[cfg(feature = "postgres")]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    use blogicum_infra::database::{
        PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
        PostgresPostRepository, PostgresUserRepository, connect,
    };
    use migration::{Migrator, MigratorTrait};

    let Some(config) = db_config else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return in_memory();
    };

    let db = match connect(config).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database. Using in-memory fallback.");
            return in_memory();
        }
    };

    if config.run_migrations {
        match Migrator::up(&db, None).await {
            Ok(()) => tracing::info!("Migrations applied"),
            Err(e) => tracing::error!(error = %e, "Failed to apply migrations"),
        }
    }

    Repositories {
        users: Arc::new(PostgresUserRepository::new(db.clone())),
        categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
        locations: Arc::new(PostgresLocationRepository::new(db.clone())),
        posts: Arc::new(PostgresPostRepository::new(db.clone())),
        comments: Arc::new(PostgresCommentRepository::new(db)),
    }
}

#[cfg(not(feature = "postgres"))]
async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
    if db_config.is_some() {
        tracing::warn!("Built without postgres feature - ignoring DATABASE_URL");
    }
    tracing::info!("Running with the in-memory store");
    in_memory()
}
