use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod adapters;
mod app;
mod config;
mod models;
mod routes;

use adapters::PgUserRepository;
use config::ServerConfig;
use tessera::{CachedUserRepository, InMemoryUserRepository, UserRepository, UserService};

/// Application service over whichever repository was configured at start-up
pub type AppUserService = UserService<dyn UserRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<AppUserService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(repo)),
        }
    }
}

fn init_tracing(fallback_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

async fn build_repository(config: &ServerConfig) -> Result<Arc<dyn UserRepository>> {
    let base: Arc<dyn UserRepository> = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(config.db_timeout)
                .connect(url)
                .await
                .context("Failed to connect to PostgreSQL")?;

            sqlx::migrate!()
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("✅ Database migrations completed");
            Arc::new(PgUserRepository::with_timeout(pool, config.db_timeout))
        }
        None => {
            tracing::warn!("⚠️  No DATABASE_URL set - users are kept in memory only");
            Arc::new(InMemoryUserRepository::new())
        }
    };

    if config.cache_capacity == 0 {
        tracing::info!("User cache disabled");
        return Ok(base);
    }

    tracing::info!("🗃️  User cache enabled ({} entries)", config.cache_capacity);
    Ok(Arc::new(CachedUserRepository::with_capacity(
        base,
        config.cache_capacity,
    )))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env()?;
    init_tracing(&config.log_filter);

    tracing::info!("Tessera API initializing...");

    let repo = build_repository(&config).await?;
    let state = AppState::new(repo);
    let router = app::build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Tessera API ready on {}", config.bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
