//! # Connector API Server
//!
//! Serves `POST /api/users` (user registration) and `GET /health`.
//!
//! ## Storage
//!
//! With `DATABASE_URL` set, users are stored in PostgreSQL and pending
//! migrations are applied at startup. Without it, an in-memory store is used
//! and nothing survives a restart.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p connector-api
//! ```

use connector_api::{
    app::{build_router, AppState},
    config::Config,
};
use connector_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    store::{InMemoryUserStore, PgUserStore, UserStore},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "connector_api=debug,connector_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Returns the store to serve from, plus the PostgreSQL store (if any) so its
/// pool can be closed on shutdown
async fn open_store(
    config: &Config,
) -> anyhow::Result<(Arc<dyn UserStore>, Option<PgUserStore>)> {
    match &config.database.url {
        Some(url) => {
            let pool = create_pool(DatabaseConfig {
                url: url.clone(),
                max_connections: config.database.max_connections,
                ..Default::default()
            })
            .await?;

            run_migrations(&pool).await?;

            let pg = PgUserStore::new(pool);
            let store: Arc<dyn UserStore> = Arc::new(pg.clone());
            Ok((store, Some(pg)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory user store");
            let store: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
            Ok((store, None))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "Connector API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;
    let bind_address = config.bind_address();

    let (store, pg) = open_store(&config).await?;
    let app = build_router(AppState::new(store, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pg) = pg {
        close_pool(pg.pool().clone()).await;
    }

    tracing::info!("Server stopped");
    Ok(())
}
