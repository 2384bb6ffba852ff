/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use connector_api::{app::{build_router, AppState}, config::Config};
/// use connector_shared::store::InMemoryUserStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(InMemoryUserStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use connector_shared::{avatar::AvatarOptions, store::UserStore};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// User persistence
    pub store: Arc<dyn UserStore>,

    /// Application configuration
    pub config: Arc<Config>,

    /// Parameters for generated avatar URLs
    pub avatar: AvatarOptions,
}

impl AppState {
    /// Creates state with the default 200px / pg / mm avatar options
    pub fn new(store: Arc<dyn UserStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
            avatar: AvatarOptions::default(),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Lifetime of issued tokens
    ///
    /// `Config::from_env` bounds the setting; anything outside the range
    /// `chrono::Duration` can hold saturates at its maximum.
    pub fn token_lifetime(&self) -> chrono::Duration {
        chrono::Duration::try_seconds(self.config.jwt.expiration_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

/// Builds the Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health        # Health check (public)
/// └── POST /api/users     # Register user (public)
/// ```
///
/// Every route is wrapped in request tracing and CORS.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().route("/users", post(routes::users::register));

    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
