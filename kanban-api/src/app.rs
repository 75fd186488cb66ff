/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use kanban_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = kanban_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use kanban_shared::auth::middleware::authenticate;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health
/// └── /api/
///     ├── /auth/
///     │   ├── POST  /register, /login, /logout        (public)
///     │   └── GET   /me, GET|PATCH /profile, POST /profile/photo
///     ├── DELETE    /users/:id
///     ├── GET|POST  /workspaces
///     ├── GET|PATCH|DELETE /workspaces/:id
///     ├── GET|POST  /workspaces/:id/boards
///     ├── GET|PATCH|DELETE /boards/:id
///     ├── GET|POST  /boards/:id/lists
///     ├── PATCH     /boards/:id/lists/positions
///     ├── PATCH|DELETE /lists/:id
///     ├── GET|POST  /lists/:id/cards
///     ├── PATCH     /lists/:id/cards/positions
///     └── PATCH|DELETE /cards/:id
/// ```
///
/// Everything under `/api` except register, login and logout requires a
/// session token.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (protected routes only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout));

    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route(
            "/auth/profile",
            get(routes::profile::get_profile).patch(routes::profile::update_profile),
        )
        .route("/auth/profile/photo", post(routes::profile::update_photo))
        .route("/users/:id", delete(routes::users::delete_user))
        .route(
            "/workspaces",
            get(routes::workspaces::list_workspaces).post(routes::workspaces::create_workspace),
        )
        .route(
            "/workspaces/:id",
            get(routes::workspaces::get_workspace)
                .patch(routes::workspaces::update_workspace)
                .delete(routes::workspaces::delete_workspace),
        )
        .route(
            "/workspaces/:id/boards",
            get(routes::boards::list_boards).post(routes::boards::create_board),
        )
        .route(
            "/boards/:id",
            get(routes::boards::get_board)
                .patch(routes::boards::update_board)
                .delete(routes::boards::delete_board),
        )
        .route(
            "/boards/:id/lists",
            get(routes::lists::list_lists).post(routes::lists::create_list),
        )
        .route("/boards/:id/lists/positions", patch(routes::lists::reorder_lists))
        .route(
            "/lists/:id",
            patch(routes::lists::update_list).delete(routes::lists::delete_list),
        )
        .route(
            "/lists/:id/cards",
            get(routes::cards::list_cards).post(routes::cards::create_card),
        )
        .route("/lists/:id/cards/positions", patch(routes::cards::reorder_cards))
        .route(
            "/cards/:id",
            patch(routes::cards::update_card).delete(routes::cards::delete_card),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    let api_routes = Router::new().merge(public_routes).merge(protected_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// CORS policy from configuration
///
/// `*` yields a permissive policy. Explicit origins allow credentials so
/// the session cookie is sent cross-origin.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Session authentication middleware layer
///
/// Reads the session token from the bearer header or the `token` cookie,
/// validates it and injects the caller's `AuthContext` into request
/// extensions.
async fn session_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, DatabaseConfig, JwtConfig};

    fn config_with_origins(origins: &[&str]) -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: origins.iter().map(|o| o.to_string()).collect(),
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
                ttl_hours: 24,
            },
        }
    }

    #[test]
    fn test_cors_layer_builds_for_both_modes() {
        let _ = cors_layer(&config_with_origins(&["*"]));
        let _ = cors_layer(&config_with_origins(&["http://localhost:3000"]));
    }

    #[tokio::test]
    async fn test_app_state_exposes_secret() {
        let pool = PgPool::connect_lazy("postgresql://localhost/test").unwrap();
        let state = AppState::new(pool, config_with_origins(&["*"]));

        assert_eq!(state.jwt_secret(), "test-secret-key-at-least-32-bytes-long");
    }
}
