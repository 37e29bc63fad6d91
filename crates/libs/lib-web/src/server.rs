//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! Builds the Axum router, applies middleware, runs migrations, seeds the
//! root admin account, and starts the HTTP server.

// region: --- Imports
use crate::dispatch::{HttpWorkerForwarder, WorkerForwarder};
use crate::handlers;
use crate::middleware::{log_requests, require_admin, require_auth, stamp_req};
use axum::{
    routing::{get, post},
    Router,
};
use lib_core::config::init_config;
use lib_core::model::store::UserRepository;
use lib_core::{create_pool, Config, DbPool};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub worker: Arc<dyn WorkerForwarder>,
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<dyn WorkerForwarder> {
    fn from_ref(state: &AppState) -> Self {
        state.worker.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
    /// Database migrations path
    pub migrations_path: &'static str,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            migrations_path: "./migrations",
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server.
///
/// # Errors
///
/// Returns an error if configuration loading, database setup, migrations, or
/// server binding fails.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("CHAT BACKEND STARTING");

    dotenvy::dotenv().ok();

    info!("Loading configuration...");
    let app_config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    app_config.validate().map_err(|e| anyhow::anyhow!(e))?;
    // Middleware reads the global config; handlers get it through AppState
    init_config(app_config.clone()).map_err(|e| anyhow::anyhow!(e))?;

    // Ensure data directory exists for SQLite database
    if let Some(db_path) = app_config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created database directory: {:?}", parent);
            }
        }
    }

    info!("Connecting to database...");
    let pool = create_pool(&app_config.database_url).await?;

    info!("Running database migrations from: {}", config.migrations_path);
    let migrator =
        sqlx::migrate::Migrator::new(std::path::Path::new(config.migrations_path)).await?;
    migrator.run(&pool).await?;
    info!("Migrations complete");

    seed_root_admin(&pool, &app_config).await?;

    let worker: Arc<dyn WorkerForwarder> = Arc::new(HttpWorkerForwarder::new(
        app_config.worker_webhook_url.clone(),
        app_config.worker_api_key.clone(),
        app_config.worker_timeout_secs,
    )?);
    info!(
        "Worker forwarder ready ({}s timeout): {}",
        app_config.worker_timeout_secs, app_config.worker_webhook_url
    );

    let state = AppState {
        db: pool,
        config: app_config,
        worker,
    };

    let app = create_router(state, config.allowed_origins.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!("SERVER READY: http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;
    Ok(())
}

/// Hash the configured root password and seed the root admin if absent.
async fn seed_root_admin(pool: &DbPool, config: &Config) -> anyhow::Result<()> {
    let password_hash = lib_auth::hash_password(&config.root_admin_password)
        .map_err(|e| anyhow::anyhow!("Failed to hash root admin password: {}", e))?;
    UserRepository::seed_root_admin(pool, &password_hash).await?;
    Ok(())
}

/// Create the main application router with all routes.
pub fn create_router(state: AppState, allowed_origins: Vec<String>) -> Router {
    use axum::http::{HeaderValue, Method};

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    // Admin routes sit behind both the bearer gate and the admin gate
    let admin_routes = Router::new()
        .route(
            "/api/admin/users",
            get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route("/api/admin/users/{id}", axum::routing::delete(handlers::admin::delete_user))
        .layer(axum::middleware::from_fn(require_admin))
        .layer(axum::middleware::from_fn(require_auth));

    // Routes for any authenticated user
    let user_routes = Router::new()
        .route("/api/logout", post(handlers::auth::logout))
        .route(
            "/api/chats",
            post(handlers::chat::create_session).get(handlers::chat::list_sessions),
        )
        .route(
            "/api/chats/{id}",
            get(handlers::chat::session_history).delete(handlers::chat::delete_session),
        )
        .route(
            "/api/chats/{id}/visibility",
            axum::routing::patch(handlers::chat::toggle_visibility),
        )
        .route("/api/chats/{id}/messages", post(handlers::message::send_message))
        .route("/api/messages/{id}/status", get(handlers::message::check_status))
        .layer(axum::middleware::from_fn(require_auth));

    // Public routes: login, the worker callback (shared-secret auth), health
    Router::new()
        .route("/api/login", post(handlers::auth::login))
        .route("/api/worker/callback", post(handlers::message::handle_callback))
        .route("/health", get(|| async { "OK" }))
        .merge(admin_routes)
        .merge(user_routes)
        .fallback(|| async { (axum::http::StatusCode::NOT_FOUND, "Route not found") })
        .with_state(state)
        // Request stamping (adds request ID) - must be first
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    let request_id = request
                        .extensions()
                        .get::<crate::middleware::mw_req_stamp::RequestStamp>()
                        .map(|s| s.id.clone())
                        .unwrap_or_else(|| "unknown".to_string());
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                },
            ),
        )
        .layer(cors)
}

/// Log server information
fn log_server_info() {
    info!("AUTH:");
    info!("   • POST   /api/login");
    info!("   • POST   /api/logout");
    info!("ADMIN:");
    info!("   • GET    /api/admin/users");
    info!("   • POST   /api/admin/users");
    info!("   • DELETE /api/admin/users/{{id}}");
    info!("CHAT:");
    info!("   • POST   /api/chats");
    info!("   • GET    /api/chats");
    info!("   • GET    /api/chats/{{id}}");
    info!("   • PATCH  /api/chats/{{id}}/visibility");
    info!("   • DELETE /api/chats/{{id}}");
    info!("MESSAGES:");
    info!("   • POST   /api/chats/{{id}}/messages");
    info!("   • GET    /api/messages/{{id}}/status");
    info!("WORKER:");
    info!("   • POST   /api/worker/callback");
    info!("HEALTH:");
    info!("   • GET    /health");
}
// endregion: --- Server Setup
