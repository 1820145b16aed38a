use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CredentialHasher, IdentityResolver, PortfolioService, SeaOrmAuthService,
    SeaOrmPortfolioService, SessionStore,
};

pub mod auth;
mod error;
mod observability;
mod portfolios;
pub mod session;
mod system;
mod types;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth: Arc<dyn AuthService>,

    pub portfolios: Arc<dyn PortfolioService>,

    pub sessions: Arc<SessionStore>,

    pub clock: Arc<dyn Clock>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

/// Wires the services over an already connected store.
pub fn create_app_state(
    config: Config,
    store: Store,
    clock: Arc<dyn Clock>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let hasher = CredentialHasher::new(&config.security)?;

    let sessions = Arc::new(SessionStore::new(store.clone(), clock.clone()));
    let identity = Arc::new(IdentityResolver::new(store.clone(), sessions.clone()));

    let auth: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
        store.clone(),
        hasher,
        sessions.clone(),
        identity,
        clock.clone(),
    )?);

    let portfolios: Arc<dyn PortfolioService> = Arc::new(SeaOrmPortfolioService::new(
        store.clone(),
        auth.clone(),
        clock.clone(),
    ));

    Ok(Arc::new(AppState {
        config: Arc::new(config),
        store,
        auth,
        portfolios,
        sessions,
        clock,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let store = Store::connect(&config.database).await?;
    create_app_state(config, store, Arc::new(SystemClock), prometheus_handle)
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_layer = cors_layer(&state.config.server.cors_allowed_origins);

    let api_router = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/check", get(auth::check_auth))
        .route(
            "/portfolios",
            get(portfolios::list_portfolios).post(portfolios::create_portfolio),
        );

    Router::new()
        .nest("/api", api_router)
        .route("/health", get(system::health))
        .route("/health/ready", get(system::ready))
        .route("/metrics", get(observability::get_metrics))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Cookies ride on cross-origin requests, so the layer allows credentials
/// and therefore lists methods and headers explicitly. `*` mirrors the
/// request origin.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
