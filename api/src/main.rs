//! UPSTAC API Server
//!
//! Tracks COVID test requests from registration through lab testing to a
//! doctor's consultation.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{ensure_schema, PostgresTestRequestRepository, PostgresUserRepository};
use app::{ConsultationService, LabService, TestRequestService, UserService};
use config::Config;
use domain::ports::{TestRequestRepository, UserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<dyn UserRepository>>,
    pub test_request_service: Arc<TestRequestService<dyn TestRequestRepository>>,
    pub lab_service: Arc<LabService<dyn TestRequestRepository>>,
    pub consultation_service: Arc<ConsultationService<dyn TestRequestRepository>>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserRepository>, requests: Arc<dyn TestRequestRepository>) -> Self {
        Self {
            user_service: Arc::new(UserService::new(users)),
            test_request_service: Arc::new(TestRequestService::new(requests.clone())),
            lab_service: Arc::new(LabService::new(requests.clone())),
            consultation_service: Arc::new(ConsultationService::new(requests)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Authenticated API routes
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Patient requests and lookups
        .route(
            "/test-requests",
            post(handlers::create_request).get(handlers::request_history),
        )
        .route("/test-requests/:id", get(handlers::get_request))
        .route(
            "/test-requests/status/:status",
            get(handlers::list_by_status),
        )
        // Lab workflow (testers)
        .route("/lab/requests", get(handlers::lab_queue))
        .route("/lab/requests/mine", get(handlers::my_lab_tests))
        .route("/lab/assign/:id", put(handlers::assign_for_lab_test))
        .route("/lab/update/:id", put(handlers::update_lab_test))
        // Consultation workflow (doctors)
        .route("/consultations/in-queue", get(handlers::consultation_queue))
        .route("/consultations/mine", get(handlers::my_consultations))
        .route(
            "/consultations/assign/:id",
            put(handlers::assign_for_consultation),
        )
        .route(
            "/consultations/update/:id",
            put(handlers::update_consultation),
        )
        .layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

/// Build the application router without the registration rate limiter
pub fn build_router(state: AppState, registration: Router<AppState>) -> Router {
    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .merge(registration)
        .merge(protected_routes(state.clone()))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Registration route (no auth)
pub fn registration_routes() -> Router<AppState> {
    Router::new().route("/auth/register", post(handlers::register))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,upstac_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting UPSTAC API...");

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    ensure_schema(&db)
        .await
        .context("Failed to prepare database schema")?;
    tracing::info!("Database connected");

    // Create adapters
    let users: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(db.clone()));
    let requests: Arc<dyn TestRequestRepository> =
        Arc::new(PostgresTestRequestRepository::new(db.clone()));

    let state = AppState::new(users, requests);

    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(config.register_rate_per_second)
            .burst_size(config.register_burst)
            .finish()
            .context("Failed to build governor config")?,
    );

    let registration = registration_routes().layer(GovernorLayer {
        config: governor_config,
    });

    let app = build_router(state, registration);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
