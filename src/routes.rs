//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod audits;
mod compliance;
mod documents;
mod feedback;
mod products;
mod standards;

use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    extract::State,
    http::{header, Method},
    routing::{get, post, put},
    Json, Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    api_routes().layer(middleware).with_state(state)
}

/// API routes without middleware
pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // ISO reference data
        .route("/iso-standards", get(standards::list_standards))
        .route("/iso-standards/{id}/clauses", get(standards::list_clauses))
        // Products
        .route("/products", get(products::list_products))
        .route("/products/{id}", get(products::get_product))
        // Compliance tracking
        .route("/products/{id}/compliance", get(compliance::get_product_compliance))
        .route("/products/{id}/checklist", get(compliance::get_product_checklist))
        .route("/products/{id}/compliance/{clause_id}", put(compliance::upsert_compliance))
        .route(
            "/products/{id}/compliance/{clause_id}/steps/{step_index}",
            put(compliance::set_step),
        )
        // QMS documentation
        .route("/documents", get(documents::list_documents))
        .route("/documents/{id}", get(documents::get_document))
        // Audits
        .route("/audits", post(audits::create_audit).get(audits::list_audits))
        // Feedback
        .route("/feedback", post(feedback::create_feedback).get(feedback::list_feedback))
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

/// Health check endpoint
async fn health_check(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "store": state.store.backend(),
        "compliancePolicy": state.policy.to_string(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
