//! QMS Compliance API - Quality Management Dashboard Backend
//!
//! Tracks ISO standard compliance for internal software products:
//! - ISO standards and clauses, each clause broken into compliance steps
//! - Per-product, per-clause compliance records rolled up from step flags
//! - Audit scheduling and product feedback
//! - A read-only QMS documentation library
//!
//! Storage is PostgreSQL when DATABASE_URL is set, in-memory otherwise.

mod compliance;
mod config;
mod db;
mod error;
mod extractors;
mod models;
mod routes;
mod seed;
mod state;

use crate::config::Settings;
use crate::db::{MemoryStore, PgStore, RecordStore};
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("Starting QMS Compliance API...");

    // Load configuration
    let settings = Settings::load()?;
    info!("Configuration loaded successfully");

    let store = init_store(&settings).await?;
    let seeded = store.seed_reference_data(&seed::iso_standards()).await?;
    if seeded > 0 {
        info!("Seeded {} ISO standards", seeded);
    }

    info!(
        "Compliance policy: {} (clauses count as compliant when {})",
        settings.compliance_policy,
        match settings.compliance_policy {
            compliance::CompliancePolicy::PresentSteps => "every marked step is confirmed",
            compliance::CompliancePolicy::DeclaredSteps => "every declared step is confirmed",
        }
    );

    let state = Arc::new(AppState::new(store, settings.compliance_policy));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("Server listening on http://{}", addr);
    info!("API Endpoints:");
    info!("   GET  /iso-standards                                   - List ISO standards");
    info!("   GET  /iso-standards/{{id}}/clauses                      - List clauses of a standard");
    info!("   GET  /products                                        - Product dashboard");
    info!("   GET  /products/{{id}}                                   - Product processes and observations");
    info!("   GET  /products/{{id}}/compliance                        - Compliance records of a product");
    info!("   GET  /products/{{id}}/checklist                         - Clause checklist of a product");
    info!("   PUT  /products/{{id}}/compliance/{{clauseId}}             - Replace clause steps");
    info!("   PUT  /products/{{id}}/compliance/{{clauseId}}/steps/{{n}}   - Set one step");
    info!("   GET  /documents  GET /documents/{{id}}                 - QMS documentation library");
    info!("   POST /audits  GET /audits                             - Schedule / list audits");
    info!("   POST /feedback  GET /feedback                         - Submit / list feedback");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,qms_compliance_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Pick the record store: PostgreSQL if configured, in-memory otherwise
async fn init_store(settings: &Settings) -> anyhow::Result<Arc<dyn RecordStore>> {
    match &settings.database {
        Some(db_config) => {
            let pg = PgStore::connect(db_config).await?;
            pg.init_schema().await?;
            let store: Arc<dyn RecordStore> = Arc::new(pg);
            Ok(store)
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory record store. Data will not survive restarts.");
            let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
            Ok(store)
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        },
    }
}
