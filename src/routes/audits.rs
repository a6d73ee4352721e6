//! Audit scheduling route handlers

use crate::error::ApiResult;
use crate::extractors::extract_validated_json;
use crate::models::{Audit, CreateAuditRequest, NewAudit};
use crate::state::SharedState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, info};

/// Schedule an audit; the status always starts as `scheduled`
pub async fn create_audit(
    State(state): State<SharedState>,
    body: Result<Json<CreateAuditRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Audit>)> {
    let payload = extract_validated_json(body)?;
    debug!("Scheduling audit for product {}", payload.product_id);

    let audit = state.store.create_audit(NewAudit::from(payload)).await?;

    info!(
        "Audit {} scheduled for {} on {} {} ({})",
        audit.id, audit.product_name, audit.date, audit.time, audit.assigned_to
    );

    Ok((StatusCode::CREATED, Json(audit)))
}

/// List audits, newest date first
pub async fn list_audits(State(state): State<SharedState>) -> ApiResult<Json<Vec<Audit>>> {
    let audits = state.store.list_audits().await?;
    debug!("Listed {} audits", audits.len());
    Ok(Json(audits))
}
