//! Product compliance route handlers
//!
//! Writes always go through the aggregator, so the stored `is_compliant`
//! flag is derived from the step map and never taken from the client.

use crate::compliance::{build_checklist, replace_steps, toggle_step};
use crate::error::ApiResult;
use crate::extractors::{extract_json, extract_path};
use crate::models::{
    ComplianceRecord, StandardChecklist, ToggleStepRequest, UpsertComplianceRequest,
};
use crate::state::SharedState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use tracing::{debug, warn};

/// All compliance records of a product
pub async fn get_product_compliance(
    State(state): State<SharedState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Vec<ComplianceRecord>>> {
    let product_id = extract_path(path)?;
    let records = state.store.list_compliance(product_id).await?;
    debug!("Found {} compliance records for product {}", records.len(), product_id);
    Ok(Json(records))
}

/// Every standard's clauses with this product's step states
pub async fn get_product_checklist(
    State(state): State<SharedState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Vec<StandardChecklist>>> {
    let product_id = extract_path(path)?;
    let records = state.store.list_compliance(product_id).await?;
    let standards = state.store.list_standards().await?;

    let mut checklist = Vec::with_capacity(standards.len());
    for standard in &standards {
        let clauses = state.store.list_clauses(standard.id).await?;
        checklist.push(build_checklist(standard, &clauses, &records));
    }

    Ok(Json(checklist))
}

/// Replace the step map of a (product, clause) record
pub async fn upsert_compliance(
    State(state): State<SharedState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
    body: Result<Json<UpsertComplianceRequest>, JsonRejection>,
) -> ApiResult<Json<ComplianceRecord>> {
    let (product_id, clause_id) = extract_path(path)?;
    let payload = extract_json(body)?;

    let record = replace_steps(
        state.store.as_ref(),
        state.policy,
        product_id,
        clause_id,
        payload.notes,
    )
    .await?;

    if let Some(claimed) = payload.is_compliant {
        if claimed != record.is_compliant {
            warn!(
                "Client sent is_compliant={} for product {} clause {}, stored {} from its steps",
                claimed, product_id, clause_id, record.is_compliant
            );
        }
    }

    Ok(Json(record))
}

/// Set a single compliance step
pub async fn set_step(
    State(state): State<SharedState>,
    path: Result<Path<(i32, i32, u32)>, PathRejection>,
    body: Result<Json<ToggleStepRequest>, JsonRejection>,
) -> ApiResult<Json<ComplianceRecord>> {
    let (product_id, clause_id, step_index) = extract_path(path)?;
    let payload = extract_json(body)?;

    let record = toggle_step(
        state.store.as_ref(),
        state.policy,
        product_id,
        clause_id,
        step_index,
        payload.value,
    )
    .await?;

    Ok(Json(record))
}
