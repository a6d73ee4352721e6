//! ISO standard route handlers

use crate::error::ApiResult;
use crate::extractors::extract_path;
use crate::models::{Clause, Standard};
use crate::state::SharedState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use tracing::debug;

/// List all ISO standards
pub async fn list_standards(State(state): State<SharedState>) -> ApiResult<Json<Vec<Standard>>> {
    let standards = state.store.list_standards().await?;
    debug!("Listed {} standards", standards.len());
    Ok(Json(standards))
}

/// List the clauses of a standard
pub async fn list_clauses(
    State(state): State<SharedState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Vec<Clause>>> {
    let standard_id = extract_path(path)?;
    let clauses = state.store.list_clauses(standard_id).await?;
    debug!("Listed {} clauses for standard {}", clauses.len(), standard_id);
    Ok(Json(clauses))
}
