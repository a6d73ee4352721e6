//! QMS documentation route handlers

use crate::error::{not_found_error, ApiResult};
use crate::extractors::extract_path;
use crate::models::Document;
use crate::seed::{find_document, DOCUMENT_LIBRARY};
use axum::{
    extract::{rejection::PathRejection, Path},
    Json,
};

/// Every controlled document, with its markdown content
pub async fn list_documents() -> Json<Vec<Document>> {
    Json(DOCUMENT_LIBRARY.clone())
}

pub async fn get_document(path: Result<Path<i32>, PathRejection>) -> ApiResult<Json<Document>> {
    let document_id = extract_path(path)?;
    find_document(document_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found_error(format!("Document {} not found", document_id)))
}
