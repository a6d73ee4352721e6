//! Product catalog route handlers

use crate::compliance::{product_compliance, product_summary};
use crate::error::{not_found_error, ApiResult};
use crate::extractors::extract_path;
use crate::models::{ProductDetail, ProductSummary};
use crate::seed::{find_product, PRODUCT_CATALOG};
use axum::{
    extract::{rejection::PathRejection, Path},
    Json,
};

/// Dashboard summaries for every product
pub async fn list_products() -> Json<Vec<ProductSummary>> {
    Json(PRODUCT_CATALOG.iter().map(product_summary).collect())
}

/// One product with its processes and observations
pub async fn get_product(
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<ProductDetail>> {
    let product_id = extract_path(path)?;
    let product = find_product(product_id)
        .ok_or_else(|| not_found_error(format!("Product {} not found", product_id)))?;

    Ok(Json(ProductDetail {
        compliance_score: product_compliance(product),
        product: product.clone(),
    }))
}
