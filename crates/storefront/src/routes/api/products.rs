//! Product JSON endpoint.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use haqq_core::Product;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/products/{id}`: the adapted product.
///
/// 404 `{"message": "Product not found"}` for unknown or malformed ids; any
/// other upstream failure is a 500 `{"message": "Failed to fetch product"}`.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state.printify().get_product(&id).await?;
    Ok(Json(product))
}
