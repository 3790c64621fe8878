//! Product catalog routes.

use crate::{
    api::AppState,
    core::product::{self, ProductWithStock},
    errors::Result,
};
use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Response body for `GET /api/products`.
#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    /// All products with their stock levels, ordered by id
    pub products: Vec<ProductWithStock>,
}

/// `GET /api/products` — all products with current stock, ordered by id.
pub async fn list_products(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let products = product::list_products_with_stock(&state.database).await?;
    Ok(Json(ProductsResponse { products }))
}
