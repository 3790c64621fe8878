//! Purchase ledger routes.

use crate::{
    api::AppState,
    api::validation::{self, CreatePurchaseBody},
    core::purchase::{self, PurchaseRecord},
    errors::Result,
};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

/// Response body for `GET /api/purchases`.
#[derive(Debug, Serialize)]
pub struct PurchasesResponse {
    /// All purchases, most recent purchase date first
    pub purchases: Vec<PurchaseRecord>,
}

/// Response body wrapping a single purchase.
#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    /// The created or updated purchase
    pub purchase: PurchaseRecord,
}

/// `GET /api/purchases` — every purchase joined with its product name.
pub async fn list_purchases(State(state): State<AppState>) -> Result<Json<PurchasesResponse>> {
    let purchases = purchase::list_purchases(&state.database).await?;
    Ok(Json(PurchasesResponse { purchases }))
}

/// `POST /api/purchases` — validate, then create atomically.
///
/// The body is an optional extractor so a non-JSON payload falls through to
/// the same validation gate as an empty one, keeping the error body shape
/// uniform across all 400s.
pub async fn create_purchase(
    State(state): State<AppState>,
    body: Option<Json<CreatePurchaseBody>>,
) -> Result<(StatusCode, Json<PurchaseResponse>)> {
    let body = body.map(|Json(inner)| inner).unwrap_or_default();
    let validated = validation::validate_purchase(&body)?;

    let purchase = purchase::create_purchase(
        &state.database,
        validated.product_id,
        validated.quantity,
        validated.purchase_date,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(PurchaseResponse { purchase })))
}

/// `POST /api/purchases/:id/cancel` — cancel a purchase and restore stock.
pub async fn cancel_purchase(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PurchaseResponse>> {
    let purchase_id = validation::parse_purchase_id(&id)?;
    let purchase = purchase::cancel_purchase(&state.database, purchase_id).await?;
    Ok(Json(PurchaseResponse { purchase }))
}
