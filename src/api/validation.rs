//! Field-level validation for purchase requests.
//!
//! The gate runs before anything touches the ledger: every failing field is
//! collected and reported in one response, and a request only proceeds once
//! all three fields are present and well-formed. Numeric strings are
//! accepted wherever numbers are, matching what the admin UI's form fields
//! submit.

use crate::errors::{Error, FieldError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

/// Raw purchase-creation body. Every field is optional so the gate can
/// report all missing or malformed fields at once instead of failing on the
/// first deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseBody {
    /// Product id; number or numeric string
    #[serde(default)]
    pub product_id: Option<Value>,
    /// Units to buy; number or numeric string
    #[serde(default)]
    pub quantity: Option<Value>,
    /// Calendar date, `YYYY-MM-DD`
    #[serde(default)]
    pub purchase_date: Option<Value>,
}

/// A purchase request that has passed the validation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedPurchase {
    /// Parsed product id
    pub product_id: i64,
    /// Parsed, positive, integral quantity
    pub quantity: i64,
    /// Parsed purchase date, not in the future
    pub purchase_date: NaiveDate,
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Interprets a JSON value the way a lenient form field would: numbers pass
/// through, numeric strings parse, everything else is `None`.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Validates a purchase-creation body, collecting every failing field.
///
/// Missing fields short-circuit the format checks (a field cannot be both
/// "required" and "malformed"), mirroring the two-pass behavior of the
/// admin UI's server.
#[allow(clippy::cast_possible_truncation)]
pub fn validate_purchase(body: &CreatePurchaseBody) -> Result<ValidatedPurchase> {
    let mut details = Vec::new();

    if is_missing(body.product_id.as_ref()) {
        details.push(FieldError::new("productId", "Product ID is required"));
    }
    if is_missing(body.quantity.as_ref()) {
        details.push(FieldError::new("quantity", "Quantity is required"));
    }
    if is_missing(body.purchase_date.as_ref()) {
        details.push(FieldError::new("purchaseDate", "Purchase date is required"));
    }
    if !details.is_empty() {
        return Err(Error::Validation { details });
    }

    let mut product_id = None;
    match body.product_id.as_ref().and_then(numeric_value) {
        Some(n) if n > 0.0 && n.fract() == 0.0 => product_id = Some(n as i64),
        _ => details.push(FieldError::new(
            "productId",
            "Product ID must be a valid number",
        )),
    }

    let mut quantity = None;
    match body.quantity.as_ref().and_then(numeric_value) {
        None => details.push(FieldError::new("quantity", "Quantity must be a valid number")),
        Some(n) if n <= 0.0 => {
            details.push(FieldError::new("quantity", "Quantity must be a positive number"));
        }
        Some(n) if n.fract() != 0.0 => {
            details.push(FieldError::new("quantity", "Quantity must be a whole number"));
        }
        Some(n) => quantity = Some(n as i64),
    }

    let mut purchase_date = None;
    match body.purchase_date.as_ref() {
        Some(Value::String(raw)) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) if date > chrono::Utc::now().date_naive() => {
                details.push(FieldError::new(
                    "purchaseDate",
                    "Purchase date cannot be in the future",
                ));
            }
            Ok(date) => purchase_date = Some(date),
            Err(_) => details.push(FieldError::new(
                "purchaseDate",
                "Purchase date must be a valid date",
            )),
        },
        _ => details.push(FieldError::new(
            "purchaseDate",
            "Purchase date must be a valid date",
        )),
    }

    match (product_id, quantity, purchase_date) {
        (Some(product_id), Some(quantity), Some(purchase_date)) if details.is_empty() => {
            Ok(ValidatedPurchase {
                product_id,
                quantity,
                purchase_date,
            })
        }
        _ => Err(Error::Validation { details }),
    }
}

/// Parses the `:id` path parameter for the cancel route.
pub fn parse_purchase_id(raw: &str) -> Result<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Error::InvalidPurchaseId),
    }
}
