//! Unified error types for the service.
//!
//! Domain errors carry the data the gateway needs to build a structured
//! response (`InsufficientStock` carries both quantities, validation carries
//! the per-field failures). Store failures are wrapped and never shown to
//! clients in detail.

use serde::Serialize;
use thiserror::Error;

/// A single failed field from the validation gate, reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Request field that failed, camelCase as the client sent it
    pub field: String,
    /// Human-readable description of the failure
    pub message: String,
}

impl FieldError {
    /// Builds a field/message pair.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong while loading configuration
        message: String,
    },

    /// Request failed field-level validation and never reached the ledger
    #[error("Validation failed")]
    Validation {
        /// Every field that failed, in request order
        details: Vec<FieldError>,
    },

    /// The `:id` path parameter was not a positive integer
    #[error("Invalid purchase ID")]
    InvalidPurchaseId,

    /// Ledger-side guard: a purchase quantity must be a positive integer
    #[error("Quantity must be a positive number (got {quantity})")]
    InvalidQuantity {
        /// The rejected quantity
        quantity: i64,
    },

    /// No product (and therefore no stock row) with this id
    #[error("Product not found")]
    ProductNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No purchase with this id
    #[error("Purchase not found")]
    PurchaseNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Fewer units on hand than the purchase requested
    #[error("Insufficient stock. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        /// Units currently in stock
        available: i64,
        /// Units the purchase asked for
        requested: i64,
    },

    /// The purchase was cancelled earlier; cancellation is not idempotent
    #[error("Purchase is already cancelled")]
    AlreadyCancelled {
        /// The purchase that was already cancelled
        id: i64,
    },

    /// Underlying persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Machine-readable code used in the HTTP error body.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } | Self::InvalidPurchaseId | Self::InvalidQuantity { .. } => {
                "VALIDATION_ERROR"
            }
            Self::ProductNotFound { .. } => "PRODUCT_NOT_FOUND",
            Self::PurchaseNotFound { .. } => "PURCHASE_NOT_FOUND",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::AlreadyCancelled { .. } => "ALREADY_CANCELLED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config { .. } | Self::Io(_) => "INTERNAL_ERROR",
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
