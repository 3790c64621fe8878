//! Shared test utilities for `Stockroom`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::{
    core::{purchase, stock},
    entities::product,
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ConnectOptions, DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
///
/// The pool is capped at a single connection so every task in a test sees
/// the same in-memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Inserts a product together with its stock row and returns the product.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    initial_stock: i64,
) -> Result<product::Model> {
    let created = product::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    stock::insert_stock(db, created.id, initial_stock).await?;

    Ok(created)
}

/// Inserts a product without any stock row (the pre-seed state).
pub async fn create_product_without_stock(
    db: &DatabaseConnection,
    name: &str,
) -> Result<product::Model> {
    product::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates an active purchase dated today through the ledger.
pub async fn create_test_purchase(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i64,
) -> Result<purchase::PurchaseRecord> {
    purchase::create_purchase(db, product_id, quantity, Utc::now().date_naive()).await
}

/// Sets up a database with one seeded product ("Laptop", stock 50).
/// Returns (db, product) for common test scenarios.
pub async fn setup_with_product() -> Result<(DatabaseConnection, product::Model)> {
    let db = setup_test_db().await?;
    let product = create_test_product(&db, "Laptop", 50).await?;
    Ok((db, product))
}
