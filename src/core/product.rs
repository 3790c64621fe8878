//! Catalog queries and seeding.
//!
//! Products are read-only at runtime; they come into existence through
//! seeding and are only ever joined against by the ledger and the list
//! endpoints.

use crate::{
    config::catalog::Catalog,
    core::stock,
    entities::{Product, Stock, product},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;

/// A product joined with its current stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductWithStock {
    /// Product id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Units on hand; absent when the product has no stock row yet
    pub stock: Option<i64>,
}

/// Lists all products with their stock quantities, ordered by id ascending.
///
/// A product without a stock row reports its stock as `None` rather than
/// failing; seeding always creates the row, so this only shows up in a
/// half-seeded store.
pub async fn list_products_with_stock(db: &DatabaseConnection) -> Result<Vec<ProductWithStock>> {
    let rows = Product::find()
        .find_also_related(Stock)
        .order_by_asc(product::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(item, stock_row)| ProductWithStock {
            id: item.id,
            name: item.name,
            stock: stock_row.map(|s| s.quantity),
        })
        .collect())
}

/// Retrieves a product by its unique ID.
pub async fn product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Seeds the catalog from the given configuration.
///
/// Idempotent: if any product already exists the catalog is left untouched
/// and `false` is returned. Each product and its stock row are inserted
/// together in one transaction, so a partially seeded catalog can never be
/// observed.
pub async fn seed_products(db: &DatabaseConnection, catalog: &Catalog) -> Result<bool> {
    let existing = Product::find().count(db).await?;
    if existing > 0 {
        return Ok(false);
    }

    let txn = db.begin().await?;

    for seed in &catalog.products {
        let created = product::ActiveModel {
            name: Set(seed.name.clone()),
            description: Set(seed.description.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        stock::insert_stock(&txn, created.id, seed.stock).await?;
    }

    txn.commit().await?;
    Ok(true)
}
