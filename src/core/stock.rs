//! Stock adjustment primitives used by the purchase ledger.
//!
//! Adjustments are single UPDATE statements, so a quantity is never
//! read-modify-written from stale state. `debit_stock` carries its own
//! sufficiency guard in the WHERE clause; callers treat zero affected rows
//! as "not enough stock at execution time". All functions are generic over
//! `ConnectionTrait` so they run inside the ledger's transactions.

use crate::{
    entities::{Stock, stock},
    errors::Result,
};
use sea_orm::sea_query::Expr;
use sea_orm::{Set, prelude::*};

/// Returns the stock row for a product, if one exists.
pub async fn stock_for_product<C>(db: &C, product_id: i64) -> Result<Option<stock::Model>>
where
    C: ConnectionTrait,
{
    Stock::find()
        .filter(stock::Column::ProductId.eq(product_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Debits `quantity` units from a product's stock.
///
/// The UPDATE only applies while at least `quantity` units are on hand, so
/// the sufficiency check and the decrement happen in one atomic statement:
/// `UPDATE stock SET quantity = quantity - ? WHERE product_id = ? AND
/// quantity >= ?`. Returns whether a row was updated; `false` means the
/// guard rejected the debit (or no stock row exists).
pub async fn debit_stock<C>(db: &C, product_id: i64, quantity: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Stock::update_many()
        .col_expr(
            stock::Column::Quantity,
            Expr::col(stock::Column::Quantity).sub(quantity),
        )
        .col_expr(stock::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(stock::Column::ProductId.eq(product_id))
        .filter(stock::Column::Quantity.gte(quantity))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Credits `quantity` units back to a product's stock.
///
/// Returns whether a row was updated; `false` means the product has no
/// stock row.
pub async fn credit_stock<C>(db: &C, product_id: i64, quantity: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = Stock::update_many()
        .col_expr(
            stock::Column::Quantity,
            Expr::col(stock::Column::Quantity).add(quantity),
        )
        .col_expr(stock::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(stock::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected > 0)
}

/// Inserts a stock row for a product. Used by seeding; the ledger itself
/// never creates stock rows.
pub async fn insert_stock<C>(db: &C, product_id: i64, quantity: i64) -> Result<stock::Model>
where
    C: ConnectionTrait,
{
    stock::ActiveModel {
        product_id: Set(product_id),
        quantity: Set(quantity),
        updated_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
