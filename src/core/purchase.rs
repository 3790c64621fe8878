//! Purchase ledger - atomic, stock-consistent purchase operations.
//!
//! The ledger is the only writer of purchase rows and (outside seeding) of
//! stock quantities. Every mutation runs inside a store transaction: a
//! purchase is never visible without its stock debit, and a cancellation
//! never restores stock without flipping the status. Dropping the
//! transaction on an early error return rolls everything back.

use crate::{
    core::stock,
    entities::{Product, Purchase, purchase},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{IntoActiveModel, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Serialize;

/// A purchase joined with its product's display name, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    /// Purchase id
    pub id: i64,
    /// Product the purchase debits
    pub product_id: i64,
    /// Display name of the product, when the product still resolves
    pub product_name: Option<String>,
    /// Units bought
    pub quantity: i64,
    /// Calendar date of the purchase
    pub purchase_date: NaiveDate,
    /// Lifecycle state
    pub status: purchase::Status,
    /// Set once the purchase has been cancelled
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl PurchaseRecord {
    fn from_model(model: purchase::Model, product_name: Option<String>) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            product_name,
            quantity: model.quantity,
            purchase_date: model.purchase_date,
            status: model.status,
            cancelled_at: model.cancelled_at,
        }
    }
}

/// Creates a purchase and debits the product's stock as one atomic unit.
///
/// Fails with `ProductNotFound` when the product has no stock row,
/// `InsufficientStock` (carrying available and requested quantities) when
/// fewer units are on hand than requested, and `InvalidQuantity` when the
/// quantity is not positive. On any failure the transaction rolls back and
/// no state changes.
pub async fn create_purchase(
    db: &DatabaseConnection,
    product_id: i64,
    quantity: i64,
    purchase_date: NaiveDate,
) -> Result<PurchaseRecord> {
    if quantity <= 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    let on_hand = stock::stock_for_product(&txn, product_id)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    if on_hand.quantity < quantity {
        return Err(Error::InsufficientStock {
            available: on_hand.quantity,
            requested: quantity,
        });
    }

    let product = Product::find_by_id(product_id)
        .one(&txn)
        .await?
        .ok_or(Error::ProductNotFound { id: product_id })?;

    let created = purchase::ActiveModel {
        product_id: Set(product_id),
        quantity: Set(quantity),
        purchase_date: Set(purchase_date),
        status: Set(purchase::Status::Active),
        created_at: Set(Utc::now()),
        cancelled_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    // The guard in the UPDATE re-applies the sufficiency check, so a debit
    // racing past the read above still cannot overdraw.
    if !stock::debit_stock(&txn, product_id, quantity).await? {
        let available = stock::stock_for_product(&txn, product_id)
            .await?
            .map_or(0, |row| row.quantity);
        return Err(Error::InsufficientStock {
            available,
            requested: quantity,
        });
    }

    txn.commit().await?;

    Ok(PurchaseRecord::from_model(created, Some(product.name)))
}

/// Cancels an active purchase and restores its full quantity to stock as
/// one atomic unit.
///
/// Cancellation is deliberately not idempotent: a purchase that is already
/// cancelled fails with `AlreadyCancelled` rather than succeeding a second
/// time. There is no partial cancellation.
pub async fn cancel_purchase(db: &DatabaseConnection, purchase_id: i64) -> Result<PurchaseRecord> {
    let txn = db.begin().await?;

    let existing = Purchase::find_by_id(purchase_id)
        .one(&txn)
        .await?
        .ok_or(Error::PurchaseNotFound { id: purchase_id })?;

    if existing.status == purchase::Status::Cancelled {
        return Err(Error::AlreadyCancelled { id: purchase_id });
    }

    let product_id = existing.product_id;
    let quantity = existing.quantity;

    let mut active = existing.into_active_model();
    active.status = Set(purchase::Status::Cancelled);
    active.cancelled_at = Set(Some(Utc::now()));
    let cancelled = active.update(&txn).await?;

    if !stock::credit_stock(&txn, product_id, quantity).await? {
        return Err(Error::ProductNotFound { id: product_id });
    }

    txn.commit().await?;

    let product_name = Product::find_by_id(product_id).one(db).await?.map(|p| p.name);

    Ok(PurchaseRecord::from_model(cancelled, product_name))
}

/// Lists every purchase joined with its product name, most recent purchase
/// date first; same-day purchases order by id descending so the newest
/// insertion comes first.
pub async fn list_purchases(db: &DatabaseConnection) -> Result<Vec<PurchaseRecord>> {
    let rows = Purchase::find()
        .find_also_related(Product)
        .order_by_desc(purchase::Column::PurchaseDate)
        .order_by_desc(purchase::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(row, product)| PurchaseRecord::from_model(row, product.map(|p| p.name)))
        .collect())
}

/// Retrieves a purchase by its unique ID, without the product join.
pub async fn purchase_by_id(
    db: &DatabaseConnection,
    purchase_id: i64,
) -> Result<Option<purchase::Model>> {
    Purchase::find_by_id(purchase_id)
        .one(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::stock::stock_for_product;
    use crate::test_utils::{
        create_test_product, create_test_purchase, setup_test_db, setup_with_product,
    };
    use chrono::Duration;

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[tokio::test]
    async fn create_purchase_debits_stock() -> Result<()> {
        let (db, laptop) = setup_with_product().await?; // "Laptop", stock 50

        let record = create_purchase(&db, laptop.id, 10, today()).await?;

        assert_eq!(record.status, purchase::Status::Active);
        assert_eq!(record.product_name.as_deref(), Some("Laptop"));
        assert_eq!(record.quantity, 10);
        assert_eq!(record.purchase_date, today());
        assert!(record.cancelled_at.is_none());

        let on_hand = stock_for_product(&db, laptop.id).await?.unwrap();
        assert_eq!(on_hand.quantity, 40);
        Ok(())
    }

    #[tokio::test]
    async fn cancel_purchase_restores_stock() -> Result<()> {
        let (db, laptop) = setup_with_product().await?;
        let created = create_purchase(&db, laptop.id, 10, today()).await?;

        let before = Utc::now();
        let cancelled = cancel_purchase(&db, created.id).await?;

        assert_eq!(cancelled.status, purchase::Status::Cancelled);
        let cancelled_at = cancelled.cancelled_at.unwrap();
        assert!(cancelled_at >= before && cancelled_at <= Utc::now());

        let on_hand = stock_for_product(&db, laptop.id).await?.unwrap();
        assert_eq!(on_hand.quantity, 50);
        Ok(())
    }

    #[tokio::test]
    async fn insufficient_stock_reports_both_quantities() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Webcam", 5).await?;

        let err = create_purchase(&db, product.id, 6, today()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientStock {
                available: 5,
                requested: 6
            }
        ));
        assert_eq!(err.to_string(), "Insufficient stock. Available: 5, Requested: 6");

        // Nothing was created and stock is untouched
        let on_hand = stock_for_product(&db, product.id).await?.unwrap();
        assert_eq!(on_hand.quantity, 5);
        assert_eq!(Purchase::find().all(&db).await?.len(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn purchase_of_exact_stock_empties_it() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Webcam", 5).await?;

        let record = create_purchase(&db, product.id, 5, today()).await?;
        assert_eq!(record.status, purchase::Status::Active);

        let on_hand = stock_for_product(&db, product.id).await?.unwrap();
        assert_eq!(on_hand.quantity, 0);

        // The next unit is one too many
        let err = create_purchase(&db, product.id, 1, today()).await.unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientStock {
                available: 0,
                requested: 1
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_product_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let err = create_purchase(&db, 999, 1, today()).await.unwrap_err();
        assert!(matches!(err, Error::ProductNotFound { id: 999 }));
        Ok(())
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() -> Result<()> {
        let (db, laptop) = setup_with_product().await?;

        let err = create_purchase(&db, laptop.id, 0, today()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { quantity: 0 }));

        let err = create_purchase(&db, laptop.id, -3, today()).await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { quantity: -3 }));

        let on_hand = stock_for_product(&db, laptop.id).await?.unwrap();
        assert_eq!(on_hand.quantity, 50);
        Ok(())
    }

    #[tokio::test]
    async fn cancelling_nonexistent_purchase_changes_nothing() -> Result<()> {
        let (db, laptop) = setup_with_product().await?;

        let err = cancel_purchase(&db, 12345).await.unwrap_err();
        assert!(matches!(err, Error::PurchaseNotFound { id: 12345 }));

        let on_hand = stock_for_product(&db, laptop.id).await?.unwrap();
        assert_eq!(on_hand.quantity, 50);
        Ok(())
    }

    #[tokio::test]
    async fn second_cancellation_is_rejected_not_ignored() -> Result<()> {
        let (db, laptop) = setup_with_product().await?;
        let created = create_purchase(&db, laptop.id, 10, today()).await?;

        cancel_purchase(&db, created.id).await?;
        let err = cancel_purchase(&db, created.id).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyCancelled { id } if id == created.id));

        // Stock was credited exactly once
        let on_hand = stock_for_product(&db, laptop.id).await?.unwrap();
        assert_eq!(on_hand.quantity, 50);

        // And the first cancellation timestamp was not overwritten
        let row = purchase_by_id(&db, created.id).await?.unwrap();
        assert_eq!(row.status, purchase::Status::Cancelled);
        assert!(row.cancelled_at.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn rolled_back_atomic_unit_leaves_no_partial_state() -> Result<()> {
        let (db, laptop) = setup_with_product().await?;

        let txn = db.begin().await?;
        purchase::ActiveModel {
            product_id: Set(laptop.id),
            quantity: Set(10),
            purchase_date: Set(today()),
            status: Set(purchase::Status::Active),
            created_at: Set(Utc::now()),
            cancelled_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        assert!(stock::debit_stock(&txn, laptop.id, 10).await?);
        txn.rollback().await?;

        // Neither the purchase nor the debit survives the rollback
        assert_eq!(Purchase::find().all(&db).await?.len(), 0);
        let on_hand = stock_for_product(&db, laptop.id).await?.unwrap();
        assert_eq!(on_hand.quantity, 50);
        Ok(())
    }

    #[tokio::test]
    async fn stock_invariant_holds_across_operations() -> Result<()> {
        let (db, laptop) = setup_with_product().await?; // initial 50

        let first = create_test_purchase(&db, laptop.id, 10).await?;
        create_test_purchase(&db, laptop.id, 5).await?;
        cancel_purchase(&db, first.id).await?;
        create_test_purchase(&db, laptop.id, 20).await?;

        let active_total: i64 = Purchase::find()
            .filter(purchase::Column::Status.eq(purchase::Status::Active))
            .all(&db)
            .await?
            .iter()
            .map(|p| p.quantity)
            .sum();
        let on_hand = stock_for_product(&db, laptop.id).await?.unwrap().quantity;

        assert_eq!(active_total, 25);
        assert_eq!(on_hand + active_total, 50);
        Ok(())
    }

    #[tokio::test]
    async fn list_orders_by_date_then_id_descending() -> Result<()> {
        let (db, laptop) = setup_with_product().await?;
        let yesterday = today() - Duration::days(1);

        let p1 = create_purchase(&db, laptop.id, 1, today()).await?;
        let p2 = create_purchase(&db, laptop.id, 1, yesterday).await?;
        let p3 = create_purchase(&db, laptop.id, 1, today()).await?;

        let listed = list_purchases(&db).await?;
        let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();

        // Same-day purchases tie-break on id, newest insertion first
        assert_eq!(ids, vec![p3.id, p1.id, p2.id]);
        assert_eq!(listed[0].product_name.as_deref(), Some("Laptop"));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_never_overdraw() -> Result<()> {
        let db = setup_test_db().await?;
        let product = create_test_product(&db, "Webcam", 10).await?;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let db = db.clone();
            let product_id = product.id;
            handles.push(tokio::spawn(async move {
                create_purchase(&db, product_id, 3, Utc::now().date_naive()).await
            }));
        }

        let mut succeeded: i64 = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                succeeded += 1;
            }
        }

        // 10 units admit exactly three 3-unit purchases; the fourth must
        // fail rather than drive stock negative.
        assert_eq!(succeeded, 3);
        let on_hand = stock_for_product(&db, product.id).await?.unwrap().quantity;
        assert_eq!(on_hand, 10 - succeeded * 3);
        Ok(())
    }
}
