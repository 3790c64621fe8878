//! Stock entity - units currently on hand, one row per product.
//!
//! Mutated only by the purchase ledger, inside the same atomic unit as the
//! corresponding purchase mutation. The quantity is never negative.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock")]
pub struct Model {
    /// Unique identifier for the stock row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product this row tracks; unique, making the relation 1:1
    #[sea_orm(unique)]
    pub product_id: i64,
    /// Units currently on hand
    pub quantity: i64,
    /// Last time the quantity changed
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Stock and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each stock row belongs to one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
