//! Purchase entity - the ledger of stock debits.
//!
//! A purchase is inserted as `active` and can only ever transition to
//! `cancelled`, at which point `cancelled_at` is set exactly once. The
//! quantity is fixed at creation and never changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a purchase. `Cancelled` is terminal.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Still counted against stock
    #[sea_orm(string_value = "active")]
    Active,
    /// Cancelled; its quantity has been restored to stock
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Purchase database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    /// Unique identifier for the purchase
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product the purchase debits
    pub product_id: i64,
    /// Units bought; fixed at creation
    pub quantity: i64,
    /// Calendar date of the purchase (no time component)
    pub purchase_date: Date,
    /// Current lifecycle state
    pub status: Status,
    /// When the purchase row was created
    pub created_at: DateTimeUtc,
    /// Set exactly once, when the purchase is cancelled
    pub cancelled_at: Option<DateTimeUtc>,
}

/// Defines relationships between Purchase and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each purchase belongs to one product
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
