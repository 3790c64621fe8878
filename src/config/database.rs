//! Database configuration module.
//!
//! This module handles the `SQLite` database connection and table creation
//! using `SeaORM`. Schema statements are generated from the entity definitions
//! with `Schema::create_table_from_entity`, so the database layout always
//! matches the Rust struct definitions without manual SQL. Table creation is
//! idempotent because it runs on every startup against a persistent file.

use crate::entities::{Product, Purchase, Stock};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/stockroom.sqlite?mode=rwc";

/// Gets the database URL from the environment or the default local `SQLite` path.
#[must_use]
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a default local `SQLite` file if no environment variable is
/// set. The returned handle is created once at startup and shared from there;
/// nothing else in the crate opens connections.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(database_url()).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions, if they do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut product_table = schema.create_table_from_entity(Product);
    product_table.if_not_exists();
    let mut stock_table = schema.create_table_from_entity(Stock);
    stock_table.if_not_exists();
    let mut purchase_table = schema.create_table_from_entity(Purchase);
    purchase_table.if_not_exists();

    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&stock_table)).await?;
    db.execute(builder.build(&purchase_table)).await?;

    Ok(())
}
