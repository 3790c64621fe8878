//! Service entry point: configuration, store initialization, seeding, and
//! the HTTP server.

use dotenvy::dotenv;
use std::env;
use stockroom::api::{self, AppState};
use stockroom::config::{catalog, database};
use stockroom::core::product;
use stockroom::errors::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Open the store and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    // 4. Seed the catalog on first run
    let seed_catalog = catalog::load_default_catalog()?;
    if product::seed_products(&db, &seed_catalog).await? {
        info!("Seeded catalog with {} products.", seed_catalog.products.len());
    }

    // 5. Serve the API; the database handle lives as long as the process
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    api::serve(AppState::new(db), &addr).await
}
