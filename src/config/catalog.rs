//! Seed catalog loading from products.toml
//!
//! This module provides functionality to load the initial product catalog
//! from a TOML configuration file. The products defined there are used to
//! seed the database on first run; when no file is present, a built-in
//! sample catalog is used instead.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire products.toml file
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// List of product configurations to seed
    pub products: Vec<ProductSeed>,
}

/// Seed configuration for a single product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductSeed {
    /// Display name of the product
    pub name: String,
    /// Optional longer description
    pub description: Option<String>,
    /// Initial stock quantity
    pub stock: i64,
}

/// Loads the seed catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse products.toml: {e}"),
    })
}

/// Loads the catalog from the default location (./products.toml), falling
/// back to the built-in sample catalog when the file does not exist.
pub fn load_default_catalog() -> Result<Catalog> {
    if Path::new("products.toml").exists() {
        load_catalog("products.toml")
    } else {
        Ok(sample_catalog())
    }
}

/// The built-in sample catalog used when no products.toml is present.
#[must_use]
pub fn sample_catalog() -> Catalog {
    let seed = |name: &str, description: &str, stock: i64| ProductSeed {
        name: name.to_string(),
        description: Some(description.to_string()),
        stock,
    };

    Catalog {
        products: vec![
            seed("Laptop", "High-performance laptop", 50),
            seed("Mouse", "Wireless optical mouse", 200),
            seed("Keyboard", "Mechanical keyboard", 150),
            seed("Monitor", "27-inch LED monitor", 75),
            seed("Headphones", "Noise-cancelling headphones", 100),
            seed("Webcam", "HD webcam with microphone", 80),
            seed("USB Cable", "USB-C to USB-A cable", 300),
            seed("HDMI Cable", "4K HDMI cable", 250),
            seed("Desk Lamp", "LED desk lamp", 120),
            seed("Phone Stand", "Adjustable phone stand", 180),
        ],
    }
}
