use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::{error, info};

use crate::error::AdvisorResult;

pub mod generator;

/// A single catalog record, immutable after load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub ram_gb: u32,
    pub cpu: String,
    pub price: f64,
    #[serde(deserialize_with = "flexible_bool")]
    pub in_stock: bool,
}

/// Accepts true/false in the casings that common CSV writers produce,
/// plus 1/0.
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "invalid boolean value: {other}"
        ))),
    }
}

/// In-memory laptop catalog backed by a flat CSV file
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
}

impl CatalogStore {
    /// Build a store from already loaded products
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load the catalog from a CSV file.
    ///
    /// Structural problems (missing file, malformed column) surface as an
    /// error; the caller decides whether to degrade to an empty catalog.
    pub fn load<P: AsRef<Path>>(path: P) -> AdvisorResult<Self> {
        let mut reader = csv::Reader::from_path(path.as_ref())?;
        let mut products = Vec::new();

        for record in reader.deserialize() {
            let product: Product = record?;
            products.push(product);
        }

        info!("Loaded {} products from catalog", products.len());
        Ok(Self { products })
    }

    /// Load the catalog, degrading to an empty store on any failure.
    ///
    /// The assistant keeps serving commands against an empty catalog rather
    /// than refusing to start.
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(store) => store,
            Err(e) => {
                error!(
                    category = e.category(),
                    "Failed to load catalog from {}: {}",
                    path.as_ref().display(),
                    e
                );
                Self::default()
            }
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Deduplicated brand list in first-seen order
    pub fn available_brands(&self) -> Vec<String> {
        let mut brands: Vec<String> = Vec::new();
        for product in &self.products {
            if !brands.iter().any(|b| b == &product.brand) {
                brands.push(product.brand.clone());
            }
        }
        brands
    }
}
