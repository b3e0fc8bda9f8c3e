use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::matcher::BrandMatcher;
use crate::session::Preferences;

pub mod extract;

pub use extract::FilterExtractor;

/// Accumulated filter keys for the session.
///
/// One optional slot per key instead of a string-keyed map, so the set of
/// filterable attributes is checked at compile time. Deserialization
/// tolerates unknown keys, which lets a raw generation reply parse
/// directly into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.ram.is_none()
            && self.max_price.is_none()
            && self.cpu.is_none()
            && self.brand.is_none()
            && self.in_stock.is_none()
    }

    /// Merge `incoming` into this set. A set key in `incoming` overwrites
    /// the standing value; an unset key leaves it untouched.
    pub fn merge(&mut self, incoming: FilterSet) {
        if incoming.ram.is_some() {
            self.ram = incoming.ram;
        }
        if incoming.max_price.is_some() {
            self.max_price = incoming.max_price;
        }
        if incoming.cpu.is_some() {
            self.cpu = incoming.cpu;
        }
        if incoming.brand.is_some() {
            self.brand = incoming.brand;
        }
        if incoming.in_stock.is_some() {
            self.in_stock = incoming.in_stock;
        }
    }

    /// Names of the keys currently set, for logging
    pub fn active_keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.ram.is_some() {
            keys.push("ram");
        }
        if self.max_price.is_some() {
            keys.push("max_price");
        }
        if self.cpu.is_some() {
            keys.push("cpu");
        }
        if self.brand.is_some() {
            keys.push("brand");
        }
        if self.in_stock.is_some() {
            keys.push("in_stock");
        }
        keys
    }
}

/// Evaluate the standing preferences and filters against the full catalog.
///
/// Stages run in a fixed order, each narrowing the previous; unset keys are
/// skipped. The filter brand is re-resolved through the matcher at apply
/// time, and an unresolvable value passes everything through.
pub fn apply(
    products: &[Product],
    preferences: &Preferences,
    filters: &FilterSet,
    matcher: &BrandMatcher,
) -> Vec<Product> {
    let mut filtered: Vec<Product> = products.to_vec();

    if let Some(preferred) = &preferences.brand {
        let preferred = preferred.to_lowercase();
        filtered.retain(|p| p.brand.to_lowercase() == preferred);
    }

    if let Some(ram) = filters.ram {
        filtered.retain(|p| p.ram_gb >= ram);
    }

    if let Some(max_price) = filters.max_price {
        filtered.retain(|p| p.price <= max_price);
    }

    if let Some(cpu) = &filters.cpu {
        let needle = cpu.to_lowercase();
        filtered.retain(|p| p.cpu.to_lowercase().contains(&needle));
    }

    if let Some(brand) = &filters.brand {
        if let Some(resolved) = matcher.resolve(brand) {
            let resolved = resolved.to_lowercase();
            filtered.retain(|p| p.brand.to_lowercase() == resolved);
        }
    }

    if let Some(in_stock) = filters.in_stock {
        filtered.retain(|p| p.in_stock == in_stock);
    }

    filtered
}
