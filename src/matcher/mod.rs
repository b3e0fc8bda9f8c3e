use strsim::{jaro_winkler, normalized_damerau_levenshtein};
use tracing::debug;

/// Fuzzy brand resolver over the catalog's known brand list.
///
/// Scores on a 0-100 scale; a candidate below the threshold is treated as
/// unknown rather than guessed.
#[derive(Debug, Clone)]
pub struct BrandMatcher {
    brands: Vec<String>,
    threshold: f64,
}

impl BrandMatcher {
    pub fn new(brands: Vec<String>, threshold: f64) -> Self {
        Self { brands, threshold }
    }

    /// Resolve free-form user text to a canonical brand name.
    ///
    /// An exact case-insensitive match short-circuits; otherwise the best
    /// similarity score wins if it clears the threshold.
    pub fn resolve(&self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let query_lower = query.to_lowercase();
        for brand in &self.brands {
            if brand.to_lowercase() == query_lower {
                return Some(brand.clone());
            }
        }

        let mut best_score = 0.0;
        let mut best_brand: Option<&String> = None;
        for brand in &self.brands {
            let score = similarity(&query_lower, &brand.to_lowercase());
            if score > best_score {
                best_score = score;
                best_brand = Some(brand);
            }
        }

        match best_brand {
            Some(brand) if best_score >= self.threshold => {
                debug!(
                    "Resolved brand '{}' to '{}' (score {:.1})",
                    query, brand, best_score
                );
                Some(brand.clone())
            }
            _ => None,
        }
    }

    pub fn brands(&self) -> &[String] {
        &self.brands
    }
}

/// Weighted similarity on a 0-100 scale.
///
/// Takes the better of edit-distance and prefix-weighted similarity so that
/// both dropped-letter typos ("Lenvo") and transpositions ("Samsnug")
/// clear the bar while unrelated strings stay far below it.
fn similarity(a: &str, b: &str) -> f64 {
    let edit = normalized_damerau_levenshtein(a, b);
    let prefix = jaro_winkler(a, b);
    edit.max(prefix) * 100.0
}
