use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::filters::FilterSet;

/// Standing user preferences, durable for the whole session.
///
/// Only `brand` is settable by command today; the remaining slots travel
/// with the preference block into generation prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_ram: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_stock: Option<bool>,
}

/// Conversational state for one interactive session.
///
/// Mutated only by the filter accumulator and the preference setter;
/// a restart is the only reset.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub preferences: Preferences,
    pub filters: FilterSet,
    pub last_results: Vec<Product>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_serialize_compactly() {
        let preferences = Preferences {
            brand: Some("Lenovo".to_string()),
            ..Default::default()
        };

        // Only set slots appear in prompt context
        assert_eq!(
            serde_json::to_string(&preferences).unwrap(),
            r#"{"brand":"Lenovo"}"#
        );
        assert_eq!(
            serde_json::to_string(&Preferences::default()).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_new_session_is_blank() {
        let session = Session::new();
        assert!(session.preferences.brand.is_none());
        assert!(session.filters.is_empty());
        assert!(session.last_results.is_empty());
    }
}
