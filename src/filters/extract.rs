//! Filter extraction from free-form requests.
//!
//! Two passes feed one [`FilterSet`]: cheap local patterns that run on every
//! request, and a delegated structured-extraction call. Local hits always
//! win over delegated values for the same key, and any failure in the
//! delegated pass degrades to the local result instead of failing the
//! request.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{AdvisorError, AdvisorResult};
use crate::filters::FilterSet;
use crate::i18n::{self, Language};
use crate::llm::prompts::build_filter_extraction_prompt;
use crate::llm::{extract_json_object, TextGenerator};
use crate::matcher::BrandMatcher;

/// Matches "16 gb", "16gb", "рам 16" and "ram 16" forms.
static RAM_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*gb|рам\s*(\d+)|ram\s*(\d+)").expect("valid RAM pattern")
});

pub struct FilterExtractor {
    generator: Arc<dyn TextGenerator>,
    temperature: f32,
    language: Language,
}

impl FilterExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>, temperature: f32, language: Language) -> Self {
        Self {
            generator,
            temperature,
            language,
        }
    }

    /// Extract filter keys from one request.
    ///
    /// The returned set carries at most the keys the request mentioned;
    /// session accumulation happens at the caller. A brand value that the
    /// matcher cannot resolve against the catalog is dropped here so an
    /// invented brand never reaches the apply stage.
    pub async fn extract(&self, user_input: &str, matcher: &BrandMatcher) -> FilterSet {
        let mut filters = local_filters(user_input);

        match self.delegated_filters(user_input).await {
            Ok(delegated) => merge_unset(&mut filters, delegated),
            Err(e) => {
                warn!(error = %e, "structured extraction failed, keeping local patterns only");
            }
        }

        if let Some(brand) = filters.brand.take() {
            match matcher.resolve(&brand) {
                Some(resolved) => filters.brand = Some(resolved),
                None => debug!(brand = %brand, "dropping unrecognized brand value"),
            }
        }

        debug!(keys = ?filters.active_keys(), "extracted filters");
        filters
    }

    async fn delegated_filters(&self, user_input: &str) -> AdvisorResult<FilterSet> {
        let prompt = build_filter_extraction_prompt(user_input, self.language);
        let reply = self.generator.generate(&prompt, self.temperature).await?;
        let payload = extract_json_object(&reply)
            .ok_or_else(|| AdvisorError::malformed_reply("reply carries no JSON object"))?;
        Ok(serde_json::from_str(&payload)?)
    }
}

/// Pattern-based pass that needs no network round trip.
fn local_filters(user_input: &str) -> FilterSet {
    let lowered = user_input.to_lowercase();
    let mut filters = FilterSet::default();

    if i18n::in_stock_phrases()
        .iter()
        .any(|phrase| lowered.contains(phrase))
    {
        filters.in_stock = Some(true);
    }

    if let Some(captures) = RAM_PATTERN.captures(&lowered) {
        let digits = captures
            .get(1)
            .or_else(|| captures.get(2))
            .or_else(|| captures.get(3));
        if let Some(digits) = digits {
            if let Ok(ram) = digits.as_str().parse::<u32>() {
                filters.ram = Some(ram);
            }
        }
    }

    filters
}

/// Copy keys from `incoming` that `base` has not set. The opposite of
/// [`FilterSet::merge`], which lets newer values win.
fn merge_unset(base: &mut FilterSet, incoming: FilterSet) {
    if base.ram.is_none() {
        base.ram = incoming.ram;
    }
    if base.max_price.is_none() {
        base.max_price = incoming.max_price;
    }
    if base.cpu.is_none() {
        base.cpu = incoming.cpu;
    }
    if base.brand.is_none() {
        base.brand = incoming.brand;
    }
    if base.in_stock.is_none() {
        base.in_stock = incoming.in_stock;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedGenerator {
        reply: &'static str,
    }

    #[async_trait]
    impl TextGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str, _temperature: f32) -> AdvisorResult<String> {
            Ok(self.reply.to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _temperature: f32) -> AdvisorResult<String> {
            Err(AdvisorError::llm("service unavailable"))
        }
    }

    fn matcher() -> BrandMatcher {
        BrandMatcher::new(vec!["Lenovo".to_string(), "Dell".to_string()], 75.0)
    }

    fn extractor(reply: &'static str) -> FilterExtractor {
        FilterExtractor::new(
            Arc::new(FixedGenerator { reply }),
            0.3,
            Language::Russian,
        )
    }

    fn offline_extractor() -> FilterExtractor {
        FilterExtractor::new(Arc::new(FailingGenerator), 0.3, Language::Russian)
    }

    #[test]
    fn test_local_ram_forms() {
        assert_eq!(local_filters("ноутбук 16 gb").ram, Some(16));
        assert_eq!(local_filters("ноутбук 32GB").ram, Some(32));
        assert_eq!(local_filters("рам 8").ram, Some(8));
        assert_eq!(local_filters("laptop with RAM 64").ram, Some(64));
        assert_eq!(local_filters("покажи все ноутбуки").ram, None);
    }

    #[test]
    fn test_local_stock_phrase() {
        assert_eq!(local_filters("только В НАЛИЧИИ").in_stock, Some(true));
        assert_eq!(local_filters("only in stock please").in_stock, Some(true));
        assert_eq!(local_filters("покажи все").in_stock, None);
    }

    #[tokio::test]
    async fn test_local_values_win_over_delegated() {
        let extractor = extractor(r#"{"ram": 99, "cpu": "Intel i7"}"#);

        let filters = extractor.extract("ноутбук 16 gb", &matcher()).await;
        assert_eq!(filters.ram, Some(16));
        assert_eq!(filters.cpu.as_deref(), Some("Intel i7"));
    }

    #[tokio::test]
    async fn test_delegated_brand_is_resolved() {
        let extractor = extractor(r#"{"brand": "Lenvo"}"#);

        let filters = extractor.extract("что-нибудь от Lenvo", &matcher()).await;
        assert_eq!(filters.brand.as_deref(), Some("Lenovo"));
    }

    #[tokio::test]
    async fn test_unrecognized_brand_is_dropped() {
        let extractor = extractor(r#"{"brand": "Frobnicator", "ram": 16}"#);

        let filters = extractor.extract("ноутбук Frobnicator", &matcher()).await;
        assert!(filters.brand.is_none());
        assert_eq!(filters.ram, Some(16));
    }

    #[tokio::test]
    async fn test_fenced_reply_is_salvaged() {
        let extractor = extractor("```json\n{\"max_price\": 1000.0}\n```");

        let filters = extractor.extract("до 1000 долларов", &matcher()).await;
        assert_eq!(filters.max_price, Some(1000.0));
    }

    #[tokio::test]
    async fn test_generation_failure_degrades_to_local() {
        let extractor = offline_extractor();

        let filters = extractor.extract("в наличии, рам 16", &matcher()).await;
        assert_eq!(filters.ram, Some(16));
        assert_eq!(filters.in_stock, Some(true));
        assert!(filters.cpu.is_none());
    }

    #[tokio::test]
    async fn test_unparseable_reply_degrades_to_local() {
        let extractor = extractor("sure, here are some laptops!");

        let filters = extractor.extract("рам 8", &matcher()).await;
        assert_eq!(filters.ram, Some(8));
        assert!(!filters.is_empty());
        assert!(filters.brand.is_none());
    }

    #[test]
    fn test_merge_unset_never_overwrites() {
        let mut base = FilterSet {
            ram: Some(16),
            ..Default::default()
        };

        merge_unset(
            &mut base,
            FilterSet {
                ram: Some(8),
                in_stock: Some(false),
                ..Default::default()
            },
        );

        assert_eq!(base.ram, Some(16));
        assert_eq!(base.in_stock, Some(false));
    }
}
