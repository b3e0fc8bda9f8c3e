//! Command dispatch over one interactive session.
//!
//! The advisor owns the session state and routes each input line to one of
//! four handlers: exit, preference setting, comparison, or the default
//! extract-filter-and-list path with an optional recommendation step.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::catalog::{CatalogStore, Product};
use crate::config::AdvisorConfig;
use crate::filters::{self, FilterExtractor};
use crate::i18n::{self, Language, Messages};
use crate::llm::prompts::{self, ComparisonItem};
use crate::llm::TextGenerator;
use crate::matcher::BrandMatcher;
use crate::session::Session;

pub mod present;

static POSITIONS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digits pattern"));

/// What one handled command means for the interactive loop.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Terminate the loop.
    Exit,
    /// Print this block and prompt again.
    Reply(String),
}

pub struct Advisor {
    catalog: Arc<CatalogStore>,
    matcher: BrandMatcher,
    extractor: FilterExtractor,
    generator: Arc<dyn TextGenerator>,
    messages: Messages,
    session: Session,
    language: Language,
    recommendation_temperature: f32,
    comparison_temperature: f32,
}

impl Advisor {
    pub fn new(
        config: &AdvisorConfig,
        catalog: Arc<CatalogStore>,
        generator: Arc<dyn TextGenerator>,
        messages: Messages,
    ) -> Self {
        let language = messages.current_language();
        let matcher = BrandMatcher::new(catalog.available_brands(), config.matcher.threshold);
        let extractor = FilterExtractor::new(
            Arc::clone(&generator),
            config.llm.extraction_temperature,
            language,
        );

        Self {
            catalog,
            matcher,
            extractor,
            generator,
            messages,
            session: Session::new(),
            language,
            recommendation_temperature: config.llm.recommendation_temperature,
            comparison_temperature: config.llm.comparison_temperature,
        }
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Dispatch one line of user input.
    ///
    /// Command phrases are matched against the lowercased line; the search
    /// path receives the line as typed. Every path returns a reply rather
    /// than an error, so a failed generation call never ends the session.
    pub async fn handle_command(&mut self, user_input: &str) -> Outcome {
        let original = user_input.trim();
        let lowered = original.to_lowercase();

        if i18n::exit_phrases().contains(&lowered.as_str()) {
            return Outcome::Exit;
        }

        if i18n::prefer_prefixes()
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
        {
            return Outcome::Reply(self.set_preference(preference_argument(original)));
        }

        if i18n::compare_prefixes()
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
        {
            let positions = parse_positions(original);
            return Outcome::Reply(self.compare(&positions).await);
        }

        let new_filters = self.extractor.extract(original, &self.matcher).await;
        self.session.filters.merge(new_filters);
        self.session.last_results = filters::apply(
            self.catalog.products(),
            &self.session.preferences,
            &self.session.filters,
            &self.matcher,
        );

        if i18n::recommend_keywords()
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            Outcome::Reply(self.recommend().await)
        } else {
            Outcome::Reply(present::format_results(
                &self.session.last_results,
                &self.messages,
            ))
        }
    }

    fn set_preference(&mut self, brand_query: &str) -> String {
        match self.matcher.resolve(brand_query) {
            Some(brand) => {
                info!(brand = %brand, "brand preference stored");
                let reply = self.messages.render("prefer.ok", &[("brand", &brand)]);
                self.session.preferences.brand = Some(brand);
                reply
            }
            None => {
                let brands = self.matcher.brands().join(", ");
                self.messages.render(
                    "prefer.unknown",
                    &[("brand", brand_query), ("brands", &brands)],
                )
            }
        }
    }

    async fn recommend(&self) -> String {
        let products = &self.session.last_results;
        if products.is_empty() {
            return self.messages.t("recommend.none");
        }

        let prompt = prompts::build_recommendation_prompt(
            &self.session.preferences,
            &self.session.filters,
            products,
            self.language,
        );
        match self
            .generator
            .generate(&prompt, self.recommendation_temperature)
            .await
        {
            Ok(reply) => present::normalize_currency(&reply),
            Err(e) => {
                warn!(error = %e, "recommendation call failed, using deterministic fallback");
                present::recommendation_fallback(products, &self.messages)
            }
        }
    }

    /// Compare entries of the last listing by their 1-based positions.
    /// Out-of-range positions are dropped; only an entirely invalid
    /// selection is reported back.
    async fn compare(&self, positions: &[usize]) -> String {
        let last = &self.session.last_results;
        if last.is_empty() {
            return self.messages.t("compare.none");
        }

        let selected: Vec<&Product> = positions
            .iter()
            .filter(|&&position| position >= 1 && position <= last.len())
            .map(|&position| &last[position - 1])
            .collect();

        if selected.is_empty() {
            let count = last.len().to_string();
            return self.messages.render("compare.invalid", &[("count", &count)]);
        }

        let items: Vec<ComparisonItem> = selected
            .iter()
            .map(|&product| ComparisonItem::from(product))
            .collect();
        let prompt = prompts::build_comparison_prompt(&items, self.language);
        match self
            .generator
            .generate(&prompt, self.comparison_temperature)
            .await
        {
            Ok(reply) => present::normalize_currency(&reply),
            Err(e) => {
                warn!(error = %e, "comparison call failed, using deterministic fallback");
                present::comparison_fallback(&selected, &self.messages)
            }
        }
    }
}

/// Everything after the first whitespace-delimited token.
fn preference_argument(input: &str) -> &str {
    match input.split_once(char::is_whitespace) {
        Some((_, rest)) => rest.trim(),
        None => "",
    }
}

/// All integers anywhere in the command text, taken as 1-based positions.
fn parse_positions(input: &str) -> Vec<usize> {
    POSITIONS
        .find_iter(input)
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::{AdvisorError, AdvisorResult};

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
            Err(AdvisorError::llm("API error"))
        }
    }

    fn product(
        id: &str,
        brand: &str,
        model: &str,
        ram_gb: u32,
        cpu: &str,
        price: f64,
        in_stock: bool,
    ) -> Product {
        Product {
            id: id.to_string(),
            brand: brand.to_string(),
            model: model.to_string(),
            ram_gb,
            cpu: cpu.to_string(),
            price,
            in_stock,
        }
    }

    fn catalog() -> Arc<CatalogStore> {
        Arc::new(CatalogStore::from_products(vec![
            product("1", "Lenovo", "ThinkPad X1", 16, "Intel i7", 1200.0, true),
            product("2", "Lenovo", "IdeaPad 5", 8, "Intel i5", 650.0, true),
            product("3", "Dell", "XPS 13", 16, "Intel i7", 1400.0, false),
            product("4", "Apple", "MacBook Air", 16, "Apple M2", 1500.0, true),
        ]))
    }

    fn advisor_with(generator: Arc<dyn TextGenerator>, language: Language) -> Advisor {
        let config = AdvisorConfig::default();
        Advisor::new(&config, catalog(), generator, Messages::new(language))
    }

    fn advisor(reply: &'static str) -> Advisor {
        advisor_with(Arc::new(FixedGenerator { reply }), Language::Russian)
    }

    fn offline_advisor() -> Advisor {
        advisor_with(Arc::new(FailingGenerator), Language::Russian)
    }

    fn reply_text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Reply(text) => text,
            Outcome::Exit => panic!("expected a reply, got exit"),
        }
    }

    #[tokio::test]
    async fn test_exit_phrases() {
        let mut advisor = advisor("{}");
        assert_eq!(advisor.handle_command("выход").await, Outcome::Exit);
        assert_eq!(advisor.handle_command("  EXIT  ").await, Outcome::Exit);
        assert_eq!(advisor.handle_command("quit").await, Outcome::Exit);
    }

    #[tokio::test]
    async fn test_set_preference_confirms_and_sticks() {
        let mut advisor = advisor("{}");

        let reply = reply_text(advisor.handle_command("предпочитаю Lenovo").await);
        assert!(reply.contains("Запомнил ваше предпочтение: Lenovo"));

        let listing = reply_text(advisor.handle_command("покажи ноутбуки").await);
        assert!(listing.contains("ThinkPad X1"));
        assert!(listing.contains("IdeaPad 5"));
        assert!(!listing.contains("XPS 13"));
        assert!(!listing.contains("MacBook Air"));
    }

    #[tokio::test]
    async fn test_set_preference_resolves_typo() {
        let mut advisor = advisor("{}");

        let reply = reply_text(advisor.handle_command("предпочитаю Lenvo").await);
        assert!(reply.contains("Lenovo"));
    }

    #[tokio::test]
    async fn test_set_preference_unknown_brand() {
        let mut advisor = advisor("{}");

        let reply = reply_text(advisor.handle_command("предпочитаю InvalidBrand123").await);
        assert!(reply.contains("не найден"));
        assert!(reply.contains("Lenovo"));
        assert!(reply.contains("Dell"));
    }

    #[tokio::test]
    async fn test_bare_preference_command_reports_unknown() {
        let mut advisor = advisor("{}");

        let reply = reply_text(advisor.handle_command("предпочитаю").await);
        assert!(reply.contains("не найден"));
    }

    #[tokio::test]
    async fn test_search_applies_local_filters() {
        let mut advisor = advisor("not json at all");

        let listing = reply_text(advisor.handle_command("ноутбуки 16 gb в наличии").await);
        assert!(listing.contains("ThinkPad X1"));
        assert!(listing.contains("MacBook Air"));
        assert!(!listing.contains("IdeaPad 5"));
        assert!(!listing.contains("XPS 13"));
    }

    #[tokio::test]
    async fn test_search_merges_delegated_filters() {
        let mut advisor = advisor(r#"{"max_price": 1000, "cpu": "Intel"}"#);

        let listing = reply_text(advisor.handle_command("ноутбук до 1000 с intel").await);
        assert!(listing.contains("Найдено ноутбуков: 1"));
        assert!(listing.contains("IdeaPad 5"));
    }

    #[tokio::test]
    async fn test_filters_accumulate_across_commands() {
        let mut advisor = advisor("{}");

        let first = reply_text(advisor.handle_command("ноутбуки 16 gb").await);
        assert!(first.contains("Найдено ноутбуков: 3"));

        let second = reply_text(advisor.handle_command("в наличии").await);
        assert!(second.contains("Найдено ноутбуков: 2"));
        assert!(second.contains("ThinkPad X1"));
        assert!(second.contains("MacBook Air"));
    }

    #[tokio::test]
    async fn test_no_results_message() {
        let mut advisor = advisor(r#"{"max_price": 10}"#);

        let listing = reply_text(advisor.handle_command("что-то до 10 долларов").await);
        assert!(listing.contains("Не найдено ноутбуков"));
    }

    #[tokio::test]
    async fn test_recommendation_keyword_returns_generated_text() {
        let mut advisor = advisor("🏆 Рекомендуемый ноутбук: Lenovo ThinkPad X1");

        let reply = reply_text(advisor.handle_command("рекомендуй").await);
        assert_eq!(reply, "🏆 Рекомендуемый ноутбук: Lenovo ThinkPad X1");
    }

    #[tokio::test]
    async fn test_recommendation_normalizes_currency() {
        let mut advisor = advisor("Отличный выбор за 1000€, аналог стоит 900 евро");

        let reply = reply_text(advisor.handle_command("посоветуй ноутбук").await);
        assert!(!reply.contains('€'));
        assert!(reply.contains("$900"));
    }

    #[tokio::test]
    async fn test_recommendation_fallback_lists_options() {
        let mut advisor = offline_advisor();

        let reply = reply_text(advisor.handle_command("рекомендуй").await);
        assert!(reply.contains("❌ Не удалось получить рекомендацию"));
        assert!(reply.contains("Lenovo ThinkPad X1"));
        let rows = reply.lines().filter(|line| line.starts_with('-')).count();
        assert_eq!(rows, 3);
    }

    #[tokio::test]
    async fn test_recommendation_with_no_matches() {
        let mut advisor = advisor(r#"{"ram": 999}"#);

        let reply = reply_text(advisor.handle_command("рекомендуй что-нибудь").await);
        assert_eq!(reply, "❌ Нет ноутбуков для рекомендации");
    }

    #[tokio::test]
    async fn test_compare_returns_generated_text() {
        let mut advisor = advisor("📊 Сравнение ноутбуков: ...\n🏆 Рекомендация: первый");

        reply_text(advisor.handle_command("покажи все ноутбуки").await);
        let reply = reply_text(advisor.handle_command("сравни 1 2").await);
        assert!(reply.contains("Сравнение"));
        assert!(reply.contains("Рекомендация"));
    }

    #[tokio::test]
    async fn test_compare_without_results() {
        let mut advisor = advisor("{}");

        let reply = reply_text(advisor.handle_command("сравни 1 2").await);
        assert!(reply.contains("Нет результатов для сравнения"));
    }

    #[tokio::test]
    async fn test_compare_drops_out_of_range_positions() {
        let mut advisor = offline_advisor();

        reply_text(advisor.handle_command("покажи все").await);
        let reply = reply_text(advisor.handle_command("сравни 1 99").await);
        assert!(reply.contains("ThinkPad X1"));
        assert!(!reply.contains("IdeaPad 5"));
        assert!(reply.contains("🏆 Рекомендация:"));
    }

    #[tokio::test]
    async fn test_compare_all_positions_invalid() {
        let mut advisor = advisor("{}");

        reply_text(advisor.handle_command("покажи все").await);
        let reply = reply_text(advisor.handle_command("сравни 99").await);
        assert!(reply.contains("Неверные номера моделей"));
        assert!(reply.contains("от 1 до 4"));
    }

    #[tokio::test]
    async fn test_compare_fallback_picks_best_value() {
        let mut advisor = offline_advisor();

        reply_text(advisor.handle_command("покажи все").await);
        // ThinkPad X1 is in stock at $75/GB, XPS 13 is out of stock
        let reply = reply_text(advisor.handle_command("сравни 1 3").await);
        assert!(reply.contains("🏆 Рекомендация: Lenovo ThinkPad X1"));
    }

    #[tokio::test]
    async fn test_english_lexicon_dispatch() {
        let mut advisor = advisor_with(
            Arc::new(FixedGenerator { reply: "{}" }),
            Language::English,
        );

        let reply = reply_text(advisor.handle_command("prefer Dell").await);
        assert!(reply.contains("Preference noted: Dell"));

        let listing = reply_text(advisor.handle_command("show laptops").await);
        assert!(listing.contains("Found laptops: 1"));
        assert!(listing.contains("XPS 13"));

        assert_eq!(advisor.handle_command("exit").await, Outcome::Exit);
    }

    #[test]
    fn test_parse_positions() {
        assert_eq!(parse_positions("сравни 1 2 3"), vec![1, 2, 3]);
        assert_eq!(parse_positions("compare 10 and 2"), vec![10, 2]);
        assert!(parse_positions("сравни эти два").is_empty());
    }

    #[test]
    fn test_preference_argument() {
        assert_eq!(preference_argument("предпочитаю Dell"), "Dell");
        assert_eq!(preference_argument("prefer  Dell Inspiron "), "Dell Inspiron");
        assert_eq!(preference_argument("предпочитаю"), "");
    }
}
