use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Russian,
}

impl Language {
    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Russian => "ru",
        }
    }

    /// Get language name
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Russian => "Русский",
        }
    }

    /// Get all supported languages
    pub fn all() -> Vec<Language> {
        vec![Language::English, Language::Russian]
    }

    /// Parse language from code
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_lowercase().as_str() {
            "en" => Some(Language::English),
            "ru" => Some(Language::Russian),
            _ => None,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

/// Message map for a single language
#[derive(Debug, Clone)]
pub struct LanguageMessages {
    pub language: Language,
    pub messages: HashMap<String, String>,
}

impl LanguageMessages {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            messages: HashMap::new(),
        }
    }

    pub fn add(&mut self, key: &str, value: &str) {
        self.messages.insert(key.to_string(), value.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.messages.get(key)
    }
}

/// User-facing message catalog with English fallback
#[derive(Debug, Clone)]
pub struct Messages {
    current_language: Language,
    catalogs: HashMap<Language, LanguageMessages>,
    fallback_language: Language,
}

impl Messages {
    pub fn new(language: Language) -> Self {
        let mut messages = Self {
            current_language: language,
            catalogs: HashMap::new(),
            fallback_language: Language::English,
        };
        messages.load_default_messages();
        messages
    }

    /// Get current language
    pub fn current_language(&self) -> Language {
        self.current_language
    }

    /// Get message for the current language
    pub fn t(&self, key: &str) -> String {
        self.get_message(key, self.current_language)
    }

    /// Get message for the current language with `{name}` placeholders filled
    pub fn render(&self, key: &str, params: &[(&str, &str)]) -> String {
        let mut message = self.t(key);
        for (name, value) in params {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }

    /// Get message for a specific language
    pub fn get_message(&self, key: &str, language: Language) -> String {
        if let Some(catalog) = self.catalogs.get(&language) {
            if let Some(message) = catalog.get(key) {
                return message.clone();
            }
        }

        // Fall back to English
        if language != self.fallback_language {
            if let Some(catalog) = self.catalogs.get(&self.fallback_language) {
                if let Some(message) = catalog.get(key) {
                    warn!(
                        "Message missing for key '{}' in language '{}', using fallback",
                        key,
                        language.name()
                    );
                    return message.clone();
                }
            }
        }

        warn!("Message missing for key '{}' in all languages, using key", key);
        key.to_string()
    }

    /// Get all available languages
    pub fn available_languages(&self) -> Vec<Language> {
        self.catalogs.keys().cloned().collect()
    }

    fn load_default_messages(&mut self) {
        // English messages
        let mut english = LanguageMessages::new(Language::English);
        english.add(
            "banner.title",
            "💻 Hi! I help pick laptops. Describe what you need, or say 'exit'",
        );
        english.add("banner.commands_header", "Available commands:");
        english.add(
            "banner.cmd_search",
            "- 'show laptops with Intel i7' - search by parameters",
        );
        english.add("banner.cmd_recommend", "- 'recommend' - get a recommendation");
        english.add("banner.cmd_prefer", "- 'prefer BRAND' - set a brand preference");
        english.add("banner.cmd_compare", "- 'compare 1 2 3' - compare listed models");
        english.add("banner.cmd_exit", "- 'exit' - quit");
        english.add("prompt", "You: ");
        english.add("exit.goodbye", "👋 Goodbye!");
        english.add("interrupt.hint", "Type 'exit' to leave.");
        english.add("error.generic", "⚠️ Error: {error}");
        english.add("catalog.empty", "⚠️ The catalog is empty. Check the data file.");

        // Preferences
        english.add("prefer.ok", "✅ Preference noted: {brand}");
        english.add(
            "prefer.unknown",
            "❌ Brand '{brand}' not found. Available brands: {brands}",
        );

        // Result listing
        english.add("results.none", "❌ No laptops found for the given criteria.");
        english.add("results.header", "🔍 Found laptops: {count}");
        english.add(
            "results.row",
            "{index}. {brand} {model} | RAM: {ram}GB | CPU: {cpu} | Price: ${price} | {stock}",
        );
        english.add("results.truncated", "Showing 10 of {count}. Narrow the criteria.");
        english.add("stock.in", "✅ In stock");
        english.add("stock.out", "❌ Out of stock");

        // Recommendation
        english.add("recommend.none", "❌ No laptops to recommend");
        english.add(
            "recommend.fallback",
            "❌ Could not get a recommendation. Available options:",
        );
        english.add("recommend.fallback_row", "- {brand} {model} (${price})");

        // Comparison
        english.add("compare.none", "❌ No results to compare. Run a search first.");
        english.add(
            "compare.invalid",
            "❌ Invalid model numbers. Valid numbers are 1 to {count}.",
        );
        english.add("compare.header", "📊 Comparison:");
        english.add(
            "compare.item",
            "{index}. {brand} {model}\n   CPU: {cpu}, RAM: {ram}GB\n   Price: ${price}\n   {stock}",
        );
        english.add("compare.best", "🏆 Recommendation: {brand} {model}");
        english.add(
            "compare.best_reason",
            "💡 Why: Best balance of price and specs among the selected.",
        );

        self.catalogs.insert(Language::English, english);

        // Russian messages
        let mut russian = LanguageMessages::new(Language::Russian);
        russian.add(
            "banner.title",
            "💻 Привет! Я помогу выбрать ноутбук. Задайте параметры или 'выход'",
        );
        russian.add("banner.commands_header", "Доступные команды:");
        russian.add(
            "banner.cmd_search",
            "- 'покажи ноутбуки с Intel i7' - поиск по параметрам",
        );
        russian.add("banner.cmd_recommend", "- 'рекомендуй' - получить рекомендацию");
        russian.add(
            "banner.cmd_prefer",
            "- 'предпочитаю БРЕНД' - установить предпочтение по бренду",
        );
        russian.add(
            "banner.cmd_compare",
            "- 'сравни 1 2 3' - сравнить выбранные модели",
        );
        russian.add("banner.cmd_exit", "- 'выход' - завершить работу");
        russian.add("prompt", "Вы: ");
        russian.add("exit.goodbye", "👋 До свидания!");
        russian.add("interrupt.hint", "Для выхода введите 'выход'.");
        russian.add("error.generic", "⚠️ Ошибка: {error}");
        russian.add("catalog.empty", "⚠️ Каталог пуст. Проверьте файл данных.");

        // Preferences
        russian.add("prefer.ok", "✅ Запомнил ваше предпочтение: {brand}");
        russian.add(
            "prefer.unknown",
            "❌ Бренд '{brand}' не найден. Доступные бренды: {brands}",
        );

        // Result listing
        russian.add("results.none", "❌ Не найдено ноутбуков по заданным критериям.");
        russian.add("results.header", "🔍 Найдено ноутбуков: {count}");
        russian.add(
            "results.row",
            "{index}. {brand} {model} | RAM: {ram}GB | CPU: {cpu} | Цена: ${price} | {stock}",
        );
        russian.add("results.truncated", "Показано 10 из {count}. Уточните критерии.");
        russian.add("stock.in", "✅ В наличии");
        russian.add("stock.out", "❌ Нет в наличии");

        // Recommendation
        russian.add("recommend.none", "❌ Нет ноутбуков для рекомендации");
        russian.add(
            "recommend.fallback",
            "❌ Не удалось получить рекомендацию. Доступные варианты:",
        );
        russian.add("recommend.fallback_row", "- {brand} {model} (${price})");

        // Comparison
        russian.add(
            "compare.none",
            "❌ Нет результатов для сравнения. Сначала выполните поиск.",
        );
        russian.add(
            "compare.invalid",
            "❌ Неверные номера моделей. Доступны номера от 1 до {count}.",
        );
        russian.add("compare.header", "📊 Сравнение:");
        russian.add(
            "compare.item",
            "{index}. {brand} {model}\n   CPU: {cpu}, RAM: {ram}GB\n   Цена: ${price}\n   {stock}",
        );
        russian.add("compare.best", "🏆 Рекомендация: {brand} {model}");
        russian.add(
            "compare.best_reason",
            "💡 Почему: Лучшее соотношение цены и характеристик среди выбранных.",
        );

        self.catalogs.insert(Language::Russian, russian);
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::new(Language::default())
    }
}

// Command phrases are accepted in every supported language at once, so the
// lexicon below is the union across languages rather than per-catalog.

/// Phrases that terminate the session
pub fn exit_phrases() -> &'static [&'static str] {
    &["выход", "exit", "quit"]
}

/// Prefixes that set a brand preference
pub fn prefer_prefixes() -> &'static [&'static str] {
    &["предпочитаю", "prefer"]
}

/// Prefixes that request a comparison
pub fn compare_prefixes() -> &'static [&'static str] {
    &["сравни", "compare"]
}

/// Keywords that request a free-text recommendation
pub fn recommend_keywords() -> &'static [&'static str] {
    &["рекоменд", "совет", "посоветуй", "recommend", "suggest", "advise"]
}

/// Phrases that express an in-stock requirement
pub fn in_stock_phrases() -> &'static [&'static str] {
    &["в наличии", "in stock"]
}
