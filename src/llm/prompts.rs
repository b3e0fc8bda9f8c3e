/// Prompt templates for model interactions
use serde::Serialize;

use crate::catalog::Product;
use crate::filters::FilterSet;
use crate::i18n::Language;
use crate::session::Preferences;

/// At most this many catalog entries are embedded in a recommendation prompt.
const PROMPT_PRODUCT_LIMIT: usize = 10;

/// Build prompt for structured filter extraction from free-form input
pub fn build_filter_extraction_prompt(user_input: &str, language: Language) -> String {
    match language {
        Language::Russian => format!(
            "Извлеки параметры ноутбука из запроса на русском. \
             Возможные параметры: ram (int), max_price (float), cpu (str), brand (str), in_stock (bool). \
             Для in_stock используй true/false. \
             Запрос: {} \
             Верни только JSON, например: {{\"cpu\": \"Intel i7\", \"in_stock\": true}}",
            user_input
        ),
        Language::English => format!(
            "Extract laptop parameters from the request. \
             Possible parameters: ram (int), max_price (float), cpu (str), brand (str), in_stock (bool). \
             Use true/false for in_stock. \
             Request: {} \
             Return only JSON, for example: {{\"cpu\": \"Intel i7\", \"in_stock\": true}}",
            user_input
        ),
    }
}

/// Build prompt asking for a reasoned pick from the filtered catalog
pub fn build_recommendation_prompt(
    preferences: &Preferences,
    filters: &FilterSet,
    products: &[Product],
    language: Language,
) -> String {
    let window = &products[..products.len().min(PROMPT_PRODUCT_LIMIT)];
    let preferences_json = serde_json::to_string(preferences).unwrap_or_default();
    let filters_json = serde_json::to_string(filters).unwrap_or_default();
    let products_json = serde_json::to_string_pretty(window).unwrap_or_default();

    match language {
        Language::Russian => format!(
            r#"Ты эксперт по выбору ноутбуков. Выбери лучший вариант из списка и обоснуй выбор на русском языке.
Предпочтения пользователя: {}
Текущие фильтры: {}
Ноутбуки для анализа:
{}
ВАЖНО: Все цены должны быть указаны в ДОЛЛАРАХ ($), а не в евро!
Учитывай:
1. Соответствие требованиям
2. Соотношение цены и качества
3. Наличие в магазине
4. Технические характеристики
Формат ответа:
🏆 Рекомендуемый ноутбук: [полное название]
📌 Характеристики: [основные параметры]
💡 Обоснование: [развернутое объяснение на русском языке]"#,
            preferences_json, filters_json, products_json
        ),
        Language::English => format!(
            r#"You are a laptop selection expert. Pick the best option from the list and justify the choice.
User preferences: {}
Current filters: {}
Laptops to analyze:
{}
IMPORTANT: All prices must be given in DOLLARS ($), not in euros!
Consider:
1. Fit against the requirements
2. Price to quality ratio
3. Store availability
4. Technical specifications
Response format:
🏆 Recommended laptop: [full name]
📌 Specifications: [key parameters]
💡 Reasoning: [detailed explanation]"#,
            preferences_json, filters_json, products_json
        ),
    }
}

/// Build prompt asking for a side-by-side comparison of selected models
pub fn build_comparison_prompt(items: &[ComparisonItem], language: Language) -> String {
    let items_json = serde_json::to_string_pretty(items).unwrap_or_default();

    match language {
        Language::Russian => format!(
            r#"Сравни следующие ноутбуки на русском языке и дай рекомендацию:
{}
ВАЖНО: Все цены должны быть указаны в ДОЛЛАРАХ ($), а не в евро!
Сделай:
1. Детальное сравнение характеристик
2. Оценку по соотношению цена/качество
3. Рекомендацию лучшего варианта с обоснованием
Формат вывода на русском:
📊 Сравнение ноутбуков:
[подробное сравнение в табличной или списковой форме]
🏆 Рекомендация:
[развернутое обоснование выбора]"#,
            items_json
        ),
        Language::English => format!(
            r#"Compare the following laptops and give a recommendation:
{}
IMPORTANT: All prices must be given in DOLLARS ($), not in euros!
Provide:
1. A detailed comparison of the specifications
2. An assessment of the price to quality ratio
3. A recommendation of the best option with reasoning
Output format:
📊 Laptop comparison:
[detailed comparison in table or list form]
🏆 Recommendation:
[detailed reasoning for the choice]"#,
            items_json
        ),
    }
}

/// Reduced product view embedded in comparison prompts.
///
/// The price is pre-formatted as a dollar string so the model never sees a
/// bare number it could re-denominate.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonItem {
    pub brand: String,
    pub model: String,
    pub cpu: String,
    pub ram_gb: u32,
    pub price: String,
    pub in_stock: bool,
}

impl From<&Product> for ComparisonItem {
    fn from(product: &Product) -> Self {
        Self {
            brand: product.brand.clone(),
            model: product.model.clone(),
            cpu: product.cpu.clone(),
            ram_gb: product.ram_gb,
            price: format!("${:.2}", product.price),
            in_stock: product.in_stock,
        }
    }
}
