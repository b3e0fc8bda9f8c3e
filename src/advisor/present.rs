//! Response formatting and deterministic fallbacks.
//!
//! Everything here is pure text assembly. The generation calls that may
//! precede these functions live in the advisor itself; when those calls
//! fail, the fallbacks below still produce a usable response block.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::Product;
use crate::i18n::Messages;

/// At most this many rows appear in one listing.
const MAX_LISTED: usize = 10;

/// How many products the recommendation fallback names.
const FALLBACK_OPTIONS: usize = 3;

/// Amounts written against a euro currency word, in either language.
static EURO_AMOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:евро|euros?)").expect("valid euro pattern"));

/// Render the filtered list as a numbered block, capped at ten rows.
pub fn format_results(products: &[Product], messages: &Messages) -> String {
    if products.is_empty() {
        return messages.t("results.none");
    }

    let total = products.len().to_string();
    let mut out = format!("{}\n", messages.render("results.header", &[("count", &total)]));
    for (index, product) in products.iter().take(MAX_LISTED).enumerate() {
        let position = (index + 1).to_string();
        let ram = product.ram_gb.to_string();
        let price = format!("{:.2}", product.price);
        let stock = stock_label(product.in_stock, messages);
        out.push_str(&messages.render(
            "results.row",
            &[
                ("index", &position),
                ("brand", &product.brand),
                ("model", &product.model),
                ("ram", &ram),
                ("cpu", &product.cpu),
                ("price", &price),
                ("stock", &stock),
            ],
        ));
        out.push('\n');
    }
    if products.len() > MAX_LISTED {
        out.push('\n');
        out.push_str(&messages.render("results.truncated", &[("count", &total)]));
    }
    out
}

/// Rewrite euro-denominated amounts to dollars. Catalog prices are dollars
/// by contract, so generated text must never present euro amounts.
pub fn normalize_currency(text: &str) -> String {
    let replaced = text.replace('€', "$");
    EURO_AMOUNT.replace_all(&replaced, "$$${1}").into_owned()
}

/// Deterministic stand-in when the recommendation call fails.
pub fn recommendation_fallback(products: &[Product], messages: &Messages) -> String {
    let mut lines = vec![messages.t("recommend.fallback")];
    for product in products.iter().take(FALLBACK_OPTIONS) {
        let price = format!("{:.2}", product.price);
        lines.push(messages.render(
            "recommend.fallback_row",
            &[
                ("brand", &product.brand),
                ("model", &product.model),
                ("price", &price),
            ],
        ));
    }
    lines.join("\n")
}

/// Deterministic stand-in when the comparison call fails: a block of
/// hardware details per item plus a locally computed best pick.
pub fn comparison_fallback(selected: &[&Product], messages: &Messages) -> String {
    let mut out = format!("{}\n", messages.t("compare.header"));
    for (index, product) in selected.iter().enumerate() {
        let position = (index + 1).to_string();
        let ram = product.ram_gb.to_string();
        let price = format!("{:.2}", product.price);
        let stock = stock_label(product.in_stock, messages);
        out.push('\n');
        out.push_str(&messages.render(
            "compare.item",
            &[
                ("index", &position),
                ("brand", &product.brand),
                ("model", &product.model),
                ("cpu", &product.cpu),
                ("ram", &ram),
                ("price", &price),
                ("stock", &stock),
            ],
        ));
    }

    if let Some(best) = best_pick(selected) {
        out.push_str("\n\n");
        out.push_str(&messages.render(
            "compare.best",
            &[("brand", &best.brand), ("model", &best.model)],
        ));
        out.push('\n');
        out.push_str(&messages.t("compare.best_reason"));
    }
    out
}

/// In-stock items first, then the lowest price per gigabyte of RAM.
pub fn best_pick<'a>(products: &[&'a Product]) -> Option<&'a Product> {
    products.iter().copied().min_by(|a, b| {
        let stock_order = stock_rank(a).cmp(&stock_rank(b));
        stock_order.then_with(|| {
            price_per_gb(a)
                .partial_cmp(&price_per_gb(b))
                .unwrap_or(Ordering::Equal)
        })
    })
}

fn stock_rank(product: &Product) -> u8 {
    if product.in_stock {
        0
    } else {
        1
    }
}

fn price_per_gb(product: &Product) -> f64 {
    product.price / product.ram_gb as f64
}

fn stock_label(in_stock: bool, messages: &Messages) -> String {
    if in_stock {
        messages.t("stock.in")
    } else {
        messages.t("stock.out")
    }
}
