use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing::info;

use super::Product;
use crate::error::AdvisorResult;

const BRANDS: &[&str] = &[
    "Lenovo", "Dell", "HP", "Asus", "Acer", "Apple", "MSI", "Samsung",
];

const CPUS: &[&str] = &[
    "Intel i5",
    "Intel i7",
    "Intel i9",
    "AMD Ryzen 5",
    "AMD Ryzen 7",
    "AMD Ryzen 9",
    "Apple M1",
    "Apple M2",
];

const RAM_CHOICES: &[u32] = &[8, 16, 32, 64];

fn models_for(brand: &str) -> &'static [&'static str] {
    match brand {
        "Lenovo" => &["ThinkPad X1", "ThinkBook", "IdeaPad", "Legion"],
        "Dell" => &["XPS 13", "XPS 15", "Inspiron", "Alienware"],
        "HP" => &["Spectre", "Envy", "Pavilion", "Omen"],
        "Asus" => &["ZenBook", "ROG Zephyrus", "VivoBook", "TUF Gaming"],
        "Acer" => &["Swift", "Aspire", "Predator", "Nitro"],
        "Apple" => &["MacBook Air", "MacBook Pro"],
        "MSI" => &["Stealth", "Raider", "Katana", "Sword"],
        "Samsung" => &["Galaxy Book", "Odyssey"],
        _ => &["Notebook"],
    }
}

/// Create a seeded or entropy-backed generator RNG
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Generate a synthetic laptop catalog.
///
/// `model_count` is the number of model draws; each draw produces one to
/// three RAM/CPU variants, so the output has at least that many rows.
pub fn generate_laptops(model_count: usize, rng: &mut StdRng) -> Vec<Product> {
    let mut products = Vec::new();

    for _ in 0..model_count {
        let brand = BRANDS[rng.gen_range(0..BRANDS.len())];
        let model_bases = models_for(brand);
        let model_base = model_bases[rng.gen_range(0..model_bases.len())];
        let model = if brand == "Apple" {
            model_base.to_string()
        } else {
            let letter = (b'A' + rng.gen_range(0..26u8)) as char;
            format!("{} {}{:02}", model_base, letter, rng.gen_range(0..100u32))
        };

        // Apple silicon never ships in other brands; Apple machines can
        // still draw any CPU.
        let cpu_pool: Vec<&str> = CPUS
            .iter()
            .copied()
            .filter(|cpu| !(cpu.contains("Apple") && brand != "Apple"))
            .collect();

        for _ in 0..rng.gen_range(1..=3) {
            let ram = RAM_CHOICES[rng.gen_range(0..RAM_CHOICES.len())];
            let cpu = cpu_pool[rng.gen_range(0..cpu_pool.len())];

            let mut base_price = 500.0 + (f64::from(ram) / 8.0 * 200.0);
            if cpu.contains("i7") || cpu.contains("Ryzen 7") {
                base_price += 300.0;
            }
            if cpu.contains("i9") || cpu.contains("Ryzen 9") {
                base_price += 600.0;
            }
            if cpu.contains("Apple") {
                base_price += 400.0;
            }
            let price = (base_price * (0.9 + rng.gen::<f64>() * 0.3) * 100.0).round() / 100.0;

            products.push(Product {
                id: uuid::Builder::from_random_bytes(rng.gen::<[u8; 16]>())
                    .into_uuid()
                    .to_string(),
                brand: brand.to_string(),
                model: model.clone(),
                ram_gb: ram,
                cpu: cpu.to_string(),
                price,
                in_stock: rng.gen_bool(0.5),
            });
        }
    }

    products
}

/// Write a generated catalog to CSV, creating the parent directory if needed
pub fn save_to_csv<P: AsRef<Path>>(products: &[Product], path: P) -> AdvisorResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for product in products {
        writer.serialize(product)?;
    }
    writer.flush()?;

    info!(
        "Wrote {} products to {}",
        products.len(),
        path.as_ref().display()
    );
    Ok(())
}
