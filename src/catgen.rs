use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use laptop_advisor::catalog::generator::{generate_laptops, make_rng, save_to_csv};

#[derive(Parser)]
#[command(name = "advisor-catgen")]
#[command(about = "Generate a synthetic laptop catalog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[arg(short = 'n', long, default_value_t = 20, help = "Number of laptop models to generate")]
    count: usize,

    #[arg(short, long, default_value = "data/laptops.csv", help = "Output CSV path")]
    output: PathBuf,

    #[arg(long, help = "Seed for a reproducible catalog")]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut rng = make_rng(args.seed);
    let laptops = generate_laptops(args.count, &mut rng);
    save_to_csv(&laptops, &args.output)
        .with_context(|| format!("writing catalog to {}", args.output.display()))?;

    println!(
        "Generated {} laptop variants. File saved to {}",
        laptops.len(),
        args.output.display()
    );
    if let Some(first) = laptops.first() {
        println!("Sample record:");
        println!("{}", serde_json::to_string_pretty(first)?);
    }

    Ok(())
}
