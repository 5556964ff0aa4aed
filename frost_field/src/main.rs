//! field_stats — generate a tree field and print what went into it.

use frost_field::{FieldConfig, ParticleField};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_arg::<u64>(&args, "--seed").unwrap_or(2024);
    let capacity = parse_arg::<usize>(&args, "--capacity").unwrap_or(8000);

    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║             Frost Tree Particle Field                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let cfg = FieldConfig { capacity, ..FieldConfig::default() };
    let field = match ParticleField::seeded(&cfg, seed) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    println!("  seed {}  capacity {}", seed, capacity);
    println!();
    for line in field.stats().to_string().lines() {
        println!("  {}", line);
    }
    if field.dropped() > 0 {
        println!();
        println!("  ⚠  {} particles did not fit the capacity", field.dropped());
    }
    println!();
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|v| v == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse::<T>().ok())
}
