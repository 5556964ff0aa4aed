//! frost_tree — interactive entry point.

use std::io::{self, Write};

use anyhow::Result;
use frost_tree::app::{run, AppConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║          Frost Tree — Gesture-Driven Holiday Particles       ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse/keyboard simulation  (use --features leap for hardware)");
    println!();

    if let Err(e) = start() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn start() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    let mut cfg = match flag_value(&args, "--config") {
        Some(path) => {
            println!("  Config: {}\n", path);
            AppConfig::load(path)?
        }
        None if args.iter().any(|a| a == "--quick") => {
            println!("  Quick-start: 8000 particles, seed 2024\n");
            AppConfig::default()
        }
        None => configure_interactively(),
    };
    if let Some(seed) = flag_value(&args, "--seed").and_then(|s| s.parse().ok()) {
        cfg.seed = seed;
    }

    if let Some(path) = flag_value(&args, "--save-config") {
        cfg.save(path)?;
        println!("  Saved config to {}", path);
        return Ok(());
    }

    println!();
    println!("  Opening preview window…");
    println!();
    run(cfg)
}

fn configure_interactively() -> AppConfig {
    let mut cfg = AppConfig::default();

    cfg.seed = read_line("  Seed (default 2024): ")
        .trim().parse().unwrap_or(2024);
    cfg.field.capacity = read_line("  Particle capacity (default 8000): ")
        .trim().parse::<usize>().unwrap_or(8000).clamp(100, 50_000);

    println!("  Window: 1=960×720  2=1280×960  3=640×480");
    let (w, h) = match read_line("  Choice (default 1): ").trim() {
        "2" => (1280, 960),
        "3" => (640, 480),
        _   => (960, 720),
    };
    cfg.width = w;
    cfg.height = h;

    let open: f32 = read_line("  Open-palm threshold (default 1.6): ")
        .trim().parse().unwrap_or(1.6);
    let close: f32 = read_line("  Fist threshold (default 1.3): ")
        .trim().parse().unwrap_or(1.3);
    if close < open {
        cfg.gesture.open_threshold = open;
        cfg.gesture.close_threshold = close;
    } else {
        println!("  ⚠  fist threshold must be below open threshold; keeping defaults.");
    }
    cfg
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
