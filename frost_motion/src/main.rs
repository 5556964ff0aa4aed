//! motion_trace — run the engine headless through a scripted gesture
//! session and print the blend and rotation curves.

use frost_field::{FieldConfig, ParticleField};
use frost_gesture::GestureState;
use frost_motion::{AnimationEngine, InstanceBuffer};
use tracing_subscriber::EnvFilter;

const FPS: f32 = 60.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_arg::<u64>(&args, "--seed").unwrap_or(2024);
    let seconds = parse_arg::<f32>(&args, "--seconds").unwrap_or(8.0);

    println!();
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║               Frost Tree Motion Trace                ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let field = match ParticleField::seeded(&FieldConfig::default(), seed) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let mut engine = AnimationEngine::default();
    let mut buffer = InstanceBuffer::new(field.len());

    println!("  {:>6}  {:<9} {:>5}  {:>6}  {:>8}  {:>8}", "time", "state", "hand", "blend", "rotation", "spread");
    let frames = (seconds * FPS) as usize;
    for i in 0..=frames {
        let time = i as f32 / FPS;
        let gesture = scripted(time, seconds);
        let frame = match engine.frame(&field, &gesture, time, 1.0 / FPS, &mut buffer) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        };
        if i % (FPS as usize / 2) == 0 {
            let spread = frame
                .transforms
                .iter()
                .map(|t| t.translation.length())
                .fold(0.0f32, f32::max);
            println!(
                "  {:>6.2}  {:<9} {:>5}  {:>6.3}  {:>8.3}  {:>8.2}",
                time,
                gesture.status_label(),
                if gesture.hand_present { "yes" } else { "no" },
                frame.blend,
                frame.rotation,
                spread,
            );
        }
    }
    println!();
}

/// Idle for the first quarter, hand sweeps and opens in the middle half,
/// hand leaves (formation held) for the last quarter.
fn scripted(time: f32, total: f32) -> GestureState {
    let u = time / total;
    if u < 0.25 {
        GestureState::default()
    } else if u < 0.75 {
        GestureState {
            expanded:     u > 0.4,
            hand_present: true,
            hand_x:       0.2 + 0.6 * ((u - 0.25) / 0.5),
        }
    } else {
        GestureState { expanded: true, hand_present: false, hand_x: 0.8 }
    }
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|v| v == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse::<T>().ok())
}
