//! gesture_console — drive the palm classifier by hand from the terminal.

use std::io::{self, Write};
use std::time::Duration;

use frost_gesture::{
    spawn_pipeline, synthetic_hand, GestureClassifier, GestureConfig, GestureState, Landmark,
    ReplaySource,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              Frost Tree Gesture Console                  ║");
    println!("╚══════════════════════════════════════════════════════════╝");
    println!();

    let mut classifier = GestureClassifier::default();
    let mut wrist_x = 0.5f32;
    let mut ratio   = 1.0f32;

    println!("  ✓  {}\n", describe(&classifier.state(false), None));

    loop {
        print_menu();
        let choice = read_line("Command: ").trim().to_ascii_lowercase();

        match choice.as_str() {
            "1" => {
                ratio = read_line("  Extension ratio (default 2.0): ")
                    .trim().parse().unwrap_or(2.0);
                let s = classifier.classify(Some(&hand(wrist_x, ratio)));
                println!("  {}", describe(&s, classifier.last_ratio()));
            }
            "2" => {
                wrist_x = read_line("  Raw wrist x 0–1 (default 0.5): ")
                    .trim().parse().unwrap_or(0.5);
                let s = classifier.classify(Some(&hand(wrist_x, ratio)));
                println!("  {}", describe(&s, classifier.last_ratio()));
            }
            "3" => {
                let n: usize = read_line("  Repeat last hand N times (default 10): ")
                    .trim().parse().unwrap_or(10);
                let sample = hand(wrist_x, ratio);
                let mut s = classifier.state(false);
                for _ in 0..n {
                    s = classifier.classify(Some(&sample));
                }
                println!("  {}", describe(&s, classifier.last_ratio()));
            }
            "4" => {
                let s = classifier.classify(None);
                println!("  Hand lost.  {}", describe(&s, None));
            }
            "5" => {
                let s = classifier.classify(Some(&hand(wrist_x, ratio)[..8]));
                println!("  Malformed sample.  {}", describe(&s, None));
            }
            "6" => replay_script(),
            "7" => {
                println!("  {:#?}", classifier.config());
            }
            "8" => {
                classifier = GestureClassifier::default();
                println!("  Reset.  {}", describe(&classifier.state(false), None));
            }
            "q" | "quit" | "exit" => {
                println!("\n  Goodbye!\n");
                break;
            }
            "" => {}
            _ => println!("  Unknown command."),
        }
        println!();
    }
}

fn hand(wrist_x: f32, ratio: f32) -> Vec<Landmark> {
    synthetic_hand(Landmark::new(wrist_x, 0.6, 0.0), ratio)
}

fn describe(s: &GestureState, ratio: Option<f32>) -> String {
    let ratio = ratio.map_or_else(|| "—".to_string(), |r| format!("{:.2}", r));
    format!(
        "[{}] {}  hand={}  x={:.3}  ratio={}",
        s.status_label(),
        s.title(),
        if s.hand_present { "yes" } else { "no" },
        s.hand_x,
        ratio,
    )
}

/// Run a fist → open → fist script through a live pipeline.
fn replay_script() {
    let mut script = Vec::new();
    for i in 0..30 {
        let x = 0.2 + 0.02 * i as f32;
        let r = if (10..20).contains(&i) { 2.0 } else { 1.0 };
        script.push(Some(hand(x, r)));
    }
    script.push(None);

    let pipeline = match spawn_pipeline(
        ReplaySource::new(script, Duration::from_millis(30)),
        GestureConfig::default(),
    ) {
        Ok(p) => p,
        Err(e) => {
            println!("  ⚠  {}", e);
            return;
        }
    };

    let mut last = pipeline.snapshot();
    println!("  {}", describe(&last, None));
    while !pipeline.is_finished() {
        std::thread::sleep(Duration::from_millis(10));
        let s = pipeline.snapshot();
        if s.expanded != last.expanded || s.hand_present != last.hand_present {
            println!("  {}", describe(&s, None));
        }
        last = s;
    }
    println!("  final: {}", describe(&pipeline.snapshot(), None));
    pipeline.shutdown();
}

fn print_menu() {
    println!("┌─────────────────────────────────────────────────────────┐");
    println!("│  1. Set extension ratio      5. Send malformed sample   │");
    println!("│  2. Move wrist               6. Replay scripted session │");
    println!("│  3. Hold hand N samples      7. Show config             │");
    println!("│  4. Lose hand                8. Reset                   │");
    println!("│  Q. Quit                                                │");
    println!("└─────────────────────────────────────────────────────────┘");
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}
