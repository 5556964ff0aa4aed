//! Walks the palm classifier: hysteresis, smoothing, dropouts, the cell.

use std::time::Duration;

use frost_gesture::{
    gesture_cell, spawn_pipeline, synthetic_hand, GestureClassifier, GestureConfig,
    GestureState, Landmark, ReplaySource,
};

fn hand(wrist_x: f32, ratio: f32) -> Vec<Landmark> {
    synthetic_hand(Landmark::new(wrist_x, 0.6, 0.0), ratio)
}

fn main() {
    println!("\n=== Frost Gesture Demo ===\n");

    // ── 1. Hysteresis ────────────────────────────────────────────────────
    println!("1. Ratios through the 1.3 / 1.6 band");
    let mut c = GestureClassifier::default();
    for r in [1.0, 1.5, 1.65, 1.4, 1.25] {
        let s = c.classify(Some(&hand(0.5, r)));
        println!("   ratio {:.2} → {}", r, s.status_label());
    }
    println!();

    // ── 2. Smoothing ─────────────────────────────────────────────────────
    println!("2. hand_x chasing raw 0.9");
    let mut c = GestureClassifier::default();
    for i in 1..=50 {
        let s = c.classify(Some(&hand(0.1, 1.0)));
        if i % 10 == 0 {
            println!("   after {:>2} samples: {:.4}", i, s.hand_x);
        }
    }
    println!();

    // ── 3. Dropouts keep the formation ───────────────────────────────────
    let mut c = GestureClassifier::default();
    c.classify(Some(&hand(0.5, 2.0)));
    let lost = c.classify(None);
    let broken = c.classify(Some(&hand(0.5, 2.0)[..5]));
    println!("3. Open palm, then lost: {} (present={})", lost.status_label(), lost.hand_present);
    println!("   Malformed sample:      {} (present={})", broken.status_label(), broken.hand_present);
    println!();

    // ── 4. Sealed cell ───────────────────────────────────────────────────
    let (w, r) = gesture_cell(GestureState::default());
    w.publish(GestureState { expanded: true, hand_present: true, hand_x: 0.6 });
    r.seal();
    let accepted = w.publish(GestureState::default());
    println!("4. Publish after seal accepted: {}  state still {:?}", accepted, r.load());
    println!();

    // ── 5. Pipeline on its own thread ────────────────────────────────────
    let script = vec![Some(hand(0.3, 1.0)), Some(hand(0.3, 2.0)), None];
    let p = spawn_pipeline(ReplaySource::new(script, Duration::from_millis(5)), GestureConfig::default())
        .expect("default config is valid");
    while !p.is_finished() {
        std::thread::sleep(Duration::from_millis(1));
    }
    let s = p.snapshot();
    println!("5. Replay finished: {}  \"{}\"", s.status_label(), s.title());
    p.shutdown();
    println!();
}
