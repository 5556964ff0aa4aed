//! Walks the animation engine: blend easing, rotation, per-particle output.

use frost_field::{FieldConfig, ParticleField, ParticleKind};
use frost_gesture::GestureState;
use frost_motion::{AnimationEngine, InstanceBuffer, MotionConfig};

fn main() {
    println!("\n=== Frost Motion Demo ===\n");

    let field = ParticleField::seeded(&FieldConfig::default(), 7).expect("default config is valid");
    let mut buffer = InstanceBuffer::new(field.len());

    // ── 1. Blend easing ──────────────────────────────────────────────────
    println!("1. Palm opens: blend at 60 fps");
    let mut engine = AnimationEngine::default();
    let open = GestureState { expanded: true, hand_present: true, hand_x: 0.5 };
    for frame in 1..=180 {
        engine.step(&open, 1.0 / 60.0);
        if frame % 30 == 0 {
            println!("   {:>4.1}s  t = {:.4}", frame as f32 / 60.0, engine.blend());
        }
    }
    println!();

    // ── 2. Idle spin vs hand follow ──────────────────────────────────────
    println!("2. Rotation");
    let mut idle = AnimationEngine::default();
    for _ in 0..600 {
        idle.step(&GestureState::default(), 1.0 / 60.0);
    }
    println!("   10 s without a hand  → {:.3} rad", idle.rotation());
    let mut follow = AnimationEngine::default();
    let right = GestureState { expanded: false, hand_present: true, hand_x: 1.0 };
    for _ in 0..120 {
        follow.step(&right, 1.0 / 60.0);
    }
    println!("   2 s with hand at edge → {:.3} rad", follow.rotation());
    println!();

    // ── 3. One particle through the transition ───────────────────────────
    println!("3. First ornament, formed → exploded");
    let idx = field
        .particles()
        .iter()
        .position(|p| p.kind == ParticleKind::Ornament)
        .unwrap_or(0);
    let mut engine = AnimationEngine::default();
    for step in 0..=4 {
        engine
            .write_frame(field.particles(), 1.0, &mut buffer)
            .expect("buffer matches field");
        let t = buffer.as_slice()[idx];
        println!(
            "   t={:.2}  pos ({:>6.2}, {:>6.2}, {:>6.2})  scale {:.3}",
            engine.blend(),
            t.translation.x, t.translation.y, t.translation.z,
            t.scale.x,
        );
        if step < 4 {
            for _ in 0..15 {
                engine.step(&open, 1.0 / 60.0);
            }
        }
    }
    println!();

    // ── 4. Custom config ─────────────────────────────────────────────────
    let fast = MotionConfig { blend_rate: 6.0, ..MotionConfig::default() };
    let mut engine = AnimationEngine::new(fast).expect("valid");
    engine.step(&open, 0.1);
    println!("4. blend_rate 6 → after 0.1 s t = {:.3}", engine.blend());
    println!();
}
