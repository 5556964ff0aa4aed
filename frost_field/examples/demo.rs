//! Walks the field generator: seeding, group order, exploded shell.

use frost_field::{FieldConfig, FieldGroup, ParticleField, ParticleKind};

fn main() {
    println!("\n=== Frost Field Demo ===\n");

    // ── 1. Same seed, same field ─────────────────────────────────────────
    let cfg = FieldConfig::default();
    let a = ParticleField::seeded(&cfg, 7).expect("default config is valid");
    let b = ParticleField::seeded(&cfg, 7).expect("default config is valid");
    println!("1. Seed 7 twice → identical: {}", a.particles() == b.particles());
    println!();

    // ── 2. Group boundaries in creation order ────────────────────────────
    println!("2. Groups in creation order");
    let mut start = 0;
    for group in FieldGroup::ALL {
        let n = a.particles().iter().filter(|p| p.group == group).count();
        println!("   {:<8} [{:>5} .. {:>5})", group.name(), start, start + n);
        start += n;
    }
    println!();

    // ── 3. Exploded shell ────────────────────────────────────────────────
    let (lo, hi) = a.particles().iter().fold((f32::MAX, 0.0f32), |(lo, hi), p| {
        let r = p.exploded.length();
        (lo.min(r), hi.max(r))
    });
    println!("3. Exploded radius range: {:.2} .. {:.2}", lo, hi);
    println!();

    // ── 4. A few ornaments ───────────────────────────────────────────────
    println!("4. First ornaments");
    for p in a.particles().iter().filter(|p| p.kind == ParticleKind::Ornament).take(5) {
        println!(
            "   formed ({:>6.2}, {:>6.2}, {:>6.2})  color #{:06X}",
            p.formed.x, p.formed.y, p.formed.z,
            p.color.to_argb() & 0x00FF_FFFF
        );
    }
    println!();

    // ── 5. A cramped capacity truncates without error ────────────────────
    let small = FieldConfig { capacity: 500, ..FieldConfig::default() };
    let f = ParticleField::seeded(&small, 7).expect("valid");
    println!("5. capacity 500 → {} particles, {} dropped", f.len(), f.dropped());
    println!();
}
