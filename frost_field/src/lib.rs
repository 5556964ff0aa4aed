//! # frost_field
//!
//! Seeded procedural particle field for the frost tree installation.
//!
//! A field is generated once and never mutated.  Each particle carries a
//! *formed* position (tree shape) and an *exploded* position (a uniform
//! point on a sphere shell around the origin), plus color, anisotropic
//! scale, animation phase and a structural kind.
//!
//! ## Passes
//!
//! | Pass | Kind(s) | Default count |
//! |---|---|---|
//! | Trunk | `Trunk` | 600 |
//! | Canopy | `Needle`, `Snow`, `Ornament` | remainder of capacity |
//! | Garlands | `Snow` | fixed by geometry |
//! | Star | `Ornament` | 180 |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use frost_field::{FieldConfig, ParticleField};
//!
//! let field = ParticleField::seeded(&FieldConfig::default(), 2024).unwrap();
//! assert_eq!(field.len(), 8000);
//! println!("{}", field.stats());
//! ```

pub mod config;
pub mod generator;
pub mod palette;
pub mod particle;
pub mod stats;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

pub use config::{
    CanopyConfig, ExplosionConfig, FieldConfig, GarlandConfig, StarConfig, TrunkConfig,
};
pub use generator::shell_point;
pub use palette::{Palette, Rgb};
pub use particle::{FieldGroup, Particle, ParticleKind};
pub use stats::FieldStats;

// ════════════════════════════════════════════════════════════════════════════
// FieldError
// ════════════════════════════════════════════════════════════════════════════

/// Configuration problems detected before generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    #[error("canopy needs at least 2 layers, got {0}")]
    TooFewLayers(usize),

    #[error("explosion shell [{min}, {max}) is empty or negative")]
    ExplosionShell { min: f32, max: f32 },

    #[error("{name} = {value} is not a probability")]
    Probability { name: &'static str, value: f32 },

    #[error("invalid field config: {0}")]
    Invalid(&'static str),
}

// ════════════════════════════════════════════════════════════════════════════
// ParticleField
// ════════════════════════════════════════════════════════════════════════════

/// The immutable particle set and its packed RGB color buffer.
#[derive(Clone, Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    colors:    Vec<f32>,
    dropped:   usize,
}

impl ParticleField {
    /// Generate a field drawing every random value from `rng`.
    pub fn generate<R: Rng>(cfg: &FieldConfig, rng: &mut R) -> Result<Self, FieldError> {
        cfg.validate()?;
        let built = generator::build(cfg, rng);
        let field = ParticleField {
            particles: built.particles,
            colors:    built.colors,
            dropped:   built.dropped,
        };
        info!(
            particles = field.len(),
            capacity = cfg.capacity,
            dropped = field.dropped,
            "particle field generated"
        );
        Ok(field)
    }

    /// Generate from a fixed seed.  Same seed and config ⇒ identical field.
    pub fn seeded(cfg: &FieldConfig, seed: u64) -> Result<Self, FieldError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(cfg, &mut rng)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Packed `[r, g, b, r, g, b, …]` in creation order.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particles refused because capacity was already reached.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats::from_particles(&self.particles)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::TAU;

    fn default_field(seed: u64) -> ParticleField {
        ParticleField::seeded(&FieldConfig::default(), seed).unwrap()
    }

    /// Kolmogorov–Smirnov statistic of `samples` against U(0, 1).
    fn ks_uniform(mut samples: Vec<f64>) -> f64 {
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let n = samples.len() as f64;
        samples
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let x = x.clamp(0.0, 1.0);
                let above = (i as f64 + 1.0) / n - x;
                let below = x - i as f64 / n;
                above.max(below)
            })
            .fold(0.0, f64::max)
    }

    #[test]
    fn default_fills_capacity_exactly() {
        for seed in [0, 1, 7, 2024, 99_999] {
            let field = default_field(seed);
            assert_eq!(field.len(), 8000, "seed {}", seed);
            assert_eq!(field.colors().len(), 8000 * 3);
            assert_eq!(field.dropped(), 0, "seed {}", seed);
        }
    }

    #[test]
    fn every_group_present() {
        let stats = default_field(3).stats();
        assert_eq!(stats.group(FieldGroup::Trunk), 600);
        assert_eq!(stats.group(FieldGroup::Star), 180);
        assert!(stats.group(FieldGroup::Garland) > 0);
        assert!(stats.group(FieldGroup::Canopy) > 5000);
        assert!(stats.kind(ParticleKind::Ornament) > 180);
    }

    #[test]
    fn groups_in_creation_order() {
        let field = default_field(5);
        let groups: Vec<usize> = field.particles().iter().map(|p| p.group.index()).collect();
        assert!(groups.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(field.particles()[0].group, FieldGroup::Trunk);
        assert_eq!(field.particles()[field.len() - 1].group, FieldGroup::Star);
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let a = default_field(42);
        let b = default_field(42);
        assert_eq!(a.len(), b.len());
        for (pa, pb) in a.particles().iter().zip(b.particles()) {
            assert_eq!(pa.formed.to_array().map(f32::to_bits), pb.formed.to_array().map(f32::to_bits));
            assert_eq!(pa.exploded.to_array().map(f32::to_bits), pb.exploded.to_array().map(f32::to_bits));
            assert_eq!(pa.phase.to_bits(), pb.phase.to_bits());
            assert_eq!(pa.kind, pb.kind);
        }
        let bits = |f: &ParticleField| f.colors().iter().map(|c| c.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn different_seeds_differ() {
        let a = default_field(1);
        let b = default_field(2);
        assert_ne!(a.particles()[0].formed, b.particles()[0].formed);
    }

    #[test]
    fn exploded_radius_within_shell() {
        let field = default_field(11);
        for p in field.particles() {
            let r = p.exploded.length();
            assert!(r >= 15.0 - 1e-3 && r < 45.0 + 1e-3, "radius {}", r);
        }
    }

    #[test]
    fn exploded_directions_uniform_on_sphere() {
        let field = default_field(12);
        let n = field.len() as f64;
        // α = 0.001
        let critical = 1.95 / n.sqrt();

        let cos_polar: Vec<f64> = field
            .particles()
            .iter()
            .map(|p| ((p.exploded.z / p.exploded.length()) as f64 + 1.0) / 2.0)
            .collect();
        let d = ks_uniform(cos_polar);
        assert!(d < critical, "polar KS {} >= {}", d, critical);

        let azimuth: Vec<f64> = field
            .particles()
            .iter()
            .map(|p| (p.exploded.y.atan2(p.exploded.x).rem_euclid(TAU) / TAU) as f64)
            .collect();
        let d = ks_uniform(azimuth);
        assert!(d < critical, "azimuth KS {} >= {}", d, critical);
    }

    #[test]
    fn phase_and_speed_ranges() {
        for p in default_field(8).particles() {
            assert!((0.0..TAU).contains(&p.phase));
            assert!((0.2..1.0).contains(&p.speed));
        }
    }

    #[test]
    fn needles_are_stretched_vertically() {
        let field = default_field(9);
        let needle = field
            .particles()
            .iter()
            .find(|p| p.kind == ParticleKind::Needle)
            .unwrap();
        assert!(needle.scale_dims.y > needle.scale_dims.x * 4.0);
    }

    #[test]
    fn tiny_capacity_truncates_silently() {
        let cfg = FieldConfig { capacity: 100, ..FieldConfig::default() };
        let field = ParticleField::seeded(&cfg, 1).unwrap();
        assert_eq!(field.len(), 100);
        assert!(field.dropped() > 0);
        assert!(field.particles().iter().all(|p| p.kind == ParticleKind::Trunk));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = FieldConfig { capacity: 0, ..FieldConfig::default() };
        assert_eq!(ParticleField::seeded(&cfg, 1).unwrap_err(), FieldError::ZeroCapacity);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn count_never_exceeds_capacity(capacity in 1usize..12_000, seed in any::<u64>()) {
            let cfg = FieldConfig { capacity, ..FieldConfig::default() };
            let field = ParticleField::seeded(&cfg, seed).unwrap();
            prop_assert!(field.len() <= capacity);
            prop_assert_eq!(field.colors().len(), field.len() * 3);
        }

        #[test]
        fn shell_bounds_follow_config(min in 1.0f32..20.0, width in 1.0f32..30.0, seed in any::<u64>()) {
            let mut cfg = FieldConfig { capacity: 1500, ..FieldConfig::default() };
            cfg.explosion = ExplosionConfig { min_radius: min, max_radius: min + width };
            let field = ParticleField::seeded(&cfg, seed).unwrap();
            for p in field.particles() {
                let r = p.exploded.length();
                prop_assert!(r >= min - 1e-3 && r < min + width + 1e-3);
            }
        }
    }
}
