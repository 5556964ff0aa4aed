//! Procedural tree generation.
//!
//! Passes run in creation order: trunk, canopy, garlands, star.  The
//! garland geometry carries no randomness, so its exact size is known up
//! front; together with the fixed trunk and star counts that gives the
//! canopy its budget.  The canopy is then planned to slightly overshoot
//! the budget and the overshoot is thinned evenly, which keeps the field at
//! exactly `capacity` without clipping whole branches off the bottom.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::FieldConfig;
use crate::palette::Rgb;
use crate::particle::{FieldGroup, Particle, ParticleKind};

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// ════════════════════════════════════════════════════════════════════════════
// Spawner — turns a formed position into a complete particle
// ════════════════════════════════════════════════════════════════════════════

struct Spawner<'a, R: Rng> {
    rng: &'a mut R,
    cfg: &'a FieldConfig,
}

impl<'a, R: Rng> Spawner<'a, R> {
    fn unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Centered jitter in `[-width/2, width/2)`.
    fn jitter(&mut self, width: f32) -> f32 {
        (self.unit() - 0.5) * width
    }

    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    fn pick(&mut self, share: f32, a: Rgb, b: Rgb) -> Rgb {
        if self.chance(share) { a } else { b }
    }

    fn spawn(
        &mut self,
        formed: Vec3,
        base: Rgb,
        base_scale: f32,
        kind: ParticleKind,
        group: FieldGroup,
    ) -> Particle {
        let shell = &self.cfg.explosion;
        let exploded = shell_point(&mut *self.rng, shell.min_radius, shell.max_radius);

        let width = kind.lightness_jitter();
        let color = if width > 0.0 {
            let delta = self.jitter(width);
            base.offset_lightness(delta)
        } else {
            base
        };

        let speed = 0.2 + self.unit() * 0.8;
        let phase = self.unit() * TAU;

        Particle {
            formed,
            exploded,
            color,
            scale_dims: kind.stretch() * base_scale,
            phase,
            speed,
            kind,
            group,
        }
    }
}

/// Uniform point on a spherical shell with radius in `[min_r, max_r)`.
///
/// The polar angle comes from `acos(2u - 1)` so the direction is uniform
/// over the sphere rather than bunched at the poles.
pub fn shell_point<R: Rng>(rng: &mut R, min_r: f32, max_r: f32) -> Vec3 {
    let radius = min_r + rng.gen::<f32>() * (max_r - min_r);
    let theta = rng.gen::<f32>() * TAU;
    let phi = (rng.gen::<f32>() * 2.0 - 1.0).acos();
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
    )
}

// ════════════════════════════════════════════════════════════════════════════
// FieldBuilder — capacity-capped sink
// ════════════════════════════════════════════════════════════════════════════

pub(crate) struct FieldBuilder {
    pub(crate) particles: Vec<Particle>,
    pub(crate) colors:    Vec<f32>,
    capacity:             usize,
    pub(crate) dropped:   usize,
}

impl FieldBuilder {
    pub(crate) fn new(capacity: usize) -> Self {
        FieldBuilder {
            particles: Vec::with_capacity(capacity),
            colors:    Vec::with_capacity(capacity * 3),
            capacity,
            dropped:   0,
        }
    }

    /// Append a particle.  Once full, further particles are counted and
    /// discarded.
    pub(crate) fn push(&mut self, p: Particle) -> bool {
        if self.particles.len() >= self.capacity {
            self.dropped += 1;
            return false;
        }
        self.colors.extend_from_slice(&p.color.to_array());
        self.particles.push(p);
        true
    }

    pub(crate) fn remaining(&self) -> usize {
        self.capacity - self.particles.len()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Density plan
// ════════════════════════════════════════════════════════════════════════════

/// Positions emitted along one branch of a layer at the given density.
fn positions_per_branch(cfg: &FieldConfig, t: f32, density: f32) -> usize {
    let c = &cfg.canopy;
    let raw = c.min_positions as f32 + (t * c.extra_positions as f32).floor();
    ((raw * density).round() as usize).max(1)
}

fn branches_per_layer(cfg: &FieldConfig, t: f32) -> usize {
    let c = &cfg.canopy;
    c.min_branches + (t * c.extra_branches as f32).floor() as usize
}

/// Expected number of canopy particles at a given density.
fn expected_canopy(cfg: &FieldConfig, density: f32) -> f32 {
    let c = &cfg.canopy;
    let mean_icicle = (c.icicle_min_len + c.icicle_max_len) as f32 / 2.0;
    let mut total = 0.0;
    for layer in 0..c.layers {
        let t = cfg.layer_t(layer);
        let n = positions_per_branch(cfg, t, density);
        let mut per_branch = 0.0;
        for p in 0..n {
            let dist = p as f32 / n as f32;
            let mut e = 1.0 + c.snow_chance;
            if dist > c.ornament_min_dist {
                e += c.ornament_chance;
            }
            if dist > c.icicle_min_dist && t > c.icicle_min_t {
                e += c.icicle_chance * mean_icicle;
            }
            per_branch += e;
        }
        total += per_branch * branches_per_layer(cfg, t) as f32;
    }
    total
}

/// Choose the positions-per-branch density so expected canopy demand sits
/// `canopy_headroom` above `budget`.  Never densifies past the base geometry.
pub(crate) fn plan_density(cfg: &FieldConfig, budget: usize) -> f32 {
    let target = budget as f32 * (1.0 + cfg.canopy_headroom);
    let full = expected_canopy(cfg, 1.0);
    if full <= target || full <= 0.0 {
        return 1.0;
    }
    let mut density = target / full;
    // Rounding per layer makes demand slightly non-linear in density.
    let at = expected_canopy(cfg, density);
    if at > 0.0 {
        density *= target / at;
    }
    density.clamp(1e-3, 1.0)
}

/// Keep `keep` evenly spaced elements, preserving order.
pub(crate) fn thin_evenly<T: Copy>(items: Vec<T>, keep: usize) -> Vec<T> {
    let len = items.len();
    if len <= keep {
        return items;
    }
    (0..keep)
        .map(|i| items[(i as u64 * len as u64 / keep as u64) as usize])
        .collect()
}

// ════════════════════════════════════════════════════════════════════════════
// Passes
// ════════════════════════════════════════════════════════════════════════════

fn trunk<R: Rng>(sp: &mut Spawner<'_, R>, out: &mut FieldBuilder) {
    let cfg = sp.cfg;
    let t = &cfg.trunk;
    let (brown, dark) = (cfg.palette.trunk_brown, cfg.palette.trunk_dark);
    for _ in 0..t.count {
        let h = sp.unit() * t.height;
        let theta = sp.unit() * TAU;
        let r = t.min_radius + sp.unit() * (t.max_radius - t.min_radius);
        let pos = Vec3::new(theta.cos() * r, t.base_y + h, theta.sin() * r);
        let color = sp.pick(t.brown_share, brown, dark);
        let p = sp.spawn(pos, color, t.base_scale, ParticleKind::Trunk, FieldGroup::Trunk);
        out.push(p);
    }
}

fn canopy<R: Rng>(sp: &mut Spawner<'_, R>, density: f32) -> Vec<Particle> {
    let cfg = sp.cfg;
    let c = &cfg.canopy;
    let pal = &cfg.palette;
    let mut out = Vec::new();

    for layer in 0..c.layers {
        let t = cfg.layer_t(layer);
        let layer_y = lerp(c.top_y, c.bottom_y, t);
        let max_r = lerp(c.top_radius, c.bottom_radius, t);
        let branches = branches_per_layer(cfg, t);
        let positions = positions_per_branch(cfg, t, density);
        let spread = 0.4 * t;

        for b in 0..branches {
            let angle = (b as f32 / branches as f32) * TAU + sp.jitter(c.angle_jitter);
            let length = max_r * (0.6 + sp.unit() * 0.4);
            let (sin_a, cos_a) = angle.sin_cos();

            for p in 0..positions {
                let dist = p as f32 / positions as f32;
                let r = dist * length;
                let droop = dist.powf(c.droop_exponent) * (1.0 + t * c.droop_gain);
                let base = Vec3::new(cos_a * r, layer_y - droop, sin_a * r);

                // Needle body
                let needle = Vec3::new(
                    base.x + sp.jitter(spread),
                    base.y - sp.unit() * 0.4,
                    base.z + sp.jitter(spread),
                );
                let color = sp.pick(0.7, pal.needle_blue, pal.needle_shadow);
                out.push(sp.spawn(needle, color, 0.12, ParticleKind::Needle, FieldGroup::Canopy));

                // Snow cap, strictly above the needle line
                if sp.chance(c.snow_chance) {
                    let snow = Vec3::new(
                        base.x + sp.jitter(spread * 0.9),
                        base.y + 0.2 + sp.unit() * 0.1,
                        base.z + sp.jitter(spread * 0.9),
                    );
                    let color = sp.pick(0.9, pal.snow_white, pal.snow_shadow);
                    out.push(sp.spawn(snow, color, 0.13, ParticleKind::Snow, FieldGroup::Canopy));
                }

                // Ornament
                if dist > c.ornament_min_dist && sp.chance(c.ornament_chance) {
                    let color = sp.pick(c.gold_share, pal.ornament_gold, pal.ornament_red);
                    let ornament = Vec3::new(
                        base.x + sp.jitter(0.5),
                        base.y - 0.4,
                        base.z + sp.jitter(0.5),
                    );
                    out.push(sp.spawn(ornament, color, 0.22, ParticleKind::Ornament, FieldGroup::Canopy));
                }

                // Icicle chain hanging from the tip
                if dist > c.icicle_min_dist && t > c.icicle_min_t && sp.chance(c.icicle_chance) {
                    let spread_len = c.icicle_max_len - c.icicle_min_len + 1;
                    let len = c.icicle_min_len + ((sp.unit() * spread_len as f32) as usize).min(spread_len - 1);
                    for k in 0..len {
                        let k = k as f32;
                        let pos = Vec3::new(base.x, base.y - 0.3 - k * 0.15, base.z);
                        let scale = (0.08 - k * 0.015).max(0.005);
                        out.push(sp.spawn(pos, pal.snow_shadow, scale, ParticleKind::Snow, FieldGroup::Canopy));
                    }
                }
            }
        }
    }
    out
}

/// Garland strand points.  Deterministic: depends only on the config.
pub(crate) fn garland_points(cfg: &FieldConfig) -> Vec<Vec3> {
    let c = &cfg.canopy;
    let g = &cfg.garland;
    let mut points = Vec::new();
    let end = c.layers.saturating_sub(g.bottom_skip);

    let mut layer = g.first_layer;
    while layer < end {
        let t = cfg.layer_t(layer);
        let r = lerp(g.inner_radius, g.outer_radius, t) * g.radius_scale;
        let y = lerp(c.top_y, c.bottom_y, t);

        for s in 0..g.segments {
            let theta = (s as f32 / g.segments as f32) * TAU * g.turns;
            let drape = (theta * g.drape_waves).sin() * g.drape;
            let gy = y + drape - theta * g.descent;
            if gy > c.bottom_y + g.floor_margin {
                points.push(Vec3::new(theta.cos() * r, gy, theta.sin() * r));
            }
        }
        layer += g.layer_step;
    }
    points
}

fn garlands<R: Rng>(sp: &mut Spawner<'_, R>, points: &[Vec3], out: &mut FieldBuilder) {
    let silver = sp.cfg.palette.garland_silver;
    let scale = sp.cfg.garland.base_scale;
    for &pos in points {
        let p = sp.spawn(pos, silver, scale, ParticleKind::Snow, FieldGroup::Garland);
        out.push(p);
    }
}

fn star<R: Rng>(sp: &mut Spawner<'_, R>, out: &mut FieldBuilder) {
    let cfg = sp.cfg;
    let s = &cfg.star;
    let glow = cfg.palette.star_glow;
    let center_y = cfg.canopy.top_y + s.lift;
    for _ in 0..s.count {
        let r = sp.unit() * s.radius;
        let theta = sp.unit() * TAU;
        let phi = sp.unit() * PI;
        let pos = Vec3::new(
            r * phi.sin() * theta.cos(),
            center_y + r * phi.sin() * theta.sin(),
            r * phi.cos() * s.depth_scale,
        );
        let p = sp.spawn(pos, glow, s.base_scale, ParticleKind::Ornament, FieldGroup::Star);
        out.push(p);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// build — runs every pass
// ════════════════════════════════════════════════════════════════════════════

/// Run all passes against `rng`.  Assumes `cfg` has been validated.
pub(crate) fn build<R: Rng>(cfg: &FieldConfig, rng: &mut R) -> FieldBuilder {
    let mut out = FieldBuilder::new(cfg.capacity);
    let points = garland_points(cfg);
    let fixed = cfg.trunk.count + points.len() + cfg.star.count;
    let budget = cfg.capacity.saturating_sub(fixed);

    let mut sp = Spawner { rng, cfg };

    trunk(&mut sp, &mut out);

    if budget > 0 {
        let density = plan_density(cfg, budget);
        let candidates = canopy(&mut sp, density);
        debug!(
            density,
            budget,
            candidates = candidates.len(),
            "canopy planned"
        );
        let kept = thin_evenly(candidates, budget.min(out.remaining()));
        for p in kept {
            out.push(p);
        }
    } else {
        // No room beyond the fixed groups: fill in creation order and let
        // the builder truncate.
        for p in canopy(&mut sp, 1.0) {
            out.push(p);
        }
    }

    garlands(&mut sp, &points, &mut out);
    star(&mut sp, &mut out);

    if out.dropped > 0 {
        warn!(
            dropped = out.dropped,
            capacity = cfg.capacity,
            "particle capacity reached; remaining procedural additions skipped"
        );
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn garland_points_clip_above_floor() {
        let cfg = FieldConfig::default();
        let pts = garland_points(&cfg);
        assert!(!pts.is_empty());
        let floor = cfg.canopy.bottom_y + cfg.garland.floor_margin;
        assert!(pts.iter().all(|p| p.y > floor));
        // Nine strands of at most fifty points each.
        assert!(pts.len() <= 9 * 50);
    }

    #[test]
    fn thin_evenly_keeps_order_and_count() {
        let v: Vec<u32> = (0..100).collect();
        let kept = thin_evenly(v, 10);
        assert_eq!(kept, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90]);
        assert_eq!(thin_evenly(vec![1, 2, 3], 5), vec![1, 2, 3]);
    }

    #[test]
    fn density_plan_overshoots_budget() {
        let cfg = FieldConfig::default();
        let budget = 6000;
        let d = plan_density(&cfg, budget);
        assert!(d > 0.0 && d < 1.0);
        let expected = expected_canopy(&cfg, d);
        assert!(expected > budget as f32, "expected {} <= budget", expected);
        assert!(expected < budget as f32 * 1.2, "expected {} overshoots too far", expected);
    }

    #[test]
    fn density_is_one_when_budget_is_generous() {
        let cfg = FieldConfig::default();
        assert_eq!(plan_density(&cfg, 1_000_000), 1.0);
    }

    #[test]
    fn builder_truncates_silently() {
        let cfg = FieldConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut sp = Spawner { rng: &mut rng, cfg: &cfg };
        let mut b = FieldBuilder::new(2);
        for _ in 0..5 {
            let p = sp.spawn(Vec3::ZERO, Rgb::new(1.0, 1.0, 1.0), 0.1, ParticleKind::Snow, FieldGroup::Star);
            b.push(p);
        }
        assert_eq!(b.particles.len(), 2);
        assert_eq!(b.colors.len(), 6);
        assert_eq!(b.dropped, 3);
    }

    #[test]
    fn small_capacity_truncates_in_creation_order() {
        let cfg = FieldConfig { capacity: 1000, ..FieldConfig::default() };
        let mut rng = StdRng::seed_from_u64(1);
        let out = build(&cfg, &mut rng);
        let count = |g: FieldGroup| out.particles.iter().filter(|p| p.group == g).count();
        assert_eq!(out.particles.len(), 1000);
        assert_eq!(count(FieldGroup::Trunk), 600);
        assert_eq!(count(FieldGroup::Canopy), 400);
        assert_eq!(count(FieldGroup::Garland), 0);
        assert_eq!(count(FieldGroup::Star), 0);
        assert!(out.dropped > 0);
    }

    #[test]
    fn shell_point_radius_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..10_000 {
            let r = shell_point(&mut rng, 15.0, 45.0).length();
            assert!(r >= 15.0 - 1e-3 && r < 45.0 + 1e-3, "radius {}", r);
        }
    }
}
