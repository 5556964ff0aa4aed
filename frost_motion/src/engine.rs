//! Frame-by-frame animation of a particle field.
//!
//! # Per frame
//!
//! 1. Blend `t` eases toward 1 (expanded) or 0 at `blend_rate`.
//! 2. With a hand, rotation eases toward `(hand_x − 0.5) · span` at
//!    `follow_rate`; without one it spins slowly at `idle_spin`, wrapped
//!    into `[0, 2π)` so the angle keeps full precision however long it runs.
//! 3. Every particle transform is then a pure function of the particle,
//!    `t`, rotation and elapsed time.
//!
//! Only `t` and the rotation angle persist between frames.

use std::f32::consts::TAU;

use glam::{EulerRot, Quat, Vec3};
use rayon::prelude::*;
use tracing::{debug, trace};

use frost_field::{Particle, ParticleField, ParticleKind};
use frost_gesture::GestureState;

use crate::config::MotionConfig;
use crate::instance::{FrameOutput, InstanceBuffer, InstanceTransform};
use crate::MotionError;

// ════════════════════════════════════════════════════════════════════════════
// AnimationEngine
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct AnimationEngine {
    cfg:      MotionConfig,
    blend:    f32,
    rotation: f32,
}

impl Default for AnimationEngine {
    fn default() -> Self {
        AnimationEngine { cfg: MotionConfig::default(), blend: 0.0, rotation: 0.0 }
    }
}

impl AnimationEngine {
    pub fn new(cfg: MotionConfig) -> Result<Self, MotionError> {
        cfg.validate()?;
        Ok(AnimationEngine { cfg, blend: 0.0, rotation: 0.0 })
    }

    pub fn config(&self) -> &MotionConfig {
        &self.cfg
    }

    /// Current blend factor in `[0, 1]`.
    pub fn blend(&self) -> f32 {
        self.blend
    }

    /// Current rotation about the vertical axis, in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Advance the persistent state by `dt` seconds.
    pub fn step(&mut self, gesture: &GestureState, dt: f32) {
        let dt = self.cfg.clamp_dt(dt);
        let was_settled = self.is_settled();

        let target = if gesture.expanded { 1.0 } else { 0.0 };
        self.blend += (target - self.blend) * (self.cfg.blend_rate * dt).min(1.0);

        if gesture.hand_present {
            let target = (gesture.hand_x - 0.5) * self.cfg.rotation_span;
            self.rotation += (target - self.rotation) * (self.cfg.follow_rate * dt).min(1.0);
        } else {
            self.rotation = (self.rotation + self.cfg.idle_spin * dt).rem_euclid(TAU);
        }

        if was_settled != self.is_settled() {
            debug!(
                blend = self.blend,
                expanded = gesture.expanded,
                settled = self.is_settled(),
                "blend transition"
            );
        }
        trace!(blend = self.blend, rotation = self.rotation, dt, "motion step");
    }

    /// True when the blend sits at (or within 1e-3 of) either end.
    pub fn is_settled(&self) -> bool {
        self.blend < 1e-3 || self.blend > 1.0 - 1e-3
    }

    /// Transform of a single particle at elapsed time `time` under the
    /// current blend and rotation.
    pub fn transform(&self, p: &Particle, time: f32) -> InstanceTransform {
        particle_transform(&self.cfg, p, self.blend, self.rotation, time)
    }

    /// Overwrite `buffer` with the transforms of `particles`.
    pub fn write_frame(
        &self,
        particles: &[Particle],
        time:      f32,
        buffer:    &mut InstanceBuffer,
    ) -> Result<(), MotionError> {
        if buffer.len() != particles.len() {
            return Err(MotionError::BufferLength {
                particles: particles.len(),
                buffer:    buffer.len(),
            });
        }
        let (cfg, t, rot) = (&self.cfg, self.blend, self.rotation);
        let out = buffer.as_mut_slice();
        if particles.len() >= cfg.parallel_min {
            out.par_iter_mut()
                .zip(particles.par_iter())
                .for_each(|(slot, p)| *slot = particle_transform(cfg, p, t, rot, time));
        } else {
            for (slot, p) in out.iter_mut().zip(particles) {
                *slot = particle_transform(cfg, p, t, rot, time);
            }
        }
        Ok(())
    }

    /// Step, write every transform and hand back what the renderer needs.
    pub fn frame<'a>(
        &mut self,
        field:   &'a ParticleField,
        gesture: &GestureState,
        time:    f32,
        dt:      f32,
        buffer:  &'a mut InstanceBuffer,
    ) -> Result<FrameOutput<'a>, MotionError> {
        self.step(gesture, dt);
        self.write_frame(field.particles(), time, buffer)?;
        Ok(FrameOutput {
            transforms: buffer.as_slice(),
            colors:     field.colors(),
            blend:      self.blend,
            rotation:   self.rotation,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Per-particle transform
// ════════════════════════════════════════════════════════════════════════════

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wind offset `(x, z)` for a canopy particle at formed height `y`.
fn sway(cfg: &MotionConfig, y: f32, time: f32) -> (f32, f32) {
    let h = (y + cfg.sway_floor).max(0.0) / cfg.sway_span;
    let wind = (time + y * cfg.wind_height).sin() * cfg.wind_amplitude;
    let z = (time * cfg.sway_z_rate + y).cos() * cfg.sway_z_amplitude;
    (wind * h, z * h)
}

fn particle_transform(
    cfg:      &MotionConfig,
    p:        &Particle,
    t:        f32,
    rotation: f32,
    time:     f32,
) -> InstanceTransform {
    let (sx, sz) = if p.kind == ParticleKind::Trunk {
        (0.0, 0.0)
    } else {
        sway(cfg, p.formed.y, time)
    };
    let x = p.formed.x + sx;
    let z = p.formed.z + sz;
    let (sin, cos) = rotation.sin_cos();
    let rx = x * cos - z * sin;
    let rz = x * sin + z * cos;

    let translation = Vec3::new(
        lerp(rx, p.exploded.x, t),
        lerp(p.formed.y, p.exploded.y, t),
        lerp(rz, p.exploded.z, t),
    );

    let mut s = 1.0;
    if p.kind == ParticleKind::Ornament {
        s *= 1.0 + (time * cfg.pulse_rate + p.phase).sin() * cfg.pulse_amplitude;
    }
    let current = lerp(s, s * cfg.explode_scale, t);

    InstanceTransform {
        translation,
        rotation: Quat::from_euler(
            EulerRot::XYZ,
            p.phase + t * time,
            rotation + p.phase,
            p.phase * 0.5,
        ),
        scale: p.scale_dims * current,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use frost_field::{FieldConfig, FieldGroup, Rgb};
    use proptest::prelude::*;

    fn expanded() -> GestureState {
        GestureState { expanded: true, hand_present: false, hand_x: 0.5 }
    }

    fn particle(kind: ParticleKind) -> Particle {
        Particle {
            formed:     Vec3::new(1.5, 2.0, -0.75),
            exploded:   Vec3::new(20.0, -5.0, 10.0),
            color:      Rgb::new(1.0, 1.0, 1.0),
            scale_dims: Vec3::new(0.1, 0.3, 0.1),
            phase:      1.0,
            speed:      0.5,
            kind,
            group:      FieldGroup::Canopy,
        }
    }

    fn small_field() -> ParticleField {
        let cfg = FieldConfig { capacity: 1200, ..FieldConfig::default() };
        ParticleField::seeded(&cfg, 4).unwrap()
    }

    #[test]
    fn blend_approaches_one_without_overshoot() {
        let mut e = AnimationEngine::default();
        let mut prev = e.blend();
        for _ in 0..600 {
            e.step(&expanded(), 1.0 / 60.0);
            assert!(e.blend() >= prev);
            assert!(e.blend() <= 1.0);
            prev = e.blend();
        }
        assert!(e.blend() > 0.999);
    }

    #[test]
    fn huge_dt_is_clamped() {
        let mut e = AnimationEngine::default();
        e.step(&expanded(), 10.0);
        // max_dt 0.25 at rate 2 covers half the distance.
        assert!((e.blend() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn formed_trunk_at_rest_is_exact() {
        let e = AnimationEngine::default();
        let p = particle(ParticleKind::Trunk);
        let tr = e.transform(&p, 3.7);
        assert_eq!(tr.translation, p.formed);
        assert_eq!(tr.scale, p.scale_dims);
    }

    #[test]
    fn formed_canopy_only_sways() {
        let e = AnimationEngine::default();
        let p = particle(ParticleKind::Needle);
        let tr = e.transform(&p, 0.0);
        assert_eq!(tr.translation.y, p.formed.y);
        let h = (p.formed.y + 6.0) / 14.0;
        assert!((tr.translation.x - (p.formed.x + (0.8f32).sin() * 0.06 * h)).abs() < 1e-6);
        assert!((tr.translation.z - (p.formed.z + (2.0f32).cos() * 0.02 * h)).abs() < 1e-6);
    }

    #[test]
    fn fully_exploded_lands_on_shell_point() {
        let mut e = AnimationEngine::default();
        for _ in 0..2000 {
            e.step(&expanded(), 0.25);
        }
        let p = particle(ParticleKind::Snow);
        let tr = e.transform(&p, 5.0);
        assert!((tr.translation - p.exploded).length() < 1e-3);
        assert!((tr.scale - p.scale_dims * 0.2).length() < 1e-4);
    }

    #[test]
    fn idle_rotation_advances_at_spin_rate() {
        let mut e = AnimationEngine::default();
        let mut prev = e.rotation();
        for _ in 0..120 {
            e.step(&GestureState::default(), 0.1);
            assert!(e.rotation() > prev);
            prev = e.rotation();
        }
        assert!((e.rotation() - 120.0 * 0.1 * 0.08).abs() < 1e-4);
    }

    #[test]
    fn idle_rotation_keeps_advancing_after_days() {
        let mut e = AnimationEngine::default();
        // Five days of idle spin.
        e.rotation = 5.0 * 86_400.0 * 0.08;
        e.step(&GestureState::default(), 1.0 / 60.0);
        let start = e.rotation();
        assert!((0.0..TAU).contains(&start));

        for _ in 0..600 {
            let before = e.rotation();
            e.step(&GestureState::default(), 1.0 / 60.0);
            let advanced = (e.rotation() - before).rem_euclid(TAU);
            assert!((advanced - 0.08 / 60.0).abs() < 1e-5, "step advanced {}", advanced);
        }
        let total = (e.rotation() - start).rem_euclid(TAU);
        assert!((total - 0.8).abs() < 1e-3, "ten seconds advanced {}", total);
    }

    #[test]
    fn instance_orientation_follows_phase_blend_and_rotation() {
        let mut e = AnimationEngine::default();
        e.blend = 0.5;
        e.rotation = 0.3;
        let p = particle(ParticleKind::Snow);
        let tr = e.transform(&p, 2.0);
        let expected = Quat::from_euler(EulerRot::XYZ, 1.0 + 0.5 * 2.0, 0.3 + 1.0, 0.5);
        assert!(tr.rotation.angle_between(expected) < 1e-4);

        // Formed particles ignore elapsed time in their orientation.
        e.blend = 0.0;
        let early = e.transform(&p, 0.0).rotation;
        let late = e.transform(&p, 50.0).rotation;
        assert!(early.angle_between(late) < 1e-4);
    }

    #[test]
    fn hand_drives_rotation_toward_target() {
        let mut e = AnimationEngine::default();
        let g = GestureState { expanded: false, hand_present: true, hand_x: 0.9 };
        for _ in 0..300 {
            e.step(&g, 1.0 / 60.0);
        }
        let target = 0.4 * 2.5 * std::f32::consts::PI;
        assert!((e.rotation() - target).abs() < 1e-3);
    }

    #[test]
    fn ornaments_pulse() {
        let e = AnimationEngine::default();
        let p = particle(ParticleKind::Ornament);
        let peak = std::f32::consts::FRAC_PI_2 - p.phase;
        let tr = e.transform(&p, peak / 4.0);
        assert!((tr.scale.y - p.scale_dims.y * 1.15).abs() < 1e-5);
    }

    #[test]
    fn parallel_and_serial_paths_agree() {
        let field = small_field();
        let mut serial = AnimationEngine::new(MotionConfig { parallel_min: usize::MAX, ..MotionConfig::default() }).unwrap();
        let mut parallel = AnimationEngine::new(MotionConfig { parallel_min: 0, ..MotionConfig::default() }).unwrap();
        let g = GestureState { expanded: true, hand_present: true, hand_x: 0.3 };
        serial.step(&g, 0.1);
        parallel.step(&g, 0.1);

        let mut a = InstanceBuffer::new(field.len());
        let mut b = InstanceBuffer::new(field.len());
        serial.write_frame(field.particles(), 2.5, &mut a).unwrap();
        parallel.write_frame(field.particles(), 2.5, &mut b).unwrap();
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn frame_bundles_colors() {
        let field = small_field();
        let mut e = AnimationEngine::default();
        let mut buf = InstanceBuffer::new(field.len());
        let out = e.frame(&field, &expanded(), 1.0, 0.016, &mut buf).unwrap();
        assert_eq!(out.len(), field.len());
        assert_eq!(out.colors.len(), field.len() * 3);
        assert!(out.blend > 0.0);
    }

    #[test]
    fn mismatched_buffer_is_an_error() {
        let field = small_field();
        let e = AnimationEngine::default();
        let mut buf = InstanceBuffer::new(3);
        assert_eq!(
            e.write_frame(field.particles(), 0.0, &mut buf),
            Err(MotionError::BufferLength { particles: field.len(), buffer: 3 })
        );
    }

    proptest! {
        #[test]
        fn blend_stays_in_unit_interval(
            steps in proptest::collection::vec((any::<bool>(), 0.0f32..1.0), 1..200)
        ) {
            let mut e = AnimationEngine::default();
            for (on, dt) in steps {
                e.step(&GestureState { expanded: on, ..GestureState::default() }, dt);
                prop_assert!((0.0..=1.0).contains(&e.blend()));
            }
        }

        #[test]
        fn at_rest_translation_keeps_height(time in 0.0f32..1000.0, rot in -10.0f32..10.0) {
            let cfg = MotionConfig::default();
            let p = particle(ParticleKind::Snow);
            let tr = particle_transform(&cfg, &p, 0.0, rot, time);
            prop_assert_eq!(tr.translation.y, p.formed.y);
        }
    }
}
