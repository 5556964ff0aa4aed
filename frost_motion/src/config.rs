//! Animation constants, all overridable from the app config file.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::MotionError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Blend approach rate per second toward the formed/exploded target.
    pub blend_rate:       f32,
    /// Rotation approach rate per second while a hand is tracked.
    pub follow_rate:      f32,
    /// Radians per second of unattended spin.
    pub idle_spin:        f32,
    /// Rotation range swept by moving the hand across the full width.
    pub rotation_span:    f32,
    /// Scale multiplier at full explosion.
    pub explode_scale:    f32,
    pub pulse_amplitude:  f32,
    pub pulse_rate:       f32,
    pub wind_amplitude:   f32,
    /// How fast the wind phase moves with height.
    pub wind_height:      f32,
    pub sway_z_amplitude: f32,
    pub sway_z_rate:      f32,
    /// Sway is zero at `y = -sway_floor` and grows linearly over `sway_span`.
    pub sway_floor:       f32,
    pub sway_span:        f32,
    /// Longest step accepted; slower frames are clamped to this.
    pub max_dt:           f32,
    /// Fields at least this large are transformed on the rayon pool.
    pub parallel_min:     usize,
}

impl Default for MotionConfig {
    fn default() -> Self {
        MotionConfig {
            blend_rate:       2.0,
            follow_rate:      3.0,
            idle_spin:        0.08,
            rotation_span:    2.5 * PI,
            explode_scale:    0.2,
            pulse_amplitude:  0.15,
            pulse_rate:       4.0,
            wind_amplitude:   0.06,
            wind_height:      0.4,
            sway_z_amplitude: 0.02,
            sway_z_rate:      0.6,
            sway_floor:       6.0,
            sway_span:        14.0,
            max_dt:           0.25,
            parallel_min:     2048,
        }
    }
}

impl MotionConfig {
    pub fn validate(&self) -> Result<(), MotionError> {
        let rates = [
            ("blend_rate", self.blend_rate),
            ("follow_rate", self.follow_rate),
            ("max_dt", self.max_dt),
            ("sway_span", self.sway_span),
        ];
        for (name, value) in rates {
            if !(value.is_finite() && value > 0.0) {
                return Err(MotionError::NonPositive { name, value });
            }
        }
        if !self.explode_scale.is_finite() || self.explode_scale < 0.0 {
            return Err(MotionError::NonPositive { name: "explode_scale", value: self.explode_scale });
        }
        Ok(())
    }

    /// Clamp a raw frame delta into `[0, max_dt]`; NaN counts as zero.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_nan() {
            return 0.0;
        }
        dt.clamp(0.0, self.max_dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(MotionConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_rate_rejected() {
        let cfg = MotionConfig { blend_rate: 0.0, ..MotionConfig::default() };
        assert_eq!(
            cfg.validate(),
            Err(MotionError::NonPositive { name: "blend_rate", value: 0.0 })
        );
    }

    #[test]
    fn dt_is_clamped() {
        let cfg = MotionConfig::default();
        assert_eq!(cfg.clamp_dt(-1.0), 0.0);
        assert_eq!(cfg.clamp_dt(f32::NAN), 0.0);
        assert_eq!(cfg.clamp_dt(3.0), 0.25);
        assert_eq!(cfg.clamp_dt(0.016), 0.016);
    }
}
