//! Generator configuration.
//!
//! Defaults reproduce the installation tree.  Every struct is
//! `#[serde(default)]` so a partial JSON document only overrides what it
//! names.

use serde::{Deserialize, Serialize};

use crate::palette::Palette;
use crate::FieldError;

/// Short cylinder of bark particles under the canopy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrunkConfig {
    pub count:      usize,
    pub base_y:     f32,
    pub height:     f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Probability of the lighter of the two bark tones.
    pub brown_share: f32,
    pub base_scale: f32,
}

impl Default for TrunkConfig {
    fn default() -> Self {
        TrunkConfig {
            count:       600,
            base_y:      -6.0,
            height:      3.5,
            min_radius:  0.3,
            max_radius:  0.8,
            brown_share: 0.6,
            base_scale:  0.15,
        }
    }
}

/// Layered, drooping branches.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    pub layers:           usize,
    pub top_y:            f32,
    pub bottom_y:         f32,
    pub top_radius:       f32,
    pub bottom_radius:    f32,
    pub min_branches:     usize,
    /// Extra branches added at the bottom layer (scaled by layer `t`).
    pub extra_branches:   usize,
    pub min_positions:    usize,
    pub extra_positions:  usize,
    /// Random angular offset of each branch (full width, radians).
    pub angle_jitter:     f32,
    pub droop_exponent:   f32,
    pub droop_gain:       f32,
    pub snow_chance:      f32,
    pub ornament_chance:  f32,
    /// Ornaments only appear past this fraction of the branch length.
    pub ornament_min_dist: f32,
    pub gold_share:       f32,
    pub icicle_chance:    f32,
    pub icicle_min_dist:  f32,
    pub icicle_min_t:     f32,
    pub icicle_min_len:   usize,
    pub icicle_max_len:   usize,
}

impl Default for CanopyConfig {
    fn default() -> Self {
        CanopyConfig {
            layers:            22,
            top_y:             8.0,
            bottom_y:          -4.0,
            top_radius:        0.5,
            bottom_radius:     9.0,
            min_branches:      8,
            extra_branches:    22,
            min_positions:     18,
            extra_positions:   35,
            angle_jitter:      0.25,
            droop_exponent:    2.2,
            droop_gain:        2.2,
            snow_chance:       0.65,
            ornament_chance:   0.035,
            ornament_min_dist: 0.3,
            gold_share:        0.7,
            icicle_chance:     0.12,
            icicle_min_dist:   0.9,
            icicle_min_t:      0.2,
            icicle_min_len:    3,
            icicle_max_len:    5,
        }
    }
}

/// Silver helix strands hung on every other layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GarlandConfig {
    pub first_layer:  usize,
    pub layer_step:   usize,
    /// Layers this close to the bottom get no strand.
    pub bottom_skip:  usize,
    pub segments:     usize,
    pub turns:        f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub radius_scale: f32,
    pub drape:        f32,
    pub drape_waves:  f32,
    /// Vertical drop per radian of sweep.
    pub descent:      f32,
    /// Strand points must stay this far above the canopy bottom.
    pub floor_margin: f32,
    pub base_scale:   f32,
}

impl Default for GarlandConfig {
    fn default() -> Self {
        GarlandConfig {
            first_layer:  2,
            layer_step:   2,
            bottom_skip:  2,
            segments:     50,
            turns:        2.0,
            inner_radius: 1.0,
            outer_radius: 8.0,
            radius_scale: 0.85,
            drape:        0.4,
            drape_waves:  8.0,
            descent:      0.6,
            floor_margin: 1.0,
            base_scale:   0.06,
        }
    }
}

/// Glowing cluster above the apex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub count:       usize,
    pub radius:      f32,
    /// Height above the canopy top.
    pub lift:        f32,
    /// Depth squash of the cluster.
    pub depth_scale: f32,
    pub base_scale:  f32,
}

impl Default for StarConfig {
    fn default() -> Self {
        StarConfig {
            count:       180,
            radius:      0.9,
            lift:        1.7,
            depth_scale: 0.3,
            base_scale:  0.15,
        }
    }
}

/// Sphere shell that exploded positions are drawn from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        ExplosionConfig { min_radius: 15.0, max_radius: 45.0 }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FieldConfig
// ════════════════════════════════════════════════════════════════════════════

/// Full generator configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Hard cap on the particle count.
    pub capacity:        usize,
    /// How far expected canopy demand is planned above its budget before
    /// the excess is thinned evenly.
    pub canopy_headroom: f32,
    pub trunk:           TrunkConfig,
    pub canopy:          CanopyConfig,
    pub garland:         GarlandConfig,
    pub star:            StarConfig,
    pub explosion:       ExplosionConfig,
    pub palette:         Palette,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            capacity:        8000,
            canopy_headroom: 0.08,
            trunk:           TrunkConfig::default(),
            canopy:          CanopyConfig::default(),
            garland:         GarlandConfig::default(),
            star:            StarConfig::default(),
            explosion:       ExplosionConfig::default(),
            palette:         Palette::default(),
        }
    }
}

impl FieldConfig {
    /// Reject values the generator cannot make sense of.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.capacity == 0 {
            return Err(FieldError::ZeroCapacity);
        }
        if self.canopy.layers < 2 {
            return Err(FieldError::TooFewLayers(self.canopy.layers));
        }
        if self.garland.layer_step == 0 {
            return Err(FieldError::Invalid("garland.layer_step must be at least 1"));
        }
        if self.canopy.icicle_min_len > self.canopy.icicle_max_len {
            return Err(FieldError::Invalid("canopy.icicle_min_len exceeds icicle_max_len"));
        }
        let e = &self.explosion;
        if !(e.min_radius >= 0.0 && e.min_radius < e.max_radius) {
            return Err(FieldError::ExplosionShell { min: e.min_radius, max: e.max_radius });
        }
        if !(self.trunk.min_radius <= self.trunk.max_radius) {
            return Err(FieldError::Invalid("trunk.min_radius exceeds max_radius"));
        }
        if !(self.canopy_headroom >= 0.0) {
            return Err(FieldError::Invalid("canopy_headroom must be non-negative"));
        }

        let c = &self.canopy;
        for (name, p) in [
            ("canopy.snow_chance",     c.snow_chance),
            ("canopy.ornament_chance", c.ornament_chance),
            ("canopy.gold_share",      c.gold_share),
            ("canopy.icicle_chance",   c.icicle_chance),
            ("trunk.brown_share",      self.trunk.brown_share),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(FieldError::Probability { name, value: p });
            }
        }
        Ok(())
    }

    /// Normalized height of a canopy layer (0 = apex, 1 = base).
    pub fn layer_t(&self, layer: usize) -> f32 {
        layer as f32 / (self.canopy.layers - 1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(FieldConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_shell() {
        let mut cfg = FieldConfig::default();
        cfg.explosion = ExplosionConfig { min_radius: 30.0, max_radius: 10.0 };
        assert!(matches!(cfg.validate(), Err(FieldError::ExplosionShell { .. })));
    }

    #[test]
    fn rejects_bad_probability() {
        let mut cfg = FieldConfig::default();
        cfg.canopy.snow_chance = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(FieldError::Probability { name: "canopy.snow_chance", .. })
        ));
    }

    #[test]
    fn rejects_single_layer() {
        let mut cfg = FieldConfig::default();
        cfg.canopy.layers = 1;
        assert_eq!(cfg.validate(), Err(FieldError::TooFewLayers(1)));
    }

    #[test]
    fn layer_t_spans_unit_interval() {
        let cfg = FieldConfig::default();
        assert_eq!(cfg.layer_t(0), 0.0);
        assert_eq!(cfg.layer_t(21), 1.0);
    }
}
