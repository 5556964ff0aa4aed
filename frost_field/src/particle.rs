//! Particle records.  Written once by the generator, read-only afterwards.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::palette::Rgb;

// ════════════════════════════════════════════════════════════════════════════
// ParticleKind
// ════════════════════════════════════════════════════════════════════════════

/// Structural type of a particle.  Drives shape stretch, color jitter and
/// which idle animation applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    Needle,
    Snow,
    Ornament,
    Trunk,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 4] = [
        ParticleKind::Needle,
        ParticleKind::Snow,
        ParticleKind::Ornament,
        ParticleKind::Trunk,
    ];

    /// Anisotropic multiplier applied on top of the base scale.
    pub fn stretch(self) -> Vec3 {
        match self {
            ParticleKind::Needle   => Vec3::new(0.6, 3.0, 0.6),
            ParticleKind::Trunk    => Vec3::splat(1.2),
            ParticleKind::Ornament => Vec3::splat(2.0),
            ParticleKind::Snow     => Vec3::ONE,
        }
    }

    /// Full width of the random lightness offset (offset is ±width/2).
    pub fn lightness_jitter(self) -> f32 {
        match self {
            ParticleKind::Needle   => 0.05,
            ParticleKind::Snow     => 0.02,
            ParticleKind::Trunk    => 0.1,
            ParticleKind::Ornament => 0.0,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ParticleKind::Needle   => "needle",
            ParticleKind::Snow     => "snow",
            ParticleKind::Ornament => "ornament",
            ParticleKind::Trunk    => "trunk",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FieldGroup
// ════════════════════════════════════════════════════════════════════════════

/// Which generation pass produced a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldGroup {
    Trunk,
    Canopy,
    Garland,
    Star,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 4] = [
        FieldGroup::Trunk,
        FieldGroup::Canopy,
        FieldGroup::Garland,
        FieldGroup::Star,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldGroup::Trunk   => "trunk",
            FieldGroup::Canopy  => "canopy",
            FieldGroup::Garland => "garland",
            FieldGroup::Star    => "star",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Particle
// ════════════════════════════════════════════════════════════════════════════

/// One micro-object of the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in tree form.
    pub formed:     Vec3,
    /// Position when fully scattered; on a sphere shell around the origin.
    pub exploded:   Vec3,
    pub color:      Rgb,
    pub scale_dims: Vec3,
    /// Animation offset in `[0, 2π)`.
    pub phase:      f32,
    /// Reserved rate multiplier in `[0.2, 1.0)`.
    pub speed:      f32,
    pub kind:       ParticleKind,
    pub group:      FieldGroup,
}
