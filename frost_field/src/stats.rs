//! Summary counts for a generated field.

use std::fmt;

use glam::Vec3;

use crate::particle::{FieldGroup, Particle, ParticleKind};

/// Per-kind and per-group counts plus the formed-position bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldStats {
    pub total:    usize,
    pub by_kind:  [usize; 4],
    pub by_group: [usize; 4],
    pub min:      Vec3,
    pub max:      Vec3,
}

impl FieldStats {
    pub fn from_particles(particles: &[Particle]) -> Self {
        let mut stats = FieldStats {
            total:    particles.len(),
            by_kind:  [0; 4],
            by_group: [0; 4],
            min:      Vec3::splat(f32::INFINITY),
            max:      Vec3::splat(f32::NEG_INFINITY),
        };
        for p in particles {
            stats.by_kind[p.kind.index()] += 1;
            stats.by_group[p.group.index()] += 1;
            stats.min = stats.min.min(p.formed);
            stats.max = stats.max.max(p.formed);
        }
        if particles.is_empty() {
            stats.min = Vec3::ZERO;
            stats.max = Vec3::ZERO;
        }
        stats
    }

    pub fn kind(&self, kind: ParticleKind) -> usize {
        self.by_kind[kind.index()]
    }

    pub fn group(&self, group: FieldGroup) -> usize {
        self.by_group[group.index()]
    }
}

impl fmt::Display for FieldStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} particles", self.total)?;
        for kind in ParticleKind::ALL {
            writeln!(f, "  {:<9} {:>6}", kind.name(), self.kind(kind))?;
        }
        for group in FieldGroup::ALL {
            writeln!(f, "  [{:<7}] {:>6}", group.name(), self.group(group))?;
        }
        write!(
            f,
            "  bounds ({:.2}, {:.2}, {:.2}) .. ({:.2}, {:.2}, {:.2})",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}
