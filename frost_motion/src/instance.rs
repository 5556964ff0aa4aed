//! Per-particle instance transforms and the buffer the renderer reads.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation, rotation and scale of one rendered instance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstanceTransform {
    pub translation: Vec3,
    pub rotation:    Quat,
    pub scale:       Vec3,
}

impl InstanceTransform {
    pub const IDENTITY: InstanceTransform = InstanceTransform {
        translation: Vec3::ZERO,
        rotation:    Quat::IDENTITY,
        scale:       Vec3::ONE,
    };

    /// Column-major model matrix for instanced drawing.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ════════════════════════════════════════════════════════════════════════════
// InstanceBuffer
// ════════════════════════════════════════════════════════════════════════════

/// Index-aligned transform storage, one slot per particle.  Allocated once
/// and overwritten in full every frame.
#[derive(Clone, Debug, Default)]
pub struct InstanceBuffer {
    transforms: Vec<InstanceTransform>,
}

impl InstanceBuffer {
    pub fn new(len: usize) -> Self {
        InstanceBuffer { transforms: vec![InstanceTransform::IDENTITY; len] }
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Grow or shrink to `len` slots, e.g. after a field is regenerated.
    pub fn resize(&mut self, len: usize) {
        self.transforms.resize(len, InstanceTransform::IDENTITY);
    }

    pub fn as_slice(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [InstanceTransform] {
        &mut self.transforms
    }

    /// Model matrices in particle order.
    pub fn matrices(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.transforms.iter().map(InstanceTransform::to_matrix)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameOutput
// ════════════════════════════════════════════════════════════════════════════

/// Everything the renderer needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameOutput<'a> {
    pub transforms: &'a [InstanceTransform],
    /// Packed RGB, three floats per instance.
    pub colors:     &'a [f32],
    pub blend:      f32,
    pub rotation:   f32,
}

impl FrameOutput<'_> {
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn color(&self, i: usize) -> [f32; 3] {
        [self.colors[i * 3], self.colors[i * 3 + 1], self.colors[i * 3 + 2]]
    }
}
