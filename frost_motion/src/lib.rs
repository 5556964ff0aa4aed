//! # frost_motion
//!
//! Animates a [`ParticleField`](frost_field::ParticleField) under a
//! [`GestureState`](frost_gesture::GestureState).
//!
//! Each frame the engine eases a single blend factor between the formed
//! tree and the exploded cloud and eases a rotation angle toward the hand,
//! then recomputes every instance transform from scratch into an
//! index-aligned [`InstanceBuffer`].
//!
//! | Stage | Formed (t = 0) | Exploded (t = 1) |
//! |---|---|---|
//! | Position | tree point, swayed, rotated about Y | shell point |
//! | Scale | `scale_dims` (ornaments pulse ±15%) | `0.2 · scale_dims` |
//! | Orientation | `(phase, rotation + phase, phase/2)` | X spins with time |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use frost_field::{FieldConfig, ParticleField};
//! use frost_gesture::GestureState;
//! use frost_motion::{AnimationEngine, InstanceBuffer};
//!
//! let field = ParticleField::seeded(&FieldConfig::default(), 1).unwrap();
//! let mut engine = AnimationEngine::default();
//! let mut buffer = InstanceBuffer::new(field.len());
//! let frame = engine
//!     .frame(&field, &GestureState::default(), 0.0, 1.0 / 60.0, &mut buffer)
//!     .unwrap();
//! println!("{} instances, blend {:.3}", frame.len(), frame.blend);
//! ```

pub mod config;
pub mod engine;
pub mod instance;

pub use config::MotionConfig;
pub use engine::AnimationEngine;
pub use instance::{FrameOutput, InstanceBuffer, InstanceTransform};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MotionError {
    #[error("instance buffer holds {buffer} slots but the field has {particles} particles")]
    BufferLength { particles: usize, buffer: usize },

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
}
