//! # frost_gesture
//!
//! Turns per-frame hand landmarks into a tiny, sticky gesture state for the
//! frost tree animation.
//!
//! ## Gesture → State mapping
//!
//! | Gesture | Condition | Effect |
//! |---|---|---|
//! | Open palm | middle-finger ratio > 1.6 | `expanded = true` |
//! | Closed fist | ratio < 1.3 | `expanded = false` |
//! | In between | 1.3 ≤ ratio ≤ 1.6 | previous state holds |
//! | Horizontal move | every sample with a hand | `hand_x` smoothed toward `1 − wrist.x` |
//! | Hand lost | no / malformed sample | `hand_present = false`, rest frozen |
//!
//! ## Threads
//!
//! A [`LandmarkSource`] runs on its own thread via [`spawn_pipeline`] and
//! publishes into a single-slot cell ([`gesture_cell`]).  The animation
//! loop reads the latest state with [`GestureReader::load`], never blocking
//! and never seeing a half-written update.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use frost_gesture::{spawn_pipeline, synthetic_hand, GestureConfig, Landmark, ReplaySource};
//!
//! let open = synthetic_hand(Landmark::new(0.4, 0.6, 0.0), 2.0);
//! let src = ReplaySource::new(vec![Some(open)], Duration::from_millis(16));
//! let pipeline = spawn_pipeline(src, GestureConfig::default()).unwrap();
//! println!("{}", pipeline.snapshot().status_label());
//! pipeline.shutdown();
//! ```

pub mod cell;
pub mod classifier;
pub mod landmarks;
pub mod pipeline;

pub use cell::{gesture_cell, GestureReader, GestureWriter};
pub use classifier::{GestureClassifier, GestureConfig, GestureConfigError, GestureState};
pub use landmarks::{synthetic_hand, HandLandmarks, Landmark, LandmarkError, LANDMARK_COUNT};
pub use pipeline::{spawn_pipeline, GesturePipeline, LandmarkSink, LandmarkSource, ReplaySource};
