//! Open/closed palm classification with hysteresis and hand-x smoothing.
//!
//! # Algorithm
//!
//! For each sample with a usable hand:
//!
//! * `ratio = |tip − wrist| / |knuckle − wrist|` on the middle finger.
//! * Collapsed → expanded only when `ratio > open_threshold`;
//!   expanded → collapsed only when `ratio < close_threshold`.  Between the
//!   two thresholds the previous state holds.
//! * `hand_x += (mirrored_x − hand_x) · smoothing`.
//!
//! A sample without a usable hand leaves `expanded` and `hand_x` untouched
//! and reports `hand_present = false`, so a tracking dropout never
//! collapses an expanded formation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::landmarks::{HandLandmarks, Landmark};

// ════════════════════════════════════════════════════════════════════════════
// GestureConfig
// ════════════════════════════════════════════════════════════════════════════

/// Empirically tuned thresholds and smoothing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub open_threshold:  f32,
    pub close_threshold: f32,
    /// Exponential smoothing factor per sample, in (0, 1].
    pub smoothing:       f32,
    pub initial_hand_x:  f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            open_threshold:  1.6,
            close_threshold: 1.3,
            smoothing:       0.15,
            initial_hand_x:  0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GestureConfigError {
    #[error("close threshold {close} must be below open threshold {open}")]
    ThresholdOrder { open: f32, close: f32 },

    #[error("smoothing factor {0} must be in (0, 1]")]
    Smoothing(f32),

    #[error("initial hand x {0} must be in [0, 1]")]
    InitialHandX(f32),
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), GestureConfigError> {
        if !(self.close_threshold < self.open_threshold) {
            return Err(GestureConfigError::ThresholdOrder {
                open:  self.open_threshold,
                close: self.close_threshold,
            });
        }
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(GestureConfigError::Smoothing(self.smoothing));
        }
        if !(0.0..=1.0).contains(&self.initial_hand_x) {
            return Err(GestureConfigError::InitialHandX(self.initial_hand_x));
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureState
// ════════════════════════════════════════════════════════════════════════════

/// What the animation loop reads every frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GestureState {
    pub expanded:     bool,
    pub hand_present: bool,
    /// Smoothed horizontal hand position; 0 = left edge, 1 = right edge.
    pub hand_x:       f32,
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState { expanded: false, hand_present: false, hand_x: 0.5 }
    }
}

impl GestureState {
    /// Short label for the control surface.
    pub fn status_label(&self) -> &'static str {
        if self.expanded { "expanded" } else { "idle" }
    }

    /// Scene title shown over the installation.
    pub fn title(&self) -> &'static str {
        if self.expanded { "Stardust Galaxy" } else { "Frosty Wonderland" }
    }

    pub fn hint(&self) -> &'static str {
        "Move hand to rotate  |  Open palm to scatter"
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct GestureClassifier {
    cfg:        GestureConfig,
    expanded:   bool,
    hand_x:     f32,
    last_ratio: Option<f32>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        let cfg = GestureConfig::default();
        GestureClassifier {
            expanded:   false,
            hand_x:     cfg.initial_hand_x,
            last_ratio: None,
            cfg,
        }
    }
}

impl GestureClassifier {
    pub fn new(cfg: GestureConfig) -> Result<Self, GestureConfigError> {
        cfg.validate()?;
        Ok(GestureClassifier {
            expanded:   false,
            hand_x:     cfg.initial_hand_x,
            last_ratio: None,
            cfg,
        })
    }

    pub fn config(&self) -> &GestureConfig {
        &self.cfg
    }

    /// Consume one provider sample.  `None`, or a sample that fails
    /// validation, is a frame without a hand.
    pub fn classify(&mut self, sample: Option<&[Landmark]>) -> GestureState {
        let Some(points) = sample else {
            return self.state(false);
        };
        match HandLandmarks::from_points(points) {
            Ok(hand) => self.observe(&hand),
            Err(e) => {
                debug!(error = %e, "discarding malformed landmark sample");
                self.state(false)
            }
        }
    }

    /// Feed an already-extracted hand.
    pub fn observe(&mut self, hand: &HandLandmarks) -> GestureState {
        self.apply_ratio(hand.extension_ratio());
        self.smooth_x(hand.mirrored_x());
        self.state(true)
    }

    /// Hysteresis step.  Returns the (possibly unchanged) expanded flag.
    pub fn apply_ratio(&mut self, ratio: f32) -> bool {
        self.last_ratio = Some(ratio);
        if !self.expanded && ratio > self.cfg.open_threshold {
            self.expanded = true;
            debug!(ratio, "palm opened; expanding");
        } else if self.expanded && ratio < self.cfg.close_threshold {
            self.expanded = false;
            debug!(ratio, "palm closed; collapsing");
        }
        self.expanded
    }

    /// One exponential smoothing step toward `raw`.
    pub fn smooth_x(&mut self, raw: f32) -> f32 {
        self.hand_x += (raw - self.hand_x) * self.cfg.smoothing;
        self.hand_x
    }

    pub fn state(&self, hand_present: bool) -> GestureState {
        GestureState { expanded: self.expanded, hand_present, hand_x: self.hand_x }
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    pub fn hand_x(&self) -> f32 {
        self.hand_x
    }

    /// Ratio of the most recent usable hand, for diagnostics.
    pub fn last_ratio(&self) -> Option<f32> {
        self.last_ratio
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::synthetic_hand;
    use proptest::prelude::*;

    fn hand(wrist_x: f32, ratio: f32) -> Vec<Landmark> {
        synthetic_hand(Landmark::new(wrist_x, 0.6, 0.0), ratio)
    }

    #[test]
    fn hysteresis_sequence() {
        let mut c = GestureClassifier::default();
        let states: Vec<bool> = [1.0, 1.5, 1.65, 1.4, 1.25]
            .iter()
            .map(|&r| c.classify(Some(&hand(0.5, r))).expanded)
            .collect();
        assert_eq!(states, vec![false, false, true, true, false]);
    }

    #[test]
    fn thresholds_are_strict() {
        let mut c = GestureClassifier::default();
        assert!(!c.apply_ratio(1.6));
        assert!(c.apply_ratio(1.61));
        assert!(c.apply_ratio(1.3));
        assert!(!c.apply_ratio(1.29));
    }

    #[test]
    fn hand_x_converges_monotonically() {
        let mut c = GestureClassifier::default();
        // raw x = 1 − wrist.x = 0.9
        let sample = hand(0.1, 1.0);
        let mut prev = c.hand_x();
        for _ in 0..50 {
            let x = c.classify(Some(&sample)).hand_x;
            assert!(x >= prev);
            assert!(x <= 0.9 + 1e-6);
            prev = x;
        }
        assert!((prev - 0.9).abs() < 1e-3, "hand_x {}", prev);
    }

    #[test]
    fn no_hand_keeps_state_and_freezes_x() {
        let mut c = GestureClassifier::default();
        c.classify(Some(&hand(0.2, 2.0)));
        let before = c.classify(Some(&hand(0.2, 2.0)));
        assert!(before.expanded);

        for _ in 0..10 {
            let s = c.classify(None);
            assert!(s.expanded);
            assert!(!s.hand_present);
            assert_eq!(s.hand_x, before.hand_x);
        }
    }

    #[test]
    fn malformed_sample_is_no_hand() {
        let mut c = GestureClassifier::default();
        c.classify(Some(&hand(0.3, 2.0)));
        let x = c.hand_x();

        let s = c.classify(Some(&hand(0.3, 2.0)[..10]));
        assert!(!s.hand_present);
        assert!(s.expanded);
        assert_eq!(s.hand_x, x);
    }

    #[test]
    fn labels_follow_state() {
        let mut s = GestureState::default();
        assert_eq!(s.status_label(), "idle");
        assert_eq!(s.title(), "Frosty Wonderland");
        s.expanded = true;
        assert_eq!(s.status_label(), "expanded");
        assert_eq!(s.title(), "Stardust Galaxy");
    }

    #[test]
    fn config_validation() {
        let bad = GestureConfig { open_threshold: 1.2, close_threshold: 1.3, ..GestureConfig::default() };
        assert!(matches!(GestureClassifier::new(bad), Err(GestureConfigError::ThresholdOrder { .. })));

        let bad = GestureConfig { smoothing: 0.0, ..GestureConfig::default() };
        assert_eq!(GestureClassifier::new(bad).unwrap_err(), GestureConfigError::Smoothing(0.0));
    }

    proptest! {
        #[test]
        fn hand_x_stays_in_unit_interval(xs in proptest::collection::vec(-0.5f32..1.5, 1..64)) {
            let mut c = GestureClassifier::default();
            for x in xs {
                let s = c.classify(Some(&hand(x, 1.0)));
                prop_assert!((0.0..=1.0).contains(&s.hand_x));
            }
        }

        #[test]
        fn ambiguous_band_never_toggles(start in any::<bool>(), ratios in proptest::collection::vec(1.3f32..=1.6, 1..32)) {
            let mut c = GestureClassifier::default();
            if start { c.apply_ratio(3.0); }
            for r in ratios {
                prop_assert_eq!(c.apply_ratio(r), start);
            }
        }
    }
}
