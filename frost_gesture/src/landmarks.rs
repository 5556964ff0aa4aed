//! Hand landmarks as delivered by the landmark provider.
//!
//! The provider uses the 21-point hand model: wrist, then four joints per
//! digit from thumb to pinky.  Coordinates are normalized to the camera
//! image (x, y in 0–1) with a relative depth in z.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Indices
// ════════════════════════════════════════════════════════════════════════════

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    pub fn distance(self, other: Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Why a sample could not be used.  The classifier treats all of these as
/// "no hand" for that sample.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LandmarkError {
    #[error("expected 21 landmarks, got {0}")]
    TooFewPoints(usize),

    #[error("landmark {0} has a non-finite coordinate")]
    NonFinite(usize),

    #[error("wrist and middle knuckle coincide; palm size is zero")]
    DegeneratePalm,
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks — the three reference points the classifier needs
// ════════════════════════════════════════════════════════════════════════════

/// Wrist, middle-finger knuckle and middle fingertip of one hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandLandmarks {
    pub wrist:      Landmark,
    pub middle_mcp: Landmark,
    pub middle_tip: Landmark,
}

impl HandLandmarks {
    /// Pull the reference points out of a full provider sample.
    pub fn from_points(points: &[Landmark]) -> Result<Self, LandmarkError> {
        if points.len() < LANDMARK_COUNT {
            return Err(LandmarkError::TooFewPoints(points.len()));
        }
        for idx in [WRIST, MIDDLE_MCP, MIDDLE_TIP] {
            if !points[idx].is_finite() {
                return Err(LandmarkError::NonFinite(idx));
            }
        }
        let hand = HandLandmarks {
            wrist:      points[WRIST],
            middle_mcp: points[MIDDLE_MCP],
            middle_tip: points[MIDDLE_TIP],
        };
        if hand.palm_size() <= f32::EPSILON {
            return Err(LandmarkError::DegeneratePalm);
        }
        Ok(hand)
    }

    pub fn palm_size(&self) -> f32 {
        self.wrist.distance(self.middle_mcp)
    }

    pub fn finger_extension(&self) -> f32 {
        self.wrist.distance(self.middle_tip)
    }

    /// Extension relative to the hand's own size; independent of how far
    /// the hand is from the camera.
    pub fn extension_ratio(&self) -> f32 {
        self.finger_extension() / self.palm_size()
    }

    /// Screen-space horizontal position: the provider sees the un-mirrored
    /// image, so moving right on screen lowers the raw x.
    pub fn mirrored_x(&self) -> f32 {
        (1.0 - self.wrist.x).clamp(0.0, 1.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// synthetic_hand — a plausible 21-point hand for simulation and tests
// ════════════════════════════════════════════════════════════════════════════

/// Build a 21-point upright hand with the wrist at `wrist` whose
/// middle-finger extension ratio is exactly `ratio`.
///
/// Palm size is 0.1 in image units.  Other digits fan out around the
/// middle finger with the same curl so the hand looks consistent when drawn.
pub fn synthetic_hand(wrist: Landmark, ratio: f32) -> Vec<Landmark> {
    const PALM: f32 = 0.1;
    // Horizontal offset of each digit's knuckle, thumb to pinky.
    const SPREAD: [f32; 5] = [-0.06, -0.03, 0.0, 0.025, 0.05];

    let mut points = vec![wrist; LANDMARK_COUNT];
    let reach = PALM * ratio;

    for (digit, &dx) in SPREAD.iter().enumerate() {
        let knuckle = Landmark::new(wrist.x + dx, wrist.y - PALM, wrist.z);
        // Tip lies along the wrist-to-knuckle direction at distance `reach`.
        let dir_x = dx / PALM;
        let norm = (1.0 + dir_x * dir_x).sqrt();
        let tip = Landmark::new(
            wrist.x + reach * dir_x / norm,
            wrist.y - reach / norm,
            wrist.z,
        );
        for joint in 0..4 {
            let f = joint as f32 / 3.0;
            points[1 + digit * 4 + joint] = Landmark::new(
                knuckle.x + (tip.x - knuckle.x) * f,
                knuckle.y + (tip.y - knuckle.y) * f,
                wrist.z,
            );
        }
    }
    // The middle knuckle sits straight above the wrist so the palm is exact.
    points[MIDDLE_MCP] = Landmark::new(wrist.x, wrist.y - PALM, wrist.z);
    points[MIDDLE_TIP] = Landmark::new(wrist.x, wrist.y - reach, wrist.z);
    points
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_hand_has_requested_ratio() {
        for ratio in [0.8, 1.3, 1.6, 2.2] {
            let pts = synthetic_hand(Landmark::new(0.4, 0.7, -0.02), ratio);
            let hand = HandLandmarks::from_points(&pts).unwrap();
            assert!((hand.extension_ratio() - ratio).abs() < 1e-4, "ratio {}", ratio);
        }
    }

    #[test]
    fn ratio_is_scale_invariant() {
        let near = HandLandmarks {
            wrist:      Landmark::new(0.5, 0.8, 0.0),
            middle_mcp: Landmark::new(0.5, 0.6, 0.0),
            middle_tip: Landmark::new(0.5, 0.45, 0.0),
        };
        let far = HandLandmarks {
            wrist:      Landmark::new(0.5, 0.8, 0.0),
            middle_mcp: Landmark::new(0.5, 0.7, 0.0),
            middle_tip: Landmark::new(0.5, 0.625, 0.0),
        };
        assert!((near.extension_ratio() - far.extension_ratio()).abs() < 1e-4);
    }

    #[test]
    fn short_sample_rejected() {
        let pts = vec![Landmark::default(); 5];
        assert_eq!(HandLandmarks::from_points(&pts), Err(LandmarkError::TooFewPoints(5)));
    }

    #[test]
    fn nan_rejected() {
        let mut pts = synthetic_hand(Landmark::new(0.5, 0.5, 0.0), 1.5);
        pts[MIDDLE_TIP].y = f32::NAN;
        assert_eq!(HandLandmarks::from_points(&pts), Err(LandmarkError::NonFinite(MIDDLE_TIP)));
    }

    #[test]
    fn collapsed_palm_rejected() {
        let pts = vec![Landmark::new(0.3, 0.3, 0.0); LANDMARK_COUNT];
        assert_eq!(HandLandmarks::from_points(&pts), Err(LandmarkError::DegeneratePalm));
    }

    #[test]
    fn mirrored_x_flips_and_clamps() {
        let pts = synthetic_hand(Landmark::new(0.2, 0.5, 0.0), 1.0);
        let hand = HandLandmarks::from_points(&pts).unwrap();
        assert!((hand.mirrored_x() - 0.8).abs() < 1e-6);

        let pts = synthetic_hand(Landmark::new(-0.1, 0.5, 0.0), 1.0);
        assert_eq!(HandLandmarks::from_points(&pts).unwrap().mirrored_x(), 1.0);
    }
}
