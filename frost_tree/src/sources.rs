//! Landmark sources — LeapMotion hardware and mouse/keyboard simulation.
//!
//! Both feed the same [`LandmarkSink`]; the animation loop cannot tell
//! which one is running.

use std::sync::mpsc::Receiver;

use frost_gesture::{synthetic_hand, Landmark, LandmarkSink, LandmarkSource};
use tracing::debug;

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource — mouse/keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the preview window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position as a fraction of window width; sent every frame.
    Pointer(f32),
    /// Space: switch between open palm and fist.
    TogglePalm,
    /// H: put the hand in front of / away from the "camera".
    ToggleHand,
}

/// Synthetic-hand state driven by [`SimInput`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimHand {
    pub present:  bool,
    pub open:     bool,
    /// Screen-space x of the hand, 0 = left.
    pub screen_x: f32,
}

impl Default for SimHand {
    fn default() -> Self {
        SimHand { present: true, open: false, screen_x: 0.5 }
    }
}

impl SimHand {
    const OPEN_RATIO:   f32 = 2.0;
    const CLOSED_RATIO: f32 = 1.0;

    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer(x)  => self.screen_x = x.clamp(0.0, 1.0),
            SimInput::TogglePalm  => self.open = !self.open,
            SimInput::ToggleHand  => self.present = !self.present,
        }
    }

    /// The provider sample this hand would produce.  The provider sees an
    /// un-mirrored image, so screen x maps to `1 − wrist.x`.
    pub fn sample(&self) -> Option<Vec<Landmark>> {
        if !self.present {
            return None;
        }
        let ratio = if self.open { Self::OPEN_RATIO } else { Self::CLOSED_RATIO };
        Some(synthetic_hand(Landmark::new(1.0 - self.screen_x, 0.7, 0.0), ratio))
    }
}

/// Landmark source fed by the preview window.  Emits one sample per input,
/// so the pointer event sent every frame gives a per-frame cadence.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, mut sink: LandmarkSink) {
        let mut hand = SimHand::default();
        for input in self.rx {
            if !matches!(input, SimInput::Pointer(_)) {
                debug!(?input, "sim input");
            }
            hand.apply(input);
            if !sink.push(hand.sample().as_deref()) {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Leap coordinates are millimetres above the device.  They are mapped into
/// the provider's image space with one uniform scale so distance ratios
/// survive: `x → 0.5 − x/400` (mirrored, like a webcam image),
/// `y → 1 − y/400`, `z → z/400`.  The first tracked hand is used.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, mut sink: LandmarkSink) {
        use leaprs::*;
        use tracing::{info, warn};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = ?e, "cannot create LeapC connection; no hand will be tracked");
                return;
            }
        };
        if let Err(e) = connection.open() {
            warn!(error = ?e, "cannot open LeapMotion device; no hand will be tracked");
            return;
        }
        info!("LeapMotion connected");

        while !sink.is_closed() {
            let msg = match connection.poll(100) {
                Ok(m) => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let hands: Vec<_> = frame.hands().collect();
                let sample = hands.first().map(leap_landmarks);
                if !sink.push(sample.as_deref()) {
                    return;
                }
            }
        }
    }
}

/// Map one Leap hand onto the 21-point layout.  Each digit contributes its
/// knuckle and tip; the two inner joints are interpolated between them.
#[cfg(feature = "leap")]
fn leap_landmarks(hand: &leaprs::Hand) -> Vec<Landmark> {
    const MM: f32 = 400.0;
    let to_image = |x: f32, y: f32, z: f32| Landmark::new(0.5 - x / MM, 1.0 - y / MM, z / MM);

    let digits: Vec<_> = hand.digits().collect();
    let mut points = vec![Landmark::default(); frost_gesture::LANDMARK_COUNT];
    if let Some(middle) = digits.get(2) {
        let w = middle.metacarpal().prev_joint();
        points[0] = to_image(w.x, w.y, w.z);
    }
    for (d, digit) in digits.iter().take(5).enumerate() {
        let k = digit.metacarpal().next_joint();
        let t = digit.distal().next_joint();
        let knuckle = to_image(k.x, k.y, k.z);
        let tip = to_image(t.x, t.y, t.z);
        for joint in 0..4 {
            let f = joint as f32 / 3.0;
            points[1 + d * 4 + joint] = Landmark::new(
                knuckle.x + (tip.x - knuckle.x) * f,
                knuckle.y + (tip.y - knuckle.y) * f,
                knuckle.z + (tip.z - knuckle.z) * f,
            );
        }
    }
    points
}
