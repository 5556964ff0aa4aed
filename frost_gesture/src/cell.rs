//! Single-slot gesture cell shared between the gesture thread and the
//! animation loop.
//!
//! The whole [`GestureState`] lives in one `AtomicU64`, so a reader always
//! sees a state that some write actually published:
//!
//! | Bits | Field |
//! |---|---|
//! | 0 | `expanded` |
//! | 1 | `hand_present` |
//! | 2 | sealed |
//! | 32–63 | `hand_x` as `f32` bits |
//!
//! There is exactly one [`GestureWriter`] (it is not `Clone`) and any
//! number of [`GestureReader`]s.  Sealing is permanent: once the sealed bit
//! is set, `publish` refuses and returns `false`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::classifier::GestureState;

const EXPANDED: u64 = 1 << 0;
const PRESENT:  u64 = 1 << 1;
const SEALED:   u64 = 1 << 2;

fn pack(state: GestureState) -> u64 {
    let mut word = (state.hand_x.to_bits() as u64) << 32;
    if state.expanded {
        word |= EXPANDED;
    }
    if state.hand_present {
        word |= PRESENT;
    }
    word
}

fn unpack(word: u64) -> GestureState {
    GestureState {
        expanded:     word & EXPANDED != 0,
        hand_present: word & PRESENT != 0,
        hand_x:       f32::from_bits((word >> 32) as u32),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Constructor
// ════════════════════════════════════════════════════════════════════════════

/// Create a cell holding `initial` and return its writer and first reader.
pub fn gesture_cell(initial: GestureState) -> (GestureWriter, GestureReader) {
    let slot = Arc::new(AtomicU64::new(pack(initial)));
    (GestureWriter { slot: Arc::clone(&slot) }, GestureReader { slot })
}

// ════════════════════════════════════════════════════════════════════════════
// GestureWriter
// ════════════════════════════════════════════════════════════════════════════

/// The one publishing end.
#[derive(Debug)]
pub struct GestureWriter {
    slot: Arc<AtomicU64>,
}

impl GestureWriter {
    /// Replace the stored state.  Returns `false` without writing when the
    /// cell has been sealed.
    pub fn publish(&self, state: GestureState) -> bool {
        let next = pack(state);
        let mut current = self.slot.load(Ordering::Acquire);
        loop {
            if current & SEALED != 0 {
                return false;
            }
            match self.slot.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(seen) => current = seen,
            }
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.slot.load(Ordering::Acquire) & SEALED != 0
    }

    pub fn reader(&self) -> GestureReader {
        GestureReader { slot: Arc::clone(&self.slot) }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureReader
// ════════════════════════════════════════════════════════════════════════════

/// A cheap, cloneable view of the latest published state.
#[derive(Clone, Debug)]
pub struct GestureReader {
    slot: Arc<AtomicU64>,
}

impl GestureReader {
    pub fn load(&self) -> GestureState {
        unpack(self.slot.load(Ordering::Acquire))
    }

    /// Stop accepting writes.  Idempotent; the last published state stays
    /// readable.
    pub fn seal(&self) {
        self.slot.fetch_or(SEALED, Ordering::AcqRel);
    }

    pub fn is_sealed(&self) -> bool {
        self.slot.load(Ordering::Acquire) & SEALED != 0
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
