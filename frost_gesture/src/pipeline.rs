//! Gesture pipeline: a landmark source on its own thread feeding the
//! classifier, whose output lands in a [`GestureCell`](crate::cell).
//!
//! Consumers don't need to know whether samples come from hardware, the
//! simulation window or a scripted replay; they only ever read the latest
//! [`GestureState`].

use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::cell::{gesture_cell, GestureReader, GestureWriter};
use crate::classifier::{GestureClassifier, GestureConfig, GestureConfigError, GestureState};
use crate::landmarks::Landmark;

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait — unified interface for hw, sim and replay
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver landmark samples to a [`LandmarkSink`].
///
/// Implementations loop until [`LandmarkSink::push`] returns `false` (the
/// pipeline was shut down) or their input ends.  A source that cannot
/// initialise should log and return; the cell then keeps reporting no hand.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, sink: LandmarkSink);
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSink
// ════════════════════════════════════════════════════════════════════════════

/// Classifier plus the cell's writing end, owned by the source thread.
#[derive(Debug)]
pub struct LandmarkSink {
    classifier: GestureClassifier,
    writer:     GestureWriter,
    samples:    u64,
}

impl LandmarkSink {
    pub fn new(classifier: GestureClassifier, writer: GestureWriter) -> Self {
        LandmarkSink { classifier, writer, samples: 0 }
    }

    /// Classify one sample and publish the result.  Returns `false` once the
    /// cell is sealed; the source should then stop.
    pub fn push(&mut self, sample: Option<&[Landmark]>) -> bool {
        let state = self.classifier.classify(sample);
        self.samples += 1;
        self.writer.publish(state)
    }

    pub fn is_closed(&self) -> bool {
        self.writer.is_sealed()
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GesturePipeline
// ════════════════════════════════════════════════════════════════════════════

/// Handle to a running source thread.
///
/// Dropping the handle seals the cell without waiting; [`shutdown`]
/// seals and then joins.
///
/// [`shutdown`]: GesturePipeline::shutdown
#[derive(Debug)]
pub struct GesturePipeline {
    reader: GestureReader,
    handle: Option<JoinHandle<()>>,
}

/// Validate `cfg`, create the cell and run `source` on its own thread.
pub fn spawn_pipeline<S: LandmarkSource>(
    source: S,
    cfg:    GestureConfig,
) -> Result<GesturePipeline, GestureConfigError> {
    let classifier = GestureClassifier::new(cfg)?;
    let initial = classifier.state(false);
    let (writer, reader) = gesture_cell(initial);
    let sink = LandmarkSink::new(classifier, writer);

    let handle = thread::spawn(move || {
        debug!("landmark source started");
        Box::new(source).run(sink);
        debug!("landmark source finished");
    });
    info!("gesture pipeline running");
    Ok(GesturePipeline { reader, handle: Some(handle) })
}

impl GesturePipeline {
    pub fn reader(&self) -> GestureReader {
        self.reader.clone()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> GestureState {
        self.reader.load()
    }

    /// True once the source thread has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Seal the cell and wait for the source to return.  Blocks until the
    /// source next calls `push` or otherwise notices the seal.
    pub fn shutdown(mut self) {
        self.reader.seal();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("landmark source panicked");
            }
        }
        info!("gesture pipeline stopped");
    }
}

impl Drop for GesturePipeline {
    fn drop(&mut self) {
        self.reader.seal();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource — scripted samples at a fixed cadence
// ════════════════════════════════════════════════════════════════════════════

/// Plays back a fixed list of samples, one per `interval`.
///
/// With `looping` the list repeats until shutdown; otherwise the source
/// returns after the last sample and the cell keeps the final state.
#[derive(Clone, Debug)]
pub struct ReplaySource {
    pub samples:  Vec<Option<Vec<Landmark>>>,
    pub interval: Duration,
    pub looping:  bool,
}

impl ReplaySource {
    pub fn new(samples: Vec<Option<Vec<Landmark>>>, interval: Duration) -> Self {
        ReplaySource { samples, interval, looping: false }
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }
}

impl LandmarkSource for ReplaySource {
    fn run(self: Box<Self>, mut sink: LandmarkSink) {
        if self.samples.is_empty() {
            return;
        }
        loop {
            for sample in &self.samples {
                if !sink.push(sample.as_deref()) {
                    return;
                }
                if !self.interval.is_zero() {
                    thread::sleep(self.interval);
                }
            }
            if !self.looping {
                debug!(samples = sink.samples(), "replay exhausted");
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::synthetic_hand;
    use std::time::Instant;

    fn open_hand(x: f32) -> Option<Vec<Landmark>> {
        Some(synthetic_hand(Landmark::new(x, 0.6, 0.0), 2.0))
    }

    fn wait_finished(p: &GesturePipeline) {
        let start = Instant::now();
        while !p.is_finished() {
            assert!(start.elapsed() < Duration::from_secs(5), "source never finished");
            thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn replay_publishes_final_state() {
        let script = vec![open_hand(0.5), open_hand(0.5), None];
        let p = spawn_pipeline(ReplaySource::new(script, Duration::ZERO), GestureConfig::default())
            .unwrap();
        wait_finished(&p);

        let s = p.snapshot();
        assert!(s.expanded);
        assert!(!s.hand_present);
        p.shutdown();
    }

    #[test]
    fn initial_snapshot_is_idle() {
        let p = spawn_pipeline(ReplaySource::new(Vec::new(), Duration::ZERO), GestureConfig::default())
            .unwrap();
        assert_eq!(p.snapshot(), GestureState::default());
        p.shutdown();
    }

    #[test]
    fn shutdown_stops_looping_source() {
        let src = ReplaySource::new(vec![open_hand(0.3), None], Duration::from_millis(1)).looping();
        let p = spawn_pipeline(src, GestureConfig::default()).unwrap();
        let reader = p.reader();
        thread::sleep(Duration::from_millis(20));

        p.shutdown();
        assert!(reader.is_sealed());
        let frozen = reader.load();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(reader.load(), frozen);
    }

    #[test]
    fn sink_reports_seal() {
        let (w, r) = gesture_cell(GestureState::default());
        let mut sink = LandmarkSink::new(GestureClassifier::default(), w);
        assert!(sink.push(None));
        r.seal();
        assert!(sink.is_closed());
        assert!(!sink.push(open_hand(0.5).as_deref()));
        assert_eq!(sink.samples(), 2);
        assert_eq!(r.load(), GestureState::default());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = GestureConfig { smoothing: 2.0, ..GestureConfig::default() };
        let err = spawn_pipeline(ReplaySource::new(Vec::new(), Duration::ZERO), cfg).unwrap_err();
        assert_eq!(err, GestureConfigError::Smoothing(2.0));
    }
}
