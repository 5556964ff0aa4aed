//! Top-level application state and the preview loop.
//!
//! `AppState` owns the particle field, the animation engine, the instance
//! buffer and the camera.  Each frame it reads the latest gesture from the
//! cell, advances the animation and hands the frame to the visualizer.

use std::fs;
use std::path::Path;
use std::sync::mpsc;
use std::f64::consts::PI;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use frost_field::{FieldConfig, ParticleField};
use frost_gesture::{spawn_pipeline, GestureConfig, GesturePipeline, GestureState};
use frost_motion::{AnimationEngine, FrameOutput, InstanceBuffer, MotionConfig};

use crate::camera::DriftCamera;
use crate::sources::SimInput;
use crate::visualizer::{Visualizer, WindowAction};

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application; loadable from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub seed:    u64,
    pub width:   usize,
    pub height:  usize,
    pub field:   FieldConfig,
    pub motion:  MotionConfig,
    pub gesture: GestureConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            seed:    2024,
            width:   960,
            height:  720,
            field:   FieldConfig::default(),
            motion:  MotionConfig::default(),
            gesture: GestureConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config.  Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).context("serializing config")?;
        fs::write(path, text).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.field.validate().context("field config")?;
        self.motion.validate().context("motion config")?;
        self.gesture.validate().context("gesture config")?;
        anyhow::ensure!(
            self.width >= 64 && self.height >= 64,
            "window {}x{} is too small",
            self.width,
            self.height
        );
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── scene ────────────────────────────────────────────────────────────
    field:  ParticleField,
    engine: AnimationEngine,
    buffer: InstanceBuffer,
    camera: DriftCamera,

    // ── config ───────────────────────────────────────────────────────────
    field_cfg: FieldConfig,
    seed:      u64,

    // ── status message ───────────────────────────────────────────────────
    pub status: String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self> {
        let field = ParticleField::seeded(&cfg.field, cfg.seed).context("generating field")?;
        let engine = AnimationEngine::new(cfg.motion.clone()).context("motion config")?;
        let buffer = InstanceBuffer::new(field.len());
        Ok(AppState {
            field,
            engine,
            buffer,
            camera:    DriftCamera::default(),
            field_cfg: cfg.field.clone(),
            seed:      cfg.seed,
            status:    String::new(),
        })
    }

    /// Regenerate the field from a new seed; the animation state carries on.
    pub fn reseed(&mut self, seed: u64) -> Result<()> {
        self.field = ParticleField::seeded(&self.field_cfg, seed).context("generating field")?;
        self.buffer.resize(self.field.len());
        self.seed = seed;
        info!(seed, particles = self.field.len(), "field reseeded");
        Ok(())
    }

    /// Per-frame logic: animation, transforms, camera, status line.
    pub fn tick(&mut self, gesture: &GestureState, time: f32, dt: f32) -> Result<()> {
        self.engine.step(gesture, dt);
        self.engine.write_frame(self.field.particles(), time, &mut self.buffer)?;
        self.camera.update(time, gesture.expanded);
        self.status = format!(
            "{}  |  {}  |  t={:.2}  rot={:+.2}  |  seed {}  |  {} particles",
            gesture.title(),
            gesture.status_label(),
            self.engine.blend(),
            self.engine.rotation(),
            self.seed,
            self.field.len(),
        );
        Ok(())
    }

    pub fn frame(&self) -> FrameOutput<'_> {
        FrameOutput {
            transforms: self.buffer.as_slice(),
            colors:     self.field.colors(),
            blend:      self.engine.blend(),
            rotation:   self.engine.rotation(),
        }
    }

    pub fn camera(&self) -> &DriftCamera { &self.camera }
    pub fn engine(&self) -> &AnimationEngine { &self.engine }
    pub fn field(&self)  -> &ParticleField { &self.field }
    pub fn seed(&self)   -> u64 { self.seed }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Common period of the default sway, ornament-pulse and camera-drift waves
/// (rates 1, 0.6, 4 and 0.05 rad/s all complete whole cycles in 40π s).
const SCENE_PERIOD: f64 = 8.0 * 40.0 * PI;

/// Elapsed wall time folded into one scene period before narrowing to `f32`,
/// so the animation clock keeps millisecond resolution over days of uptime.
pub fn scene_time(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f64() % SCENE_PERIOD) as f32
}

/// Landmark source for this build: hardware with `--features leap`,
/// otherwise the window-driven simulation.
#[cfg(not(feature = "leap"))]
fn start_pipeline(cfg: &AppConfig, sim_rx: mpsc::Receiver<SimInput>) -> Result<GesturePipeline> {
    spawn_pipeline(crate::sources::SimLandmarkSource { rx: sim_rx }, cfg.gesture.clone())
        .context("starting gesture pipeline")
}

#[cfg(feature = "leap")]
fn start_pipeline(cfg: &AppConfig, sim_rx: mpsc::Receiver<SimInput>) -> Result<GesturePipeline> {
    drop(sim_rx);
    spawn_pipeline(crate::sources::LeapLandmarkSource, cfg.gesture.clone())
        .context("starting gesture pipeline")
}

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It starts the gesture
/// pipeline, opens the preview window and drives the render loop at
/// ~60 fps until the window closes.
pub fn run(cfg: AppConfig) -> Result<()> {
    cfg.validate()?;

    // ── Gesture pipeline ─────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let pipeline = start_pipeline(&cfg, sim_rx)?;
    let gestures = pipeline.reader();

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(cfg.width, cfg.height, sim_tx)?;

    // ── App state ────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg)?;
    info!(particles = app.field().len(), seed = app.seed(), "preview running");

    // ── Main loop ────────────────────────────────────────────────────────
    let start = Instant::now();
    let mut last = start;
    while vis.is_open() {
        match vis.poll_input() {
            WindowAction::Close    => break,
            WindowAction::Reseed   => app.reseed(app.seed().wrapping_add(1))?,
            WindowAction::Continue => {}
        }

        let now = Instant::now();
        let dt = (now - last).as_secs_f32();
        last = now;
        let time = scene_time(now - start);

        let gesture = gestures.load();
        app.tick(&gesture, time, dt)?;
        vis.render(&app.frame(), app.camera(), &gesture, &app.status);
    }

    // Closing the window drops the sim sender, which ends the sim source.
    drop(vis);
    pipeline.shutdown();
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.field.capacity = 1500;
        cfg
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("frost_tree_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn config_round_trips_through_json_file() {
        let mut cfg = small_config();
        cfg.seed = 77;
        cfg.gesture.open_threshold = 1.8;
        cfg.motion.idle_spin = 0.2;
        let path = temp_path("round_trip");
        cfg.save(&path).unwrap();
        let back = AppConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(back, cfg);
    }

    #[test]
    fn partial_config_takes_defaults() {
        let path = temp_path("partial");
        fs::write(&path, r#"{ "seed": 9, "gesture": { "smoothing": 0.3 } }"#).unwrap();
        let cfg = AppConfig::load(&path).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.gesture.smoothing, 0.3);
        assert_eq!(cfg.gesture.open_threshold, 1.6);
        assert_eq!(cfg.field, FieldConfig::default());
    }

    #[test]
    fn invalid_config_file_is_rejected() {
        let path = temp_path("invalid");
        fs::write(&path, r#"{ "gesture": { "open_threshold": 1.0, "close_threshold": 1.3 } }"#).unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(format!("{:#}", err).contains("gesture config"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn tick_fills_every_transform() {
        let mut app = AppState::new(&small_config()).unwrap();
        let open = GestureState { expanded: true, hand_present: true, hand_x: 0.7 };
        app.tick(&open, 0.5, 1.0 / 60.0).unwrap();
        let frame = app.frame();
        assert_eq!(frame.len(), app.field().len());
        assert_eq!(frame.colors.len(), frame.len() * 3);
        assert!(frame.blend > 0.0);
        assert!(app.status.contains("Stardust Galaxy"));
    }

    #[test]
    fn reseed_changes_field_and_keeps_buffer_aligned() {
        let mut app = AppState::new(&small_config()).unwrap();
        let before = app.field().particles()[0].formed;
        app.reseed(app.seed() + 1).unwrap();
        assert_ne!(app.field().particles()[0].formed, before);
        app.tick(&GestureState::default(), 0.0, 0.016).unwrap();
        assert_eq!(app.frame().len(), app.field().len());
    }

    #[test]
    fn scene_time_keeps_precision_after_days() {
        let five_days = 5.0 * 86_400.0 + 0.25;
        let frame = 1.0 / 60.0;
        let a = scene_time(Duration::from_secs_f64(five_days));
        let b = scene_time(Duration::from_secs_f64(five_days + frame));
        assert!(a < SCENE_PERIOD as f32);
        assert!(((b - a) as f64 - frame).abs() < 5e-4, "frame step {}", b - a);

        // Every default wave sees the same phase as the unwrapped clock.
        for rate in [1.0, 0.6, 4.0, 0.05] {
            let exact = (rate * five_days).sin();
            let folded = (rate as f32 * a).sin() as f64;
            assert!((exact - folded).abs() < 1e-3, "rate {} drifted", rate);
        }
    }

    #[test]
    fn camera_follows_expansion() {
        let mut app = AppState::new(&small_config()).unwrap();
        let open = GestureState { expanded: true, hand_present: false, hand_x: 0.5 };
        for i in 0..300 {
            app.tick(&open, i as f32 / 60.0, 1.0 / 60.0).unwrap();
        }
        assert!(app.camera().position.z > 35.0);
    }
}
