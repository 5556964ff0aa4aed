//! Software-rendered preview of the particle field using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    FROSTY WONDERLAND                     │
//! │       Move hand to rotate  |  Open palm to scatter       │
//! │                          *                               │
//! │                        .:*:.                             │
//! │                      .:*:::*:.        (particle splats)  │
//! │                    .::*::::::*:.                         │
//! │                          ||                              │
//! │                                                          │
//! │  status bar                                   hand: yes  │
//! │  key legend                                              │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each instance is projected through the [`DriftCamera`], splatted as a
//! square whose side follows its largest scale axis, drawn far-to-near and
//! faded toward the background with linear fog.

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{anyhow, Result};
use frost_field::Rgb;
use frost_gesture::GestureState;
use frost_motion::FrameOutput;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::camera::{DriftCamera, GROUP_OFFSET};
use crate::sources::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Look constants
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:    u32 = 0xFF02040A;
const FOG_NEAR:    f32 = 15.0;
const FOG_FAR:     f32 = 60.0;
const STATUS_H:    usize = 36;
const TEXT_BG:     u32 = 0xFF0A1428;
const TITLE_COLOR: u32 = 0xFFE8F4FF;
const GOLD:        u32 = 0xFFFFD700;
const DIM:         u32 = 0xFF888888;

/// What the window asked the app to do this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowAction {
    Continue,
    Reseed,
    Close,
}

/// One projected particle, ready to draw.
#[derive(Clone, Copy, Debug)]
struct Splat {
    x:     i32,
    y:     i32,
    half:  i32,
    depth: f32,
    color: u32,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    width:  usize,
    height: usize,
    buf:    Vec<u32>,
    splats: Vec<Splat>,
    sim_tx: Sender<SimInput>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize, sim_tx: Sender<SimInput>) -> Result<Self> {
        let mut window = Window::new(
            "Frost Tree — Frosty Wonderland",
            width,
            height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("cannot open preview window: {}", e))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            width,
            height,
            buf: vec![BG_COLOR; width * height],
            splats: Vec::new(),
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Poll mouse and keyboard, forward hand input to the sim source and
    /// report window-level commands.
    pub fn poll_input(&mut self) -> WindowAction {
        if !self.window.is_open() {
            return WindowAction::Close;
        }
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if one_shot(Key::Q) || one_shot(Key::Escape) {
            return WindowAction::Close;
        }
        if one_shot(Key::Space) {
            let _ = self.sim_tx.send(SimInput::TogglePalm);
        }
        if one_shot(Key::H) {
            let _ = self.sim_tx.send(SimInput::ToggleHand);
        }
        let reseed = one_shot(Key::R);

        if let Some((mx, _)) = self.window.get_mouse_pos(MouseMode::Clamp) {
            let _ = self.sim_tx.send(SimInput::Pointer(mx / self.width as f32));
        }

        if reseed { WindowAction::Reseed } else { WindowAction::Continue }
    }

    /// Render one frame.
    pub fn render(
        &mut self,
        frame:   &FrameOutput<'_>,
        camera:  &DriftCamera,
        gesture: &GestureState,
        status:  &str,
    ) {
        self.buf.fill(BG_COLOR);

        self.collect_splats(frame, camera);
        let splats = std::mem::take(&mut self.splats);
        for s in &splats {
            self.fill_rect_clipped(s.x - s.half, s.y - s.half, 2 * s.half + 1, s.color);
        }
        self.splats = splats;

        // ── Title and hint ────────────────────────────────────────────────
        let title = gesture.title().to_uppercase();
        let tx = centered_x(&title, 3, self.width);
        self.draw_label_scaled(&title, tx, 24, 3, TITLE_COLOR);
        let hint = gesture.hint();
        self.draw_label(hint, centered_x(hint, 1, self.width), 24 + 5 * 3 + 8, DIM);

        // ── Status bar ────────────────────────────────────────────────────
        let status_y = self.height.saturating_sub(STATUS_H);
        self.fill_rect(0, status_y, self.width, STATUS_H, TEXT_BG);
        self.draw_label(status, 10, status_y + 8, 0xFFEEEEEE);

        let (hand, color) = if gesture.hand_present { ("hand: yes", GOLD) } else { ("hand: no", DIM) };
        self.draw_label(hand, self.width.saturating_sub(60), status_y + 8, color);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(
            "mouse=move hand  space=open/close palm  h=hand in/out  r=reseed  q=quit",
            10,
            self.height.saturating_sub(12),
            DIM,
        );

        self.window
            .update_with_buffer(&self.buf, self.width, self.height)
            .ok();
    }

    fn collect_splats(&mut self, frame: &FrameOutput<'_>, camera: &DriftCamera) {
        let proj = camera.projector(self.width, self.height);
        self.splats.clear();
        for (i, t) in frame.transforms.iter().enumerate() {
            let Some(p) = proj.project(t.translation + GROUP_OFFSET) else { continue };
            if p.x < -50.0 || p.y < -50.0 || p.x > self.width as f32 + 50.0 || p.y > self.height as f32 + 50.0 {
                continue;
            }
            let half = (t.scale.max_element() * p.scale * 0.5) as i32;
            let [r, g, b] = frame.color(i);
            self.splats.push(Splat {
                x:     p.x as i32,
                y:     p.y as i32,
                half:  half.clamp(0, 12),
                depth: p.depth,
                color: splat_color([r, g, b], p.depth),
            });
        }
        self.splats.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    /// Square of side `size` at signed coordinates, clipped to the window.
    fn fill_rect_clipped(&mut self, x: i32, y: i32, size: i32, color: u32) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x + size).max(0) as usize;
        let y1 = (y + size).max(0) as usize;
        if x1 > x0 && y1 > y0 {
            self.fill_rect(x0, y0, x1 - x0, y1 - y0, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        self.draw_label_scaled(text, x, y, 1, color);
    }

    /// Minimal bitmap font — 3×5 characters, each pixel drawn as a
    /// `scale × scale` block.
    fn draw_label_scaled(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for dy in 0..scale {
                            for dx in 0..scale {
                                self.set_pixel(cx + col * scale + dx, y + row * scale + dy, color);
                            }
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.width { break; }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Color helpers
// ────────────────────────────────────────────────────────────────────────────

fn splat_color([r, g, b]: [f32; 3], depth: f32) -> u32 {
    fog(Rgb::new(r, g, b).to_argb(), depth)
}

/// Left edge that centers `text` drawn at `scale` in a `width`-pixel row.
fn centered_x(text: &str, scale: usize, width: usize) -> usize {
    width.saturating_sub(text.chars().count() * 4 * scale) / 2
}

/// Linear fog toward the background between `FOG_NEAR` and `FOG_FAR`.
fn fog(color: u32, depth: f32) -> u32 {
    let f = ((depth - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0);
    blend(color, BG_COLOR, f)
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar, br) << 16) | (lerp(ag, bg) << 8) | lerp(ab, bb)
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '|' => [0b010, 0b010, 0b010, 0b010, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
