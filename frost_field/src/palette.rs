//! Tree palette and HSL lightness jitter.
//!
//! Colors are kept as normalized sRGB triples.  Jitter is applied the same
//! way for every particle kind: convert to HSL, shift the lightness, clamp,
//! convert back.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Rgb
// ════════════════════════════════════════════════════════════════════════════

/// A normalized RGB color, each channel in 0.0–1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub fn from_hex(hex: u32) -> Self {
        let ch = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Rgb::new(ch(16), ch(8), ch(0))
    }

    /// Convert to (hue, saturation, lightness), all in 0.0–1.0.
    pub fn to_hsl(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (min + max) / 2.0;

        if min == max {
            return (0.0, 0.0, l);
        }

        let delta = max - min;
        let s = if l <= 0.5 { delta / (max + min) } else { delta / (2.0 - max - min) };
        let h = if max == self.r {
            (self.g - self.b) / delta + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };
        (h / 6.0, s, l)
    }

    /// Inverse of [`Rgb::to_hsl`].  Hue wraps; saturation and lightness clamp.
    pub fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Rgb::new(l, l, l);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;
        Rgb::new(
            hue_to_channel(q, p, h + 1.0 / 3.0),
            hue_to_channel(q, p, h),
            hue_to_channel(q, p, h - 1.0 / 3.0),
        )
    }

    /// Shift the lightness by `delta` (clamped to the valid range).
    pub fn offset_lightness(self, delta: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        Rgb::from_hsl(h, s, l + delta)
    }

    /// Packed `0xAARRGGBB` with opaque alpha, as a framebuffer expects.
    pub fn to_argb(self) -> u32 {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        0xFF000000 | (q(self.r) << 16) | (q(self.g) << 8) | q(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 { t += 1.0; }
    if t > 1.0 { t -= 1.0; }
    if t < 1.0 / 6.0 { return p + (q - p) * 6.0 * t; }
    if t < 0.5       { return q; }
    if t < 2.0 / 3.0 { return p + (q - p) * 6.0 * (2.0 / 3.0 - t); }
    p
}

// ════════════════════════════════════════════════════════════════════════════
// Palette
// ════════════════════════════════════════════════════════════════════════════

/// Every base color the generator draws from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub needle_blue:    Rgb,
    pub needle_shadow:  Rgb,
    pub snow_white:     Rgb,
    pub snow_shadow:    Rgb,
    pub trunk_brown:    Rgb,
    pub trunk_dark:     Rgb,
    pub garland_silver: Rgb,
    pub ornament_gold:  Rgb,
    pub ornament_red:   Rgb,
    pub star_glow:      Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            needle_blue:    Rgb::from_hex(0x1565C0),
            needle_shadow:  Rgb::from_hex(0x0D47A1),
            snow_white:     Rgb::from_hex(0xFFFFFF),
            snow_shadow:    Rgb::from_hex(0xE3F2FD),
            trunk_brown:    Rgb::from_hex(0x5D4037),
            trunk_dark:     Rgb::from_hex(0x3E2723),
            garland_silver: Rgb::from_hex(0xECEFF1),
            ornament_gold:  Rgb::from_hex(0xFFD700),
            ornament_red:   Rgb::from_hex(0xD32F2F),
            star_glow:      Rgb::from_hex(0xFFF59D),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-4 && (a.g - b.g).abs() < 1e-4 && (a.b - b.b).abs() < 1e-4
    }

    #[test]
    fn from_hex_channels() {
        let c = Rgb::from_hex(0xFF8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn hsl_round_trip_palette() {
        let p = Palette::default();
        for c in [p.needle_blue, p.trunk_brown, p.ornament_red, p.star_glow, p.snow_shadow] {
            let (h, s, l) = c.to_hsl();
            assert!(close(Rgb::from_hsl(h, s, l), c), "{:?}", c);
        }
    }

    #[test]
    fn grey_has_no_saturation() {
        let (_, s, l) = Rgb::new(0.4, 0.4, 0.4).to_hsl();
        assert_eq!(s, 0.0);
        assert!((l - 0.4).abs() < 1e-6);
    }

    #[test]
    fn lightness_offset_brightens_and_clamps() {
        let base = Rgb::from_hex(0x1565C0);
        let (_, _, l0) = base.to_hsl();
        let (_, _, l1) = base.offset_lightness(0.02).to_hsl();
        assert!(l1 > l0);

        let white = Rgb::from_hex(0xFFFFFF).offset_lightness(0.5);
        assert!(close(white, Rgb::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn argb_is_opaque() {
        assert_eq!(Rgb::from_hex(0x02040A).to_argb(), 0xFF02040A);
        assert_eq!(Rgb::new(2.0, -1.0, 0.0).to_argb(), 0xFFFF0000);
    }
}
