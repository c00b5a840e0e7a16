// Core types shared by the canvas, the fade renderer and the demo.

use crate::error::{Error, Result};
use std::ops::Range;

/// Straight (non-premultiplied) ARGB color, 8 bits per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { a: 0, r: 0, g: 0, b: 0 };
    pub const BLACK: Color = Color { a: 0xFF, r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { a: 0xFF, r: 0xFF, g: 0xFF, b: 0xFF };

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    /// Opaque color from 8-bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xFF, r, g, b }
    }

    /// Unpack 0xAARRGGBB.
    pub const fn from_argb(px: u32) -> Self {
        Self {
            a: (px >> 24) as u8,
            r: (px >> 16) as u8,
            g: (px >> 8) as u8,
            b: px as u8,
        }
    }

    /// Pack as 0xAARRGGBB.
    pub const fn to_argb(self) -> u32 {
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Alpha in [0, 1].
    #[inline]
    pub fn alpha_f32(self) -> f32 {
        self.a as f32 / 255.0
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse a CSS color: `#rgb`, `#rrggbb`, `#rrggbbaa`, a color name, or
    /// `rgb()`/`hsl()` notation. Note that CSS puts alpha *last* in hex.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        // csscolorparser hands hex digits to `from_str_radix`, which also takes a sign.
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(Error::InvalidConfig(format!("color {s:?}: not a hex color")));
            }
        }
        let parsed: csscolorparser::Color = s
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("color {s:?}: {e}")))?;
        let [r, g, b, a] = parsed.to_rgba8();
        Ok(Self::argb(a, r, g, b))
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }

    /// Demultiply a tiny-skia pixel.
    pub fn from_premultiplied(px: tiny_skia::PremultipliedColorU8) -> Self {
        let c = px.demultiply();
        Self::argb(c.alpha(), c.red(), c.green(), c.blue())
    }
}

/// Size of the area the host is drawing this frame. Supplied fresh every frame.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when there is no area to draw into (also true for NaN sizes).
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// The viewport as a rect anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_ltrb(0.0, 0.0, self.width.max(0.0), self.height.max(0.0))
    }
}

/// Axis-aligned rectangle in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_ltrb(x, y, x + width, y + height)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Closed-interval test on x; used by the analytic mask.
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.left && x <= self.right
    }

    /// Pixel columns whose centers fall in [left, right), clipped to 0..limit.
    pub fn columns(&self, limit: usize) -> Range<usize> {
        pixel_span(self.left, self.right, limit)
    }

    /// Pixel rows whose centers fall in [top, bottom), clipped to 0..limit.
    pub fn rows(&self, limit: usize) -> Range<usize> {
        pixel_span(self.top, self.bottom, limit)
    }
}

fn pixel_span(lo: f32, hi: f32, limit: usize) -> Range<usize> {
    // `as` saturates (NaN -> 0), so any float lands in a sane range.
    let start = ((lo - 0.5).ceil() as i64).clamp(0, limit as i64) as usize;
    let end = ((hi - 0.5).ceil() as i64).clamp(0, limit as i64) as usize;
    start..end.max(start)
}
