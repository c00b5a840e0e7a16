// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the composited strip.
// 2) A small selection marker under the centered item.
// 3) A tiny 5x7 bitmap font for item labels and the HUD.
// 4) PNG snapshots of whatever is on screen.

use crate::canvas::SoftwareCanvas;
use crate::error::{Error, Result};
use crate::types::Color;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::path::Path;
use tiny_skia::Pixmap;

pub struct Drawer {
    window: Window,   // the on-screen window you see
    buffer: Vec<u32>, // 0x00RRGGBB copy of the pixmap, reused every frame
}

impl Drawer {
    /// Create a resizable window of the given size.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window, buffer: Vec::new() })
    }

    /// Push the pixels for this frame to the screen.
    /// minifb ignores the top byte, so an opaque surface shows as-is.
    pub fn present(&mut self, pixmap: &Pixmap) -> Result<()> {
        self.buffer.clear();
        self.buffer
            .extend(pixmap.pixels().iter().map(|&px| Color::from_premultiplied(px).to_argb()));
        self.window
            .update_with_buffer(&self.buffer, pixmap.width() as usize, pixmap.height() as usize)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Current inner size; changes when the user resizes the window.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    // Arrow keys repeat while held so the strip keeps moving.
    pub fn left_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::Left, KeyRepeat::Yes)
    }

    pub fn right_pressed(&self) -> bool {
        self.window.is_key_pressed(Key::Right, KeyRepeat::Yes)
    }

    /// Vertical or horizontal wheel movement this frame, whichever is larger.
    pub fn scroll_wheel(&self) -> f32 {
        match self.window.get_scroll_wheel() {
            Some((dx, dy)) if dx.abs() > dy.abs() => dx,
            Some((_, dy)) => dy,
            None => 0.0,
        }
    }

    // we flip a boolean in main to compare faded vs. raw.
    pub fn f_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::F, KeyRepeat::No)
    }

    pub fn s_pressed_once(&self) -> bool {
        self.window.is_key_pressed(Key::S, KeyRepeat::No)
    }
}

/// Write `pixmap` as a straight-alpha RGBA PNG.
pub fn save_png(pixmap: &Pixmap, path: impl AsRef<Path>) -> Result<()> {
    let rgba: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|&px| {
            let c = Color::from_premultiplied(px);
            [c.r, c.g, c.b, c.a]
        })
        .collect();
    let img = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
        .ok_or_else(|| Error::Snapshot("pixel buffer does not match its size".into()))?;
    img.save(path.as_ref())
        .map_err(|e| Error::Snapshot(format!("{}: {e}", path.as_ref().display())))
}

/* ---------- Software drawing: lines, marker, tiny bitmap font ---------- */

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
fn draw_line(canvas: &mut SoftwareCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        canvas.blend_pixel(x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/// Small upward-pointing triangle with its tip at (cx, tip_y).
/// Visual: marks the selected slot in the middle of the strip.
pub fn draw_center_marker(canvas: &mut SoftwareCanvas, cx: i32, tip_y: i32, size: i32, color: Color) {
    for row in 0..size {
        draw_line(canvas, cx - row, tip_y + row, cx + row, tip_y + row, color);
    }
}

/* ---------- 5x7 bitmap font (digits, A-Z, a little punctuation) ---------- */

/// Return a 5x7 glyph bitmap. Lowercase maps to uppercase.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),

        _ => None,
    }
}

/// Draw one glyph at (x,y), each font pixel as a `scale`x`scale` block.
/// A 1-pixel (scaled) dark shadow keeps it readable on bright tiles.
fn draw_char_5x7(canvas: &mut SoftwareCanvas, x: i32, y: i32, ch: char, color: Color, scale: i32) {
    let Some(rows) = glyph5x7(ch) else { return };
    let shadow = Color::BLACK.with_alpha(0xA0);
    for (offset, c) in [(scale, shadow), (0, color)] {
        for (ry, rowbits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if (rowbits & (1 << (4 - rx))) == 0 {
                    continue;
                }
                let px = x + rx * scale + offset;
                let py = y + ry as i32 * scale + offset;
                for dy in 0..scale {
                    for dx in 0..scale {
                        canvas.blend_pixel(px + dx, py + dy, c);
                    }
                }
            }
        }
    }
}

/// Width in pixels of `text` at `scale` (5 px glyph + 1 px spacing, no trailing gap).
pub fn text_width_5x7(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 { 0 } else { (n * 6 - 1) * scale }
}

/// Draw a text string using 5x7 glyphs.
pub fn draw_text_5x7(canvas: &mut SoftwareCanvas, mut x: i32, y: i32, text: &str, color: Color, scale: i32) {
    let scale = scale.max(1);
    for ch in text.chars() {
        draw_char_5x7(canvas, x, y, ch, color, scale);
        x += 6 * scale;
    }
}
