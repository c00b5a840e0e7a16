// A horizontally scrolling list of capture-mode labels.
// This is the "content" the fade renderer wraps: it draws straight into
// whatever layer is current and has no idea its edges get faded afterwards.
//
// Behaviour: one item is selected and sits in the middle; scrolling moves the
// selection and the strip glides there over a fixed transition time. Items
// shrink toward `min_scale` as they move one slot away from the center.

use crate::canvas::SoftwareCanvas;
use crate::draw::{draw_text_5x7, text_width_5x7};
use crate::error::Result;
use crate::types::{Color, Rect, Viewport};
use log::debug;
use std::time::Duration;

/// Tile colors, cycled by item index.
const PALETTE: [Color; 4] = [
    Color::rgb(0x3D, 0x7E, 0xFF),
    Color::rgb(0xFF, 0x8A, 0x3D),
    Color::rgb(0x2E, 0xC4, 0x8E),
    Color::rgb(0xC9, 0x4D, 0xFF),
];

pub struct ModeStrip {
    labels: Vec<String>,
    item_width: f32,
    min_scale: f32,
    transition: Duration,
    position: f32,   // fractional item index currently centered
    selected: usize,
    from: f32,       // where the running transition started
    elapsed: Duration,
}

impl ModeStrip {
    pub fn new(labels: Vec<String>, item_width: f32, min_scale: f32, transition: Duration) -> Self {
        Self {
            labels,
            item_width,
            min_scale: min_scale.clamp(0.0, 1.0),
            transition,
            position: 0.0,
            selected: 0,
            from: 0.0,
            elapsed: transition,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.labels.get(self.selected).map(String::as_str)
    }

    /// Fractional index of the item at the center right now.
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn is_settled(&self) -> bool {
        self.elapsed >= self.transition
    }

    /// Move the selection by `delta` items (clamped to the list).
    pub fn scroll_by(&mut self, delta: i32) {
        let target = (self.selected as i64 + delta as i64).clamp(0, self.len().saturating_sub(1) as i64);
        self.scroll_to(target as usize);
    }

    /// Start gliding toward `index`.
    pub fn scroll_to(&mut self, index: usize) {
        let index = index.min(self.len().saturating_sub(1));
        if index == self.selected && self.is_settled() {
            return;
        }
        debug!("strip: select {index} ({:?})", self.labels.get(index));
        self.selected = index;
        self.from = self.position;
        self.elapsed = Duration::ZERO;
        if self.transition.is_zero() {
            self.position = index as f32;
        }
    }

    /// Advance the transition by `dt`.
    pub fn update(&mut self, dt: Duration) {
        if self.is_settled() {
            self.position = self.selected as f32;
            return;
        }
        self.elapsed = (self.elapsed + dt).min(self.transition);
        let t = self.elapsed.as_secs_f32() / self.transition.as_secs_f32();
        let eased = 1.0 - (1.0 - t) * (1.0 - t); // ease-out
        self.position = self.from + (self.selected as f32 - self.from) * eased;
    }

    /// 1.0 at the center, `min_scale` one slot (or more) away.
    pub fn item_scale(&self, index: usize) -> f32 {
        let d = (index as f32 - self.position).abs().min(1.0);
        1.0 - (1.0 - self.min_scale) * d
    }

    /// Where item `index` is drawn this frame.
    pub fn item_rect(&self, index: usize, viewport: Viewport) -> Rect {
        let scale = self.item_scale(index);
        let cx = viewport.width * 0.5 + (index as f32 - self.position) * self.item_width;
        let cy = viewport.height * 0.5;
        let w = self.item_width * 0.9 * scale;
        let h = viewport.height * 0.6 * scale;
        Rect::from_ltrb(cx - w * 0.5, cy - h * 0.5, cx + w * 0.5, cy + h * 0.5)
    }

    /// Draw every item that intersects the viewport into the current target.
    pub fn draw(&self, canvas: &mut SoftwareCanvas, viewport: Viewport) -> Result<()> {
        for (i, label) in self.labels.iter().enumerate() {
            let rect = self.item_rect(i, viewport);
            if rect.right < 0.0 || rect.left > viewport.width {
                continue;
            }
            canvas.fill_rect(rect, PALETTE[i % PALETTE.len()]);

            // Bigger type for the item in the middle.
            let text_scale = if self.item_scale(i) > 0.95 { 2 } else { 1 };
            let tw = text_width_5x7(label, text_scale);
            let tx = ((rect.left + rect.right) * 0.5) as i32 - tw / 2;
            let ty = ((rect.top + rect.bottom) * 0.5) as i32 - (7 * text_scale) / 2;
            draw_text_5x7(canvas, tx, ty, label, Color::WHITE, text_scale);
        }
        Ok(())
    }
}
