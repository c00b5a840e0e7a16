//! Software drawing surface with an offscreen layer stack.
//!
//! [`Surface`] is the small set of primitives the fade renderer needs from a
//! host: open a layer, fill a rect with a gradient, set/clear a blend mode and
//! flatten layers back down. [`SoftwareCanvas`] implements it on tiny-skia
//! [`Pixmap`]s; the window and the PNG writer convert out of them.
//!
//! Pixel model: premultiplied RGBA inside the pixmaps, straight [`Color`] at
//! the API. A pixel column `x` is covered by a rect when its center `x + 0.5`
//! lies in `[left, right)`, and gradients are sampled at pixel centers.

use crate::error::{Error, Result};
use crate::gradient::LinearGradient;
use crate::types::{Color, Rect};
use log::{trace, warn};
use std::ops::Range;
use tiny_skia::{GradientStop, Paint, Pixmap, PixmapPaint, Point, SpreadMode, Transform};

/// How a new draw combines with what is already in the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Normal painting: source drawn over destination.
    #[default]
    SourceOver,
    /// Keep destination, alpha multiplied by source alpha. Color untouched.
    DestinationIn,
}

impl BlendMode {
    fn to_skia(self) -> tiny_skia::BlendMode {
        match self {
            BlendMode::SourceOver => tiny_skia::BlendMode::SourceOver,
            BlendMode::DestinationIn => tiny_skia::BlendMode::DestinationIn,
        }
    }
}

/// The host primitives the fade renderer depends on, and nothing else.
pub trait Surface {
    /// Redirect drawing into a fresh transparent layer clipped to `bounds`.
    /// Returns the save count *before* the push, for [`Surface::restore_to_count`].
    fn save_layer(&mut self, bounds: Rect) -> usize;

    /// Flatten layers (source-over) until the save count equals `count`.
    fn restore_to_count(&mut self, count: usize);

    /// Blend mode for subsequent draws in the current layer.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Back to [`BlendMode::SourceOver`].
    fn clear_blend_mode(&mut self);

    /// Fill `rect` with `gradient` using the current blend mode.
    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &LinearGradient);
}

struct LayerRecord {
    parent: Pixmap,
    parent_origin: (usize, usize),
    parent_blend: BlendMode,
    // The layer pushed on top of `parent` covers no pixels; drop it on restore.
    empty: bool,
}

/// CPU canvas: one base pixmap plus a stack of offscreen layers.
///
/// All coordinates are in base-surface pixels; a layer only stores the pixels
/// inside its bounds and is drawn back at its origin.
pub struct SoftwareCanvas {
    target: Pixmap,         // where draws land right now (base or top layer)
    origin: (usize, usize), // top-left of `target` in base coordinates
    blend_mode: BlendMode,
    layers: Vec<LayerRecord>,
}

impl SoftwareCanvas {
    /// Base surface filled with `background`. Fails for a zero-sized surface.
    pub fn new(width: usize, height: usize, background: Color) -> Result<Self> {
        let mut target = Pixmap::new(width as u32, height as u32).ok_or(Error::DegenerateGeometry {
            width: width as f32,
            height: height as f32,
        })?;
        target.fill(background.to_skia());
        Ok(Self {
            target,
            origin: (0, 0),
            blend_mode: BlendMode::SourceOver,
            layers: Vec::new(),
        })
    }

    /// 1 with no layers open, +1 per open layer.
    pub fn save_count(&self) -> usize {
        self.layers.len() + 1
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    /// The visible surface (bottom of the stack).
    pub fn surface(&self) -> &Pixmap {
        match self.layers.first() {
            Some(bottom) => &bottom.parent,
            None => &self.target,
        }
    }

    pub fn width(&self) -> usize {
        self.surface().width() as usize
    }

    pub fn height(&self) -> usize {
        self.surface().height() as usize
    }

    /// Straight-alpha color of a visible pixel.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        self.surface().pixel(x, y).map(Color::from_premultiplied)
    }

    /// Size of whatever draws currently land in, and its origin in base
    /// coordinates. An empty layer reports zero size.
    pub fn target_bounds(&self) -> ((usize, usize), (usize, usize)) {
        if self.layers.last().is_some_and(|top| top.empty) {
            return ((0, 0), self.origin);
        }
        let size = (self.target.width() as usize, self.target.height() as usize);
        (size, self.origin)
    }

    /// Overwrite the current target with `color` (no blending).
    pub fn clear(&mut self, color: Color) {
        self.target.fill(color.to_skia());
    }

    /// Solid fill using the current blend mode.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint.blend_mode = self.blend_mode.to_skia();
        self.fill_snapped(rect, &paint);
    }

    /// Source-over a single pixel; silently ignores out-of-bounds positions.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 {
            return;
        }
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        self.fill_snapped(Rect::from_xywh(x as f32, y as f32, 1.0, 1.0), &paint);
    }

    /// Rect -> covered columns/rows in base coordinates, clipped to the target.
    fn clip(&self, rect: Rect) -> (Range<usize>, Range<usize>) {
        let ((w, h), (ox, oy)) = self.target_bounds();
        let cols = rect.columns(ox + w);
        let rows = rect.rows(oy + h);
        let cols = cols.start.max(ox)..cols.end.max(ox);
        let rows = rows.start.max(oy)..rows.end.max(oy);
        (cols, rows)
    }

    /// Fill the pixels whose centers fall in `rect`. The rect is snapped to
    /// whole pixels first so tiny-skia sees full coverage or none.
    fn fill_snapped(&mut self, rect: Rect, paint: &Paint) {
        let (cols, rows) = self.clip(rect);
        if cols.is_empty() || rows.is_empty() {
            return;
        }
        let (ox, oy) = self.origin;
        let Some(snapped) = tiny_skia::Rect::from_ltrb(
            (cols.start - ox) as f32,
            (rows.start - oy) as f32,
            (cols.end - ox) as f32,
            (rows.end - oy) as f32,
        ) else {
            return;
        };
        self.target.fill_rect(snapped, paint, Transform::identity(), None);
    }

    fn pop_layer(&mut self) {
        let Some(record) = self.layers.pop() else {
            return;
        };
        let layer = std::mem::replace(&mut self.target, record.parent);
        let layer_origin = std::mem::replace(&mut self.origin, record.parent_origin);
        self.blend_mode = record.parent_blend;
        if record.empty {
            trace!("drop empty layer (save count now {})", self.save_count());
            return;
        }
        trace!(
            "flatten layer {}x{} at {:?} (save count now {})",
            layer.width(),
            layer.height(),
            layer_origin,
            self.save_count()
        );
        self.composite_layer(&layer, layer_origin);
    }

    /// Source-over of a whole layer; the current blend mode is ignored.
    fn composite_layer(&mut self, layer: &Pixmap, layer_origin: (usize, usize)) {
        let x = layer_origin.0 as i32 - self.origin.0 as i32;
        let y = layer_origin.1 as i32 - self.origin.1 as i32;
        self.target
            .draw_pixmap(x, y, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }
}

impl Surface for SoftwareCanvas {
    fn save_layer(&mut self, bounds: Rect) -> usize {
        let before = self.save_count();
        let (cols, rows) = self.clip(bounds);
        let empty = cols.is_empty() || rows.is_empty();
        // tiny-skia has no zero-sized pixmaps; an empty layer gets one pixel
        // that is never composited.
        let Some(layer) = Pixmap::new((cols.len() as u32).max(1), (rows.len() as u32).max(1)) else {
            warn!("save_layer: cannot allocate a {}x{} layer", cols.len(), rows.len());
            return before;
        };
        let record = LayerRecord {
            parent: std::mem::replace(&mut self.target, layer),
            parent_origin: std::mem::replace(&mut self.origin, (cols.start, rows.start)),
            parent_blend: self.blend_mode,
            empty,
        };
        self.layers.push(record);
        // Drawing inside a new layer starts from normal painting.
        self.blend_mode = BlendMode::SourceOver;
        trace!(
            "save_layer {}x{} at {:?} (save count {})",
            cols.len(),
            rows.len(),
            self.origin,
            self.save_count()
        );
        before
    }

    fn restore_to_count(&mut self, count: usize) {
        let count = count.max(1);
        while self.save_count() > count {
            self.pop_layer();
        }
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    fn clear_blend_mode(&mut self) {
        self.blend_mode = BlendMode::SourceOver;
    }

    fn fill_rect_gradient(&mut self, rect: Rect, gradient: &LinearGradient) {
        // Gradient endpoints live in base coordinates; the pixmap starts at the origin.
        let ox = self.origin.0 as f32;
        let stops = vec![
            GradientStop::new(0.0, gradient.start.to_skia()),
            GradientStop::new(1.0, gradient.end.to_skia()),
        ];
        let Some(shader) = tiny_skia::LinearGradient::new(
            Point::from_xy(gradient.start_x - ox, 0.0),
            Point::from_xy(gradient.end_x - ox, 0.0),
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            trace!("skip gradient fill {}..{}: no shader", gradient.start_x, gradient.end_x);
            return;
        };
        let mut paint = Paint::default();
        paint.shader = shader;
        paint.blend_mode = self.blend_mode.to_skia();
        self.fill_snapped(rect, &paint);
    }
}
