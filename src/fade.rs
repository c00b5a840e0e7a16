//! Edge fading for horizontally scrolling content.
//!
//! [`FadeMaskRenderer`] knows nothing about what gets drawn. It captures the
//! host's content into an offscreen layer, erases alpha at the left and right
//! edges with a destination-in gradient, then flattens the layer back onto the
//! visible surface. Per frame the host calls, in order:
//!
//! 1. [`FadeMaskRenderer::begin_frame`]
//! 2. its own content drawing
//! 3. [`FadeMaskRenderer::apply_edge_fades`] (exactly once)
//! 4. [`FadeMaskRenderer::end_frame`]
//!
//! [`FadeMaskRenderer::frame`] runs that sequence for a closure.

use crate::canvas::{BlendMode, Surface};
use crate::config::FadeConfig;
use crate::error::{Error, Result};
use crate::gradient::GradientMask;
use crate::types::Viewport;
use log::{debug, trace, warn};

/// Describes the layer opened by [`FadeMaskRenderer::begin_frame`].
///
/// Informational only: the renderer keeps its own copy and
/// [`FadeMaskRenderer::end_frame`] restores to that, so the host never has to
/// hand it back. Stale once the frame has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerHandle {
    restore_count: usize,
    frame: u64,
}

impl LayerHandle {
    /// Sequence number of the frame this layer belongs to.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Save count the surface returns to when the frame ends.
    pub fn restore_count(&self) -> usize {
        self.restore_count
    }
}

pub struct FadeMaskRenderer {
    config: FadeConfig,
    open: Option<LayerHandle>,
    frames: u64,
}

impl FadeMaskRenderer {
    pub fn new(config: FadeConfig) -> Self {
        Self { config, open: None, frames: 0 }
    }

    pub fn config(&self) -> &FadeConfig {
        &self.config
    }

    pub fn is_frame_open(&self) -> bool {
        self.open.is_some()
    }

    /// Open a layer sized to `viewport`; later draws land in it.
    ///
    /// A degenerate viewport still opens an (empty) layer.
    pub fn begin_frame<S: Surface + ?Sized>(&mut self, surface: &mut S, viewport: Viewport) -> Result<LayerHandle> {
        if self.open.is_some() {
            warn!("begin_frame called while frame {} is still open", self.frames);
            return Err(Error::InvalidState("begin_frame: a layer is already open"));
        }
        self.frames = self.frames.wrapping_add(1);
        let handle = LayerHandle {
            restore_count: surface.save_layer(viewport.bounds()),
            frame: self.frames,
        };
        self.open = Some(handle);
        trace!("frame {}: layer opened for {}x{}", handle.frame, viewport.width, viewport.height);
        Ok(handle)
    }

    /// Multiply the layer's alpha by the edge gradients for `viewport`.
    ///
    /// Not idempotent: a second call fades the edges again. No-op when the
    /// viewport has no area.
    pub fn apply_edge_fades<S: Surface + ?Sized>(&mut self, surface: &mut S, viewport: Viewport) -> Result<()> {
        if self.open.is_none() {
            warn!("apply_edge_fades called with no open layer");
            return Err(Error::InvalidState("apply_edge_fades: no open layer"));
        }
        let mask = match GradientMask::for_viewport(viewport, &self.config) {
            Ok(mask) => mask,
            Err(Error::DegenerateGeometry { width, height }) => {
                debug!("skip edge fades for degenerate viewport {width}x{height}");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        surface.set_blend_mode(BlendMode::DestinationIn);
        for edge in [&mask.left, &mask.right] {
            surface.fill_rect_gradient(edge.rect, &edge.gradient);
        }
        surface.clear_blend_mode();
        Ok(())
    }

    /// Flatten the layer onto the visible surface and release it.
    pub fn end_frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<()> {
        let Some(handle) = self.open.take() else {
            warn!("end_frame called with no open layer");
            return Err(Error::InvalidState("end_frame: no open layer"));
        };
        surface.restore_to_count(handle.restore_count);
        trace!("frame {}: layer flattened", handle.frame);
        Ok(())
    }

    /// One whole frame: open, draw `content`, fade, flatten.
    ///
    /// The layer is flattened even when `content` fails; the content error is
    /// returned afterwards and the edge fades are skipped.
    pub fn frame<S, F>(&mut self, surface: &mut S, viewport: Viewport, content: F) -> Result<()>
    where
        S: Surface + ?Sized,
        F: FnOnce(&mut S) -> Result<()>,
    {
        self.begin_frame(surface, viewport)?;
        let drawn = content(&mut *surface).and_then(|()| self.apply_edge_fades(&mut *surface, viewport));
        let ended = self.end_frame(surface);
        drawn.and(ended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::LinearGradient;
    use crate::types::Rect;

    /// Records every primitive call instead of drawing.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        depth: usize,
    }

    impl Surface for Recorder {
        fn save_layer(&mut self, bounds: Rect) -> usize {
            self.calls.push(format!("save {}x{}", bounds.width(), bounds.height()));
            let before = self.depth + 1;
            self.depth += 1;
            before
        }
        fn restore_to_count(&mut self, count: usize) {
            self.calls.push(format!("restore {count}"));
            self.depth = count.saturating_sub(1);
        }
        fn set_blend_mode(&mut self, mode: BlendMode) {
            self.calls.push(format!("blend {mode:?}"));
        }
        fn clear_blend_mode(&mut self) {
            self.calls.push("clear blend".into());
        }
        fn fill_rect_gradient(&mut self, rect: Rect, _gradient: &LinearGradient) {
            self.calls.push(format!("fill {}..{}", rect.left, rect.right));
        }
    }

    #[test]
    fn primitive_order() {
        let mut r = FadeMaskRenderer::new(FadeConfig::default().with_fade_fraction(0.25).unwrap());
        let mut s = Recorder::default();
        let vp = Viewport::new(100.0, 20.0);
        r.begin_frame(&mut s, vp).unwrap();
        r.apply_edge_fades(&mut s, vp).unwrap();
        r.end_frame(&mut s).unwrap();
        assert_eq!(
            s.calls,
            vec![
                "save 100x20",
                "blend DestinationIn",
                "fill 0..25",
                "fill 75..100",
                "clear blend",
                "restore 1",
            ]
        );
    }

    #[test]
    fn reentrant_begin_is_rejected() {
        let mut r = FadeMaskRenderer::new(FadeConfig::default());
        let mut s = Recorder::default();
        let vp = Viewport::new(10.0, 10.0);
        let first = r.begin_frame(&mut s, vp).unwrap();
        assert!(matches!(r.begin_frame(&mut s, vp), Err(Error::InvalidState(_))));
        // The original frame is still intact and can be closed.
        assert!(r.is_frame_open());
        r.end_frame(&mut s).unwrap();
        let second = r.begin_frame(&mut s, vp).unwrap();
        assert_eq!(second.frame(), first.frame() + 1);
    }

    #[test]
    fn end_frame_restores_to_the_handed_out_count() {
        let mut r = FadeMaskRenderer::new(FadeConfig::default());
        let mut s = Recorder::default();
        let vp = Viewport::new(10.0, 10.0);
        // An outer layer the host opened itself.
        s.save_layer(vp.bounds());
        let handle = r.begin_frame(&mut s, vp).unwrap();
        assert_eq!(handle.restore_count(), 2);
        r.end_frame(&mut s).unwrap();
        assert_eq!(s.calls.last().map(String::as_str), Some("restore 2"));
        assert_eq!(s.depth, 1);
    }

    #[test]
    fn out_of_order_calls_fail() {
        let mut r = FadeMaskRenderer::new(FadeConfig::default());
        let mut s = Recorder::default();
        let vp = Viewport::new(10.0, 10.0);
        assert!(matches!(r.apply_edge_fades(&mut s, vp), Err(Error::InvalidState(_))));
        assert!(matches!(r.end_frame(&mut s), Err(Error::InvalidState(_))));
        assert!(s.calls.is_empty());
    }

    #[test]
    fn degenerate_viewport_skips_fades_only() {
        let mut r = FadeMaskRenderer::new(FadeConfig::default());
        let mut s = Recorder::default();
        let vp = Viewport::new(0.0, 10.0);
        r.begin_frame(&mut s, vp).unwrap();
        r.apply_edge_fades(&mut s, vp).unwrap();
        r.end_frame(&mut s).unwrap();
        assert_eq!(s.calls, vec!["save 0x10", "restore 1"]);
    }

    #[test]
    fn failed_content_still_releases_layer() {
        let mut r = FadeMaskRenderer::new(FadeConfig::default());
        let mut s = Recorder::default();
        let vp = Viewport::new(10.0, 10.0);
        let res = r.frame(&mut s, vp, |_| Err(Error::InvalidConfig("boom".into())));
        assert!(matches!(res, Err(Error::InvalidConfig(_))));
        assert!(!r.is_frame_open());
        assert_eq!(s.calls, vec!["save 10x10", "restore 1"]);
    }
}
