//! Horizontal linear gradients and the per-frame edge masks built from them.
//!
//! A [`GradientMask`] is derived from the current [`Viewport`] and a
//! [`FadeConfig`] every frame. It is never cached: a resize simply produces a
//! different mask on the next call.

use crate::config::FadeConfig;
use crate::error::{Error, Result};
use crate::types::{Color, Rect, Viewport};

/// Two-stop gradient along x, clamped beyond its stops.
///
/// The canvas rasterises it with tiny-skia; `alpha_at` is the analytic
/// value the mask is checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    pub start_x: f32,
    pub end_x: f32,
    pub start: Color,
    pub end: Color,
}

impl LinearGradient {
    pub fn horizontal(start_x: f32, end_x: f32, start: Color, end: Color) -> Self {
        Self { start_x, end_x, start, end }
    }

    /// Position of `x` between the stops, in [0, 1].
    pub fn t_at(&self, x: f32) -> f32 {
        let span = self.end_x - self.start_x;
        if span == 0.0 || !span.is_finite() {
            // Zero-length gradient: hard step at the stop.
            return if x < self.start_x { 0.0 } else { 1.0 };
        }
        ((x - self.start_x) / span).clamp(0.0, 1.0)
    }

    /// Interpolated alpha in [0, 1], unquantized.
    pub fn alpha_at(&self, x: f32) -> f32 {
        let t = self.t_at(x);
        lerp(self.start.alpha_f32(), self.end.alpha_f32(), t)
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// One edge: the rectangle to fill and the gradient to fill it with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMask {
    pub rect: Rect,
    pub gradient: LinearGradient,
}

/// Left and right edge masks for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientMask {
    pub left: EdgeMask,
    pub right: EdgeMask,
}

impl GradientMask {
    /// Build both masks for `viewport`.
    ///
    /// Left: edge -> center over `[0, f*W]`. Right: center -> edge over
    /// `[(1-f)*W, W]`. Both span the full height.
    ///
    /// # Errors
    ///
    /// `DegenerateGeometry` when width or height is not positive.
    pub fn for_viewport(viewport: Viewport, config: &FadeConfig) -> Result<Self> {
        if viewport.is_degenerate() {
            return Err(Error::DegenerateGeometry {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let w = viewport.width;
        let h = viewport.height;
        let f = config.fade_fraction();
        let edge = config.edge_color();
        let center = config.center_color();

        let left_end = w * f;
        let right_start = w * (1.0 - f);

        Ok(Self {
            left: EdgeMask {
                rect: Rect::from_ltrb(0.0, 0.0, left_end, h),
                gradient: LinearGradient::horizontal(0.0, left_end, edge, center),
            },
            right: EdgeMask {
                rect: Rect::from_ltrb(right_start, 0.0, w, h),
                gradient: LinearGradient::horizontal(right_start, w, center, edge),
            },
        })
    }

    /// The factor destination alpha gets multiplied by at column `x`.
    /// 1.0 wherever neither mask is drawn.
    pub fn multiplier_at(&self, x: f32) -> f32 {
        if self.left.rect.width() > 0.0 && self.left.rect.contains_x(x) {
            self.left.gradient.alpha_at(x)
        } else if self.right.rect.width() > 0.0 && self.right.rect.contains_x(x) {
            self.right.gradient.alpha_at(x)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn gradient_clamps_outside_stops() {
        let g = LinearGradient::horizontal(10.0, 20.0, Color::TRANSPARENT, Color::BLACK);
        assert_eq!(g.alpha_at(-100.0), 0.0);
        assert_eq!(g.alpha_at(100.0), 1.0);
        assert!(close(g.alpha_at(15.0), 0.5));
    }

    #[test]
    fn zero_length_gradient_is_a_step() {
        let g = LinearGradient::horizontal(5.0, 5.0, Color::TRANSPARENT, Color::BLACK);
        assert_eq!(g.alpha_at(4.9), 0.0);
        assert_eq!(g.alpha_at(5.0), 1.0);
    }

    #[test]
    fn mask_geometry() {
        let mask = GradientMask::for_viewport(Viewport::new(1000.0, 200.0), &FadeConfig::default()).unwrap();
        assert_eq!(mask.left.rect.left, 0.0);
        assert!(close(mask.left.rect.right, 350.0));
        assert!(close(mask.right.rect.left, 650.0));
        assert_eq!(mask.right.rect.right, 1000.0);
        assert_eq!(mask.right.rect.bottom, 200.0);
    }

    #[test]
    fn degenerate_viewport_has_no_mask() {
        let cfg = FadeConfig::default();
        assert!(matches!(
            GradientMask::for_viewport(Viewport::new(0.0, 10.0), &cfg),
            Err(Error::DegenerateGeometry { .. })
        ));
        assert!(GradientMask::for_viewport(Viewport::new(10.0, 0.0), &cfg).is_err());
    }

    #[test]
    fn zero_fraction_leaves_everything() {
        let cfg = FadeConfig::default().with_fade_fraction(0.0).unwrap();
        let mask = GradientMask::for_viewport(Viewport::new(100.0, 10.0), &cfg).unwrap();
        for x in [0.0, 50.0, 100.0] {
            assert_eq!(mask.multiplier_at(x), 1.0);
        }
    }

    #[test]
    fn resize_changes_mask() {
        let cfg = FadeConfig::default();
        let a = GradientMask::for_viewport(Viewport::new(1000.0, 100.0), &cfg).unwrap();
        let b = GradientMask::for_viewport(Viewport::new(400.0, 100.0), &cfg).unwrap();
        assert_ne!(a, b);
        let half = 0.5 * cfg.center_color().alpha_f32();
        assert!((b.multiplier_at(70.0) - half).abs() < 1e-3);
        assert_eq!(b.multiplier_at(400.0), 0.0);
    }
}
