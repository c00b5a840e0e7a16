//! Fading edges for horizontally scrolling content.
//!
//! The content is drawn into an offscreen layer, the layer's alpha is erased
//! at the left and right edges with destination-in gradients, and the layer
//! is flattened onto the visible surface. See [`fade::FadeMaskRenderer`].

pub mod canvas;
pub mod config;
pub mod draw;
pub mod error;
pub mod fade;
pub mod gradient;
pub mod strip;
pub mod types;

pub use canvas::{BlendMode, SoftwareCanvas, Surface};
pub use config::{DemoArgs, DemoConfig, FadeConfig};
pub use error::{Error, Result};
pub use fade::{FadeMaskRenderer, LayerHandle};
pub use gradient::{EdgeMask, GradientMask, LinearGradient};
pub use types::{Color, Rect, Viewport};
