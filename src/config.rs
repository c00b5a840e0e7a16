use crate::error::{Error, Result};
use crate::types::Color;
use clap::Parser;

/// Largest fade fraction per edge. Above this the two edge masks would overlap.
pub const MAX_FADE_FRACTION: f32 = 0.5;

/// How the horizontal edges fade. Fixed for the lifetime of a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeConfig {
    fade_fraction: f32,
    edge_color: Color,
    center_color: Color,
}

impl FadeConfig {
    /// Rejects a fraction outside [0, 0.5] (or NaN/inf).
    pub fn new(fade_fraction: f32, edge_color: Color, center_color: Color) -> Result<Self> {
        if !fade_fraction.is_finite() || !(0.0..=MAX_FADE_FRACTION).contains(&fade_fraction) {
            return Err(Error::InvalidConfig(format!(
                "fade fraction {fade_fraction} outside [0, {MAX_FADE_FRACTION}]"
            )));
        }
        Ok(Self { fade_fraction, edge_color, center_color })
    }

    /// Same colors, different fraction.
    pub fn with_fade_fraction(self, fade_fraction: f32) -> Result<Self> {
        Self::new(fade_fraction, self.edge_color, self.center_color)
    }

    pub fn fade_fraction(&self) -> f32 {
        self.fade_fraction
    }

    pub fn edge_color(&self) -> Color {
        self.edge_color
    }

    pub fn center_color(&self) -> Color {
        self.center_color
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            fade_fraction: 0.35,
            edge_color: Color::TRANSPARENT,
            center_color: Color::argb(0xE6, 0x00, 0x00, 0x00),
        }
    }
}

/// Settings for the interactive demo window.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub width: usize,
    pub height: usize,
    pub background: Color,
    pub item_width: f32,
    pub labels: Vec<String>,
    pub snap_millis: u64,   // time to settle on the nearest item
    pub min_item_scale: f32, // scale of items one slot away from center
    pub fade: FadeConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 120,
            background: Color::rgb(0x20, 0x24, 0x2C),
            item_width: 128.0,
            labels: ["TIMELAPSE", "HDR PHOTO", "PHOTO", "VIDEO", "BULLET TIME", "NIGHT SHOT", "PANO"]
                .into_iter()
                .map(String::from)
                .collect(),
            snap_millis: 180,
            min_item_scale: 0.8,
            fade: FadeConfig::default(),
        }
    }
}

/// Command line for the demo window.
#[derive(Debug, Clone, Parser)]
#[command(name = "fading-strip", about = "Scrolling mode strip with faded edges")]
pub struct DemoArgs {
    /// Window width in pixels
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 120, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Fraction of the width faded at each edge, in [0, 0.5]
    #[arg(long, default_value_t = 0.35)]
    pub fade: f32,

    /// Background: CSS hex (#rrggbb), a color name, or rgb()
    #[arg(long, value_parser = Color::parse, default_value = "#20242c")]
    pub background: Color,
}

impl TryFrom<DemoArgs> for DemoConfig {
    type Error = Error;

    /// Apply the arguments on top of the defaults. The fade fraction goes
    /// through the same validation as any other [`FadeConfig`].
    fn try_from(args: DemoArgs) -> Result<Self> {
        let defaults = DemoConfig::default();
        Ok(Self {
            width: args.width as usize,
            height: args.height as usize,
            background: args.background,
            fade: defaults.fade.with_fade_fraction(args.fade)?,
            ..defaults
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_capture_screen() {
        let cfg = FadeConfig::default();
        assert_eq!(cfg.fade_fraction(), 0.35);
        assert_eq!(cfg.edge_color().a, 0);
        assert_eq!(cfg.center_color().to_argb(), 0xE600_0000);
    }

    #[test]
    fn fraction_bounds() {
        assert!(FadeConfig::new(0.0, Color::TRANSPARENT, Color::BLACK).is_ok());
        assert!(FadeConfig::new(0.5, Color::TRANSPARENT, Color::BLACK).is_ok());
        assert!(matches!(
            FadeConfig::new(0.51, Color::TRANSPARENT, Color::BLACK),
            Err(Error::InvalidConfig(_))
        ));
        assert!(FadeConfig::new(-0.1, Color::TRANSPARENT, Color::BLACK).is_err());
        assert!(FadeConfig::new(f32::NAN, Color::TRANSPARENT, Color::BLACK).is_err());
    }

    fn demo(args: &[&str]) -> Result<DemoConfig> {
        let parsed = DemoArgs::try_parse_from(std::iter::once("fading-strip").chain(args.iter().copied()))
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        DemoConfig::try_from(parsed)
    }

    #[test]
    fn no_args_gives_the_defaults() {
        let cfg = demo(&[]).unwrap();
        let defaults = DemoConfig::default();
        assert_eq!((cfg.width, cfg.height), (defaults.width, defaults.height));
        assert_eq!(cfg.background, defaults.background);
        assert_eq!(cfg.fade, defaults.fade);
    }

    #[test]
    fn demo_args() {
        let cfg = demo(&["--width=800", "--fade", "0.2", "--background", "steelblue"]).unwrap();
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, DemoConfig::default().height);
        assert_eq!(cfg.fade.fade_fraction(), 0.2);
        assert_eq!(cfg.fade.center_color(), FadeConfig::default().center_color());
        assert_eq!(cfg.background, Color::rgb(0x46, 0x82, 0xB4));
    }

    #[test]
    fn bad_demo_args_are_rejected() {
        assert!(matches!(demo(&["--fade=0.7"]), Err(Error::InvalidConfig(_))));
        assert!(demo(&["--fade=NaN"]).is_err());
        assert!(demo(&["--width"]).is_err());
        assert!(demo(&["--depth=3"]).is_err());
        assert!(demo(&["--height=0"]).is_err());
        assert!(demo(&["--width=abc"]).is_err());
        assert!(demo(&["--background=#+FFFFF"]).is_err());
    }
}
