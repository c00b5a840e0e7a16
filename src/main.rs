// What you SEE:
// • A row of capture modes; the selected one sits in the middle, full size.
// • Both ends of the row fade into the background instead of being cut off.
// • Left/Right arrows (or the mouse wheel) move the selection; it glides there.
// • F toggles the fade (compare with hard edges). S saves a PNG snapshot.
// • Resize the window: the fade follows the new width. ESC quits.
// Optional args: --width N --height N --fade F (F in [0, 0.5]) --background COLOR.

use fading_strip::canvas::SoftwareCanvas;
use clap::Parser;
use fading_strip::config::{DemoArgs, DemoConfig};
use fading_strip::draw::{self, Drawer};
use fading_strip::error::Error;
use fading_strip::fade::FadeMaskRenderer;
use fading_strip::strip::ModeStrip;
use fading_strip::types::{Color, Viewport};
use log::{debug, error, info};
use std::time::{Duration, Instant};

const SNAPSHOT_PATH: &str = "fading-strip.png";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let cfg = DemoConfig::try_from(DemoArgs::parse())?;
    info!(
        "{}x{} window, fade {:.2} per edge",
        cfg.width,
        cfg.height,
        cfg.fade.fade_fraction()
    );

    let mut drawer = Drawer::new("Fading Strip", cfg.width, cfg.height)?;
    let mut canvas = SoftwareCanvas::new(cfg.width, cfg.height, cfg.background)?;
    let mut renderer = FadeMaskRenderer::new(cfg.fade);
    let mut strip = ModeStrip::new(
        cfg.labels.clone(),
        cfg.item_width,
        cfg.min_item_scale,
        Duration::from_millis(cfg.snap_millis),
    );
    strip.scroll_to(strip.len() / 2);

    let mut fade_on = true;
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = now - last_frame_time;
        last_frame_time = now;

        /* 1) Inputs */
        if drawer.left_pressed() { strip.scroll_by(-1); }
        if drawer.right_pressed() { strip.scroll_by(1); }
        let wheel = drawer.scroll_wheel();
        if wheel != 0.0 { strip.scroll_by(if wheel > 0.0 { -1 } else { 1 }); }
        if drawer.f_pressed_once() {
            fade_on = !fade_on;
            info!("edge fade {}", if fade_on { "on" } else { "off" });
        }
        strip.update(dt);

        /* 2) Follow the window size; the renderer gets the new viewport every frame. */
        let (w, h) = drawer.size();
        if w > 0 && h > 0 && (w, h) != (canvas.width(), canvas.height()) {
            debug!("resize to {w}x{h}");
            canvas = SoftwareCanvas::new(w, h, cfg.background)?;
        }
        let viewport = Viewport::new(w as f32, h as f32);

        /* 3) Background, then the strip (faded or not). */
        canvas.clear(cfg.background);
        if fade_on {
            renderer.frame(&mut canvas, viewport, |c| strip.draw(c, viewport))?;
        } else {
            strip.draw(&mut canvas, viewport)?;
        }

        /* 4) Marker + HUD on top, never faded. */
        let cx = (viewport.width * 0.5) as i32;
        let marker_y = (viewport.height * 0.82) as i32;
        draw::draw_center_marker(&mut canvas, cx, marker_y, 5, Color::WHITE);
        let selected = strip.selected_label().unwrap_or("-");
        let hud = format!("{} | FADE {} | {}", selected, if fade_on { "ON" } else { "OFF" }, hud_fps_text);
        draw::draw_text_5x7(&mut canvas, 6, 6, &hud, Color::rgb(0xCC, 0xCC, 0xCC), 1);

        /* 5) Present, and snapshot on request. */
        drawer.present(canvas.surface())?;
        if drawer.s_pressed_once() {
            match draw::save_png(canvas.surface(), SNAPSHOT_PATH) {
                Ok(()) => info!("saved {SNAPSHOT_PATH}"),
                Err(e) => error!("{e}"),
            }
        }

        /* 6) FPS counter (log + HUD once per second) */
        frames_this_second += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            debug!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    Ok(())
}
