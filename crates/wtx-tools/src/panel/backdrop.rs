//! Procedural backdrops drawn beneath the panel stones.

use crate::canvas::RasterCanvas;
use crate::color::Color;
use crate::rng::DeterministicRng;

use super::ColorPanelBackground;

/// Base seed for backdrop grain; each background derives its own.
const BACKDROP_SEED: u32 = 0x5754_5821;

const BLUEPRINT_BASE: u32 = 0x1d4f91;
const BLUEPRINT_MINOR_LINE: u32 = 0x3467a8;
const BLUEPRINT_MAJOR_LINE: u32 = 0x5a8ad0;
/// Minor grid lines per canvas edge.
const BLUEPRINT_DIVISIONS: u32 = 16;

const PAPER_BASE: u32 = 0xf2efe6;
const PAPER_GRAIN: f64 = 0.02;

const LIGHT_GREYRED_TOP: u32 = 0xbdb4b2;
const LIGHT_GREYRED_BOTTOM: u32 = 0xa69c9a;
const DARK_GREYRED_TOP: u32 = 0x8a7f7d;
const DARK_GREYRED_BOTTOM: u32 = 0x6f6462;
const GREY_GRAIN: f64 = 0.01;

const ELEVATOR_BASE: u32 = 0x3b3d40;
const ELEVATOR_STREAK: f64 = 0.04;
const ELEVATOR_GRAIN: f64 = 0.012;

/// Paint an opaque square backdrop.
pub fn paint(background: ColorPanelBackground, size: u32) -> RasterCanvas {
    match background {
        ColorPanelBackground::Blueprint => blueprint(size),
        ColorPanelBackground::White => grained_gradient(
            size,
            Color::from_hex(PAPER_BASE),
            Color::from_hex(PAPER_BASE),
            PAPER_GRAIN,
            "white",
        ),
        ColorPanelBackground::LightGrey => grained_gradient(
            size,
            Color::from_hex(LIGHT_GREYRED_TOP),
            Color::from_hex(LIGHT_GREYRED_BOTTOM),
            GREY_GRAIN,
            "light-grey",
        ),
        ColorPanelBackground::DarkGrey => grained_gradient(
            size,
            Color::from_hex(DARK_GREYRED_TOP),
            Color::from_hex(DARK_GREYRED_BOTTOM),
            GREY_GRAIN,
            "dark-grey",
        ),
        ColorPanelBackground::Elevator => brushed_metal(size),
    }
}

/// Blue sheet with a lighter line grid; every fourth line is brighter.
fn blueprint(size: u32) -> RasterCanvas {
    let mut canvas = RasterCanvas::new(size, size, Color::from_hex(BLUEPRINT_BASE));
    let spacing = (size / BLUEPRINT_DIVISIONS).max(1);
    let minor = Color::from_hex(BLUEPRINT_MINOR_LINE);
    let major = Color::from_hex(BLUEPRINT_MAJOR_LINE);

    let mut line = 0u32;
    let mut pos = 0u32;
    while pos < size {
        let (color, width) = if line % 4 == 0 { (major, 2) } else { (minor, 1) };
        let p = pos as i64;
        let s = size as i64;
        canvas.fill_rect(p, 0, p + width, s, color);
        canvas.fill_rect(0, p, s, p + width, color);
        line += 1;
        pos += spacing;
    }
    canvas
}

/// Vertical gradient with per-pixel grain.
fn grained_gradient(size: u32, top: Color, bottom: Color, grain: f64, variant: &str) -> RasterCanvas {
    let mut canvas = RasterCanvas::new(size, size, top);
    let mut rng = DeterministicRng::for_variant(BACKDROP_SEED, variant);
    let denom = (size.max(2) - 1) as f64;
    for y in 0..size {
        let row = top.lerp(&bottom, y as f64 / denom);
        for x in 0..size {
            let shade = 1.0 + rng.jitter(grain);
            canvas.set(x, y, row.scale(shade).to_rgba8());
        }
    }
    canvas
}

/// Dark metal with horizontal brushing streaks.
fn brushed_metal(size: u32) -> RasterCanvas {
    let base = Color::from_hex(ELEVATOR_BASE);
    let mut canvas = RasterCanvas::new(size, size, base);
    let mut rng = DeterministicRng::for_variant(BACKDROP_SEED, "elevator");
    for y in 0..size {
        let streak = 1.0 + rng.jitter(ELEVATOR_STREAK);
        for x in 0..size {
            let shade = streak + rng.jitter(ELEVATOR_GRAIN);
            canvas.set(x, y, base.scale(shade).to_rgba8());
        }
    }
    canvas
}
