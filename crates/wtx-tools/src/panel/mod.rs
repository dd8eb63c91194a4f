//! Color-panel puzzle textures.
//!
//! A panel is a procedural backdrop with one rounded-square stone per colored
//! board cell. Stones of the same tint are rasterized into a shared mask and
//! composited once, so neighbouring stones never blend into each other.

pub mod backdrop;
mod grid;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::canvas::{CoverageMask, RasterCanvas};
use crate::config::PanelStyle;
use crate::error::{WtxError, WtxResult};
use crate::png::{self, PngConfig};

pub use grid::{PuzzleGrid, WtxColor};

/// Backdrop drawn under the stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorPanelBackground {
    Blueprint,
    White,
    LightGrey,
    DarkGrey,
    Elevator,
}

impl ColorPanelBackground {
    /// All backgrounds in declaration order (the C enum values).
    pub const ALL: [ColorPanelBackground; 5] = [
        ColorPanelBackground::Blueprint,
        ColorPanelBackground::White,
        ColorPanelBackground::LightGrey,
        ColorPanelBackground::DarkGrey,
        ColorPanelBackground::Elevator,
    ];

    /// Translate a C enum value.
    pub fn from_raw(raw: u32) -> WtxResult<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| WtxError::UnsupportedFormat(format!("unknown panel background {}", raw)))
    }

    /// Kebab-case name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            ColorPanelBackground::Blueprint => "blueprint",
            ColorPanelBackground::White => "white",
            ColorPanelBackground::LightGrey => "light-grey",
            ColorPanelBackground::DarkGrey => "dark-grey",
            ColorPanelBackground::Elevator => "elevator",
        }
    }
}

impl fmt::Display for ColorPanelBackground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorPanelBackground {
    type Err = WtxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|bg| bg.name() == lower)
            .ok_or_else(|| {
                WtxError::UnsupportedFormat(format!(
                    "unknown panel background '{}' (expected one of: blueprint, white, light-grey, dark-grey, elevator)",
                    s
                ))
            })
    }
}

/// Where to write the PNG preview of a generated panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSave {
    /// Panel identifier; becomes the lower-case hex part of the file name.
    pub id: i32,
    /// Directory the preview is written into.
    pub dir: PathBuf,
}

impl PanelSave {
    pub fn new(id: i32, dir: impl Into<PathBuf>) -> Self {
        Self { id, dir: dir.into() }
    }

    /// Full path of the preview file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("generated_{:x}.png", self.id))
    }
}

/// Render a panel, clearing alpha afterwards when the style asks for it.
pub fn render_panel(
    grid: &PuzzleGrid,
    background: ColorPanelBackground,
    style: &PanelStyle,
) -> WtxResult<RasterCanvas> {
    render_panel_with_save(grid, background, style, None)
}

/// Render a panel, writing the opaque preview before the alpha is cleared.
pub fn render_panel_with_save(
    grid: &PuzzleGrid,
    background: ColorPanelBackground,
    style: &PanelStyle,
    save: Option<&PanelSave>,
) -> WtxResult<RasterCanvas> {
    let mut canvas = paint_panel(grid, background, style)?;
    if let Some(save) = save {
        save_panel_preview(&canvas, save)?;
    }
    apply_panel_alpha(&mut canvas, style);
    Ok(canvas)
}

/// Clear the alpha of a painted panel when the style asks for it.
pub fn apply_panel_alpha(canvas: &mut RasterCanvas, style: &PanelStyle) {
    if style.clear_alpha {
        canvas.set_alpha(0);
    }
}

/// Draw backdrop and stones, leaving the canvas opaque.
pub fn paint_panel(
    grid: &PuzzleGrid,
    background: ColorPanelBackground,
    style: &PanelStyle,
) -> WtxResult<RasterCanvas> {
    style.validate()?;
    let size = style.canvas_size;
    let mut canvas = backdrop::paint(background, size);

    let (board_w, board_h) = grid.board_size();
    let longest = board_w.max(board_h);
    if longest == 0 {
        debug!(background = %background, "panel has no board cells");
        return Ok(canvas);
    }

    let pitch = style.board_span / longest as f64;
    let half = style.stone_size * pitch / 2.0;
    let corner = style.corner_radius * half;
    let center = size as f64 / 2.0;
    let offset_x = (board_w as f64 - 1.0) / 2.0;
    let offset_y = (board_h as f64 - 1.0) / 2.0;

    // One mask per color; BTreeMap keeps the composite order stable.
    let mut masks: BTreeMap<usize, CoverageMask> = BTreeMap::new();
    let mut stone_count = 0usize;
    for (col, row, color) in grid.stones() {
        if color.tint().is_none() {
            continue;
        }
        let slot = WtxColor::ALL.iter().position(|&c| c == color).unwrap_or(0);
        let cx = center + (col as f64 - offset_x) * pitch;
        let cy = center + (row as f64 - offset_y) * pitch;
        masks
            .entry(slot)
            .or_insert_with(|| CoverageMask::new(size, size))
            .add_rounded_square((cx, cy), half, corner);
        stone_count += 1;
    }

    for (slot, mask) in &masks {
        if let Some(tint) = WtxColor::ALL[*slot].tint() {
            canvas.composite_mask(mask, tint);
        }
    }

    debug!(
        board_w,
        board_h,
        stones = stone_count,
        pitch,
        background = %background,
        "panel painted"
    );
    Ok(canvas)
}

/// Write the panel preview PNG, returning its path.
pub fn save_panel_preview(canvas: &RasterCanvas, save: &PanelSave) -> WtxResult<PathBuf> {
    let path = save.path();
    write_preview(canvas, &path)?;
    debug!(path = %path.display(), "panel preview saved");
    Ok(path)
}

fn write_preview(canvas: &RasterCanvas, path: &Path) -> WtxResult<()> {
    png::write_rgba(canvas, path, &PngConfig::default())?;
    Ok(())
}
