//! Safe entry points producing finished WTX files.
//!
//! Each function renders (or decodes) a canvas and encodes it with the
//! matching preset: spec textures as DXT1 with the `0x05` flag, panels as
//! DXT5 with the `0x01` flag, both with a full mip chain. The `*_with_style`
//! variants take explicit styles; the plain ones use the defaults.

use tracing::info;

use crate::canvas::RasterCanvas;
use crate::config::{EncodeOptions, PanelStyle, SpecStyle};
use crate::error::WtxResult;
use crate::ingest::decode_image;
use crate::instructions::parse_instructions;
use crate::line::{render_instruction_path, render_lines, LineSpecRequest};
use crate::panel::{
    apply_panel_alpha, render_panel_with_save, ColorPanelBackground, PanelSave, PuzzleGrid, WtxColor,
};
use crate::wtx::encode_wtx;

/// Line-pattern spec texture with the default style.
pub fn generate_line_spec(request: &LineSpecRequest) -> WtxResult<Vec<u8>> {
    generate_line_spec_with_style(request, &SpecStyle::default())
}

pub fn generate_line_spec_with_style(request: &LineSpecRequest, style: &SpecStyle) -> WtxResult<Vec<u8>> {
    let canvas = render_lines(request, style)?;
    finish("line spec", &canvas, &EncodeOptions::spec_preset())
}

/// Spec texture drawn from an instruction string.
pub fn generate_instruction_spec(instructions: &str) -> WtxResult<Vec<u8>> {
    generate_instruction_spec_with_style(instructions, &SpecStyle::default())
}

pub fn generate_instruction_spec_with_style(instructions: &str, style: &SpecStyle) -> WtxResult<Vec<u8>> {
    let path = parse_instructions(instructions)?;
    let canvas = render_instruction_path(&path, style)?;
    finish("instruction spec", &canvas, &EncodeOptions::spec_preset())
}

/// Panel for a 3×3 board given as row-major stones.
pub fn generate_panel_from_3x3(stones: &[WtxColor; 9], background: ColorPanelBackground) -> WtxResult<Vec<u8>> {
    generate_panel_from_grid(&PuzzleGrid::from_3x3(stones), background, None)
}

/// Panel for an arbitrary wall/cell grid, optionally saving a PNG preview.
pub fn generate_panel_from_grid(
    grid: &PuzzleGrid,
    background: ColorPanelBackground,
    save: Option<&PanelSave>,
) -> WtxResult<Vec<u8>> {
    generate_panel_with_style(grid, background, &PanelStyle::default(), save)
}

pub fn generate_panel_with_style(
    grid: &PuzzleGrid,
    background: ColorPanelBackground,
    style: &PanelStyle,
    save: Option<&PanelSave>,
) -> WtxResult<Vec<u8>> {
    let canvas = render_panel_with_save(grid, background, style, save)?;
    finish("color panel", &canvas, &EncodeOptions::panel_preset())
}

/// Encode a spec canvas that was rendered separately, with the spec preset.
pub fn encode_spec_canvas(canvas: &RasterCanvas) -> WtxResult<Vec<u8>> {
    finish("spec", canvas, &EncodeOptions::spec_preset())
}

/// Encode an opaque canvas from [`crate::panel::paint_panel`], applying the
/// style's alpha rule first.
pub fn encode_panel_canvas(mut canvas: RasterCanvas, style: &PanelStyle) -> WtxResult<Vec<u8>> {
    apply_panel_alpha(&mut canvas, style);
    finish("color panel", &canvas, &EncodeOptions::panel_preset())
}

/// Convert an image file held in memory (PNG, JPEG, BMP, TGA) to WTX.
pub fn image_to_wtx(bytes: &[u8], trust_source: bool, options: &EncodeOptions) -> WtxResult<Vec<u8>> {
    let canvas = decode_image(bytes, trust_source)?;
    finish("image", &canvas, options)
}

fn finish(kind: &str, canvas: &RasterCanvas, options: &EncodeOptions) -> WtxResult<Vec<u8>> {
    let bytes = encode_wtx(canvas, options)?;
    info!(
        kind,
        width = canvas.width,
        height = canvas.height,
        format = %options.format,
        mipmaps = options.gen_mipmaps,
        bytes = bytes.len(),
        "generated wtx texture"
    );
    Ok(bytes)
}
