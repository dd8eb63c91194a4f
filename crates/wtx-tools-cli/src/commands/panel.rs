//! Panel command implementation
//!
//! Renders a 3x3 tricolor panel and writes it as WTX.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use wtx_tools::generate::encode_panel_canvas;
use wtx_tools::panel::paint_panel;
use wtx_tools::png::{self, PngConfig};
use wtx_tools::{ColorPanelBackground, PanelStyle, PuzzleGrid, WtxColor};

/// Run the panel command
///
/// # Arguments
/// * `grid` - Nine comma-separated colors (names or values), row by row
/// * `background` - Backdrop name
/// * `output` - Output WTX path
/// * `png_path` - Optional PNG of the opaque panel
/// * `style` - Panel layout style
pub fn run(
    grid: &str,
    background: &str,
    output: &str,
    png_path: Option<&str>,
    style: &PanelStyle,
) -> Result<ExitCode> {
    let stones = parse_stones(grid)?;
    let background: ColorPanelBackground = background
        .parse()
        .with_context(|| format!("Unknown background: {}", background))?;
    let grid = PuzzleGrid::from_3x3(&stones);

    println!("{} {} on {}", "Panel:".cyan().bold(), grid_summary(&stones), background);

    let canvas = paint_panel(&grid, background, style).context("Failed to paint color panel")?;
    if let Some(png_path) = png_path {
        png::write_rgba(&canvas, Path::new(png_path), &PngConfig::default())
            .with_context(|| format!("Failed to write preview: {}", png_path))?;
        println!("  {} {}", "wrote".dimmed(), png_path);
    }

    let wtx = encode_panel_canvas(canvas, style).context("Failed to encode color panel")?;
    fs::write(output, &wtx).with_context(|| format!("Failed to write: {}", output))?;
    println!("  {} {} ({} bytes)", "wrote".dimmed(), output, wtx.len());

    println!("{}", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}

/// Parse nine comma-separated colors, each an enum name or its raw value.
pub fn parse_stones(grid: &str) -> Result<[WtxColor; 9]> {
    let colors = grid
        .split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<WtxColor>()
                .with_context(|| format!("Invalid color: {:?}", part))
        })
        .collect::<Result<Vec<_>>>()?;
    if colors.len() != 9 {
        bail!("Expected 9 colors, got {}", colors.len());
    }

    let mut stones = [WtxColor::NoColor; 9];
    stones.copy_from_slice(&colors);
    Ok(stones)
}

fn grid_summary(stones: &[WtxColor; 9]) -> String {
    let placed = stones.iter().filter(|s| s.tint().is_some()).count();
    format!("{} stone(s)", placed)
}
