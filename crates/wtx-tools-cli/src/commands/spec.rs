//! Spec command implementation
//!
//! Draws a solution path from an instruction string into a gloss-map
//! texture and writes it as WTX.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use wtx_tools::generate::encode_spec_canvas;
use wtx_tools::line::render_instruction_path;
use wtx_tools::png::{self, PngConfig};
use wtx_tools::{parse_instructions, SpecStyle};

/// Run the spec command
///
/// # Arguments
/// * `instructions` - Whitespace-separated anchor names
/// * `output` - Output WTX path
/// * `png_path` - Optional PNG preview of the rendered canvas
/// * `style` - Rendering style
pub fn run(instructions: &str, output: &str, png_path: Option<&str>, style: &SpecStyle) -> Result<ExitCode> {
    println!("{} {}", "Spec:".cyan().bold(), instructions);

    let path = parse_instructions(instructions).context("Failed to parse instructions")?;
    let canvas = render_instruction_path(&path, style).context("Failed to render spec texture")?;

    let wtx = encode_spec_canvas(&canvas).context("Failed to encode spec texture")?;
    fs::write(output, &wtx).with_context(|| format!("Failed to write: {}", output))?;
    println!("  {} {} ({} bytes)", "wrote".dimmed(), output, wtx.len());

    if let Some(png_path) = png_path {
        png::write_rgba(&canvas, Path::new(png_path), &PngConfig::default())
            .with_context(|| format!("Failed to write preview: {}", png_path))?;
        println!("  {} {}", "wrote".dimmed(), png_path);
    }

    println!("{}", "SUCCESS".green().bold());
    Ok(ExitCode::SUCCESS)
}
