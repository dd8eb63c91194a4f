//! Inspect command implementation
//!
//! Prints the header and level layout of a WTX file, either as text or as
//! JSON.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::process::ExitCode;
use wtx_tools::png::content_hash;
use wtx_tools::WtxTexture;

use super::json_output::{error_codes, InspectOutput, InspectResult, JsonError};

/// Run the inspect command
///
/// # Arguments
/// * `file` - WTX file to inspect
/// * `json` - Print JSON instead of text
///
/// # Returns
/// Exit code: 0 if the file parsed, 1 otherwise
pub fn run(file: &str, json: bool) -> Result<ExitCode> {
    if json {
        run_json(file)
    } else {
        run_human(file)
    }
}

fn run_human(file: &str) -> Result<ExitCode> {
    println!("{} {}", "Inspecting:".cyan().bold(), file);

    let bytes = fs::read(file).with_context(|| format!("Failed to read file: {}", file))?;
    let texture = WtxTexture::parse(&bytes).with_context(|| format!("Failed to parse WTX: {}", file))?;
    let info = InspectResult::from_texture(&texture);

    println!("  {:<10} {}x{} (depth {})", "size".dimmed(), info.width, info.height, info.depth);
    println!("  {:<10} {}", "format".dimmed(), info.format);
    println!("  {:<10} 0x{:02x}", "bits".dimmed(), info.bits);
    let [r, g, b, a] = info.average_rgba;
    println!("  {:<10} {:.4} {:.4} {:.4} {:.4}", "average".dimmed(), r, g, b, a);
    println!("  {:<10} {} bytes", "body".dimmed(), info.body_len);
    println!("  {:<10} {}", "levels".dimmed(), info.mip_count);
    for level in &info.levels {
        println!(
            "    [{}] {}x{} {} bytes",
            level.index, level.width, level.height, level.size
        );
    }
    println!("  {:<10} {}", "blake3".dimmed(), content_hash(&bytes));

    Ok(ExitCode::SUCCESS)
}

fn run_json(file: &str) -> Result<ExitCode> {
    let (output, code) = match fs::read(file) {
        Err(e) => {
            let error = JsonError::new(error_codes::FILE_READ, format!("Failed to read file: {}", e))
                .with_file(file);
            (InspectOutput::failure(vec![error], None), ExitCode::from(1))
        }
        Ok(bytes) => {
            let hash = content_hash(&bytes);
            match WtxTexture::parse(&bytes) {
                Ok(texture) => (
                    InspectOutput::success(InspectResult::from_texture(&texture), hash),
                    ExitCode::SUCCESS,
                ),
                Err(e) => (
                    InspectOutput::failure(vec![JsonError::from(&e).with_file(file)], Some(hash)),
                    ExitCode::from(1),
                ),
            }
        }
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize JSON output")?;
    println!("{}", json);
    Ok(code)
}
