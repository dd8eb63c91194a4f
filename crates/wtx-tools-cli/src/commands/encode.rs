//! Encode command implementation
//!
//! Converts image files to WTX, writing the result next to each input.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wtx_tools::generate::image_to_wtx;
use wtx_tools::{EncodeOptions, WtxFormat};

/// Run the encode command
///
/// # Arguments
/// * `files` - Image files to convert
/// * `include_mipmaps` - Build the full mip chain
/// * `format` - "DXT5" or "DXT1"
/// * `bits` - Header flag byte, also the DXT1 alpha cutoff
///
/// # Returns
/// Exit code: 0 if every file converted, 1 otherwise
pub fn run(files: &[String], include_mipmaps: bool, format: &str, bits: u8) -> Result<ExitCode> {
    let format: WtxFormat = format
        .parse()
        .with_context(|| format!("Unknown format: {}", format))?;
    let options = EncodeOptions {
        gen_mipmaps: include_mipmaps,
        format,
        bits,
    };

    println!(
        "{} {} file(s) as {}{}",
        "Encoding:".cyan().bold(),
        files.len(),
        format,
        if include_mipmaps { " with mipmaps" } else { "" }
    );

    let mut failed = 0usize;
    for file in files {
        match encode_file(Path::new(file), &options) {
            Ok((output, size)) => {
                println!(
                    "  {} {} -> {} ({} bytes)",
                    "OK".green().bold(),
                    file,
                    output.display(),
                    size
                );
            }
            Err(e) => {
                failed += 1;
                println!("  {} {}: {:#}", "FAIL".red().bold(), file, e);
            }
        }
    }

    let succeeded = files.len() - failed;
    if failed == 0 {
        println!("{} {} converted", "SUCCESS".green().bold(), succeeded);
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "{} {} converted, {} failed",
            "FAILED".red().bold(),
            succeeded,
            failed
        );
        Ok(ExitCode::from(1))
    }
}

/// Output path for an input: the same path with a `.wtx` extension.
pub fn output_path(input: &Path) -> PathBuf {
    let mut output = input.to_path_buf();
    output.set_extension("wtx");
    output
}

fn encode_file(input: &Path, options: &EncodeOptions) -> Result<(PathBuf, usize)> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read image: {}", input.display()))?;
    // Local files are trusted; the size limits only apply to the injected runtime.
    let wtx = image_to_wtx(&bytes, true, options)
        .with_context(|| format!("Failed to convert: {}", input.display()))?;
    let output = output_path(input);
    fs::write(&output, &wtx).with_context(|| format!("Failed to write: {}", output.display()))?;
    tracing::debug!(input = %input.display(), output = %output.display(), "encoded");
    Ok((output, wtx.len()))
}
