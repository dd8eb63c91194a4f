//! Deterministic PNG writer.
//!
//! Used for the saved preview of generated color panels and by the CLI's
//! `--png` previews. Fixed compression settings keep the output
//! byte-identical for the same canvas.

use std::io::Write;
use std::path::Path;

use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

use crate::canvas::RasterCanvas;

/// Errors from PNG operations.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// PNG export configuration for deterministic output.
#[derive(Debug, Clone)]
pub struct PngConfig {
    /// Compression level. Use a fixed value for determinism.
    pub compression: Compression,
    /// Filter type. Use a fixed value for determinism.
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Write an RGBA canvas to a PNG file.
pub fn write_rgba(canvas: &RasterCanvas, path: &Path, config: &PngConfig) -> Result<(), PngError> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_rgba_to_writer(canvas, writer, config)
}

/// Write an RGBA canvas to any writer.
pub fn write_rgba_to_writer<W: Write>(
    canvas: &RasterCanvas,
    writer: W,
    config: &PngConfig,
) -> Result<(), PngError> {
    let mut encoder = Encoder::new(writer, canvas.width, canvas.height);
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(config.compression);
    encoder.set_filter(config.filter);

    // The png crate doesn't add timestamps by default
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(&canvas.to_rgba8_bytes())?;

    Ok(())
}

/// BLAKE3 hex digest of an encoded file (PNG or WTX).
pub fn content_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}
