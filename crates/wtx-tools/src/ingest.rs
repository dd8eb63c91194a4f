//! Decoding of caller-supplied image files (PNG, JPEG, BMP, TGA).

use std::io::Cursor;

use image::{ImageError, ImageReader, Limits};
use tracing::debug;

use crate::canvas::RasterCanvas;
use crate::config::MAX_TEXTURE_EDGE;
use crate::error::{WtxError, WtxResult};

/// Largest edge accepted from an untrusted source.
pub const UNTRUSTED_MAX_EDGE: u32 = 16384;
/// Largest decoder allocation accepted from an untrusted source.
pub const UNTRUSTED_MAX_ALLOC: u64 = 512 * 1024 * 1024;

/// Decoder limits applied to untrusted input.
pub fn untrusted_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(UNTRUSTED_MAX_EDGE);
    limits.max_image_height = Some(UNTRUSTED_MAX_EDGE);
    limits.max_alloc = Some(UNTRUSTED_MAX_ALLOC);
    limits
}

/// Decode an image file held in memory into an RGBA8 canvas.
///
/// The container format is sniffed from the content. With `trust_source`
/// unset the decoder refuses oversized images before allocating them.
pub fn decode_image(bytes: &[u8], trust_source: bool) -> WtxResult<RasterCanvas> {
    if bytes.is_empty() {
        return Err(WtxError::Decode("image buffer is empty".to_string()));
    }

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| WtxError::Decode(format!("failed to sniff image format: {}", e)))?;
    if reader.format().is_none() {
        return Err(WtxError::Decode("unrecognized image format".to_string()));
    }

    if trust_source {
        reader.no_limits();
    } else {
        reader.limits(untrusted_limits());
    }

    let image = reader.decode().map_err(|e| match e {
        ImageError::Limits(limits) => WtxError::Dimension(format!("image exceeds decoder limits: {}", limits)),
        other => WtxError::Decode(other.to_string()),
    })?;

    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width > MAX_TEXTURE_EDGE || height > MAX_TEXTURE_EDGE {
        return Err(WtxError::Dimension(format!(
            "image is {}x{}, WTX stores at most {} per edge",
            width, height, MAX_TEXTURE_EDGE
        )));
    }
    debug!(width, height, trust_source, "image decoded");
    RasterCanvas::from_rgba8(width, height, rgba.as_raw())
}
