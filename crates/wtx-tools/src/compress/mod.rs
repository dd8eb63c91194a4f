//! BC1/BC3 (DXT1/DXT5) block compression.
//!
//! The canvas is cut into 4×4 blocks in row-major order. Blocks that hang
//! over the right or bottom edge replicate the last column/row, so every
//! level compresses to `ceil(w/4) * ceil(h/4)` blocks.
//!
//! ## DXT1
//!
//! 8 bytes per block: two RGB565 endpoints and 2-bit indices. A pixel whose
//! alpha is below the cutoff is transparent; blocks containing one use the
//! 3-color mode with index 3 reserved for transparency.
//!
//! ## DXT5
//!
//! 16 bytes per block: an interpolated alpha block followed by a 4-color
//! DXT1 color block.

mod bc1;
mod bc3;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::canvas::RasterCanvas;
use crate::error::{WtxError, WtxResult};

pub use bc1::{decode_bc1_block, encode_bc1_block};
pub use bc3::{decode_bc3_block, encode_bc3_block};

/// Pixels of one 4×4 block, row-major.
pub type Block = [[u8; 4]; 16];

/// Block compression format of a WTX texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WtxFormat {
    #[serde(rename = "DXT1")]
    Dxt1,
    #[serde(rename = "DXT5")]
    Dxt5,
}

impl WtxFormat {
    /// Translate a C enum value (0 = DXT5, 1 = DXT1).
    pub fn from_raw(raw: u32) -> WtxResult<Self> {
        match raw {
            0 => Ok(WtxFormat::Dxt5),
            1 => Ok(WtxFormat::Dxt1),
            other => Err(WtxError::UnsupportedFormat(format!(
                "unknown texture format {}",
                other
            ))),
        }
    }

    /// Compressed bytes per 4×4 block.
    pub const fn block_size(self) -> usize {
        match self {
            WtxFormat::Dxt1 => 8,
            WtxFormat::Dxt5 => 16,
        }
    }

    /// FourCC written into the container header.
    pub const fn fourcc(self) -> [u8; 4] {
        match self {
            WtxFormat::Dxt1 => *b"DXT1",
            WtxFormat::Dxt5 => *b"DXT5",
        }
    }

    /// Inverse of [`WtxFormat::fourcc`].
    pub fn from_fourcc(fourcc: [u8; 4]) -> Option<Self> {
        match &fourcc {
            b"DXT1" => Some(WtxFormat::Dxt1),
            b"DXT5" => Some(WtxFormat::Dxt5),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WtxFormat::Dxt1 => "DXT1",
            WtxFormat::Dxt5 => "DXT5",
        }
    }
}

impl fmt::Display for WtxFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WtxFormat {
    type Err = WtxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DXT1" | "BC1" => Ok(WtxFormat::Dxt1),
            "DXT5" | "BC3" => Ok(WtxFormat::Dxt5),
            _ => Err(WtxError::UnsupportedFormat(format!(
                "unknown texture format '{}' (expected DXT1 or DXT5)",
                s
            ))),
        }
    }
}

/// Compressed size of one level.
pub fn compressed_size(width: u32, height: u32, format: WtxFormat) -> usize {
    let blocks_x = width.div_ceil(4) as usize;
    let blocks_y = height.div_ceil(4) as usize;
    blocks_x * blocks_y * format.block_size()
}

/// Gather the 4×4 block whose top-left pixel is (bx*4, by*4).
pub fn extract_block(canvas: &RasterCanvas, bx: u32, by: u32) -> Block {
    let mut block = [[0u8; 4]; 16];
    for (i, px) in block.iter_mut().enumerate() {
        let x = bx * 4 + (i % 4) as u32;
        let y = by * 4 + (i / 4) as u32;
        *px = canvas.get_clamped(x, y);
    }
    block
}

/// Compress one level. `bits` is the DXT1 alpha cutoff; DXT5 ignores it.
pub fn compress(canvas: &RasterCanvas, format: WtxFormat, bits: u8) -> Vec<u8> {
    let blocks_x = canvas.width.div_ceil(4);
    let blocks_y = canvas.height.div_ceil(4);
    let mut out = Vec::with_capacity(compressed_size(canvas.width, canvas.height, format));

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let block = extract_block(canvas, bx, by);
            match format {
                WtxFormat::Dxt1 => out.extend_from_slice(&encode_bc1_block(&block, bits)),
                WtxFormat::Dxt5 => out.extend_from_slice(&encode_bc3_block(&block)),
            }
        }
    }

    debug!(
        width = canvas.width,
        height = canvas.height,
        format = %format,
        bytes = out.len(),
        "level compressed"
    );
    out
}

/// Decompress one level back into a canvas.
pub fn decompress(data: &[u8], width: u32, height: u32, format: WtxFormat) -> WtxResult<RasterCanvas> {
    let expected = compressed_size(width, height, format);
    if width == 0 || height == 0 || data.len() != expected {
        return Err(WtxError::Container(format!(
            "{}x{} {} level needs {} bytes, got {}",
            width,
            height,
            format,
            expected,
            data.len()
        )));
    }

    let blocks_x = width.div_ceil(4);
    let mut canvas = RasterCanvas {
        width,
        height,
        data: vec![[0u8; 4]; width as usize * height as usize],
    };
    for (i, chunk) in data.chunks_exact(format.block_size()).enumerate() {
        let bx = i as u32 % blocks_x;
        let by = i as u32 / blocks_x;
        let pixels = match format {
            WtxFormat::Dxt1 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                decode_bc1_block(&raw)
            }
            WtxFormat::Dxt5 => {
                let mut raw = [0u8; 16];
                raw.copy_from_slice(chunk);
                decode_bc3_block(&raw)
            }
        };
        for (p, px) in pixels.iter().enumerate() {
            let x = bx * 4 + (p % 4) as u32;
            let y = by * 4 + (p / 4) as u32;
            if x < width && y < height {
                canvas.set(x, y, *px);
            }
        }
    }
    Ok(canvas)
}

/// RGB888 to RGB565 with rounding.
pub(crate) fn pack_565(rgb: [u8; 3]) -> u16 {
    let r = (rgb[0] as u16 * 31 + 127) / 255;
    let g = (rgb[1] as u16 * 63 + 127) / 255;
    let b = (rgb[2] as u16 * 31 + 127) / 255;
    (r << 11) | (g << 5) | b
}

/// RGB565 to RGB888 by bit replication.
pub(crate) fn unpack_565(color: u16) -> [u8; 3] {
    let r = ((color >> 11) & 0x1F) as u8;
    let g = ((color >> 5) & 0x3F) as u8;
    let b = (color & 0x1F) as u8;
    [(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)]
}
