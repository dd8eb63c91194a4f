//! WTX container writer and reader.
//!
//! A WTX file is a fixed 44-byte little-endian header followed by every
//! compressed mip level, largest first:
//!
//! ```text
//! offset  size  field
//!      0     8  magic 00 00 00 00 00 00 12 00
//!      8     4  body length + 32
//!     12     2  width
//!     14     2  height
//!     16     2  depth (1)
//!     18     2  mip level count
//!     20     1  flag byte
//!     21     3  zero
//!     24    16  average R, G, B as f32, then 1.0
//!     40     4  FourCC "DXT1" / "DXT5"
//! ```
//!
//! Rows are stored bottom-up, so the canvas is flipped before compression.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::debug;

use crate::canvas::RasterCanvas;
use crate::compress::{compress, compressed_size, decompress, WtxFormat};
use crate::config::{EncodeOptions, MAX_TEXTURE_EDGE};
use crate::error::{WtxError, WtxResult};
use crate::mip::build_mip_chain;

/// Size of the fixed header.
pub const HEADER_LEN: usize = 44;
/// Leading bytes of every WTX file.
pub const MAGIC: [u8; 8] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x12, 0x00];
/// Added to the body length in the length field.
const LENGTH_BIAS: u32 = 32;

/// Decoded WTX header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WtxHeader {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub mip_count: u16,
    pub bits: u8,
    /// Average color of the base level; alpha is always 1.0.
    pub average_rgba: [f32; 4],
    pub format: WtxFormat,
    /// Length of the compressed body in bytes.
    pub body_len: u32,
}

impl WtxHeader {
    /// Serialize into the fixed 44-byte layout.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(&MAGIC)?;
        writer.write_u32::<LittleEndian>(self.body_len + LENGTH_BIAS)?;
        writer.write_u16::<LittleEndian>(self.width)?;
        writer.write_u16::<LittleEndian>(self.height)?;
        writer.write_u16::<LittleEndian>(self.depth)?;
        writer.write_u16::<LittleEndian>(self.mip_count)?;
        writer.write_u8(self.bits)?;
        writer.write_all(&[0, 0, 0])?;
        for channel in self.average_rgba {
            writer.write_f32::<LittleEndian>(channel)?;
        }
        writer.write_all(&self.format.fourcc())?;
        Ok(())
    }

    /// Parse and validate the header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> WtxResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WtxError::Container(format!(
                "file is {} bytes, header needs {}",
                bytes.len(),
                HEADER_LEN
            )));
        }
        let mut cursor = Cursor::new(&bytes[..HEADER_LEN]);

        let mut magic = [0u8; 8];
        cursor.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(WtxError::Container(format!("bad magic {:02x?}", magic)));
        }

        let length_field = cursor.read_u32::<LittleEndian>()?;
        let body_len = length_field.checked_sub(LENGTH_BIAS).ok_or_else(|| {
            WtxError::Container(format!("length field {} is below {}", length_field, LENGTH_BIAS))
        })?;
        let width = cursor.read_u16::<LittleEndian>()?;
        let height = cursor.read_u16::<LittleEndian>()?;
        let depth = cursor.read_u16::<LittleEndian>()?;
        let mip_count = cursor.read_u16::<LittleEndian>()?;
        let bits = cursor.read_u8()?;
        let mut reserved = [0u8; 3];
        cursor.read_exact(&mut reserved)?;

        let mut average_rgba = [0f32; 4];
        for channel in average_rgba.iter_mut() {
            *channel = cursor.read_f32::<LittleEndian>()?;
        }

        let mut fourcc = [0u8; 4];
        cursor.read_exact(&mut fourcc)?;
        let format = WtxFormat::from_fourcc(fourcc).ok_or_else(|| {
            WtxError::Container(format!(
                "unknown FourCC '{}'",
                String::from_utf8_lossy(&fourcc)
            ))
        })?;

        if width == 0 || height == 0 || mip_count == 0 {
            return Err(WtxError::Container(format!(
                "empty texture: {}x{} with {} levels",
                width, height, mip_count
            )));
        }
        let available = bytes.len() - HEADER_LEN;
        if available != body_len as usize {
            return Err(WtxError::Container(format!(
                "header declares {} body bytes, file has {}",
                body_len, available
            )));
        }

        Ok(Self {
            width,
            height,
            depth,
            mip_count,
            bits,
            average_rgba,
            format,
            body_len,
        })
    }

    /// Dimensions of mip level `index`.
    pub fn level_dimensions(&self, index: usize) -> (u32, u32) {
        let shift = index.min(31) as u32;
        (
            (self.width as u32 >> shift).max(1),
            (self.height as u32 >> shift).max(1),
        )
    }
}

/// A parsed WTX file borrowing its level data.
#[derive(Debug, Clone)]
pub struct WtxTexture<'a> {
    pub header: WtxHeader,
    levels: Vec<&'a [u8]>,
}

impl<'a> WtxTexture<'a> {
    /// Parse a whole file, slicing the body into levels.
    pub fn parse(bytes: &'a [u8]) -> WtxResult<Self> {
        let header = WtxHeader::parse(bytes)?;
        let mut body = &bytes[HEADER_LEN..];
        let mut levels = Vec::with_capacity(header.mip_count as usize);

        for index in 0..header.mip_count as usize {
            let (w, h) = header.level_dimensions(index);
            let size = compressed_size(w, h, header.format);
            if body.len() < size {
                return Err(WtxError::Container(format!(
                    "level {} ({}x{}) needs {} bytes, {} left",
                    index,
                    w,
                    h,
                    size,
                    body.len()
                )));
            }
            let (level, rest) = body.split_at(size);
            levels.push(level);
            body = rest;
        }
        if !body.is_empty() {
            return Err(WtxError::Container(format!(
                "{} trailing bytes after the last level",
                body.len()
            )));
        }
        Ok(Self { header, levels })
    }

    /// Compressed levels, largest first.
    pub fn levels(&self) -> &[&'a [u8]] {
        &self.levels
    }

    /// Decompress a level back into a top-down canvas.
    pub fn decode_level(&self, index: usize) -> WtxResult<RasterCanvas> {
        let data = self.levels.get(index).ok_or_else(|| {
            WtxError::InvalidParameter(format!(
                "level {} out of range (texture has {})",
                index,
                self.levels.len()
            ))
        })?;
        let (w, h) = self.header.level_dimensions(index);
        let mut canvas = decompress(data, w, h, self.header.format)?;
        canvas.flip_vertical();
        Ok(canvas)
    }
}

/// Mean of each color channel over all pixels, in 0..1.
pub fn average_color(canvas: &RasterCanvas) -> [f32; 3] {
    let mut sums = [0f64; 3];
    for px in &canvas.data {
        for (sum, &value) in sums.iter_mut().zip(px.iter()) {
            *sum += value as f64 / 255.0;
        }
    }
    let count = canvas.data.len().max(1) as f64;
    [
        (sums[0] / count) as f32,
        (sums[1] / count) as f32,
        (sums[2] / count) as f32,
    ]
}

/// Encode a top-down canvas into a complete WTX file.
pub fn encode_wtx(canvas: &RasterCanvas, options: &EncodeOptions) -> WtxResult<Vec<u8>> {
    if canvas.width == 0
        || canvas.height == 0
        || canvas.width > MAX_TEXTURE_EDGE
        || canvas.height > MAX_TEXTURE_EDGE
    {
        return Err(WtxError::Dimension(format!(
            "{}x{} does not fit a WTX texture (1..={} per edge)",
            canvas.width, canvas.height, MAX_TEXTURE_EDGE
        )));
    }

    let mut flipped = canvas.clone();
    flipped.flip_vertical();
    let [r, g, b] = average_color(&flipped);

    let chain = build_mip_chain(flipped, options.gen_mipmaps);
    debug!(levels = chain.len(), "mip chain built");

    let mut body = Vec::new();
    for level in chain.levels() {
        body.extend_from_slice(&compress(level, options.format, options.bits));
    }

    let body_len = u32::try_from(body.len())
        .ok()
        .filter(|len| len.checked_add(LENGTH_BIAS).is_some())
        .ok_or_else(|| {
            WtxError::Dimension(format!("compressed body of {} bytes is too large", body.len()))
        })?;

    let header = WtxHeader {
        width: canvas.width as u16,
        height: canvas.height as u16,
        depth: 1,
        mip_count: chain.len() as u16,
        bits: options.bits,
        average_rgba: [r, g, b, 1.0],
        format: options.format,
        body_len,
    };

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    header.write_to(&mut out)?;
    out.extend_from_slice(&body);
    debug!(
        width = header.width,
        height = header.height,
        format = %header.format,
        bytes = out.len(),
        "wtx encoded"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use pretty_assertions::assert_eq;

    fn two_tone(width: u32, height: u32) -> RasterCanvas {
        let mut canvas = RasterCanvas::new(width, height, Color::black());
        canvas.fill_rect(0, 0, width as i64, (height / 2) as i64, Color::white());
        canvas
    }

    #[test]
    fn test_header_layout() {
        let canvas = RasterCanvas::new(8, 4, Color::rgb(1.0, 0.0, 0.0));
        let options = EncodeOptions {
            gen_mipmaps: false,
            format: WtxFormat::Dxt1,
            bits: 0x05,
        };
        let bytes = encode_wtx(&canvas, &options).unwrap();

        assert_eq!(&bytes[0..8], &MAGIC);
        assert_eq!(&bytes[8..12], &(16u32 + 32).to_le_bytes());
        assert_eq!(&bytes[12..14], &8u16.to_le_bytes());
        assert_eq!(&bytes[14..16], &4u16.to_le_bytes());
        assert_eq!(&bytes[16..18], &1u16.to_le_bytes());
        assert_eq!(&bytes[18..20], &1u16.to_le_bytes());
        assert_eq!(&bytes[20..24], &[0x05, 0, 0, 0]);
        assert_eq!(&bytes[24..28], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[28..32], &0.0f32.to_le_bytes());
        assert_eq!(&bytes[36..40], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[40..44], b"DXT1");
        assert_eq!(bytes.len(), HEADER_LEN + 16);
    }

    #[test]
    fn test_mipmapped_512_has_ten_levels() {
        let canvas = two_tone(512, 512);
        let bytes = encode_wtx(&canvas, &EncodeOptions::panel_preset()).unwrap();
        let texture = WtxTexture::parse(&bytes).unwrap();

        assert_eq!(texture.header.mip_count, 10);
        assert_eq!(texture.header.format, WtxFormat::Dxt5);
        assert_eq!(texture.levels()[0].len(), 128 * 128 * 16);
        assert_eq!(texture.levels()[9].len(), 16);
        assert!((texture.header.average_rgba[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_rows_are_stored_bottom_up() {
        let canvas = two_tone(8, 8);
        let bytes = encode_wtx(&canvas, &EncodeOptions::default()).unwrap();
        let texture = WtxTexture::parse(&bytes).unwrap();

        // first stored block row is the bottom of the canvas (black)
        let raw = decompress(texture.levels()[0], 8, 8, WtxFormat::Dxt5).unwrap();
        assert_eq!(raw.get(0, 0), [0, 0, 0, 255]);
        assert_eq!(raw.get(0, 7), [255, 255, 255, 255]);

        let decoded = texture.decode_level(0).unwrap();
        assert_eq!(decoded, canvas);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let canvas = two_tone(64, 32);
        let a = encode_wtx(&canvas, &EncodeOptions::spec_preset()).unwrap();
        let b = encode_wtx(&canvas, &EncodeOptions::spec_preset()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_rejects_corruption() {
        let bytes = encode_wtx(&two_tone(16, 16), &EncodeOptions::default()).unwrap();

        assert!(matches!(WtxHeader::parse(&bytes[..30]), Err(WtxError::Container(_))));

        let mut bad_magic = bytes.clone();
        bad_magic[6] = 0x13;
        assert!(matches!(WtxHeader::parse(&bad_magic), Err(WtxError::Container(_))));

        let mut bad_fourcc = bytes.clone();
        bad_fourcc[43] = b'3';
        assert!(matches!(WtxHeader::parse(&bad_fourcc), Err(WtxError::Container(_))));

        let truncated = &bytes[..bytes.len() - 1];
        assert!(matches!(WtxTexture::parse(truncated), Err(WtxError::Container(_))));

        let mut wrong_levels = bytes.clone();
        wrong_levels[18] = 2;
        assert!(matches!(WtxTexture::parse(&wrong_levels), Err(WtxError::Container(_))));
    }

    #[test]
    fn test_header_roundtrip() {
        let bytes = encode_wtx(&two_tone(20, 12), &EncodeOptions::spec_preset()).unwrap();
        let header = WtxHeader::parse(&bytes).unwrap();
        let mut rewritten = Vec::new();
        header.write_to(&mut rewritten).unwrap();
        assert_eq!(&rewritten[..], &bytes[..HEADER_LEN]);
        assert_eq!(header.level_dimensions(4), (1, 1));
        assert_eq!(header.level_dimensions(2), (5, 3));
    }
}
