//! Container-level tests: header fields, level layout and block sizes.

use wtx_tools::compress::{compress, compressed_size, decode_bc1_block};
use wtx_tools::mip::build_mip_chain;
use wtx_tools::wtx::{encode_wtx, WtxHeader, WtxTexture, HEADER_LEN, MAGIC};
use wtx_tools::{Color, EncodeOptions, RasterCanvas, WtxError, WtxFormat};

fn checker(width: u32, height: u32) -> RasterCanvas {
    let mut canvas = RasterCanvas::new(width, height, Color::black());
    for y in 0..height {
        for x in 0..width {
            if (x / 8 + y / 8) % 2 == 0 {
                canvas.set(x, y, [230, 200, 40, 255]);
            }
        }
    }
    canvas
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_512_dxt1_level_sizes() {
    let bytes = encode_wtx(&checker(512, 512), &EncodeOptions::spec_preset()).unwrap();
    let texture = WtxTexture::parse(&bytes).unwrap();

    let sizes: Vec<usize> = texture.levels().iter().map(|l| l.len()).collect();
    assert_eq!(sizes.len(), 10);
    assert_eq!(sizes[0], 128 * 128 * 8);
    assert_eq!(sizes[1], 64 * 64 * 8);
    assert_eq!(&sizes[7..], &[8, 8, 8]);
    assert_eq!(bytes.len(), HEADER_LEN + sizes.iter().sum::<usize>());
}

#[test]
fn test_without_mipmaps_single_level() {
    for format in [WtxFormat::Dxt1, WtxFormat::Dxt5] {
        let options = EncodeOptions {
            gen_mipmaps: false,
            format,
            bits: 0,
        };
        let bytes = encode_wtx(&checker(512, 512), &options).unwrap();
        let header = WtxHeader::parse(&bytes).unwrap();
        assert_eq!(header.mip_count, 1);
        assert_eq!(
            header.body_len as usize,
            128 * 128 * format.block_size(),
            "{}",
            format
        );
    }
}

#[test]
fn test_non_multiple_of_four_sizes() {
    let options = EncodeOptions {
        gen_mipmaps: true,
        format: WtxFormat::Dxt5,
        bits: 0,
    };
    let bytes = encode_wtx(&checker(30, 7), &options).unwrap();
    let texture = WtxTexture::parse(&bytes).unwrap();

    let expected: Vec<usize> = [(30, 7), (15, 3), (7, 1), (3, 1), (1, 1)]
        .iter()
        .map(|&(w, h)| compressed_size(w, h, WtxFormat::Dxt5))
        .collect();
    let actual: Vec<usize> = texture.levels().iter().map(|l| l.len()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_body_matches_chain_of_flipped_canvas() {
    let canvas = checker(16, 16);
    let options = EncodeOptions::spec_preset();
    let bytes = encode_wtx(&canvas, &options).unwrap();

    let mut flipped = canvas.clone();
    flipped.flip_vertical();
    let chain = build_mip_chain(flipped, true);
    let mut body = Vec::new();
    for level in chain.levels() {
        body.extend(compress(level, options.format, options.bits));
    }
    assert_eq!(&bytes[..8], &MAGIC);
    assert_eq!(&bytes[HEADER_LEN..], &body[..]);
}

// ============================================================================
// Flag byte
// ============================================================================

#[test]
fn test_dxt1_bits_cutoff_controls_transparency() {
    let mut canvas = RasterCanvas::new(4, 4, Color::rgb(0.5, 0.5, 0.5));
    canvas.set(0, 3, [128, 128, 128, 3]);

    let encode = |bits: u8| {
        let options = EncodeOptions {
            gen_mipmaps: false,
            format: WtxFormat::Dxt1,
            bits,
        };
        let bytes = encode_wtx(&canvas, &options).unwrap();
        let mut block = [0u8; 8];
        block.copy_from_slice(&bytes[HEADER_LEN..HEADER_LEN + 8]);
        decode_bc1_block(&block)
    };

    // canvas row 3 is stored first
    assert_eq!(encode(4)[0][3], 0);
    assert_eq!(encode(3)[0][3], 255);
    assert_eq!(encode(0)[0][3], 255);
}

#[test]
fn test_header_records_bits_and_average() {
    let canvas = RasterCanvas::new(8, 8, Color::rgb(0.0, 1.0, 0.0));
    let options = EncodeOptions {
        gen_mipmaps: true,
        format: WtxFormat::Dxt5,
        bits: 0x2c,
    };
    let header = WtxHeader::parse(&encode_wtx(&canvas, &options).unwrap()).unwrap();
    assert_eq!(header.bits, 0x2c);
    assert_eq!(header.depth, 1);
    assert_eq!(header.average_rgba, [0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn test_oversized_canvas_is_rejected() {
    let canvas = RasterCanvas {
        width: 70_000,
        height: 1,
        data: vec![[0, 0, 0, 255]; 70_000],
    };
    assert!(matches!(
        encode_wtx(&canvas, &EncodeOptions::default()),
        Err(WtxError::Dimension(_))
    ));
}
