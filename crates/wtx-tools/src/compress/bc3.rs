//! BC3 (DXT5) blocks: interpolated alpha followed by a BC1 color block.

use super::bc1::{decode_color_block, encode_color_block};
use super::Block;

/// Encode one block; alpha is kept at full precision by its own sub-block.
pub fn encode_bc3_block(block: &Block) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&encode_alpha_block(block));
    out[8..].copy_from_slice(&encode_color_block(block, &[false; 16]));
    out
}

/// Decode one block into 16 RGBA pixels.
pub fn decode_bc3_block(data: &[u8; 16]) -> Block {
    let mut alpha = [0u8; 8];
    alpha.copy_from_slice(&data[..8]);
    let mut color = [0u8; 8];
    color.copy_from_slice(&data[8..]);

    let alphas = decode_alpha_block(&alpha);
    let mut pixels = decode_color_block(&color, true);
    for (px, a) in pixels.iter_mut().zip(alphas.iter()) {
        px[3] = *a;
    }
    pixels
}

fn encode_alpha_block(block: &Block) -> [u8; 8] {
    let a0 = block.iter().map(|px| px[3]).max().unwrap_or(255);
    let a1 = block.iter().map(|px| px[3]).min().unwrap_or(255);

    let mut out = [0u8; 8];
    out[0] = a0;
    out[1] = a1;
    if a0 == a1 {
        return out;
    }

    let palette = alpha_palette(a0, a1);
    let mut indices = 0u64;
    for (i, px) in block.iter().enumerate() {
        let index = palette
            .iter()
            .enumerate()
            .min_by_key(|&(_, &p)| (p as i32 - px[3] as i32).abs())
            .map(|(idx, _)| idx as u64)
            .unwrap_or(0);
        indices |= index << (3 * i);
    }
    out[2..].copy_from_slice(&indices.to_le_bytes()[..6]);
    out
}

fn decode_alpha_block(data: &[u8; 8]) -> [u8; 16] {
    let palette = alpha_palette(data[0], data[1]);
    let mut raw = [0u8; 8];
    raw[..6].copy_from_slice(&data[2..]);
    let indices = u64::from_le_bytes(raw);

    let mut out = [0u8; 16];
    for (i, a) in out.iter_mut().enumerate() {
        *a = palette[((indices >> (3 * i)) & 0b111) as usize];
    }
    out
}

/// Eight-entry alpha palette; `a0 > a1` interpolates six steps, otherwise
/// four steps plus explicit 0 and 255.
fn alpha_palette(a0: u8, a1: u8) -> [u8; 8] {
    let (a, b) = (a0 as u32, a1 as u32);
    let mut palette = [a0, a1, 0, 0, 0, 0, 0, 0];
    if a0 > a1 {
        for (i, slot) in palette.iter_mut().enumerate().skip(2) {
            let i = i as u32;
            *slot = (((8 - i) * a + (i - 1) * b) / 7) as u8;
        }
    } else {
        for (i, slot) in palette.iter_mut().enumerate().take(6).skip(2) {
            let i = i as u32;
            *slot = (((6 - i) * a + (i - 1) * b) / 5) as u8;
        }
        palette[6] = 0;
        palette[7] = 255;
    }
    palette
}
