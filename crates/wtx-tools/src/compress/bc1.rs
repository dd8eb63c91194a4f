//! BC1 (DXT1) color blocks.

use super::{pack_565, unpack_565, Block};

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Encode one block. Pixels with alpha below `cutoff` become transparent.
pub fn encode_bc1_block(block: &Block, cutoff: u8) -> [u8; 8] {
    let mut transparent = [false; 16];
    for (flag, px) in transparent.iter_mut().zip(block.iter()) {
        *flag = px[3] < cutoff;
    }
    encode_color_block(block, &transparent)
}

/// Encode the color half of a block, reserving index 3 for masked pixels.
pub(super) fn encode_color_block(block: &Block, transparent: &[bool; 16]) -> [u8; 8] {
    let has_transparent = transparent.iter().any(|&t| t);

    let Some((lo, hi)) = bounding_box(block, transparent) else {
        // nothing opaque: equal endpoints select 3-color mode
        return pack(0, 0, u32::MAX);
    };

    if has_transparent {
        let (c0, c1) = (pack_565(lo), pack_565(hi));
        let (c0, c1) = if c0 <= c1 { (c0, c1) } else { (c1, c0) };
        let p0 = unpack_565(c0);
        let p1 = unpack_565(c1);
        let palette = [p0, p1, mix(p0, p1, 1, 1)];

        let mut indices = 0u32;
        for (i, px) in block.iter().enumerate() {
            let index = if transparent[i] {
                3
            } else {
                nearest(&palette, px)
            };
            indices |= index << (2 * i);
        }
        return pack(c0, c1, indices);
    }

    let (c0, c1) = (pack_565(hi), pack_565(lo));
    if c0 == c1 {
        return pack(c0, c1, 0);
    }
    let (c0, c1) = if c0 > c1 { (c0, c1) } else { (c1, c0) };
    let p0 = unpack_565(c0);
    let p1 = unpack_565(c1);
    let palette = [p0, p1, mix(p0, p1, 2, 1), mix(p0, p1, 1, 2)];

    let mut indices = 0u32;
    for (i, px) in block.iter().enumerate() {
        indices |= nearest(&palette, px) << (2 * i);
    }
    pack(c0, c1, indices)
}

/// Decode one block into 16 RGBA pixels.
pub fn decode_bc1_block(data: &[u8; 8]) -> Block {
    decode_color_block(data, false)
}

/// Decode a color block; BC3 always reads it in 4-color mode.
pub(super) fn decode_color_block(data: &[u8; 8], force_four_color: bool) -> Block {
    let c0 = u16::from_le_bytes([data[0], data[1]]);
    let c1 = u16::from_le_bytes([data[2], data[3]]);
    let indices = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);

    let p0 = unpack_565(c0);
    let p1 = unpack_565(c1);
    let opaque = |rgb: [u8; 3]| [rgb[0], rgb[1], rgb[2], 255];
    let palette = if c0 > c1 || force_four_color {
        [
            opaque(p0),
            opaque(p1),
            opaque(mix(p0, p1, 2, 1)),
            opaque(mix(p0, p1, 1, 2)),
        ]
    } else {
        [opaque(p0), opaque(p1), opaque(mix(p0, p1, 1, 1)), TRANSPARENT]
    };

    let mut out = [[0u8; 4]; 16];
    for (i, px) in out.iter_mut().enumerate() {
        *px = palette[((indices >> (2 * i)) & 0b11) as usize];
    }
    out
}

/// Per-channel min/max of the unmasked pixels, each inset by 1/16 of the range.
fn bounding_box(block: &Block, transparent: &[bool; 16]) -> Option<([u8; 3], [u8; 3])> {
    let mut lo = [u8::MAX; 3];
    let mut hi = [u8::MIN; 3];
    let mut any = false;
    for (px, &masked) in block.iter().zip(transparent.iter()) {
        if masked {
            continue;
        }
        any = true;
        for c in 0..3 {
            lo[c] = lo[c].min(px[c]);
            hi[c] = hi[c].max(px[c]);
        }
    }
    if !any {
        return None;
    }
    for c in 0..3 {
        let inset = (hi[c] - lo[c]) >> 4;
        lo[c] += inset;
        hi[c] -= inset;
    }
    Some((lo, hi))
}

/// Weighted average `(wa*a + wb*b) / (wa + wb)` per channel.
fn mix(a: [u8; 3], b: [u8; 3], wa: u32, wb: u32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for c in 0..3 {
        out[c] = ((a[c] as u32 * wa + b[c] as u32 * wb) / (wa + wb)) as u8;
    }
    out
}

/// Index of the palette entry closest in squared RGB distance; ties pick the lower index.
fn nearest(palette: &[[u8; 3]], px: &[u8; 4]) -> u32 {
    let mut best = 0usize;
    let mut best_dist = u32::MAX;
    for (i, entry) in palette.iter().enumerate() {
        let dist: u32 = (0..3)
            .map(|c| {
                let d = entry[c] as i32 - px[c] as i32;
                (d * d) as u32
            })
            .sum();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best as u32
}

fn pack(c0: u16, c1: u16, indices: u32) -> [u8; 8] {
    let mut out = [0u8; 8];
    out[0..2].copy_from_slice(&c0.to_le_bytes());
    out[2..4].copy_from_slice(&c1.to_le_bytes());
    out[4..8].copy_from_slice(&indices.to_le_bytes());
    out
}
