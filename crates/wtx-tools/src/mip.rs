//! Mip chain generation with a 2×2 box filter.
//!
//! Channel values are averaged as stored (gamma-encoded), with round-half-up
//! integer arithmetic. Odd edges clamp, so a 5-wide level reduces to 2.

use crate::canvas::RasterCanvas;

/// Base level plus its successively halved reductions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipChain {
    levels: Vec<RasterCanvas>,
}

impl MipChain {
    /// Levels, largest first.
    pub fn levels(&self) -> &[RasterCanvas] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Never true; a chain always holds its base level.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn base(&self) -> &RasterCanvas {
        &self.levels[0]
    }
}

/// Number of levels in a full chain for the given base size.
///
/// `floor(log2(max(w, h))) + 1`, so a 512×512 base yields 10.
pub fn full_chain_len(width: u32, height: u32) -> usize {
    let longest = width.max(height).max(1);
    (u32::BITS - longest.leading_zeros()) as usize
}

/// Build the chain for `base`; without `gen_mipmaps` it holds the base only.
pub fn build_mip_chain(base: RasterCanvas, gen_mipmaps: bool) -> MipChain {
    let count = if gen_mipmaps {
        full_chain_len(base.width, base.height)
    } else {
        1
    };

    let mut levels = Vec::with_capacity(count);
    levels.push(base);
    while levels.len() < count {
        let next = match levels.last() {
            Some(prev) => downsample(prev),
            None => break,
        };
        levels.push(next);
    }
    MipChain { levels }
}

/// Halve a level with a 2×2 box filter, each side at least 1.
pub fn downsample(src: &RasterCanvas) -> RasterCanvas {
    let width = (src.width / 2).max(1);
    let height = (src.height / 2).max(1);
    let mut data = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = (x * 2, y * 2);
            let quad = [
                src.get_clamped(sx, sy),
                src.get_clamped(sx + 1, sy),
                src.get_clamped(sx, sy + 1),
                src.get_clamped(sx + 1, sy + 1),
            ];
            let mut out = [0u8; 4];
            for (c, slot) in out.iter_mut().enumerate() {
                let sum: u32 = quad.iter().map(|px| px[c] as u32).sum();
                *slot = ((sum + 2) / 4) as u8;
            }
            data.push(out);
        }
    }

    RasterCanvas { width, height, data }
}
