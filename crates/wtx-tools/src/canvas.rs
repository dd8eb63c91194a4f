//! RGBA8 raster canvas and the drawing primitives the generators share.
//!
//! Shapes are rasterized in two steps: geometry accumulates into a
//! [`CoverageMask`] (per-pixel coverage in `[0, 1]`, max-combined), then the
//! mask is composited onto the canvas in a single color. Drawing several
//! shapes into one mask before compositing keeps overlapping strokes from
//! darkening where they cross.

use crate::color::Color;
use crate::error::{WtxError, WtxResult};

/// A width×height RGBA8 pixel buffer, row-major, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterCanvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel data (RGBA8, row-major).
    pub data: Vec<[u8; 4]>,
}

impl RasterCanvas {
    /// Create a new canvas filled with a color.
    ///
    /// Zero-sized canvases are a programming error; callers validate
    /// external dimensions before getting here.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        debug_assert!(width > 0 && height > 0, "canvas dimensions must be positive");
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            data: vec![fill.to_rgba8(); size],
        }
    }

    /// Wrap raw RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> WtxResult<Self> {
        if width == 0 || height == 0 {
            return Err(WtxError::Dimension(format!(
                "canvas must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(WtxError::Dimension(format!(
                "expected {} bytes for {}x{} RGBA8, got {}",
                expected,
                width,
                height,
                bytes.len()
            )));
        }
        let data = bytes
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
            .collect();
        Ok(Self { width, height, data })
    }

    /// Get a pixel at the given coordinates.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> [u8; 4] {
        self.data[(y * self.width + x) as usize]
    }

    /// Get a pixel, clamping out-of-range coordinates to the nearest edge.
    #[inline]
    pub fn get_clamped(&self, x: u32, y: u32) -> [u8; 4] {
        self.get(x.min(self.width - 1), y.min(self.height - 1))
    }

    /// Set a pixel at the given coordinates.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = (y * self.width + x) as usize;
        self.data[idx] = rgba;
    }

    /// Overwrite the pixels of an axis-aligned rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        let rgba = color.to_rgba8();
        let (xa, xb) = (x0.max(0), x1.min(self.width as i64));
        let (ya, yb) = (y0.max(0), y1.min(self.height as i64));
        for y in ya..yb {
            for x in xa..xb {
                self.set(x as u32, y as u32, rgba);
            }
        }
    }

    /// Alpha-over a color onto one pixel, scaled by `coverage`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Color, coverage: f64) {
        let src_a = (color.a * coverage).clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = Color::from_rgba8(self.get(x, y));
        let out_a = src_a + dst.a * (1.0 - src_a);
        let mix = |s: f64, d: f64| {
            if out_a <= 0.0 {
                0.0
            } else {
                (s * src_a + d * dst.a * (1.0 - src_a)) / out_a
            }
        };
        let out = Color::rgba(
            mix(color.r, dst.r),
            mix(color.g, dst.g),
            mix(color.b, dst.b),
            out_a,
        );
        self.set(x, y, out.to_rgba8());
    }

    /// Composite a coverage mask onto the canvas in a single color.
    pub fn composite_mask(&mut self, mask: &CoverageMask, color: Color) {
        debug_assert_eq!((mask.width, mask.height), (self.width, self.height));
        for y in 0..self.height {
            for x in 0..self.width {
                let coverage = mask.get(x, y);
                if coverage > 0.0 {
                    self.blend_pixel(x, y, color, coverage);
                }
            }
        }
    }

    /// Set the alpha channel of every pixel.
    pub fn set_alpha(&mut self, alpha: u8) {
        self.data.iter_mut().for_each(|px| px[3] = alpha);
    }

    /// Mirror the rows in place (top row becomes bottom row).
    pub fn flip_vertical(&mut self) {
        let w = self.width as usize;
        let h = self.height as usize;
        for y in 0..h / 2 {
            let (top, bottom) = self.data.split_at_mut((h - 1 - y) * w);
            top[y * w..(y + 1) * w].swap_with_slice(&mut bottom[..w]);
        }
    }

    /// Separable gaussian blur of all four channels, clamping at the edges.
    pub fn blur(&mut self, radius: u32, sigma: f32) -> WtxResult<()> {
        if radius == 0 {
            return Ok(());
        }
        let kernel = gaussian_kernel_q16(radius, sigma)?;
        let mut tmp = self.data.clone();
        blur_pass(&self.data, &mut tmp, self.width, self.height, &kernel, true);
        blur_pass(&tmp, &mut self.data, self.width, self.height, &kernel, false);
        Ok(())
    }

    /// Flatten to RGBA8 bytes.
    pub fn to_rgba8_bytes(&self) -> Vec<u8> {
        self.data.iter().flatten().copied().collect()
    }
}

/// Per-pixel coverage accumulator used to rasterize shapes.
#[derive(Debug, Clone)]
pub struct CoverageMask {
    pub width: u32,
    pub height: u32,
    data: Vec<f64>,
}

impl CoverageMask {
    /// Create an empty mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.data[(y * self.width + x) as usize]
    }

    /// Add a thick segment with round caps (a capsule) in pixel coordinates.
    pub fn add_capsule(&mut self, from: (f64, f64), to: (f64, f64), thickness: f64) {
        let half = thickness / 2.0;
        let min = (from.0.min(to.0) - half, from.1.min(to.1) - half);
        let max = (from.0.max(to.0) + half, from.1.max(to.1) + half);
        self.add_shape(min, max, |px, py| {
            half - distance_to_segment(px, py, from.0, from.1, to.0, to.1)
        });
    }

    /// Add a filled disc.
    pub fn add_disc(&mut self, center: (f64, f64), radius: f64) {
        self.add_capsule(center, center, radius * 2.0);
    }

    /// Add a square with rounded corners, `half_size` measured to the flat edge.
    pub fn add_rounded_square(&mut self, center: (f64, f64), half_size: f64, corner_radius: f64) {
        let r = corner_radius.clamp(0.0, half_size);
        let inner = half_size - r;
        let min = (center.0 - half_size, center.1 - half_size);
        let max = (center.0 + half_size, center.1 + half_size);
        self.add_shape(min, max, |px, py| {
            let qx = ((px - center.0).abs() - inner).max(0.0);
            let qy = ((py - center.1).abs() - inner).max(0.0);
            r - (qx * qx + qy * qy).sqrt()
        });
    }

    /// Rasterize a signed "inside distance" function over a bounding box.
    ///
    /// `inside(px, py)` returns how far the pixel center lies inside the
    /// shape (negative outside); coverage ramps over one pixel.
    fn add_shape<F>(&mut self, min: (f64, f64), max: (f64, f64), inside: F)
    where
        F: Fn(f64, f64) -> f64,
    {
        let x0 = (min.0 - 1.0).floor().max(0.0) as i64;
        let y0 = (min.1 - 1.0).floor().max(0.0) as i64;
        let x1 = ((max.0 + 1.0).ceil() as i64).min(self.width as i64);
        let y1 = ((max.1 + 1.0).ceil() as i64).min(self.height as i64);

        for y in y0..y1 {
            for x in x0..x1 {
                let coverage = (inside(x as f64 + 0.5, y as f64 + 0.5) + 0.5).clamp(0.0, 1.0);
                let idx = (y as u32 * self.width + x as u32) as usize;
                if coverage > self.data[idx] {
                    self.data[idx] = coverage;
                }
            }
        }
    }
}

/// Calculate distance from a point to a line segment.
pub fn distance_to_segment(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-10 {
        // Segment is a point
        let dpx = px - x1;
        let dpy = py - y1;
        return (dpx * dpx + dpy * dpy).sqrt();
    }

    // Project point onto line, clamping to segment
    let t = (((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0);

    let dpx = px - (x1 + t * dx);
    let dpy = py - (y1 + t * dy);
    (dpx * dpx + dpy * dpy).sqrt()
}

/// Largest blur radius; a kernel wider than any canvas edge adds nothing.
const MAX_BLUR_RADIUS: i32 = u16::MAX as i32;

/// Gaussian weights in Q16 fixed point, summing to exactly 65536.
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> WtxResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(WtxError::InvalidParameter(format!(
            "blur sigma must be > 0, got {}",
            sigma
        )));
    }

    let r = i32::try_from(radius)
        .ok()
        .filter(|&r| r <= MAX_BLUR_RADIUS)
        .ok_or_else(|| {
            WtxError::InvalidParameter(format!(
                "blur radius must be <= {}, got {}",
                MAX_BLUR_RADIUS, radius
            ))
        })?;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| (-(i as f64) * (i as f64) / denom).exp())
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();

    // Push the rounding residue into the center tap.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    weights[mid] = (i64::from(weights[mid]) + 65536 - acc).clamp(0, 65536) as u32;

    Ok(weights)
}

fn blur_pass(
    src: &[[u8; 4]],
    dst: &mut [[u8; 4]],
    width: u32,
    height: u32,
    kernel: &[u32],
    horizontal: bool,
) {
    let radius = (kernel.len() / 2) as i64;
    let (w, h) = (width as i64, height as i64);
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in kernel.iter().enumerate() {
                let d = ki as i64 - radius;
                let (sx, sy) = if horizontal {
                    ((x + d).clamp(0, w - 1), y)
                } else {
                    (x, (y + d).clamp(0, h - 1))
                };
                let px = src[(sy * w + sx) as usize];
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(px[c]);
                }
            }
            let out = &mut dst[(y * w + x) as usize];
            for c in 0..4 {
                out[c] = ((acc[c] + 32768) >> 16).min(255) as u8;
            }
        }
    }
}
