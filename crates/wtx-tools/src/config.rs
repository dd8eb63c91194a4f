//! Rendering styles and encode options.
//!
//! The C boundary always uses the defaults; the CLI can override them from a
//! JSON file. All values are plain data so a style round-trips through serde.

use serde::{Deserialize, Serialize};

use crate::compress::WtxFormat;
use crate::error::{WtxError, WtxResult};

/// Largest edge the WTX header can store.
pub const MAX_TEXTURE_EDGE: u32 = u16::MAX as u32;

/// Look of the generated "spec" (gloss) textures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecStyle {
    /// Edge length of the square canvas in pixels.
    pub canvas_size: u32,
    /// Gray level of the untouched surface (0..1).
    pub background_level: f64,
    /// Gray level of the drawn path (0..1).
    pub stroke_level: f64,
    /// Stroke thickness used for instruction-driven paths, in pixels.
    pub instruction_thickness: f64,
    /// Radius of the start disc drawn at the head of each path, in pixels.
    pub start_radius: f64,
    /// Gaussian blur radius in pixels; 0 disables the blur.
    pub blur_radius: u32,
    /// Gaussian blur sigma.
    pub blur_sigma: f32,
}

impl Default for SpecStyle {
    fn default() -> Self {
        Self {
            canvas_size: 512,
            background_level: 0.62,
            stroke_level: 0.0,
            instruction_thickness: 30.0,
            start_radius: 35.0,
            blur_radius: 15,
            blur_sigma: 5.0,
        }
    }
}

impl SpecStyle {
    /// Set the blur.
    pub fn with_blur(mut self, radius: u32, sigma: f32) -> Self {
        self.blur_radius = radius;
        self.blur_sigma = sigma;
        self
    }

    /// Set the start disc radius.
    pub fn with_start_radius(mut self, radius: f64) -> Self {
        self.start_radius = radius;
        self
    }

    /// Check the style before rendering with it.
    pub fn validate(&self) -> WtxResult<()> {
        validate_canvas_size(self.canvas_size)?;
        validate_level("background_level", self.background_level)?;
        validate_level("stroke_level", self.stroke_level)?;
        if !self.instruction_thickness.is_finite() || self.instruction_thickness <= 0.0 {
            return Err(WtxError::InvalidParameter(
                "instruction_thickness must be > 0".to_string(),
            ));
        }
        if !self.start_radius.is_finite() || self.start_radius < 0.0 {
            return Err(WtxError::InvalidParameter(
                "start_radius must be >= 0".to_string(),
            ));
        }
        if self.blur_radius > self.canvas_size {
            return Err(WtxError::InvalidParameter(format!(
                "blur_radius must be <= canvas_size ({}), got {}",
                self.canvas_size, self.blur_radius
            )));
        }
        if self.blur_radius > 0 && (!self.blur_sigma.is_finite() || self.blur_sigma <= 0.0) {
            return Err(WtxError::InvalidParameter(
                "blur_sigma must be > 0 when blur_radius is set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Layout of the color-panel textures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelStyle {
    /// Edge length of the square canvas in pixels.
    pub canvas_size: u32,
    /// Span in pixels the longer board side is stretched over.
    pub board_span: f64,
    /// Stone width as a fraction of the cell pitch.
    pub stone_size: f64,
    /// Corner rounding as a fraction of half the stone width.
    pub corner_radius: f64,
    /// Clear the alpha channel after compositing.
    pub clear_alpha: bool,
}

impl Default for PanelStyle {
    fn default() -> Self {
        Self {
            canvas_size: 512,
            board_span: 360.0,
            stone_size: 0.3,
            corner_radius: 0.45,
            clear_alpha: true,
        }
    }
}

impl PanelStyle {
    /// Check the style before rendering with it.
    pub fn validate(&self) -> WtxResult<()> {
        validate_canvas_size(self.canvas_size)?;
        if !self.board_span.is_finite() || self.board_span <= 0.0 {
            return Err(WtxError::InvalidParameter(
                "board_span must be > 0".to_string(),
            ));
        }
        validate_level("stone_size", self.stone_size)?;
        validate_level("corner_radius", self.corner_radius)
    }
}

/// How a canvas is turned into a WTX container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Build the full mip chain down to 1x1.
    pub gen_mipmaps: bool,
    /// Block compression format.
    pub format: WtxFormat,
    /// Header flag byte; also the DXT1 alpha cutoff.
    pub bits: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            gen_mipmaps: false,
            format: WtxFormat::Dxt5,
            bits: 0,
        }
    }
}

impl EncodeOptions {
    /// Options used for generated spec textures.
    pub const fn spec_preset() -> Self {
        Self {
            gen_mipmaps: true,
            format: WtxFormat::Dxt1,
            bits: 0x05,
        }
    }

    /// Options used for generated color panels.
    pub const fn panel_preset() -> Self {
        Self {
            gen_mipmaps: true,
            format: WtxFormat::Dxt5,
            bits: 0x01,
        }
    }
}

fn validate_canvas_size(size: u32) -> WtxResult<()> {
    if size == 0 || size > MAX_TEXTURE_EDGE {
        return Err(WtxError::Dimension(format!(
            "canvas_size must be in 1..={}, got {}",
            MAX_TEXTURE_EDGE, size
        )));
    }
    Ok(())
}

fn validate_level(name: &str, value: f64) -> WtxResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(WtxError::InvalidParameter(format!(
            "{} must be in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}
