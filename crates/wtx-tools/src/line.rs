//! Line-pattern spec textures.
//!
//! Paths are polylines in normalized canvas coordinates (`0..1`, y down).
//! They are stroked with round caps and joins in a dark gray over a flat
//! gloss level, a start disc marks the head of each path, and the result is
//! softened with a gaussian blur so the gloss falls off smoothly.

use tracing::debug;

use crate::canvas::{CoverageMask, RasterCanvas};
use crate::color::Color;
use crate::config::SpecStyle;
use crate::error::{WtxError, WtxResult};
use crate::instructions::InstructionPath;

/// A point in normalized canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

impl Waypoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Pixel position on a square canvas of `size` pixels.
    fn to_pixels(self, size: u32) -> (f64, f64) {
        (self.x * size as f64, self.y * size as f64)
    }
}

/// Zip separate x and y coordinate arrays into waypoints.
pub fn waypoints_from_xy(xs: &[f32], ys: &[f32]) -> WtxResult<Vec<Waypoint>> {
    if xs.len() != ys.len() {
        return Err(WtxError::Dimension(format!(
            "{} x coordinates but {} y coordinates",
            xs.len(),
            ys.len()
        )));
    }
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            if x.is_finite() && y.is_finite() {
                Ok(Waypoint::new(f64::from(x), f64::from(y)))
            } else {
                Err(WtxError::InvalidParameter(format!(
                    "non-finite waypoint ({}, {})",
                    x, y
                )))
            }
        })
        .collect()
}

/// Symmetry classes of the puzzle randomizer, in its declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symmetry {
    None,
    Horizontal,
    Vertical,
    Rotational,
    RotateLeft,
    RotateRight,
    FlipXY,
    FlipNegXY,
    ParallelH,
    ParallelV,
    ParallelHFlip,
    ParallelVFlip,
    PillarParallel,
    PillarHorizontal,
    PillarVertical,
    PillarRotational,
}

/// Axis along which a translated symmetric copy wraps around the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WrapAxis {
    X,
    Y,
}

impl Symmetry {
    const ALL: [Symmetry; 16] = [
        Symmetry::None,
        Symmetry::Horizontal,
        Symmetry::Vertical,
        Symmetry::Rotational,
        Symmetry::RotateLeft,
        Symmetry::RotateRight,
        Symmetry::FlipXY,
        Symmetry::FlipNegXY,
        Symmetry::ParallelH,
        Symmetry::ParallelV,
        Symmetry::ParallelHFlip,
        Symmetry::ParallelVFlip,
        Symmetry::PillarParallel,
        Symmetry::PillarHorizontal,
        Symmetry::PillarVertical,
        Symmetry::PillarRotational,
    ];

    /// Translate the randomizer's integer value.
    pub fn from_raw(raw: i32) -> WtxResult<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| Symmetry::ALL.get(i).copied())
            .ok_or_else(|| WtxError::UnsupportedFormat(format!("unknown symmetry {}", raw)))
    }

    /// Where the symmetric copy of `p` lands, or `None` for no symmetry.
    pub fn apply(self, p: Waypoint) -> Option<Waypoint> {
        let (x, y) = (p.x, p.y);
        let mapped = match self {
            Symmetry::None => return None,
            Symmetry::Horizontal => (x, 1.0 - y),
            Symmetry::Vertical => (1.0 - x, y),
            Symmetry::Rotational => (1.0 - x, 1.0 - y),
            Symmetry::RotateLeft => (y, 1.0 - x),
            Symmetry::RotateRight => (1.0 - y, x),
            Symmetry::FlipXY => (y, x),
            Symmetry::FlipNegXY => (1.0 - y, 1.0 - x),
            Symmetry::ParallelH => (x, y + 0.5),
            Symmetry::ParallelV => (x + 0.5, y),
            Symmetry::ParallelHFlip => (1.0 - x, y + 0.5),
            Symmetry::ParallelVFlip => (x + 0.5, 1.0 - y),
            Symmetry::PillarParallel => (x + 0.5, y),
            Symmetry::PillarHorizontal => (x + 0.5, 1.0 - y),
            Symmetry::PillarVertical => (0.5 - x, y),
            Symmetry::PillarRotational => (0.5 - x, 1.0 - y),
        };
        Some(Waypoint::new(mapped.0, mapped.1))
    }

    fn wrap_axis(self) -> Option<WrapAxis> {
        match self {
            Symmetry::ParallelH | Symmetry::ParallelHFlip => Some(WrapAxis::Y),
            Symmetry::ParallelV
            | Symmetry::ParallelVFlip
            | Symmetry::PillarParallel
            | Symmetry::PillarHorizontal
            | Symmetry::PillarVertical
            | Symmetry::PillarRotational => Some(WrapAxis::X),
            _ => None,
        }
    }

    /// Every symmetric copy of a path, wrapped copies included.
    fn copies(self, path: &[Waypoint]) -> Vec<Vec<Waypoint>> {
        let Some(mapped) = path.iter().map(|&p| self.apply(p)).collect::<Option<Vec<_>>>() else {
            return Vec::new();
        };
        match self.wrap_axis() {
            None => vec![mapped],
            Some(axis) => [-1.0, 0.0, 1.0]
                .iter()
                .map(|&shift| {
                    mapped
                        .iter()
                        .map(|p| match axis {
                            WrapAxis::X => Waypoint::new(p.x + shift, p.y),
                            WrapAxis::Y => Waypoint::new(p.x, p.y + shift),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

/// Input of a line-pattern spec texture.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSpecRequest {
    /// Main path.
    pub primary: Vec<Waypoint>,
    /// Independent second path drawn in the same pass.
    pub secondary: Option<Vec<Waypoint>>,
    /// Stroke thickness in pixels.
    pub thickness: f64,
    /// Draw symmetric copies of every path.
    pub symmetry: Option<Symmetry>,
}

impl LineSpecRequest {
    /// Single path, no symmetry.
    pub fn new(primary: Vec<Waypoint>, thickness: f64) -> Self {
        Self {
            primary,
            secondary: None,
            thickness,
            symmetry: None,
        }
    }

    /// Add the second path.
    pub fn with_secondary(mut self, secondary: Vec<Waypoint>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Set the symmetry.
    pub fn with_symmetry(mut self, symmetry: Symmetry) -> Self {
        self.symmetry = Some(symmetry);
        self
    }

    fn paths(&self) -> impl Iterator<Item = &[Waypoint]> {
        std::iter::once(self.primary.as_slice()).chain(self.secondary.as_deref())
    }
}

/// Render a line-pattern spec texture.
pub fn render_lines(request: &LineSpecRequest, style: &SpecStyle) -> WtxResult<RasterCanvas> {
    style.validate()?;
    validate_thickness(request.thickness)?;

    let size = style.canvas_size;
    let mut mask = CoverageMask::new(size, size);
    for (index, path) in request.paths().enumerate() {
        if path.len() < 2 {
            debug!(index, points = path.len(), "skipping degenerate path");
            continue;
        }
        stroke_path(&mut mask, path, request.thickness, style);
        if let Some(symmetry) = request.symmetry {
            for copy in symmetry.copies(path) {
                stroke_path(&mut mask, &copy, request.thickness, style);
            }
        }
    }

    finish_spec_canvas(&mask, style)
}

/// Render the polylines of a parsed instruction string.
pub fn render_instruction_path(path: &InstructionPath, style: &SpecStyle) -> WtxResult<RasterCanvas> {
    style.validate()?;

    let size = style.canvas_size;
    let mut mask = CoverageMask::new(size, size);
    for line in path.polylines().iter().filter(|line| line.len() >= 2) {
        stroke_path(&mut mask, line, style.instruction_thickness, style);
    }

    finish_spec_canvas(&mask, style)
}

fn validate_thickness(thickness: f64) -> WtxResult<()> {
    if !thickness.is_finite() || thickness <= 0.0 {
        return Err(WtxError::InvalidParameter(format!(
            "line thickness must be > 0, got {}",
            thickness
        )));
    }
    Ok(())
}

fn stroke_path(mask: &mut CoverageMask, path: &[Waypoint], thickness: f64, style: &SpecStyle) {
    let size = style.canvas_size;
    for pair in path.windows(2) {
        mask.add_capsule(pair[0].to_pixels(size), pair[1].to_pixels(size), thickness);
    }
    if style.start_radius > 0.0 {
        mask.add_disc(path[0].to_pixels(size), style.start_radius);
    }
}

fn finish_spec_canvas(mask: &CoverageMask, style: &SpecStyle) -> WtxResult<RasterCanvas> {
    let size = style.canvas_size;
    let mut canvas = RasterCanvas::new(size, size, Color::gray(style.background_level));
    canvas.composite_mask(mask, Color::gray(style.stroke_level));
    canvas.blur(style.blur_radius, style.blur_sigma)?;
    Ok(canvas)
}
