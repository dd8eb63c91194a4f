//! Puzzle grids at wall/cell granularity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{WtxError, WtxResult};

/// Randomizer cell flag marking a stone.
const STONE_FLAG: u32 = 0x100;
/// Randomizer cell bits holding the stone color.
const COLOR_MASK: u32 = 0xF;

/// Color of a stone on a color panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WtxColor {
    NoColor,

    TricolorWhite,
    TricolorPurple,
    TricolorGreen,

    TricolorNewWhite,
    TricolorNewPink,
    TricolorNewBlue,
    TricolorNewYellow,
}

impl WtxColor {
    /// All colors in declaration order (the C enum values).
    pub const ALL: [WtxColor; 8] = [
        WtxColor::NoColor,
        WtxColor::TricolorWhite,
        WtxColor::TricolorPurple,
        WtxColor::TricolorGreen,
        WtxColor::TricolorNewWhite,
        WtxColor::TricolorNewPink,
        WtxColor::TricolorNewBlue,
        WtxColor::TricolorNewYellow,
    ];

    /// Translate a C enum value.
    pub fn from_raw(raw: u32) -> WtxResult<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|i| WtxColor::ALL.get(i).copied())
            .ok_or_else(|| WtxError::UnsupportedFormat(format!("unknown stone color {}", raw)))
    }

    /// Enum name, as written in the C header and the puzzle tables.
    pub fn name(self) -> &'static str {
        match self {
            WtxColor::NoColor => "NoColor",
            WtxColor::TricolorWhite => "TricolorWhite",
            WtxColor::TricolorPurple => "TricolorPurple",
            WtxColor::TricolorGreen => "TricolorGreen",
            WtxColor::TricolorNewWhite => "TricolorNewWhite",
            WtxColor::TricolorNewPink => "TricolorNewPink",
            WtxColor::TricolorNewBlue => "TricolorNewBlue",
            WtxColor::TricolorNewYellow => "TricolorNewYellow",
        }
    }

    /// Decode one cell of the randomizer's panel grid.
    pub fn from_randomizer_cell(cell: u32) -> WtxResult<Self> {
        if cell & STONE_FLAG == 0 {
            return Ok(WtxColor::NoColor);
        }
        match cell & COLOR_MASK {
            0x2 => Ok(WtxColor::TricolorWhite),
            0x4 => Ok(WtxColor::TricolorPurple),
            0x5 => Ok(WtxColor::TricolorGreen),
            0x7 => Ok(WtxColor::TricolorNewPink),
            0x8 => Ok(WtxColor::TricolorNewYellow),
            0x9 => Ok(WtxColor::TricolorNewBlue),
            other => Err(WtxError::UnsupportedFormat(format!(
                "unknown stone color 0x{:x} in cell 0x{:x}",
                other, cell
            ))),
        }
    }

    /// Fill color of the stone; the same on every background.
    pub fn tint(self) -> Option<Color> {
        let hex = match self {
            WtxColor::NoColor => return None,
            WtxColor::TricolorWhite => 0xffffff,
            WtxColor::TricolorPurple => 0xa551ff,
            WtxColor::TricolorGreen => 0x6eab5d,
            WtxColor::TricolorNewWhite => 0xffffff,
            WtxColor::TricolorNewPink => 0xa437f0,
            WtxColor::TricolorNewBlue => 0x00a8e9,
            WtxColor::TricolorNewYellow => 0xf9f845,
        };
        Some(Color::from_hex(hex))
    }
}

impl fmt::Display for WtxColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the enum name (any case) or its raw value.
impl FromStr for WtxColor {
    type Err = WtxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(raw) = s.parse::<u32>() {
            return Self::from_raw(raw);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| WtxError::UnsupportedFormat(format!("unknown stone color '{}'", s)))
    }
}

/// A puzzle laid out at wall/cell granularity, row-major.
///
/// An N×M board is a (2N+1)×(2M+1) grid. Board cells sit at odd/odd
/// positions; every other position is a wall or intersection and carries no
/// stone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleGrid {
    width: usize,
    height: usize,
    cells: Vec<WtxColor>,
}

impl PuzzleGrid {
    /// Wrap a row-major cell list, checking it against the declared size.
    pub fn new(width: usize, height: usize, cells: Vec<WtxColor>) -> WtxResult<Self> {
        if width == 0 || height == 0 {
            return Err(WtxError::Dimension(format!(
                "grid must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        let expected = width.checked_mul(height).ok_or_else(|| {
            WtxError::Dimension(format!("grid size {}x{} overflows", width, height))
        })?;
        if cells.len() != expected {
            return Err(WtxError::Dimension(format!(
                "grid of {}x{} needs {} cells, got {}",
                width,
                height,
                expected,
                cells.len()
            )));
        }
        Ok(Self { width, height, cells })
    }

    /// Expand a 3×3 board (row-major stones) into its 7×7 wall/cell grid.
    pub fn from_3x3(stones: &[WtxColor; 9]) -> Self {
        let mut cells = vec![WtxColor::NoColor; 49];
        for (i, &stone) in stones.iter().enumerate() {
            let (col, row) = (i % 3, i / 3);
            cells[(2 * row + 1) * 7 + 2 * col + 1] = stone;
        }
        Self {
            width: 7,
            height: 7,
            cells,
        }
    }

    /// Decode the randomizer's flattened grid.
    ///
    /// The randomizer stores its grid column by column, so cell (x, y) lives
    /// at `x * height + y`. Only board-cell positions are decoded.
    pub fn from_randomizer_cells(raw: &[u32], width: usize, height: usize) -> WtxResult<Self> {
        let expected = width.checked_mul(height).unwrap_or(usize::MAX);
        if raw.len() != expected {
            return Err(WtxError::Dimension(format!(
                "grid of {}x{} needs {} cells, got {}",
                width,
                height,
                expected,
                raw.len()
            )));
        }
        let mut cells = vec![WtxColor::NoColor; raw.len()];
        for y in (1..height).step_by(2) {
            for x in (1..width).step_by(2) {
                cells[y * width + x] = WtxColor::from_randomizer_cell(raw[x * height + y])?;
            }
        }
        Self::new(width, height, cells)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at grid position (x, y).
    pub fn get(&self, x: usize, y: usize) -> WtxColor {
        self.cells[y * self.width + x]
    }

    /// Board size in cells, walls excluded.
    pub fn board_size(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Every board cell as (column, row, color), row by row.
    pub fn stones(&self) -> impl Iterator<Item = (usize, usize, WtxColor)> + '_ {
        let (board_w, board_h) = self.board_size();
        (0..board_h).flat_map(move |row| {
            (0..board_w).map(move |col| (col, row, self.get(2 * col + 1, 2 * row + 1)))
        })
    }
}
