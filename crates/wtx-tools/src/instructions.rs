//! Textual path instructions for spec textures.
//!
//! An instruction string is a whitespace-separated list of anchor names on a
//! 3x3 grid laid over the canvas:
//!
//! ```text
//!   TopLeft     Top     TopRight
//!   Left       Center   Right
//!   BottomLeft  Bottom  BottomRight
//! ```
//!
//! Consecutive anchors are joined into a polyline. Appending `End` to a name
//! (`BottomLeftEnd`) places the point on the panel rim instead of the inner
//! grid and closes the polyline there; the next token, if any, starts a new
//! polyline.

use std::fmt;
use std::str::FromStr;

use crate::error::{WtxError, WtxResult};
use crate::line::Waypoint;

/// Canvas fraction of the inner grid's outer rows/columns, from the center.
const INNER_OFFSET: f64 = 0.3;
/// Canvas fraction of the rim points, from the center.
const RIM_OFFSET: f64 = 0.44;

const END_SUFFIX: &str = "End";

/// One of the nine anchor points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
}

impl Anchor {
    /// All anchors in reading order.
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::Top,
        Anchor::TopRight,
        Anchor::Left,
        Anchor::Center,
        Anchor::Right,
        Anchor::BottomLeft,
        Anchor::Bottom,
        Anchor::BottomRight,
    ];

    /// Token name of the anchor.
    pub fn name(self) -> &'static str {
        match self {
            Anchor::TopLeft => "TopLeft",
            Anchor::Top => "Top",
            Anchor::TopRight => "TopRight",
            Anchor::Left => "Left",
            Anchor::Center => "Center",
            Anchor::Right => "Right",
            Anchor::BottomLeft => "BottomLeft",
            Anchor::Bottom => "Bottom",
            Anchor::BottomRight => "BottomRight",
        }
    }

    /// Column and row on the grid, each in -1..=1.
    fn grid_cell(self) -> (f64, f64) {
        let index = Anchor::ALL.iter().position(|&a| a == self).unwrap_or(4);
        ((index % 3) as f64 - 1.0, (index / 3) as f64 - 1.0)
    }

    /// Normalized position, on the rim when `on_rim` is set.
    pub fn position(self, on_rim: bool) -> Waypoint {
        let offset = if on_rim { RIM_OFFSET } else { INNER_OFFSET };
        let (col, row) = self.grid_cell();
        Waypoint::new(0.5 + col * offset, 0.5 + row * offset)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single parsed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub anchor: Anchor,
    /// Set for `...End` tokens: rim point that closes the polyline.
    pub terminal: bool,
}

impl Instruction {
    /// Normalized position of this instruction's waypoint.
    pub fn waypoint(&self) -> Waypoint {
        self.anchor.position(self.terminal)
    }
}

impl FromStr for Instruction {
    type Err = WtxError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (name, terminal) = match token.strip_suffix(END_SUFFIX) {
            Some(stem) => (stem, true),
            None => (token, false),
        };
        Anchor::ALL
            .iter()
            .find(|a| a.name() == name)
            .map(|&anchor| Instruction { anchor, terminal })
            .ok_or_else(|| WtxError::Parse(format!("unknown instruction '{}'", token)))
    }
}

/// An ordered, validated list of instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionPath {
    instructions: Vec<Instruction>,
}

impl InstructionPath {
    /// The parsed tokens in order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Every waypoint in token order.
    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.instructions.iter().map(Instruction::waypoint).collect()
    }

    /// Waypoints grouped into polylines, split after each terminal token.
    pub fn polylines(&self) -> Vec<Vec<Waypoint>> {
        let mut lines = Vec::new();
        let mut current = Vec::new();
        for instruction in &self.instructions {
            current.push(instruction.waypoint());
            if instruction.terminal {
                lines.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// Parse a whitespace-separated instruction string.
pub fn parse_instructions(input: &str) -> WtxResult<InstructionPath> {
    let instructions = input
        .split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            token.parse::<Instruction>().map_err(|_| {
                WtxError::Parse(format!(
                    "unknown instruction '{}' at position {}",
                    token, position
                ))
            })
        })
        .collect::<WtxResult<Vec<_>>>()?;

    if instructions.is_empty() {
        return Err(WtxError::Parse("instruction string is empty".to_string()));
    }

    let path = InstructionPath { instructions };
    if path.polylines().iter().all(|line| line.len() < 2) {
        return Err(WtxError::Parse(
            "instructions contain no segment (need at least two connected anchors)".to_string(),
        ));
    }
    Ok(path)
}
