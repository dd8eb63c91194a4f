//! Texture tools for the desert and color-panel puzzles.
//!
//! This crate renders the textures a randomizer injects into the game and
//! encodes them as WTX files, the game's block-compressed texture container.
//! It is linked into the injected runtime as a C library and also used by
//! the `wtx-tools` command-line tool.
//!
//! # Features
//!
//! - **Spec textures**: gloss maps with the solution path drawn in, from
//!   coordinate arrays (with optional symmetry) or an instruction string
//! - **Color panels**: tricolor stone puzzles on one of five backdrops
//! - **Image conversion**: PNG, JPEG, BMP or TGA files to WTX
//! - **WTX encoding**: mip chains with DXT1/DXT5 block compression
//!
//! # Example
//!
//! ```no_run
//! use wtx_tools::generate::generate_panel_from_3x3;
//! use wtx_tools::panel::{ColorPanelBackground, WtxColor};
//!
//! let mut stones = [WtxColor::NoColor; 9];
//! stones[4] = WtxColor::TricolorPurple;
//! let wtx = generate_panel_from_3x3(&stones, ColorPanelBackground::Blueprint).unwrap();
//! std::fs::write("panel.wtx", wtx).unwrap();
//! ```
//!
//! # Determinism
//!
//! Identical inputs produce byte-identical files: backdrop grain comes from
//! a seeded PCG32, blurring uses fixed-point weights, and the compressors
//! are plain integer code.

pub mod boundary;
pub mod canvas;
pub mod color;
pub mod compress;
pub mod config;
pub mod error;
pub mod generate;
pub mod ingest;
pub mod instructions;
pub mod line;
pub mod mip;
pub mod panel;
pub mod png;
pub mod rng;
pub mod wtx;

// Re-export main types for convenience
pub use boundary::{outstanding_buffers, ImgFileBuffer, OwnedTexture, TextureBuffer};
pub use canvas::{CoverageMask, RasterCanvas};
pub use color::Color;
pub use compress::WtxFormat;
pub use config::{EncodeOptions, PanelStyle, SpecStyle};
pub use error::{WtxError, WtxResult};
pub use generate::{
    generate_instruction_spec, generate_line_spec, generate_panel_from_3x3, generate_panel_from_grid,
    image_to_wtx,
};
pub use instructions::{parse_instructions, InstructionPath};
pub use line::{LineSpecRequest, Symmetry, Waypoint};
pub use panel::{ColorPanelBackground, PanelSave, PuzzleGrid, WtxColor};
pub use png::{PngConfig, PngError};
pub use rng::DeterministicRng;
pub use wtx::{encode_wtx, WtxHeader, WtxTexture};
