//! CLI argument definitions for the wtx-tools command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgAction, Parser, Subcommand};

/// wtx-tools - WTX texture conversion and generation
#[derive(Parser)]
#[command(name = "wtx-tools")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Style overrides (JSON with optional "spec" and "panel" sections)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Convert image files to WTX, writing <file>.wtx next to each input
    Encode {
        /// Include mipmaps; all sizes down to 1x1 are generated
        #[arg(long)]
        include_mipmaps: bool,

        /// Block compression format
        #[arg(long, default_value = "DXT5", value_parser = ["DXT5", "DXT1"])]
        format: String,

        /// Value of header byte 20; also the DXT1 alpha cutoff
        #[arg(long, default_value_t = 0)]
        bits: u8,

        /// Image files to convert (PNG, JPEG, BMP, TGA)
        #[arg(required = true)]
        files: Vec<String>,
    },

    /// Generate a spec texture from path instructions
    Spec {
        /// Whitespace-separated anchors, e.g. "TopLeft Top Center BottomEnd"
        #[arg(short, long)]
        instructions: String,

        /// Output WTX path
        #[arg(short, long)]
        output: String,

        /// Also write the rendered canvas as PNG
        #[arg(long)]
        png: Option<String>,
    },

    /// Generate a 3x3 color panel
    Panel {
        /// Nine comma-separated stone colors, row by row, by name or enum value,
        /// e.g. NoColor,TricolorGreen,NoColor,TricolorPurple,NoColor,TricolorGreen,TricolorWhite,TricolorPurple,NoColor
        #[arg(long)]
        grid: String,

        /// Backdrop (blueprint, white, light-grey, dark-grey, elevator)
        #[arg(long, default_value = "blueprint")]
        background: String,

        /// Output WTX path
        #[arg(short, long)]
        output: String,

        /// Also write the opaque panel as PNG
        #[arg(long)]
        png: Option<String>,
    },

    /// Print the header and level layout of a WTX file
    Inspect {
        /// WTX file to inspect
        file: String,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}
