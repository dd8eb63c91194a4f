//! wtx-tools CLI - converts images to WTX and generates puzzle textures.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

mod cli_args;

use cli_args::{Cli, Commands};
use wtx_tools_cli::{commands, config, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = config::ToolConfig::load(cli.config.as_deref().map(Path::new)).and_then(|config| {
        match cli.command {
            Commands::Encode {
                include_mipmaps,
                format,
                bits,
                files,
            } => commands::encode::run(&files, include_mipmaps, &format, bits),
            Commands::Spec {
                instructions,
                output,
                png,
            } => commands::spec::run(&instructions, &output, png.as_deref(), &config.spec),
            Commands::Panel {
                grid,
                background,
                output,
                png,
            } => commands::panel::run(&grid, &background, &output, png.as_deref(), &config.panel),
            Commands::Inspect { file, json } => commands::inspect::run(&file, json),
        }
    });

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_encode() {
        let cli = Cli::try_parse_from([
            "wtx-tools",
            "encode",
            "--include-mipmaps",
            "--format",
            "DXT1",
            "--bits",
            "5",
            "a.png",
            "b.jpg",
        ])
        .unwrap();
        match cli.command {
            Commands::Encode {
                include_mipmaps,
                format,
                bits,
                files,
            } => {
                assert!(include_mipmaps);
                assert_eq!(format, "DXT1");
                assert_eq!(bits, 5);
                assert_eq!(files, vec!["a.png", "b.jpg"]);
            }
            _ => panic!("expected encode command"),
        }
    }

    #[test]
    fn test_cli_encode_defaults() {
        let cli = Cli::try_parse_from(["wtx-tools", "encode", "a.png"]).unwrap();
        match cli.command {
            Commands::Encode {
                include_mipmaps,
                format,
                bits,
                ..
            } => {
                assert!(!include_mipmaps);
                assert_eq!(format, "DXT5");
                assert_eq!(bits, 0);
            }
            _ => panic!("expected encode command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format_and_missing_files() {
        assert!(Cli::try_parse_from(["wtx-tools", "encode", "--format", "DXT3", "a.png"]).is_err());
        assert!(Cli::try_parse_from(["wtx-tools", "encode"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "wtx-tools",
            "panel",
            "--grid",
            "0,5,0,4,0,5,2,4,0",
            "-o",
            "out.wtx",
            "-vv",
            "--config",
            "style.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some("style.json"));
        match cli.command {
            Commands::Panel {
                background, png, ..
            } => {
                assert_eq!(background, "blueprint");
                assert!(png.is_none());
            }
            _ => panic!("expected panel command"),
        }
    }

    #[test]
    fn test_cli_parses_spec_and_inspect() {
        let cli = Cli::try_parse_from([
            "wtx-tools",
            "spec",
            "--instructions",
            "Left Right",
            "-o",
            "s.wtx",
            "--png",
            "s.png",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Spec { ref png, .. } if png.as_deref() == Some("s.png")));

        let cli = Cli::try_parse_from(["wtx-tools", "inspect", "s.wtx", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect { json: true, .. }));
    }
}
