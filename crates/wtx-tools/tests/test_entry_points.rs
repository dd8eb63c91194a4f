//! End-to-end tests of the safe generation API.

use pretty_assertions::assert_eq;

use wtx_tools::config::{EncodeOptions, PanelStyle, SpecStyle};
use wtx_tools::generate::{
    generate_instruction_spec, generate_instruction_spec_with_style, generate_line_spec,
    generate_line_spec_with_style, generate_panel_from_3x3, generate_panel_from_grid,
    generate_panel_with_style, image_to_wtx,
};
use wtx_tools::line::render_lines;
use wtx_tools::panel::{paint_panel, PanelSave};
use wtx_tools::png::{write_rgba_to_writer, PngConfig};
use wtx_tools::wtx::{encode_wtx, WtxHeader, WtxTexture};
use wtx_tools::{
    Color, ColorPanelBackground, LineSpecRequest, PuzzleGrid, RasterCanvas, Symmetry, Waypoint,
    WtxColor, WtxError, WtxFormat,
};

const REFERENCE_PATH: &str = "TopLeft Top Center Bottom BottomLeft BottomLeftEnd";

fn example_stones() -> [WtxColor; 9] {
    use WtxColor::*;
    [
        NoColor,
        TricolorGreen,
        NoColor,
        TricolorPurple,
        NoColor,
        TricolorGreen,
        TricolorWhite,
        TricolorPurple,
        NoColor,
    ]
}

fn sharp_style(size: u32) -> SpecStyle {
    SpecStyle {
        canvas_size: size,
        ..SpecStyle::default()
    }
    .with_blur(0, 1.0)
    .with_start_radius(0.0)
}

// ============================================================================
// Spec textures
// ============================================================================

#[test]
fn test_instruction_spec_is_deterministic() {
    let a = generate_instruction_spec(REFERENCE_PATH).unwrap();
    let b = generate_instruction_spec(REFERENCE_PATH).unwrap();
    assert_eq!(a, b);

    let texture = WtxTexture::parse(&a).unwrap();
    assert_eq!(texture.levels().len(), 10);
    assert_eq!(texture.levels()[0].len(), 128 * 128 * 8);
}

#[test]
fn test_instruction_spec_draws_on_the_path() {
    let style = sharp_style(100);
    let bytes = generate_instruction_spec_with_style("Left Center Right", &style).unwrap();
    let texture = WtxTexture::parse(&bytes).unwrap();
    let canvas = texture.decode_level(0).unwrap();

    assert!(canvas.get(50, 50)[0] < 40, "center of the stroke is dark");
    assert!(canvas.get(50, 10)[0] > 120, "far from the stroke is the gloss level");
}

#[test]
fn test_two_paths_render_independently() {
    let style = sharp_style(128);
    let a = vec![Waypoint::new(0.1, 0.2), Waypoint::new(0.9, 0.2)];
    let b = vec![Waypoint::new(0.2, 0.1), Waypoint::new(0.2, 0.9)];

    let both = render_lines(
        &LineSpecRequest::new(a.clone(), 8.0).with_secondary(b.clone()),
        &style,
    )
    .unwrap();
    let only_a = render_lines(&LineSpecRequest::new(a, 8.0), &style).unwrap();
    let only_b = render_lines(&LineSpecRequest::new(b, 8.0), &style).unwrap();

    // a dark stroke over a flat level: the union is the darker of the two
    for i in 0..both.data.len() {
        let expected = only_a.data[i].min(only_b.data[i]);
        assert_eq!(both.data[i], expected, "pixel {}", i);
    }
}

#[test]
fn test_symmetry_changes_output() {
    let path = vec![Waypoint::new(0.1, 0.1), Waypoint::new(0.3, 0.2)];
    let plain = generate_line_spec(&LineSpecRequest::new(path.clone(), 20.0)).unwrap();
    let mirrored = generate_line_spec(
        &LineSpecRequest::new(path.clone(), 20.0).with_symmetry(Symmetry::Vertical),
    )
    .unwrap();
    let none = generate_line_spec(&LineSpecRequest::new(path, 20.0).with_symmetry(Symmetry::None))
        .unwrap();

    assert_ne!(plain, mirrored);
    assert_eq!(plain, none);
}

#[test]
fn test_line_spec_rejects_bad_thickness() {
    let request = LineSpecRequest::new(vec![Waypoint::new(0.0, 0.0), Waypoint::new(1.0, 1.0)], -3.0);
    assert!(matches!(
        generate_line_spec_with_style(&request, &SpecStyle::default()),
        Err(WtxError::InvalidParameter(_))
    ));
}

// ============================================================================
// Color panels
// ============================================================================

#[test]
fn test_example_panel_header_and_stones() {
    let bytes = generate_panel_from_3x3(&example_stones(), ColorPanelBackground::Blueprint).unwrap();
    let header = WtxHeader::parse(&bytes).unwrap();
    assert_eq!((header.width, header.height), (512, 512));
    assert_eq!(header.format, WtxFormat::Dxt5);
    assert_eq!(header.mip_count, 10);

    let canvas = WtxTexture::parse(&bytes).unwrap().decode_level(0).unwrap();
    let near = |x: u32, y: u32, color: WtxColor| {
        let want = color.tint().unwrap().to_rgba8();
        let got = canvas.get(x, y);
        (0..3).all(|c| (want[c] as i32 - got[c] as i32).abs() <= 12)
    };
    assert!(near(256, 136, WtxColor::TricolorGreen));
    assert!(near(136, 256, WtxColor::TricolorPurple));
    assert!(near(136, 376, WtxColor::TricolorWhite));
    assert!(!near(256, 256, WtxColor::TricolorGreen));
    assert!(canvas.data.iter().all(|px| px[3] == 0));
}

#[test]
fn test_any_valid_grid_yields_512_panel() {
    for (w, h) in [(3usize, 3usize), (5, 11), (9, 9), (13, 5)] {
        let cells = vec![0x100 | 0x5; w * h];
        let grid = PuzzleGrid::from_randomizer_cells(&cells, w, h).unwrap();
        let bytes = generate_panel_from_grid(&grid, ColorPanelBackground::DarkGrey, None).unwrap();
        let header = WtxHeader::parse(&bytes).unwrap();
        assert_eq!((header.width, header.height), (512, 512), "{}x{}", w, h);
    }
}

#[test]
fn test_grid_length_mismatch() {
    assert!(matches!(
        PuzzleGrid::from_randomizer_cells(&[0; 10], 3, 3),
        Err(WtxError::Dimension(_))
    ));
}

#[test]
fn test_backgrounds_produce_different_panels() {
    let stones = example_stones();
    let outputs: Vec<_> = ColorPanelBackground::ALL
        .iter()
        .map(|&bg| generate_panel_from_3x3(&stones, bg).unwrap())
        .collect();
    for i in 0..outputs.len() {
        for j in i + 1..outputs.len() {
            assert_ne!(outputs[i], outputs[j]);
        }
    }
}

#[test]
fn test_panel_save_writes_hex_named_preview() {
    let dir = tempfile::tempdir().unwrap();
    let grid = PuzzleGrid::from_3x3(&example_stones());
    let save = PanelSave::new(0xBEEF, dir.path());
    generate_panel_from_grid(&grid, ColorPanelBackground::White, Some(&save)).unwrap();

    let path = dir.path().join("generated_beef.png");
    assert!(path.exists());

    let expected = paint_panel(&grid, ColorPanelBackground::White, &PanelStyle::default()).unwrap();
    let mut expected_png = Vec::new();
    write_rgba_to_writer(&expected, &mut expected_png, &PngConfig::default()).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), expected_png);
}

#[test]
fn test_panel_style_keeps_alpha_when_asked() {
    let style = PanelStyle {
        clear_alpha: false,
        ..PanelStyle::default()
    };
    let grid = PuzzleGrid::from_3x3(&example_stones());
    let bytes = generate_panel_with_style(&grid, ColorPanelBackground::LightGrey, &style, None).unwrap();
    let canvas = WtxTexture::parse(&bytes).unwrap().decode_level(0).unwrap();
    assert!(canvas.data.iter().all(|px| px[3] == 255));
}

// ============================================================================
// Image conversion
// ============================================================================

#[test]
fn test_image_to_wtx_matches_direct_encoding() {
    let mut canvas = RasterCanvas::new(64, 32, Color::rgb(0.9, 0.4, 0.1));
    canvas.fill_rect(10, 10, 30, 20, Color::rgb(0.0, 0.2, 0.8));
    let mut png_bytes = Vec::new();
    write_rgba_to_writer(&canvas, &mut png_bytes, &PngConfig::default()).unwrap();

    let options = EncodeOptions {
        gen_mipmaps: true,
        format: WtxFormat::Dxt5,
        bits: 0,
    };
    let converted = image_to_wtx(&png_bytes, false, &options).unwrap();
    assert_eq!(converted, encode_wtx(&canvas, &options).unwrap());

    let header = WtxHeader::parse(&converted).unwrap();
    assert_eq!(header.mip_count, 7);
}

#[test]
fn test_image_to_wtx_errors() {
    let options = EncodeOptions::default();
    assert!(matches!(image_to_wtx(&[], false, &options), Err(WtxError::Decode(_))));
    assert!(matches!(
        image_to_wtx(b"\x89PNG\r\n\x1a\nbroken", false, &options),
        Err(WtxError::Decode(_))
    ));
}
