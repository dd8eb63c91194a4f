//! Tests for the C boundary: ownership, failure buffers and concurrency.
//!
//! The outstanding-buffer counter is process-wide, so every test here holds
//! `SERIAL` while it allocates.

use std::ffi::CString;
use std::sync::Mutex;
use std::thread;

use wtx_tools::boundary::{
    free_texbuf, generate_desert_spec_line, generate_desert_spec_line_2,
    generate_desert_spec_line_sym, generate_desert_spec_wtx, generate_tricolor_panel_3x3_wtx,
    image_to_wtx, outstanding_buffers, wtx_tools_generate_colorpanel_from_grid, ImgFileBuffer,
    OwnedTexture, TextureBuffer,
};
use wtx_tools::png::{write_rgba_to_writer, PngConfig};
use wtx_tools::wtx::WtxHeader;
use wtx_tools::{Color, RasterCanvas, WtxFormat};

static SERIAL: Mutex<()> = Mutex::new(());

const PATH_XS: [f32; 3] = [0.1, 0.5, 0.9];
const PATH_YS: [f32; 3] = [0.2, 0.8, 0.2];

fn serial() -> std::sync::MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn header_of(buf: &TextureBuffer) -> WtxHeader {
    let bytes = unsafe { buf.as_slice() };
    WtxHeader::parse(bytes).unwrap()
}

// ============================================================================
// Ownership
// ============================================================================

#[test]
fn test_generate_then_release_pairs() {
    let _guard = serial();
    let before = outstanding_buffers();

    for _ in 0..3 {
        let buf = unsafe {
            generate_desert_spec_line(PATH_XS.as_ptr(), PATH_YS.as_ptr(), PATH_XS.len(), 20.0)
        };
        assert!(!buf.is_null());
        assert_eq!(outstanding_buffers(), before + 1);
        unsafe { free_texbuf(buf) };
        assert_eq!(outstanding_buffers(), before);
    }
}

#[test]
fn test_failure_returns_null_without_allocating() {
    let _guard = serial();
    let before = outstanding_buffers();

    let bad = CString::new("TopLeft Nowhere").unwrap();
    let buf = unsafe { generate_desert_spec_wtx(bad.as_ptr()) };
    assert!(buf.is_null());
    assert_eq!(buf.len, 0);
    assert_eq!(outstanding_buffers(), before);

    // releasing the failure buffer is harmless
    unsafe { free_texbuf(buf) };
    assert_eq!(outstanding_buffers(), before);
}

#[test]
fn test_owned_texture_releases_on_drop() {
    let _guard = serial();
    let before = outstanding_buffers();

    let buf = unsafe {
        generate_desert_spec_line_sym(
            PATH_XS.as_ptr(),
            PATH_YS.as_ptr(),
            PATH_XS.len(),
            20.0,
            3,
        )
    };
    let owned = unsafe { OwnedTexture::from_raw(buf) };
    assert!(WtxHeader::parse(owned.as_slice()).is_ok());
    assert_eq!(outstanding_buffers(), before + 1);
    drop(owned);
    assert_eq!(outstanding_buffers(), before);
}

// ============================================================================
// Entry points
// ============================================================================

#[test]
fn test_every_generator_produces_valid_wtx() {
    let _guard = serial();
    let before = outstanding_buffers();

    let instructions = CString::new("TopLeft Top Center Bottom BottomLeft BottomLeftEnd").unwrap();
    let colors: [u32; 9] = [0, 3, 0, 2, 0, 3, 1, 2, 0];
    let mut grid = vec![0u32; 49];
    grid[3 * 7 + 3] = 0x100 | 0x9;

    let buffers = unsafe {
        vec![
            generate_desert_spec_line(PATH_XS.as_ptr(), PATH_YS.as_ptr(), 3, 25.0),
            generate_desert_spec_line_2(
                PATH_XS.as_ptr(),
                PATH_YS.as_ptr(),
                3,
                PATH_YS.as_ptr(),
                PATH_XS.as_ptr(),
                3,
                25.0,
            ),
            generate_desert_spec_wtx(instructions.as_ptr()),
            generate_tricolor_panel_3x3_wtx(colors.as_ptr(), 1),
            wtx_tools_generate_colorpanel_from_grid(grid.as_ptr(), 7, 7, 4),
        ]
    };

    for buf in &buffers {
        assert!(!buf.is_null());
        let header = header_of(buf);
        assert_eq!((header.width, header.height), (512, 512));
        assert_eq!(header.mip_count, 10);
    }
    assert_eq!(header_of(&buffers[0]).format, WtxFormat::Dxt1);
    assert_eq!(header_of(&buffers[3]).format, WtxFormat::Dxt5);
    assert_eq!(outstanding_buffers(), before + buffers.len());

    for buf in buffers {
        unsafe { free_texbuf(buf) };
    }
    assert_eq!(outstanding_buffers(), before);
}

#[test]
fn test_grid_length_mismatch_is_null() {
    let _guard = serial();
    let grid = vec![0u32; 48];
    // a 7x7 grid read from a 48-cell array would overrun; declare 6x8 instead
    let buf = unsafe { wtx_tools_generate_colorpanel_from_grid(grid.as_ptr(), 6, 8, 0) };
    assert!(!buf.is_null(), "6x8 matches 48 cells");
    unsafe { free_texbuf(buf) };

    let buf = unsafe { wtx_tools_generate_colorpanel_from_grid(grid.as_ptr(), 7, 7, 9) };
    assert!(buf.is_null(), "unknown background");
}

#[test]
fn test_image_to_wtx_from_png_bytes() {
    let _guard = serial();
    let mut canvas = RasterCanvas::new(40, 24, Color::rgb(0.1, 0.6, 0.3));
    canvas.fill_rect(0, 0, 20, 24, Color::rgba(1.0, 1.0, 1.0, 0.0));
    let mut png_bytes = Vec::new();
    write_rgba_to_writer(&canvas, &mut png_bytes, &PngConfig::default()).unwrap();

    let image = ImgFileBuffer {
        data: png_bytes.as_ptr() as *const std::ffi::c_char,
        len: png_bytes.len(),
    };
    let buf = unsafe { image_to_wtx(image, true, 1, 0x80) };
    assert!(!buf.is_null());
    let header = header_of(&buf);
    assert_eq!((header.width, header.height), (40, 24));
    assert_eq!(header.format, WtxFormat::Dxt1);
    assert_eq!(header.bits, 0x80);
    assert_eq!(header.mip_count, 6);
    unsafe { free_texbuf(buf) };

    // borrowed input is untouched
    assert_eq!(&png_bytes[1..4], b"PNG");
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_generate_and_release() {
    let _guard = serial();
    let before = outstanding_buffers();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let mut sizes = Vec::new();
                for _ in 0..2 {
                    let buf = if i % 2 == 0 {
                        let colors: [u32; 9] = [i as u32 % 8, 0, 0, 0, 2, 0, 0, 0, 3];
                        unsafe { generate_tricolor_panel_3x3_wtx(colors.as_ptr(), (i % 5) as u32) }
                    } else {
                        unsafe {
                            generate_desert_spec_line(
                                PATH_XS.as_ptr(),
                                PATH_YS.as_ptr(),
                                PATH_XS.len(),
                                10.0 + i as f32,
                            )
                        }
                    };
                    assert!(!buf.is_null());
                    sizes.push(buf.len);
                    unsafe { free_texbuf(buf) };
                }
                sizes
            })
        })
        .collect();

    for handle in handles {
        let sizes = handle.join().unwrap();
        assert_eq!(sizes[0], sizes[1]);
    }
    assert_eq!(outstanding_buffers(), before);
}

#[test]
fn test_same_input_same_bytes_across_threads() {
    let _guard = serial();
    let run = || {
        let buf = unsafe {
            generate_desert_spec_line(PATH_XS.as_ptr(), PATH_YS.as_ptr(), PATH_XS.len(), 18.0)
        };
        let owned = unsafe { OwnedTexture::from_raw(buf) };
        owned.as_slice().to_vec()
    };
    let reference = run();
    let others: Vec<Vec<u8>> = (0..4)
        .map(|_| thread::spawn(run))
        .map(|h| h.join().unwrap())
        .collect();
    for bytes in others {
        assert_eq!(bytes, reference);
    }
}
