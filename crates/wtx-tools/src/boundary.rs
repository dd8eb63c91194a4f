//! C ABI exposed to the game's injected runtime.
//!
//! Every generator returns a [`TextureBuffer`] that the caller owns until it
//! hands it back to [`free_texbuf`]. A failed call returns the null buffer
//! (`data == NULL`, `len == 0`) and logs the reason; there is nothing to
//! release in that case. Enum parameters arrive as raw integers and are
//! validated here before anything else happens.

use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::ptr;
use std::slice;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{error, warn};

use crate::compress::WtxFormat;
use crate::config::EncodeOptions;
use crate::error::{WtxError, WtxResult};
use crate::generate;
use crate::line::{waypoints_from_xy, LineSpecRequest, Symmetry};
use crate::panel::{ColorPanelBackground, PanelSave, PuzzleGrid, WtxColor};

static OUTSTANDING: AtomicUsize = AtomicUsize::new(0);

/// Number of buffers handed out and not yet released.
pub fn outstanding_buffers() -> usize {
    OUTSTANDING.load(Ordering::SeqCst)
}

/// A WTX file owned by the caller.
#[repr(C)]
#[derive(Debug)]
pub struct TextureBuffer {
    pub data: *mut u8,
    pub len: usize,
}

impl TextureBuffer {
    /// The buffer returned by a failed call.
    pub const fn null() -> Self {
        Self {
            data: ptr::null_mut(),
            len: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    /// View the bytes.
    ///
    /// # Safety
    ///
    /// The buffer must come from this library and must not have been freed.
    pub unsafe fn as_slice(&self) -> &[u8] {
        if self.data.is_null() {
            &[]
        } else {
            slice::from_raw_parts(self.data, self.len)
        }
    }
}

/// An encoded image file (PNG, JPEG, ...) borrowed from the caller.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ImgFileBuffer {
    pub data: *const c_char,
    pub len: usize,
}

/// Move-only owner of a boundary allocation; dropping it releases the bytes.
#[derive(Debug)]
pub struct OwnedTexture {
    buffer: TextureBuffer,
}

impl OwnedTexture {
    /// Take ownership of freshly generated bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        let boxed = bytes.into_boxed_slice();
        let len = boxed.len();
        let data = Box::into_raw(boxed) as *mut u8;
        OUTSTANDING.fetch_add(1, Ordering::SeqCst);
        Self {
            buffer: TextureBuffer { data, len },
        }
    }

    /// Re-adopt a buffer previously released with [`OwnedTexture::into_raw`].
    ///
    /// # Safety
    ///
    /// `buffer` must be the null buffer or come from `into_raw`, and must not
    /// be adopted or freed twice.
    pub unsafe fn from_raw(buffer: TextureBuffer) -> Self {
        Self { buffer }
    }

    /// Hand the allocation to the caller without releasing it.
    pub fn into_raw(self) -> TextureBuffer {
        let buffer = TextureBuffer {
            data: self.buffer.data,
            len: self.buffer.len,
        };
        std::mem::forget(self);
        buffer
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: the buffer is owned by self and still allocated.
        unsafe { self.buffer.as_slice() }
    }

    pub fn len(&self) -> usize {
        self.buffer.len
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len == 0
    }
}

impl Drop for OwnedTexture {
    fn drop(&mut self) {
        if self.buffer.data.is_null() {
            return;
        }
        // SAFETY: data/len were produced by Box::into_raw on a boxed slice.
        unsafe {
            drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
                self.buffer.data,
                self.buffer.len,
            )));
        }
        self.buffer.data = ptr::null_mut();
        OUTSTANDING.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Run an entry point, turning errors and panics into the null buffer.
fn guarded<F>(entry: &'static str, body: F) -> TextureBuffer
where
    F: FnOnce() -> WtxResult<Vec<u8>>,
{
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(bytes)) => OwnedTexture::new(bytes).into_raw(),
        Ok(Err(err)) => {
            error!(entry, category = err.category(), code = err.code(), "{}", err);
            TextureBuffer::null()
        }
        Err(_) => {
            error!(entry, "generator panicked");
            TextureBuffer::null()
        }
    }
}

/// Borrow `len` elements, accepting a null pointer only for an empty slice.
unsafe fn borrow_slice<'a, T>(data: *const T, len: usize, what: &str) -> WtxResult<&'a [T]> {
    if data.is_null() {
        if len == 0 {
            return Ok(&[]);
        }
        return Err(WtxError::InvalidParameter(format!("{} pointer is null", what)));
    }
    Ok(slice::from_raw_parts(data, len))
}

unsafe fn line_request(
    xs: *const f32,
    ys: *const f32,
    len: usize,
    thickness: f32,
) -> WtxResult<LineSpecRequest> {
    let xs = borrow_slice(xs, len, "xs")?;
    let ys = borrow_slice(ys, len, "ys")?;
    let primary = waypoints_from_xy(xs, ys)?;
    Ok(LineSpecRequest::new(primary, f64::from(thickness)))
}

unsafe fn grid_from_raw(grid: *const u32, width: usize, height: usize) -> WtxResult<PuzzleGrid> {
    let len = width.checked_mul(height).ok_or_else(|| {
        WtxError::Dimension(format!("grid size {}x{} overflows", width, height))
    })?;
    let cells = borrow_slice(grid, len, "grid")?;
    PuzzleGrid::from_randomizer_cells(cells, width, height)
}

/// Release a buffer returned by any generator. The null buffer is ignored.
///
/// # Safety
///
/// `buf` must come from this library and must not be freed twice.
#[no_mangle]
pub unsafe extern "C" fn free_texbuf(buf: TextureBuffer) {
    if buf.is_null() {
        warn!("free_texbuf called with the null buffer");
        return;
    }
    drop(OwnedTexture::from_raw(buf));
}

/// Spec texture with one path given as parallel coordinate arrays.
///
/// # Safety
///
/// `xs` and `ys` must each point to `n` readable floats.
#[no_mangle]
pub unsafe extern "C" fn generate_desert_spec_line(
    xs: *const f32,
    ys: *const f32,
    n: usize,
    thickness: f32,
) -> TextureBuffer {
    guarded("generate_desert_spec_line", || {
        let request = line_request(xs, ys, n, thickness)?;
        generate::generate_line_spec(&request)
    })
}

/// Spec texture with two independent paths.
///
/// # Safety
///
/// `xs`/`ys` must point to `n` floats and `xs2`/`ys2` to `n2` floats.
#[no_mangle]
pub unsafe extern "C" fn generate_desert_spec_line_2(
    xs: *const f32,
    ys: *const f32,
    n: usize,
    xs2: *const f32,
    ys2: *const f32,
    n2: usize,
    thickness: f32,
) -> TextureBuffer {
    guarded("generate_desert_spec_line_2", || {
        let xs2 = borrow_slice(xs2, n2, "xs2")?;
        let ys2 = borrow_slice(ys2, n2, "ys2")?;
        let secondary = waypoints_from_xy(xs2, ys2)?;
        let request = line_request(xs, ys, n, thickness)?.with_secondary(secondary);
        generate::generate_line_spec(&request)
    })
}

/// Spec texture with one path and its symmetric copies.
///
/// # Safety
///
/// `xs` and `ys` must each point to `n` readable floats.
#[no_mangle]
pub unsafe extern "C" fn generate_desert_spec_line_sym(
    xs: *const f32,
    ys: *const f32,
    n: usize,
    thickness: f32,
    symmetry: i32,
) -> TextureBuffer {
    guarded("generate_desert_spec_line_sym", || {
        let symmetry = Symmetry::from_raw(symmetry)?;
        let request = line_request(xs, ys, n, thickness)?.with_symmetry(symmetry);
        generate::generate_line_spec(&request)
    })
}

/// Spec texture from a NUL-terminated instruction string.
///
/// # Safety
///
/// `instructions` must be null or point to a NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn generate_desert_spec_wtx(instructions: *const c_char) -> TextureBuffer {
    guarded("generate_desert_spec_wtx", || {
        if instructions.is_null() {
            return Err(WtxError::InvalidParameter("instruction string is null".to_string()));
        }
        let text = CStr::from_ptr(instructions)
            .to_str()
            .map_err(|e| WtxError::Parse(format!("instructions are not UTF-8: {}", e)))?;
        generate::generate_instruction_spec(text)
    })
}

/// Color panel for a 3×3 board of row-major stone colors.
///
/// # Safety
///
/// `colors` must point to 9 readable values.
#[no_mangle]
pub unsafe extern "C" fn generate_tricolor_panel_3x3_wtx(colors: *const u32, bg: u32) -> TextureBuffer {
    guarded("generate_tricolor_panel_3x3_wtx", || {
        let raw = borrow_slice(colors, 9, "colors")?;
        let mut stones = [WtxColor::NoColor; 9];
        for (stone, &value) in stones.iter_mut().zip(raw) {
            *stone = WtxColor::from_raw(value)?;
        }
        let background = ColorPanelBackground::from_raw(bg)?;
        generate::generate_panel_from_3x3(&stones, background)
    })
}

/// Color panel for a flattened randomizer grid of `width * height` cells.
///
/// # Safety
///
/// `grid` must point to `width * height` readable values.
#[no_mangle]
pub unsafe extern "C" fn wtx_tools_generate_colorpanel_from_grid(
    grid: *const u32,
    width: usize,
    height: usize,
    bg: u32,
) -> TextureBuffer {
    guarded("wtx_tools_generate_colorpanel_from_grid", || {
        let background = ColorPanelBackground::from_raw(bg)?;
        let grid = grid_from_raw(grid, width, height)?;
        generate::generate_panel_from_grid(&grid, background, None)
    })
}

/// As [`wtx_tools_generate_colorpanel_from_grid`], also writing
/// `generated_<id in hex>.png` into the working directory.
///
/// # Safety
///
/// `grid` must point to `width * height` readable values.
#[no_mangle]
pub unsafe extern "C" fn wtx_tools_generate_colorpanel_from_grid_and_save(
    grid: *const u32,
    width: usize,
    height: usize,
    bg: u32,
    id: i32,
) -> TextureBuffer {
    guarded("wtx_tools_generate_colorpanel_from_grid_and_save", || {
        let background = ColorPanelBackground::from_raw(bg)?;
        let grid = grid_from_raw(grid, width, height)?;
        let save = PanelSave::new(id, PathBuf::from("."));
        generate::generate_panel_from_grid(&grid, background, Some(&save))
    })
}

/// Convert an in-memory image file to WTX. `format` is 0 for DXT5, 1 for DXT1.
///
/// # Safety
///
/// `image.data` must point to `image.len` readable bytes.
#[no_mangle]
pub unsafe extern "C" fn image_to_wtx(
    image: ImgFileBuffer,
    gen_mipmaps: bool,
    format: u32,
    bits: u8,
) -> TextureBuffer {
    guarded("image_to_wtx", || {
        let format = WtxFormat::from_raw(format)?;
        let bytes = borrow_slice(image.data as *const u8, image.len, "image")?;
        let options = EncodeOptions {
            gen_mipmaps,
            format,
            bits,
        };
        generate::image_to_wtx(bytes, false, &options)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_texture_roundtrip() {
        let owned = OwnedTexture::new(vec![1, 2, 3]);
        assert_eq!(owned.as_slice(), &[1, 2, 3]);
        let raw = owned.into_raw();
        assert!(!raw.is_null());
        let back = unsafe { OwnedTexture::from_raw(raw) };
        assert_eq!(back.len(), 3);
    }

    #[test]
    fn test_free_null_is_noop() {
        unsafe { free_texbuf(TextureBuffer::null()) };
    }

    #[test]
    fn test_invalid_enums_return_null() {
        let colors = [0u32; 9];
        let buf = unsafe { generate_tricolor_panel_3x3_wtx(colors.as_ptr(), 99) };
        assert!(buf.is_null());
        assert_eq!(buf.len, 0);

        let xs = [0.1f32, 0.9];
        let ys = [0.5f32, 0.5];
        let buf = unsafe { generate_desert_spec_line_sym(xs.as_ptr(), ys.as_ptr(), 2, 10.0, 16) };
        assert!(buf.is_null());

        let image = ImgFileBuffer {
            data: ptr::null(),
            len: 0,
        };
        assert!(unsafe { image_to_wtx(image, false, 7, 0) }.is_null());
    }

    #[test]
    fn test_null_pointers_are_rejected() {
        assert!(unsafe { generate_desert_spec_wtx(ptr::null()) }.is_null());
        assert!(unsafe { generate_desert_spec_line(ptr::null(), ptr::null(), 4, 10.0) }.is_null());
        assert!(unsafe { wtx_tools_generate_colorpanel_from_grid(ptr::null(), 7, 7, 0) }.is_null());
    }
}
