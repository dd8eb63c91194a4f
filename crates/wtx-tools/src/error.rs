//! Error type shared by every generation entry point.

use thiserror::Error;

use crate::png::PngError;

/// Errors from texture generation and WTX encoding.
#[derive(Debug, Error)]
pub enum WtxError {
    /// Malformed path instruction string.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The image decoder rejected the input bytes.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Grid or image dimensions do not match what the caller declared.
    #[error("Dimension error: {0}")]
    Dimension(String),

    /// Unknown format, background, color or symmetry value.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A WTX buffer failed to parse.
    #[error("Invalid WTX container: {0}")]
    Container(String),

    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WtxError {
    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            WtxError::Parse(_) => "WTX_001",
            WtxError::Decode(_) => "WTX_002",
            WtxError::Dimension(_) => "WTX_003",
            WtxError::UnsupportedFormat(_) => "WTX_004",
            WtxError::InvalidParameter(_) => "WTX_005",
            WtxError::Container(_) => "WTX_006",
            WtxError::Png(_) => "WTX_007",
            WtxError::Io(_) => "WTX_008",
        }
    }

    /// Error category used when grouping diagnostics.
    pub fn category(&self) -> &'static str {
        "wtx"
    }
}

/// Result alias used throughout the crate.
pub type WtxResult<T> = Result<T, WtxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let errors = [
            WtxError::Parse(String::new()),
            WtxError::Decode(String::new()),
            WtxError::Dimension(String::new()),
            WtxError::UnsupportedFormat(String::new()),
            WtxError::InvalidParameter(String::new()),
            WtxError::Container(String::new()),
            WtxError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")),
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_display_includes_detail() {
        let err = WtxError::Parse("unknown token 'Foo'".into());
        assert_eq!(err.to_string(), "Parse error: unknown token 'Foo'");
        assert_eq!(err.category(), "wtx");
    }
}
