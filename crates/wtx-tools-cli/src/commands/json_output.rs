//! JSON output types for machine-readable command results.

use serde::{Deserialize, Serialize};
use wtx_tools::{WtxError, WtxFormat, WtxTexture};

/// Error codes for CLI operations.
pub mod error_codes {
    /// File read error
    pub const FILE_READ: &str = "CLI_001";
}

/// A structured error in JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonError {
    /// Stable error code (e.g., "CLI_001", "WTX_006")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Source file path (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl JsonError {
    /// Creates a new error with code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            file: None,
        }
    }

    /// Sets the file path for this error.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl From<&WtxError> for JsonError {
    fn from(err: &WtxError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

/// JSON output for the `inspect` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectOutput {
    pub success: bool,
    pub errors: Vec<JsonError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<InspectResult>,
    /// BLAKE3 hash of the whole file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
}

/// Header fields and level layout of one WTX file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InspectResult {
    pub width: u16,
    pub height: u16,
    pub depth: u16,
    pub mip_count: u16,
    pub bits: u8,
    pub format: WtxFormat,
    pub average_rgba: [f32; 4],
    pub body_len: u32,
    pub levels: Vec<LevelInfo>,
}

/// One mip level inside the body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LevelInfo {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub size: usize,
}

impl InspectResult {
    /// Summarize a parsed texture.
    pub fn from_texture(texture: &WtxTexture<'_>) -> Self {
        let header = &texture.header;
        let levels = texture
            .levels()
            .iter()
            .enumerate()
            .map(|(index, level)| {
                let (width, height) = header.level_dimensions(index);
                LevelInfo {
                    index,
                    width,
                    height,
                    size: level.len(),
                }
            })
            .collect();
        Self {
            width: header.width,
            height: header.height,
            depth: header.depth,
            mip_count: header.mip_count,
            bits: header.bits,
            format: header.format,
            average_rgba: header.average_rgba,
            body_len: header.body_len,
            levels,
        }
    }
}

impl InspectOutput {
    /// Creates a successful inspect output.
    pub fn success(result: InspectResult, source_hash: String) -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            result: Some(result),
            source_hash: Some(source_hash),
        }
    }

    /// Creates a failed inspect output.
    pub fn failure(errors: Vec<JsonError>, source_hash: Option<String>) -> Self {
        Self {
            success: false,
            errors,
            result: None,
            source_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_skips_missing_file() {
        let err = JsonError::new(error_codes::FILE_READ, "gone");
        let json = serde_json::to_string(&err).unwrap();
        assert!(!json.contains("file"));

        let json = serde_json::to_string(&err.with_file("a.wtx")).unwrap();
        assert!(json.contains("\"file\":\"a.wtx\""));
    }

    #[test]
    fn test_json_error_from_library_error() {
        let err = WtxError::Container("bad magic".to_string());
        let json_err = JsonError::from(&err);
        assert_eq!(json_err.code, err.code());
        assert!(json_err.message.contains("bad magic"));
    }

    #[test]
    fn test_failure_output_has_no_result() {
        let output = InspectOutput::failure(vec![JsonError::new(error_codes::FILE_READ, "x")], None);
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["success"], false);
        assert!(value.get("result").is_none());
        assert!(value.get("source_hash").is_none());
    }
}
