//! Style file loading for `--config`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wtx_tools::config::{PanelStyle, SpecStyle};

/// Styles used by the generating commands. Missing sections keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    pub spec: SpecStyle,
    pub panel: PanelStyle,
}

impl ToolConfig {
    /// Load from a JSON file, or return the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded style config");
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("Failed to parse config JSON")?;
        config.spec.validate().context("Invalid spec style")?;
        config.panel.validate().context("Invalid panel style")?;
        Ok(config)
    }
}
