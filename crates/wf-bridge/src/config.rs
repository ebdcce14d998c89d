//! Bridge configuration, read from a TOML file.
//!
//! ```toml
//! log_level = "debug"
//!
//! [ui]
//! width = 420
//! height = 640
//!
//! [engine]
//! frame_gap = 80
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use wf_engine::EngineConfig;
use wf_engine::config::Size;

/// Plugin window size announced with `show-ui`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiSize {
    pub width: u32,
    pub height: u32,
}

impl Default for UiSize {
    fn default() -> Self {
        Self {
            width: 400,
            height: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub ui: UiSize,
    /// Canvas the in-memory host reports as its viewport.
    pub viewport: Size,
    /// `env_logger` filter used when `RUST_LOG` is unset.
    pub log_level: String,
    pub engine: EngineConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            ui: UiSize::default(),
            viewport: Size::new(1440.0, 900.0),
            log_level: "info".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl BridgeConfig {
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("invalid bridge config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(BridgeConfig::from_toml("").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn sections_override_selectively() {
        let config = BridgeConfig::from_toml(
            r#"
            log_level = "debug"

            [ui]
            width = 420
            height = 640

            [engine]
            frame_gap = 80
            default_font_family = "Roboto"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.ui, UiSize { width: 420, height: 640 });
        assert_eq!(config.viewport, Size::new(1440.0, 900.0));
        assert_eq!(config.engine.frame_gap, 80.0);
        assert_eq!(config.engine.default_font_family, "Roboto");
        assert_eq!(config.engine.navbar_link_spacing, 32.0);
    }

    #[test]
    fn bad_types_are_reported() {
        let err = BridgeConfig::from_toml("log_level = 3").unwrap_err();
        assert!(err.to_string().contains("invalid bridge config"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = BridgeConfig::load(Path::new("/nonexistent/wf-bridge.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/wf-bridge.toml"));
    }
}
