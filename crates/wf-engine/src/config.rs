//! Engine tunables. Every field has a default, so an empty `[engine]` table
//! (or none at all) yields a working configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Frame sizes for the `deviceType` of a new wireframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicePresets {
    pub desktop: Size,
    pub tablet: Size,
    pub mobile: Size,
}

impl Default for DevicePresets {
    fn default() -> Self {
        Self {
            desktop: Size::new(1440.0, 1024.0),
            tablet: Size::new(768.0, 1024.0),
            mobile: Size::new(375.0, 812.0),
        }
    }
}

impl DevicePresets {
    /// Preset for a device name; unknown names get the desktop size.
    pub fn for_device(&self, device: &str) -> Size {
        match device.to_ascii_lowercase().as_str() {
            "mobile" | "phone" => self.mobile,
            "tablet" => self.tablet,
            _ => self.desktop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Font family for text whose style names none.
    pub default_font_family: String,
    /// Horizontal gap between wireframe page frames.
    pub frame_gap: f32,
    pub devices: DevicePresets,
    /// Spacing between navbar links.
    pub navbar_link_spacing: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_font_family: "Inter".to_string(),
            frame_gap: 100.0,
            devices: DevicePresets::default(),
            navbar_link_spacing: 32.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_config_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"frame_gap": 40, "devices": {"mobile": {"width": 390, "height": 844}}}"#)
                .unwrap();
        assert_eq!(config.frame_gap, 40.0);
        assert_eq!(config.default_font_family, "Inter");
        assert_eq!(config.devices.mobile, Size::new(390.0, 844.0));
        assert_eq!(config.devices.desktop, Size::new(1440.0, 1024.0));
    }

    #[test]
    fn device_lookup() {
        let presets = DevicePresets::default();
        assert_eq!(presets.for_device("Mobile"), Size::new(375.0, 812.0));
        assert_eq!(presets.for_device("tablet"), Size::new(768.0, 1024.0));
        assert_eq!(presets.for_device("watch"), Size::new(1440.0, 1024.0));
    }
}
