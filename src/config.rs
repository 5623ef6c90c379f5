//! Driver preferences
//!
//! Stored as TOML. A missing file means defaults; missing keys fall back to
//! their default values, including individual color slots.
//!
//! ```toml
//! keyboard = 3
//! midi_port = "LoopBe"
//!
//! [colors]
//! left_thumb = "#00ffff"
//!
//! [palette]
//! "0x07" = "#ff0000"
//! "0x2D" = "#00ff00"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use kk_lightguide::{
    select_profile, ColorAssignments, DeviceProfile, KeyboardModel, PaletteMap, SessionConfig,
};
use serde::{Deserialize, Serialize};

/// Port name fragment matched when none is configured
pub const DEFAULT_MIDI_PORT: &str = "LoopBe";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Keyboard model selector (0-6)
    #[serde(default = "default_keyboard")]
    pub keyboard: usize,
    /// Case-insensitive substring of the MIDI input port name
    #[serde(default = "default_midi_port")]
    pub midi_port: String,
    /// Sweep loops played on connect
    #[serde(default = "default_sweep_loops")]
    pub sweep_loops: u32,
    /// Sleep between empty MIDI polls
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How long `stop` waits for the worker
    #[serde(default = "default_shutdown_timeout_ms")]
    pub shutdown_timeout_ms: u64,
    #[serde(default)]
    pub colors: ColorAssignments,
    /// Recorded MK2 palette; absent means the built-in indices are used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub palette: Option<PaletteMap>,
}

fn default_keyboard() -> usize {
    KeyboardModel::default().index()
}

fn default_midi_port() -> String {
    DEFAULT_MIDI_PORT.to_string()
}

fn default_sweep_loops() -> u32 {
    kk_lightguide::sweep::DEFAULT_SWEEP_LOOPS
}

fn default_poll_interval_ms() -> u64 {
    1
}

fn default_shutdown_timeout_ms() -> u64 {
    2000
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            keyboard: default_keyboard(),
            midi_port: default_midi_port(),
            sweep_loops: default_sweep_loops(),
            poll_interval_ms: default_poll_interval_ms(),
            shutdown_timeout_ms: default_shutdown_timeout_ms(),
            colors: ColorAssignments::default(),
            palette: None,
        }
    }
}

impl DriverConfig {
    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kk-lightguide")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DriverConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Profile for the selected keyboard
    pub fn profile(&self) -> anyhow::Result<DeviceProfile> {
        Ok(select_profile(self.keyboard)?)
    }

    /// Selected model
    pub fn model(&self) -> anyhow::Result<KeyboardModel> {
        Ok(self.profile()?.model)
    }

    /// Session parameters built from these preferences
    pub fn session_config(&self) -> anyhow::Result<SessionConfig> {
        Ok(SessionConfig::new(self.profile()?)
            .with_colors(self.colors)
            .with_palette(self.palette.clone())
            .with_sweep_loops(self.sweep_loops)
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_shutdown_timeout(Duration::from_millis(self.shutdown_timeout_ms)))
    }

    /// Palette map, created empty on first use
    pub fn palette_mut(&mut self) -> &mut PaletteMap {
        self.palette.get_or_insert_with(PaletteMap::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kk_lightguide::{ColorSlot, Rgb};

    #[test]
    fn test_defaults() {
        let config = DriverConfig::default();
        assert_eq!(config.keyboard, 3);
        assert_eq!(config.midi_port, "LoopBe");
        assert_eq!(config.model().unwrap(), KeyboardModel::S61Mk1);
        assert!(config.palette.is_none());
    }

    #[test]
    fn test_empty_file_is_default() {
        let parsed: DriverConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, DriverConfig::default());
    }

    #[test]
    fn test_roundtrip() {
        let mut config = DriverConfig {
            keyboard: 1,
            midi_port: "Synthesia".into(),
            ..Default::default()
        };
        config.colors.set(ColorSlot::RightPinky, Rgb::new(0x12, 0x34, 0x56));
        config.palette_mut().insert(0x2D, Rgb::GREEN);
        config.palette_mut().insert(0x07, Rgb::RED);

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("right_pinky = \"#123456\""));
        let parsed: DriverConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);

        let order: Vec<u8> = parsed.palette.unwrap().iter().map(|(i, _)| i).collect();
        assert_eq!(order, vec![0x2D, 0x07]);
    }

    #[test]
    fn test_partial_colors() {
        let parsed: DriverConfig = toml::from_str(
            r##"
keyboard = 6

[colors]
default = "#00ff00"
"##,
        )
        .unwrap();
        assert_eq!(parsed.model().unwrap(), KeyboardModel::S25Mk1);
        assert_eq!(parsed.colors.get(ColorSlot::Default), Rgb::GREEN);
        assert_eq!(
            parsed.colors.get(ColorSlot::LeftPinky),
            ColorAssignments::default().get(ColorSlot::LeftPinky)
        );
    }

    #[test]
    fn test_bad_color_rejected() {
        let result = toml::from_str::<DriverConfig>("[colors]\nleft_ring = \"purple\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_keyboard() {
        let config = DriverConfig {
            keyboard: 9,
            ..Default::default()
        };
        assert!(config.session_config().is_err());
    }

    #[test]
    fn test_session_config() {
        let config = DriverConfig {
            keyboard: 0,
            sweep_loops: 5,
            poll_interval_ms: 3,
            ..Default::default()
        };
        let session = config.session_config().unwrap();
        assert_eq!(session.profile.model, KeyboardModel::S61Mk2);
        assert_eq!(session.sweep_loops, 5);
        assert_eq!(session.poll_interval, Duration::from_millis(3));
        assert_eq!(session.shutdown_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert_eq!(DriverConfig::load(&path).unwrap(), DriverConfig::default());

        let config = DriverConfig {
            keyboard: 2,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(DriverConfig::load(&path).unwrap(), config);
    }
}
