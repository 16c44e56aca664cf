//! Optional TOML overrides for asset paths and gameplay tunables.
//!
//! Every field falls back to the values in [`crate::constants`], so an empty file (or no file at
//! all) reproduces the stock scene.

use crate::constants::{
    AD_ASSETS, AD_INTERVAL, CHARACTER_ASSET, FADE_DURATION, LEVEL_ASSET, MAX_FRAME_DELTA,
    ROTATION_STEP_DEG, SPRINT_SPEED, WALK_SPEED,
};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Paths handed to the asset source, relative to its root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetManifest {
    pub level: String,
    pub character: String,
    pub ads: Vec<String>,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            level: LEVEL_ASSET.to_string(),
            character: CHARACTER_ASSET.to_string(),
            ads: AD_ASSETS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub fade_ms: u64,
    pub ad_interval_ms: u64,
    pub rotation_step_deg: f32,
    pub sprint_speed: f32,
    pub walk_speed: f32,
    pub max_frame_delta_ms: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            fade_ms: FADE_DURATION.as_millis() as u64,
            ad_interval_ms: AD_INTERVAL.as_millis() as u64,
            rotation_step_deg: ROTATION_STEP_DEG,
            sprint_speed: SPRINT_SPEED,
            walk_speed: WALK_SPEED,
            max_frame_delta_ms: MAX_FRAME_DELTA.as_millis() as u64,
        }
    }
}

impl Tunables {
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }

    /// Carousel period. Zero is bumped to one millisecond so the ticker always makes progress.
    pub fn ad_interval(&self) -> Duration {
        Duration::from_millis(self.ad_interval_ms.max(1))
    }

    pub fn rotation_step(&self) -> f32 {
        self.rotation_step_deg.to_radians()
    }

    /// Stall clamp for frame deltas. Zero is bumped to one millisecond so time still advances.
    pub fn max_frame_delta(&self) -> Duration {
        Duration::from_millis(self.max_frame_delta_ms.max(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub assets: AssetManifest,
    pub tunables: Tunables,
}

impl Config {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    /// Reads `path` if it exists. A missing file is not an error: callers fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(src) => Self::from_toml_str(&src).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(ConfigError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_stock_scene() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.assets.ads.len(), 4);
        assert_eq!(config.tunables.fade(), Duration::from_millis(400));
        assert_eq!(config.tunables.ad_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [assets]
            ads = ["only.png"]

            [tunables]
            sprint_speed = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.assets.ads, vec!["only.png".to_string()]);
        assert_eq!(config.assets.level, LEVEL_ASSET);
        assert_eq!(config.tunables.sprint_speed, 0.5);
        assert_eq!(config.tunables.walk_speed, WALK_SPEED);
    }

    #[test]
    fn zero_interval_is_bumped() {
        let tunables = Tunables {
            ad_interval_ms: 0,
            ..Tunables::default()
        };
        assert_eq!(tunables.ad_interval(), Duration::from_millis(1));
    }

    #[test]
    fn rotation_step_is_converted_to_radians() {
        let step = Tunables::default().rotation_step();
        assert!((step - 4.0_f32.to_radians()).abs() < 1.0e-6);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = Config::from_toml_str("[tunables]\nwalk_speed = \"fast\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let loaded = Config::load("definitely/not/here/settings.toml").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn zero_frame_clamp_is_floored_to_a_millisecond() {
        let tunables = Tunables {
            max_frame_delta_ms: 0,
            ..Tunables::default()
        };
        assert_eq!(tunables.max_frame_delta(), Duration::from_millis(1));

        let mut clock = crate::game_loop::FrameClock::new(tunables.max_frame_delta());
        clock.delta(Duration::ZERO);
        assert_eq!(clock.delta(Duration::from_millis(16)), Duration::from_millis(1));
    }
}
