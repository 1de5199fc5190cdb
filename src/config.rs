use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codegen::{Framework, SvgMode};
use crate::transform::HiddenMode;

pub const DEFAULT_FIGMA_BASE_URL: &str = "https://api.figma.com/v1";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub framework: Framework,
    pub hidden_nodes: HiddenMode,
    pub spacing_tolerance: f64,
    pub svg_mode: SvgMode,
    pub with_props: bool,
    pub icons: IconThresholds,
    pub figma: FigmaSettings,
}

/// Size limits under which exportable nodes and components are treated as icons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconThresholds {
    pub max_export_size: f64,
    pub max_component_size: f64,
}

impl Default for IconThresholds {
    fn default() -> Self {
        Self {
            max_export_size: 64.0,
            max_component_size: 48.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigmaSettings {
    pub base_url: String,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for FigmaSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FIGMA_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            framework: Framework::ReactTailwind,
            hidden_nodes: HiddenMode::Drop,
            spacing_tolerance: 0.05,
            svg_mode: SvgMode::Inline,
            with_props: false,
            icons: IconThresholds::default(),
            figma: FigmaSettings::default(),
        }
    }
}

impl Config {
    /// `~/.config/fcg/config.toml`, when a home directory is known.
    pub fn central_config_path() -> Option<PathBuf> {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(|home| PathBuf::from(home).join(".config").join("fcg").join("config.toml"))
    }

    /// Explicit path > central config > defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::central_config_path() {
                Some(central) if central.is_file() => Self::from_file(&central),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigLoadError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=0.5).contains(&self.spacing_tolerance) {
            return Err(format!(
                "spacing_tolerance must be between 0 and 0.5, got {}",
                self.spacing_tolerance
            ));
        }
        if self.icons.max_export_size <= 0.0 || self.icons.max_component_size <= 0.0 {
            return Err("icon size thresholds must be positive".to_string());
        }
        if self.figma.timeout.is_zero() {
            return Err("figma.timeout must be greater than zero".to_string());
        }
        url::Url::parse(&self.figma.base_url)
            .map_err(|e| format!("figma.base_url '{}' is invalid: {}", self.figma.base_url, e))?;
        Ok(())
    }
}
