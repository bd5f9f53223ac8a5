//! Configuration file handling.
//!
//! Loads configuration from `~/.config/camsnap/config.toml` or a custom path.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::{ButtonTheme, PreviewOptions};

/// Configuration file structure for camsnap.
/// Loaded from ~/.config/camsnap/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub button: ButtonConfig,
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraConfig {
    /// Device id to open on start (default: platform default device)
    pub device: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct PreviewConfig {
    /// Preview width in terminal cells
    pub width: Option<u16>,
    /// Preview height in terminal cells
    pub height: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ButtonConfig {
    pub background: Option<String>,
    pub color: Option<String>,
    pub padding: Option<String>,
    pub border: Option<String>,
    pub border_radius: Option<String>,
    pub font_size: Option<String>,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Resolve the presentation options, filling gaps with defaults.
    pub fn preview_options(&self) -> PreviewOptions {
        let defaults = PreviewOptions::default();
        let theme_defaults = ButtonTheme::default();
        PreviewOptions {
            width: self.preview.width.unwrap_or(defaults.width),
            height: self.preview.height.unwrap_or(defaults.height),
            button: ButtonTheme {
                background: self
                    .button
                    .background
                    .clone()
                    .unwrap_or(theme_defaults.background),
                color: self.button.color.clone().unwrap_or(theme_defaults.color),
                padding: self
                    .button
                    .padding
                    .clone()
                    .unwrap_or(theme_defaults.padding),
                border: self.button.border.clone().unwrap_or(theme_defaults.border),
                border_radius: self
                    .button
                    .border_radius
                    .clone()
                    .unwrap_or(theme_defaults.border_radius),
                font_size: self
                    .button
                    .font_size
                    .clone()
                    .unwrap_or(theme_defaults.font_size),
            },
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("com", "camsnap", "camsnap")
        .map(|d| d.config_dir().to_path_buf().join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/camsnap/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/camsnap.toml"))).unwrap();
        assert!(config.camera.device.is_none());
        assert_eq!(config.preview_options(), PreviewOptions::default());
    }

    #[test]
    fn test_load_parses_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r##"
[camera]
device = "1"

[preview]
width = 80
height = 24

[button]
background = "#222222"
"##
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.camera.device.as_deref(), Some("1"));

        let options = config.preview_options();
        assert_eq!(options.width, 80);
        assert_eq!(options.height, 24);
        assert_eq!(options.button.background, "#222222");
        // Unset theme fields fall back to defaults
        assert_eq!(options.button.color, "white");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[preview\nwidth = ").unwrap();

        let result = Config::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
        let msg = format!("{}", result.unwrap_err());
        assert!(msg.contains("Failed to parse config file"));
    }
}
